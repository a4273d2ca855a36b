//! CLI error types.

use opsheet_config::ConfigError;
use opsheet_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("Failed to read template {path}: {source}")]
    Template {
        path: String,
        source: std::io::Error,
    },
}
