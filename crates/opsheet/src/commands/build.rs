//! `opsheet build` command implementation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use opsheet_config::{CliSettings, Config};
use opsheet_renderer::{RenderOptions, Schema};
use opsheet_site::{
    BuildConfig, FileIcon, GitDescribe, MetadataProvider, StaticMetadata, build_page,
};
use opsheet_storage::FsSource;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output file for the generated page ("-" writes to stdout).
    output: PathBuf,

    /// Section document directory (overrides config).
    #[arg(long)]
    ops_dir: Option<PathBuf>,

    /// Favicon image embedded in the page (overrides config).
    #[arg(long)]
    favicon: Option<PathBuf>,

    /// Page template file (overrides config).
    #[arg(long)]
    template: Option<PathBuf>,

    /// Version tag for the title (skips `git describe`).
    #[arg(long, env = "OPSHEET_TAG")]
    tag: Option<String>,

    /// Escape HTML special characters in section text.
    #[arg(long)]
    escape_html: bool,

    /// Path to configuration file (default: auto-discover opsheet.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (show INFO logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            ops_dir: self.ops_dir.clone(),
            favicon: self.favicon.clone(),
            template: self.template.clone(),
            tag: self.tag.clone(),
            escape_html: self.escape_html.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(config = ?config.config_path, "Loaded configuration");

        let catalog = config.catalog()?;
        let build_config = build_config(&config)?;
        let source = FsSource::new(config.docs_resolved.ops_dir.clone());
        let icon = FileIcon::new(config.page_resolved.favicon.clone());
        let metadata = metadata_provider(&config);

        output.building(&config.docs_resolved.ops_dir, catalog.len());

        let html = build_page(&build_config, &catalog, &source, metadata.as_ref(), &icon)?;

        if self.output == Path::new("-") {
            std::io::stdout().lock().write_all(html.as_bytes())?;
            return Ok(());
        }

        fs::write(&self.output, &html)?;
        output.written(&self.output, html.len());
        Ok(())
    }
}

/// Translate loaded configuration into page build settings.
fn build_config(config: &Config) -> Result<BuildConfig, CliError> {
    let template = config
        .page_resolved
        .template
        .as_ref()
        .map(|path| {
            fs::read_to_string(path).map_err(|source| CliError::Template {
                path: path.display().to_string(),
                source,
            })
        })
        .transpose()?;

    Ok(BuildConfig {
        title_prefix: config.page.title_prefix.clone(),
        title_suffix: config.page.title_suffix.clone(),
        template,
        schema: Schema::new(config.schema.extra_required.iter().cloned()),
        options: RenderOptions {
            escape_html: config.page.escape_html,
        },
    })
}

/// Fixed tag when configured, otherwise `git describe` in the repository.
fn metadata_provider(config: &Config) -> Box<dyn MetadataProvider> {
    match &config.version.tag {
        Some(tag) => Box::new(StaticMetadata::new(tag.clone())),
        None => Box::new(GitDescribe::new(config.repo_dir.clone())),
    }
}
