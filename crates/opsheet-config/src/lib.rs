//! Configuration management for opsheet.
//!
//! Parses `opsheet.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` or `$VAR` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `docs.ops_dir`
//! - `page.title_prefix`
//! - `page.title_suffix`
//! - `page.favicon`
//! - `page.template`
//! - `version.tag`
//!
//! ## Sections
//!
//! `[[sections]]` entries define the catalog in display order. When absent,
//! the Teletype operator sections are used.

mod expand;

use std::path::{Path, PathBuf};

use opsheet_sections::{CatalogError, SectionCatalog, SectionDescriptor};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override section document directory.
    pub ops_dir: Option<PathBuf>,
    /// Override favicon file.
    pub favicon: Option<PathBuf>,
    /// Override page template file.
    pub template: Option<PathBuf>,
    /// Override version tag (skips git lookup).
    pub tag: Option<String>,
    /// Override HTML escaping.
    pub escape_html: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "opsheet.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Section document configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Page configuration.
    pub page: PageConfig,
    /// Version lookup configuration.
    pub version: VersionConfig,
    /// Operation record schema configuration.
    pub schema: SchemaConfig,
    /// Section catalog in display order.
    pub sections: Vec<SectionDescriptor>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved page asset paths (set after loading).
    #[serde(skip)]
    pub page_resolved: PagePaths,
    /// Resolved directory for version lookup (set after loading).
    #[serde(skip)]
    pub repo_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    ops_dir: Option<String>,
}

/// Resolved section document configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory holding one `<id>.toml` per section.
    pub ops_dir: PathBuf,
}

/// Page configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Words before the version tag in the page title.
    pub title_prefix: String,
    /// Words after the version tag in the page title.
    pub title_suffix: String,
    /// Favicon file, relative to the config file.
    favicon: Option<String>,
    /// Custom page template file, relative to the config file.
    template: Option<String>,
    /// Escape HTML special characters in section text.
    pub escape_html: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title_prefix: "Teletype".to_owned(),
            title_suffix: "Cheatsheet".to_owned(),
            favicon: None,
            template: None,
            escape_html: false,
        }
    }
}

/// Resolved page asset paths.
#[derive(Debug, Default)]
pub struct PagePaths {
    /// Favicon file embedded as a data URI.
    pub favicon: PathBuf,
    /// Custom page template. `None` uses the built-in page.
    pub template: Option<PathBuf>,
}

/// Version lookup configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    /// Fixed version tag. When unset, `git describe --tags` is used.
    pub tag: Option<String>,
    /// Repository directory for `git describe`, relative to the config file.
    repo_dir: Option<String>,
}

/// Operation record schema configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Fields required in addition to `prototype` and `short`.
    pub extra_required: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Invalid section catalog.
    #[error("Configuration error: {0}")]
    Catalog(#[from] CatalogError),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`version.tag`").
        field: String,
        /// Error message (e.g., "${`TT_TAG`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Teletype operator sections in display order.
fn default_sections() -> Vec<SectionDescriptor> {
    vec![
        SectionDescriptor::new("variables", "Var", "Variables"),
        SectionDescriptor::new("hardware", "H/W", "Hardware"),
        SectionDescriptor::new("patterns", "Pat", "Patterns"),
        SectionDescriptor::new("controlflow", "Flow", "Control flow"),
        SectionDescriptor::new("maths", "Math", "Maths"),
        SectionDescriptor::new("metronome", "Metro", "Metronome"),
        SectionDescriptor::new("delay", "Del", "Delay"),
        SectionDescriptor::new("stack", "Stack", "Stack"),
        SectionDescriptor::new("queue", "Queue", "Queue"),
        SectionDescriptor::new("seed", "Seed", "Seed"),
        SectionDescriptor::new("turtle", "🐢", "Turtle").with_label_class("fixturtle"),
    ]
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `opsheet.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. Validation runs
    /// on the result, so overrides are checked like file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Build the section catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Catalog` if a section id is empty or duplicated.
    pub fn catalog(&self) -> Result<SectionCatalog, ConfigError> {
        Ok(SectionCatalog::new(self.sections.clone())?)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(ops_dir) = &settings.ops_dir {
            self.docs_resolved.ops_dir.clone_from(ops_dir);
        }
        if let Some(favicon) = &settings.favicon {
            self.page_resolved.favicon.clone_from(favicon);
        }
        if let Some(template) = &settings.template {
            self.page_resolved.template = Some(template.clone());
        }
        if let Some(tag) = &settings.tag {
            self.version.tag = Some(tag.clone());
        }
        if let Some(escape_html) = settings.escape_html {
            self.page.escape_html = escape_html;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            page: PageConfig::default(),
            version: VersionConfig::default(),
            schema: SchemaConfig::default(),
            sections: default_sections(),
            docs_resolved: DocsConfig {
                ops_dir: base.join("docs/ops"),
            },
            page_resolved: PagePaths {
                favicon: base.join("docs/img/cheatsheet-favicon.png"),
                template: None,
            },
            repo_dir: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` or `ConfigError::Catalog` if any
    /// validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_sections()?;
        self.validate_schema()?;
        if let Some(tag) = &self.version.tag {
            require_non_empty(tag, "version.tag")?;
        }
        Ok(())
    }

    /// Validate the section catalog.
    fn validate_sections(&self) -> Result<(), ConfigError> {
        for section in &self.sections {
            require_non_empty(
                &section.abbreviation,
                &format!("sections.{}.abbreviation", section.id),
            )?;
            require_non_empty(&section.title, &format!("sections.{}.title", section.id))?;
        }
        self.catalog()?;
        Ok(())
    }

    /// Validate schema configuration.
    fn validate_schema(&self) -> Result<(), ConfigError> {
        for field in &self.schema.extra_required {
            require_non_empty(field, "schema.extra_required")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref ops_dir) = self.docs.ops_dir {
            self.docs.ops_dir = Some(expand::expand_env(ops_dir, "docs.ops_dir")?);
        }

        self.page.title_prefix = expand::expand_env(&self.page.title_prefix, "page.title_prefix")?;
        self.page.title_suffix = expand::expand_env(&self.page.title_suffix, "page.title_suffix")?;
        if let Some(ref favicon) = self.page.favicon {
            self.page.favicon = Some(expand::expand_env(favicon, "page.favicon")?);
        }
        if let Some(ref template) = self.page.template {
            self.page.template = Some(expand::expand_env(template, "page.template")?);
        }

        if let Some(ref tag) = self.version.tag {
            self.version.tag = Some(expand::expand_env(tag, "version.tag")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            ops_dir: resolve(self.docs.ops_dir.as_deref(), "docs/ops"),
        };
        self.page_resolved = PagePaths {
            favicon: resolve(
                self.page.favicon.as_deref(),
                "docs/img/cheatsheet-favicon.png",
            ),
            template: self.page.template.as_deref().map(|t| config_dir.join(t)),
        };
        self.repo_dir = resolve(self.version.repo_dir.as_deref(), ".");
    }
}
