//! Cheatsheet page builder.

use opsheet_renderer::{PageRenderer, RenderError, RenderOptions, Schema, Template, TemplateError};
use opsheet_sections::SectionCatalog;
use opsheet_storage::DocumentSource;

use crate::icon::{IconError, IconProvider};
use crate::metadata::{MetadataError, MetadataProvider};

/// Configuration for page building.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Words before the version tag in the page title.
    pub title_prefix: String,
    /// Words after the version tag in the page title.
    pub title_suffix: String,
    /// Custom page template text. `None` uses the built-in page.
    pub template: Option<String>,
    /// Operation record schema.
    pub schema: Schema,
    /// Rendering options.
    pub options: RenderOptions,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            title_prefix: "Teletype".to_owned(),
            title_suffix: "Cheatsheet".to_owned(),
            template: None,
            schema: Schema::default(),
            options: RenderOptions::default(),
        }
    }
}

/// Error returned by the page builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Version lookup failed: {0}")]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Icon(#[from] IconError),
}

impl From<TemplateError> for BuildError {
    fn from(err: TemplateError) -> Self {
        Self::Render(err.into())
    }
}

/// Join title parts with single spaces, skipping empty ones.
///
/// # Examples
///
/// ```
/// use opsheet_site::page_title;
///
/// assert_eq!(page_title("Teletype", "v4.0.0", "Cheatsheet"), "Teletype v4.0.0 Cheatsheet");
/// assert_eq!(page_title("", "v4.0.0", "Cheatsheet"), "v4.0.0 Cheatsheet");
/// ```
pub fn page_title(prefix: &str, tag: &str, suffix: &str) -> String {
    [prefix, tag, suffix]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the cheatsheet page.
///
/// Looks up the version and icon, then renders every catalog section. Nothing
/// is returned unless every step succeeds.
///
/// # Errors
///
/// Returns [`BuildError`] from the first failing step.
pub fn build_page(
    config: &BuildConfig,
    catalog: &SectionCatalog,
    source: &dyn DocumentSource,
    metadata: &dyn MetadataProvider,
    icon: &dyn IconProvider,
) -> Result<String, BuildError> {
    let template = match &config.template {
        Some(text) => Template::page(text)?,
        None => Template::builtin()?,
    };

    let version = metadata.version()?;
    let title = page_title(&config.title_prefix, &version.tag, &config.title_suffix);
    let icon_uri = icon.data_uri()?;

    tracing::info!(title = %title, sections = catalog.len(), "Building cheatsheet");

    let renderer = PageRenderer::new(template)
        .with_schema(config.schema.clone())
        .with_options(config.options);
    Ok(renderer.render(catalog, source, &title, &icon_uri)?)
}
