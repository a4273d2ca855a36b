//! Cheatsheet page assembly.
//!
//! [`PageRenderer`] builds two fragments from a catalog and fills them into a
//! page [`Template`]:
//!
//! - sidebar links, one per section, in **reverse** catalog order
//! - content, one heading and one prototype/description pair per operation, in
//!   forward catalog order
//!
//! Each section document is validated as a whole before any of its operations
//! are rendered. The first error in any section aborts the page.

use std::collections::HashMap;
use std::fmt::Write;

use opsheet_sections::{SectionCatalog, SectionDescriptor};
use opsheet_storage::{DocumentSource, StorageError};

use crate::markup::{MarkupError, escape_html, transform};
use crate::schema::{OpRecord, Schema, SchemaError};
use crate::template::{Template, TemplateError};

/// Error returned when the page cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A catalog section has no document.
    #[error("Section '{section}' has no document: {source}")]
    MissingSection {
        /// Section id.
        section: String,
        /// Underlying storage error.
        source: StorageError,
    },
    /// A section document exists but could not be loaded.
    #[error("Failed to load section '{section}': {source}")]
    Load {
        /// Section id.
        section: String,
        /// Underlying storage error.
        source: StorageError,
    },
    /// A section document failed validation.
    #[error("Invalid section '{section}': {source}")]
    Schema {
        /// Section id.
        section: String,
        /// Validation error.
        source: SchemaError,
    },
    /// An operation description has unbalanced inline code.
    #[error("Invalid markup in section '{section}', operation '{op}': {source}")]
    Markup {
        /// Section id.
        section: String,
        /// Operation name.
        op: String,
        /// Markup error.
        source: MarkupError,
    },
    /// Template substitution failed.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

impl RenderError {
    /// Section the error belongs to, if any.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        match self {
            Self::MissingSection { section, .. }
            | Self::Load { section, .. }
            | Self::Schema { section, .. }
            | Self::Markup { section, .. } => Some(section),
            Self::Template(_) => None,
        }
    }
}

/// Rendering options.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    /// Escape HTML special characters in catalog labels, prototypes and
    /// descriptions.
    ///
    /// Off by default: section documents are trusted and may carry markup.
    pub escape_html: bool,
}

/// Cheatsheet page renderer.
///
/// # Example
///
/// ```ignore
/// use opsheet_renderer::{PageRenderer, RenderOptions, Schema, Template};
///
/// let renderer = PageRenderer::new(Template::builtin()?)
///     .with_schema(Schema::default())
///     .with_options(RenderOptions { escape_html: true });
/// let html = renderer.render(&catalog, &source, "Teletype 4.0 Cheatsheet", &icon)?;
/// ```
#[derive(Clone, Debug)]
pub struct PageRenderer {
    template: Template,
    schema: Schema,
    options: RenderOptions,
}

impl PageRenderer {
    /// Create a renderer for the given page template.
    #[must_use]
    pub fn new(template: Template) -> Self {
        Self {
            template,
            schema: Schema::default(),
            options: RenderOptions::default(),
        }
    }

    /// Use a custom record schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Set rendering options.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Render the full page.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] on the first failing section, or if the title or
    /// icon is empty.
    pub fn render(
        &self,
        catalog: &SectionCatalog,
        source: &dyn DocumentSource,
        version_title: &str,
        icon_data_uri: &str,
    ) -> Result<String, RenderError> {
        if version_title.is_empty() {
            return Err(TemplateError::MissingValue("version".to_owned()).into());
        }
        if icon_data_uri.is_empty() {
            return Err(TemplateError::MissingValue("encoded_favicon".to_owned()).into());
        }

        let links = self.section_links(catalog);
        let content = self.section_content(catalog, source)?;

        let title = self.text(version_title);
        let values = HashMap::from([
            ("version", title.as_str()),
            ("encoded_favicon", icon_data_uri),
            ("section_links", links.as_str()),
            ("section_content", content.as_str()),
        ]);
        let html = self.template.render(&values)?;

        tracing::info!(
            sections = catalog.len(),
            bytes = html.len(),
            "Rendered cheatsheet page"
        );
        Ok(html)
    }

    /// Build the sidebar fragment.
    ///
    /// Sections are listed in reverse catalog order; the sidebar is rotated
    /// half a turn so it reads top-down in catalog order.
    pub fn section_links(&self, catalog: &SectionCatalog) -> String {
        let mut html = String::new();
        for section in catalog.iter_rev() {
            let id = self.text(&section.id);
            let label = self.link_label(section);
            let _ = writeln!(
                html,
                "<span class=\"section\"><a href=\"#{id}\" id=\"link-{id}\">{label}</a></span>"
            );
        }
        html
    }

    /// Build the content fragment.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] for the first section that is missing, fails
    /// validation or contains unbalanced inline code.
    pub fn section_content(
        &self,
        catalog: &SectionCatalog,
        source: &dyn DocumentSource,
    ) -> Result<String, RenderError> {
        let mut html = String::new();
        for section in catalog {
            let document = source.load(&section.id).map_err(|e| {
                if e.is_not_found() {
                    RenderError::MissingSection {
                        section: section.id.clone(),
                        source: e,
                    }
                } else {
                    RenderError::Load {
                        section: section.id.clone(),
                        source: e,
                    }
                }
            })?;

            let records = self
                .schema
                .validate(&document)
                .map_err(|e| RenderError::Schema {
                    section: section.id.clone(),
                    source: e,
                })?;

            self.render_section(&mut html, section, &records)?;
            tracing::debug!(
                section = %section.id,
                operations = records.len(),
                "Rendered section"
            );
        }
        Ok(html)
    }

    fn render_section(
        &self,
        html: &mut String,
        section: &SectionDescriptor,
        records: &[OpRecord],
    ) -> Result<(), RenderError> {
        let _ = writeln!(
            html,
            "<h2 class=\"section-title\" id=\"{}\">{}</h2>",
            self.text(&section.id),
            self.text(&section.title)
        );
        for record in records {
            let short = transform(&self.text(&record.short)).map_err(|e| RenderError::Markup {
                section: section.id.clone(),
                op: record.name.clone(),
                source: e,
            })?;
            let _ = writeln!(
                html,
                "<div class=\"prototype\">{}</div>",
                self.text(&record.prototype)
            );
            let _ = writeln!(html, "<div class=\"short\">{short}</div>");
        }
        Ok(())
    }

    fn link_label(&self, section: &SectionDescriptor) -> String {
        let abbreviation = self.text(&section.abbreviation);
        match &section.label_class {
            Some(class) => format!("<span class=\"{}\">{abbreviation}</span>", self.text(class)),
            None => abbreviation,
        }
    }

    /// Apply escaping if enabled.
    fn text(&self, s: &str) -> String {
        if self.options.escape_html {
            escape_html(s)
        } else {
            s.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use opsheet_storage::MockSource;
    use pretty_assertions::assert_eq;

    use super::*;

    const ONE_OP: &str = "[OP]\nprototype = \"X Y\"\nshort = \"does `X` to `Y`\"\n";

    fn catalog(ids: &[&str]) -> SectionCatalog {
        SectionCatalog::new(
            ids.iter()
                .map(|id| SectionDescriptor::new(*id, id.to_uppercase(), format!("Title {id}")))
                .collect(),
        )
        .unwrap()
    }

    fn renderer() -> PageRenderer {
        PageRenderer::new(Template::builtin().unwrap())
    }

    #[test]
    fn test_two_sections_end_to_end() {
        let catalog = catalog(&["a", "b"]);
        let source = MockSource::new()
            .with_section("a", ONE_OP)
            .with_section("b", ONE_OP);
        let renderer = renderer();

        let content = renderer.section_content(&catalog, &source).unwrap();
        assert_eq!(
            content,
            "<h2 class=\"section-title\" id=\"a\">Title a</h2>\n\
             <div class=\"prototype\">X Y</div>\n\
             <div class=\"short\">does <code>X</code> to <code>Y</code></div>\n\
             <h2 class=\"section-title\" id=\"b\">Title b</h2>\n\
             <div class=\"prototype\">X Y</div>\n\
             <div class=\"short\">does <code>X</code> to <code>Y</code></div>\n"
        );

        let links = renderer.section_links(&catalog);
        assert_eq!(
            links,
            "<span class=\"section\"><a href=\"#b\" id=\"link-b\">B</a></span>\n\
             <span class=\"section\"><a href=\"#a\" id=\"link-a\">A</a></span>\n"
        );
    }

    #[test]
    fn test_links_are_reverse_of_content() {
        let ids = ["variables", "maths", "stack", "turtle"];
        let catalog = catalog(&ids);
        let mut source = MockSource::new();
        for id in ids {
            source = source.with_section(id, ONE_OP);
        }
        let renderer = renderer();

        let content = renderer.section_content(&catalog, &source).unwrap();
        let links = renderer.section_links(&catalog);

        let content_order: Vec<_> = content
            .lines()
            .filter_map(|l| l.split("id=\"").nth(1))
            .map(|rest| rest.split('"').next().unwrap_or_default().to_owned())
            .collect();
        let mut link_order: Vec<_> = links
            .lines()
            .filter_map(|l| l.split("href=\"#").nth(1))
            .map(|rest| rest.split('"').next().unwrap_or_default().to_owned())
            .collect();
        link_order.reverse();

        assert_eq!(content_order, ids.to_vec());
        assert_eq!(link_order, content_order);
    }

    #[test]
    fn test_label_class_wraps_abbreviation() {
        let catalog = SectionCatalog::new(vec![
            SectionDescriptor::new("turtle", "🐢", "Turtle").with_label_class("fixturtle"),
        ])
        .unwrap();

        let links = renderer().section_links(&catalog);
        assert_eq!(
            links,
            "<span class=\"section\"><a href=\"#turtle\" id=\"link-turtle\">\
             <span class=\"fixturtle\">🐢</span></a></span>\n"
        );
    }

    #[test]
    fn test_operations_keep_document_order() {
        let catalog = catalog(&["maths"]);
        let source = MockSource::new().with_section(
            "maths",
            "[SUB]\nprototype = \"SUB\"\nshort = \"s\"\n[ADD]\nprototype = \"ADD\"\nshort = \"a\"\n",
        );

        let content = renderer().section_content(&catalog, &source).unwrap();
        let sub = content.find("SUB").unwrap();
        let add = content.find("ADD").unwrap();
        assert!(sub < add);
    }

    #[test]
    fn test_prototype_is_not_transformed() {
        let catalog = catalog(&["a"]);
        let source = MockSource::new()
            .with_section("a", "[Q]\nprototype = \"`Q`\"\nshort = \"plain\"\n");

        let content = renderer().section_content(&catalog, &source).unwrap();
        assert!(content.contains("<div class=\"prototype\">`Q`</div>"));
    }

    #[test]
    fn test_missing_section_aborts() {
        let catalog = catalog(&["a", "b"]);
        let source = MockSource::new().with_section("a", ONE_OP);

        let err = renderer()
            .render(&catalog, &source, "Title", "data:,")
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingSection { .. }));
        assert_eq!(err.section(), Some("b"));
    }

    #[test]
    fn test_unparseable_section_is_load_error() {
        let catalog = catalog(&["a"]);
        let source = MockSource::new().with_section("a", "[[[");

        let err = renderer().section_content(&catalog, &source).unwrap_err();
        assert!(matches!(err, RenderError::Load { .. }));
    }

    #[test]
    fn test_schema_error_names_section_and_operation() {
        let catalog = catalog(&["a", "b"]);
        let source = MockSource::new()
            .with_section("a", ONE_OP)
            .with_section("b", "[MUL]\nprototype = \"MUL x y\"\n");

        let err = renderer()
            .render(&catalog, &source, "Title", "data:,")
            .unwrap_err();
        assert_eq!(err.section(), Some("b"));
        assert_eq!(
            err.to_string(),
            "Invalid section 'b': Operation 'MUL' is missing required field 'short'"
        );
    }

    #[test]
    fn test_odd_backticks_fail_whole_build() {
        let catalog = catalog(&["a", "b"]);
        let source = MockSource::new()
            .with_section("a", ONE_OP)
            .with_section("b", "[BAD]\nprototype = \"BAD\"\nshort = \"open `code\"\n");

        let err = renderer()
            .render(&catalog, &source, "Title", "data:,")
            .unwrap_err();
        match err {
            RenderError::Markup {
                section,
                op,
                source,
            } => {
                assert_eq!(section, "b");
                assert_eq!(op, "BAD");
                assert_eq!(source, MarkupError::Unbalanced { count: 1 });
            }
            other => panic!("expected markup error, got {other:?}"),
        }
    }

    #[test]
    fn test_render_full_page() {
        let catalog = catalog(&["a"]);
        let source = MockSource::new().with_section("a", ONE_OP);

        let html = renderer()
            .render(
                &catalog,
                &source,
                "Teletype 4.0.0 Cheatsheet",
                "data:image/png;base64,AA==",
            )
            .unwrap();

        assert!(html.contains("<title>Teletype 4.0.0 Cheatsheet</title>"));
        assert!(html.contains("href=\"data:image/png;base64,AA==\""));
        assert!(html.contains("<div class=\"links\"><span class=\"section\">"));
        assert!(html.contains("<code>X</code>"));
    }

    #[test]
    fn test_render_rejects_empty_title_and_icon() {
        let catalog = catalog(&[]);
        let source = MockSource::new();

        let err = renderer().render(&catalog, &source, "", "data:,").unwrap_err();
        assert!(matches!(
            err,
            RenderError::Template(TemplateError::MissingValue(ref name)) if name == "version"
        ));

        let err = renderer().render(&catalog, &source, "Title", "").unwrap_err();
        assert!(matches!(
            err,
            RenderError::Template(TemplateError::MissingValue(ref name)) if name == "encoded_favicon"
        ));
    }

    #[test]
    fn test_empty_catalog_renders_empty_fragments() {
        let catalog = catalog(&[]);
        let source = MockSource::new();

        let html = renderer()
            .render(&catalog, &source, "Title", "data:,")
            .unwrap();
        assert!(html.contains("<div class=\"links\"></div>"));
        assert!(html.contains("<div class=\"content\"></div>"));
    }

    #[test]
    fn test_escape_option() {
        let catalog = catalog(&["a"]);
        let source = MockSource::new().with_section(
            "a",
            "[LT]\nprototype = \"< x y\"\nshort = \"`x < y` & more\"\n",
        );

        let raw = renderer().section_content(&catalog, &source).unwrap();
        assert!(raw.contains("<div class=\"prototype\">< x y</div>"));
        assert!(raw.contains("<code>x < y</code> & more"));

        let escaped = renderer()
            .with_options(RenderOptions { escape_html: true })
            .section_content(&catalog, &source)
            .unwrap();
        assert!(escaped.contains("<div class=\"prototype\">&lt; x y</div>"));
        assert!(escaped.contains("<code>x &lt; y</code> &amp; more"));
    }

    #[test]
    fn test_custom_schema_is_applied() {
        let catalog = catalog(&["a"]);
        let source = MockSource::new().with_section("a", ONE_OP);

        let err = renderer()
            .with_schema(Schema::new(["description"]))
            .section_content(&catalog, &source)
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Schema {
                source: SchemaError::MissingField { .. },
                ..
            }
        ));
    }
}
