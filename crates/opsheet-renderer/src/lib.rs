//! Section validation, inline markup and page assembly for opsheet.
//!
//! This crate turns a [`SectionCatalog`](opsheet_sections::SectionCatalog) and
//! a [`DocumentSource`](opsheet_storage::DocumentSource) into one HTML page.
//!
//! # Architecture
//!
//! - [`Schema`]: validates a whole section document into [`OpRecord`]s
//! - [`transform`]: turns backtick-delimited spans into `<code>` elements
//! - [`Template`]: named `${placeholder}` substitution, each exactly once
//! - [`PageRenderer`]: builds the sidebar and content fragments and fills the
//!   page template
//!
//! Any error in any section aborts the whole page; no partial output is ever
//! returned.
//!
//! # Example
//!
//! ```ignore
//! use opsheet_renderer::{PageRenderer, Template};
//!
//! let renderer = PageRenderer::new(Template::builtin()?);
//! let html = renderer.render(&catalog, &source, "Teletype 4.0 Cheatsheet", &icon)?;
//! ```

mod markup;
mod page;
mod schema;
mod template;

pub use markup::{MarkupError, escape_html, transform};
pub use page::{PageRenderer, RenderError, RenderOptions};
pub use schema::{OpRecord, Schema, SchemaError};
pub use template::{PAGE_PLACEHOLDERS, Template, TemplateError};
