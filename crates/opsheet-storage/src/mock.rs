//! Mock document source for testing.
//!
//! Provides [`MockSource`] for unit testing without filesystem access.

use std::collections::HashMap;

use crate::source::{DocumentSource, StorageError};

/// Location reported in errors.
const LOCATION: &str = "mock source";

/// Mock document source for testing.
///
/// Stores TOML text per section id in memory and parses it on every load, so
/// record order and parse errors behave like the filesystem source.
///
/// # Example
///
/// ```ignore
/// use opsheet_storage::{DocumentSource, MockSource};
///
/// let source = MockSource::new()
///     .with_section("maths", "[ADD]\nprototype = \"ADD x y\"\nshort = \"add\"\n");
///
/// let ops = source.load("maths").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    sections: HashMap<String, String>,
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw TOML text for a section.
    #[must_use]
    pub fn with_section(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
        self.sections.insert(id.into(), content.into());
        self
    }
}

impl DocumentSource for MockSource {
    fn load(&self, id: &str) -> Result<toml::Table, StorageError> {
        let content = self
            .sections
            .get(id)
            .ok_or_else(|| StorageError::NotFound {
                id: id.to_owned(),
                location: LOCATION.to_owned(),
            })?;

        toml::from_str(content).map_err(|source| StorageError::Parse {
            location: format!("{LOCATION} section '{id}'"),
            source,
        })
    }
}
