//! Section catalog for opsheet.
//!
//! A [`SectionCatalog`] is the ordered list of topical sections a cheatsheet
//! page is built from. Its order is the only ordering used anywhere in the
//! pipeline:
//!
//! - the content area walks the catalog forward ([`SectionCatalog::iter`])
//! - the sidebar walks it in reverse ([`SectionCatalog::iter_rev`]) so that the
//!   rotated, vertical link bar reads in the same order as the content
//!
//! Which sections appear, their order and their labels are data. Nothing in the
//! renderer special-cases a section id.
//!
//! # Example
//!
//! ```
//! use opsheet_sections::{SectionCatalog, SectionDescriptor};
//!
//! let catalog = SectionCatalog::new(vec![
//!     SectionDescriptor::new("maths", "Math", "Maths"),
//!     SectionDescriptor::new("stack", "Stack", "Stack"),
//! ])
//! .unwrap();
//!
//! let ids: Vec<_> = catalog.iter_rev().map(|s| s.id.as_str()).collect();
//! assert_eq!(ids, ["stack", "maths"]);
//! ```

use std::collections::HashSet;

/// One topical section of the cheatsheet.
///
/// Identity is the `id`, which also names the section's source document and
/// anchors its heading in the page.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SectionDescriptor {
    /// Section identifier (e.g. "maths").
    pub id: String,
    /// Short label shown in the sidebar (e.g. "Math").
    pub abbreviation: String,
    /// Heading shown above the section's operations.
    pub title: String,
    /// CSS class wrapping the sidebar label, if any.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub label_class: Option<String>,
}

impl SectionDescriptor {
    /// Create a descriptor without a label class.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        abbreviation: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            abbreviation: abbreviation.into(),
            title: title.into(),
            label_class: None,
        }
    }

    /// Wrap the sidebar label in a span with the given class.
    #[must_use]
    pub fn with_label_class(mut self, class: impl Into<String>) -> Self {
        self.label_class = Some(class.into());
        self
    }
}

/// Error returned when a catalog cannot be built.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two descriptors share an id.
    #[error("Duplicate section id: {0}")]
    DuplicateId(String),
    /// A descriptor has an empty id.
    #[error("Section at position {0} has an empty id")]
    EmptyId(usize),
}

/// Ordered, immutable sequence of [`SectionDescriptor`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionCatalog {
    sections: Vec<SectionDescriptor>,
}

impl SectionCatalog {
    /// Build a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if an id is empty or appears twice.
    pub fn new(sections: Vec<SectionDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(sections.len());
        for (index, section) in sections.iter().enumerate() {
            if section.id.is_empty() {
                return Err(CatalogError::EmptyId(index));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(CatalogError::DuplicateId(section.id.clone()));
            }
        }
        Ok(Self { sections })
    }

    /// Iterate sections in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, SectionDescriptor> {
        self.sections.iter()
    }

    /// Iterate sections in reverse display order.
    pub fn iter_rev(&self) -> std::iter::Rev<std::slice::Iter<'_, SectionDescriptor>> {
        self.sections.iter().rev()
    }

    /// Look up a section by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SectionDescriptor> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the catalog has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl<'a> IntoIterator for &'a SectionCatalog {
    type Item = &'a SectionDescriptor;
    type IntoIter = std::slice::Iter<'a, SectionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> SectionCatalog {
        SectionCatalog::new(vec![
            SectionDescriptor::new("variables", "Var", "Variables"),
            SectionDescriptor::new("maths", "Math", "Maths"),
            SectionDescriptor::new("turtle", "🐢", "Turtle").with_label_class("fixturtle"),
        ])
        .unwrap()
    }

    #[test]
    fn test_iter_keeps_given_order() {
        let catalog = sample();
        let ids: Vec<_> = catalog.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["variables", "maths", "turtle"]);
    }

    #[test]
    fn test_iter_rev_is_exact_reverse() {
        let catalog = sample();
        let forward: Vec<_> = catalog.iter().collect();
        let mut reversed: Vec<_> = catalog.iter_rev().collect();
        reversed.reverse();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = SectionCatalog::new(vec![
            SectionDescriptor::new("maths", "Math", "Maths"),
            SectionDescriptor::new("maths", "M", "More maths"),
        ]);
        assert_eq!(result, Err(CatalogError::DuplicateId("maths".to_owned())));
    }

    #[test]
    fn test_empty_id_rejected() {
        let result = SectionCatalog::new(vec![
            SectionDescriptor::new("maths", "Math", "Maths"),
            SectionDescriptor::new("", "?", "Nothing"),
        ]);
        assert_eq!(result, Err(CatalogError::EmptyId(1)));
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = SectionCatalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.iter_rev().count(), 0);
    }

    #[test]
    fn test_get_by_id() {
        let catalog = sample();
        let turtle = catalog.get("turtle").unwrap();
        assert_eq!(turtle.label_class.as_deref(), Some("fixturtle"));
        assert!(catalog.get("grid").is_none());
        assert_eq!(catalog.len(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_descriptor_without_label_class() {
        let section: SectionDescriptor =
            toml::from_str("id = \"delay\"\nabbreviation = \"Del\"\ntitle = \"Delay\"\n").unwrap();
        assert_eq!(section, SectionDescriptor::new("delay", "Del", "Delay"));
    }
}
