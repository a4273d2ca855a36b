//! Document source trait and error types.

use std::io;
use std::path::PathBuf;

/// Error returned when a section document can't be produced.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    /// No document exists for the section.
    #[error("No document for section '{id}' ({location})")]
    NotFound {
        /// Requested section id.
        id: String,
        /// Where the document was looked up.
        location: String,
    },
    /// Section id can't name a document.
    #[error("Invalid section id {0:?}")]
    InvalidId(String),
    /// Document exists but couldn't be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Document is not valid TOML.
    #[error("Failed to parse {location}: {source}")]
    Parse {
        /// Document path or mock id.
        location: String,
        /// TOML parse error.
        source: toml::de::Error,
    },
}

impl StorageError {
    /// Whether the section simply has no document.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Source of section documents.
///
/// Each section id resolves to a table of operation name to record. Tables
/// iterate in the order the records were written.
pub trait DocumentSource: Send + Sync {
    /// Load the raw operation table for section `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the section has no document, or
    /// another variant if it can't be read or parsed.
    fn load(&self, id: &str) -> Result<toml::Table, StorageError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_only_not_found_is_not_found() {
        let missing = StorageError::NotFound {
            id: "grid".to_owned(),
            location: "/ops/grid.toml".to_owned(),
        };
        assert!(missing.is_not_found());
        assert!(!StorageError::InvalidId("../x".to_owned()).is_not_found());

        let denied = StorageError::Read {
            path: PathBuf::from("/ops/grid.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        };
        assert!(!denied.is_not_found());
    }

    #[test]
    fn test_display_names_section_and_location() {
        let err = StorageError::NotFound {
            id: "grid".to_owned(),
            location: "/ops/grid.toml".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "No document for section 'grid' (/ops/grid.toml)"
        );
        assert_eq!(
            StorageError::InvalidId("a/b".to_owned()).to_string(),
            "Invalid section id \"a/b\""
        );
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }
}
