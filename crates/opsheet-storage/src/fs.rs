//! Filesystem document source.
//!
//! Provides [`FsSource`] for reading one `<id>.toml` file per section from a
//! directory on the local filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::source::{DocumentSource, StorageError};

/// File extension of section documents.
const EXTENSION: &str = "toml";

/// Filesystem document source.
///
/// Maps section id `maths` to `<dir>/maths.toml`.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use opsheet_storage::{DocumentSource, FsSource};
///
/// let source = FsSource::new(PathBuf::from("docs/ops"));
/// let ops = source.load("stack")?;
/// ```
#[derive(Debug, Clone)]
pub struct FsSource {
    /// Directory containing section documents.
    dir: PathBuf,
}

impl FsSource {
    /// Create a new filesystem source rooted at `dir`.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory containing section documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a section id to its document path.
    ///
    /// Ids are single path components; anything that would escape `dir` is
    /// rejected.
    fn document_path(&self, id: &str) -> Result<PathBuf, StorageError> {
        let is_plain = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\'])
            && !id.starts_with('.');
        if !is_plain {
            return Err(StorageError::InvalidId(id.to_owned()));
        }
        Ok(self.dir.join(format!("{id}.{EXTENSION}")))
    }
}

impl DocumentSource for FsSource {
    fn load(&self, id: &str) -> Result<toml::Table, StorageError> {
        let path = self.document_path(id)?;
        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound {
                    id: id.to_owned(),
                    location: path.display().to_string(),
                }
            } else {
                StorageError::Read {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let table: toml::Table =
            toml::from_str(&content).map_err(|source| StorageError::Parse {
                location: path.display().to_string(),
                source,
            })?;

        tracing::debug!(
            section = %id,
            path = %path.display(),
            records = table.len(),
            "Loaded section document"
        );
        Ok(table)
    }
}
