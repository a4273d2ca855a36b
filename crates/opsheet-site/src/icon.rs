//! Page icon as an embeddable data URI.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

/// Error returned when the icon can't be produced.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// Failed to read the icon file.
    #[error("Failed to read icon {}: {source}", path.display())]
    Io {
        /// Icon file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Source of the page icon.
pub trait IconProvider: Send + Sync {
    /// Icon encoded as a `data:` URI.
    ///
    /// # Errors
    ///
    /// Returns [`IconError`] if the icon can't be read.
    fn data_uri(&self) -> Result<String, IconError>;
}

/// Encode bytes as a base64 `data:` URI.
///
/// # Examples
///
/// ```
/// use opsheet_site::encode_data_uri;
///
/// assert_eq!(encode_data_uri("image/png", b"png"), "data:image/png;base64,cG5n");
/// ```
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

/// Guess an image MIME type from the file extension.
fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Icon read from a file on every call.
#[derive(Clone, Debug)]
pub struct FileIcon {
    path: PathBuf,
}

impl FileIcon {
    /// Create a provider for the icon at `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl IconProvider for FileIcon {
    fn data_uri(&self) -> Result<String, IconError> {
        let bytes = fs::read(&self.path).map_err(|source| IconError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "Encoded icon");
        Ok(encode_data_uri(guess_mime(&self.path), &bytes))
    }
}

/// Fixed, already-encoded icon URI.
#[derive(Clone, Debug)]
pub struct StaticIcon {
    uri: String,
}

impl StaticIcon {
    /// Create a provider returning `uri` unchanged.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

impl IconProvider for StaticIcon {
    fn data_uri(&self) -> Result<String, IconError> {
        Ok(self.uri.clone())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("favicon.png")), "image/png");
        assert_eq!(guess_mime(Path::new("favicon.ICO")), "image/x-icon");
        assert_eq!(guess_mime(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(guess_mime(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("icon")), "application/octet-stream");
    }

    #[test]
    fn test_encode_data_uri() {
        assert_eq!(
            encode_data_uri("image/png", &[0x89, b'P', b'N', b'G']),
            "data:image/png;base64,iVBORw=="
        );
        assert_eq!(encode_data_uri("image/png", &[]), "data:image/png;base64,");
    }

    #[test]
    fn test_file_icon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cheatsheet-favicon.png");
        fs::write(&path, b"icon").unwrap();

        let uri = FileIcon::new(path).data_uri().unwrap();
        assert_eq!(uri, "data:image/png;base64,aWNvbg==");
    }

    #[test]
    fn test_file_icon_missing() {
        let err = FileIcon::new(PathBuf::from("/nonexistent/favicon.png"))
            .data_uri()
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/favicon.png"));
    }

    #[test]
    fn test_static_icon() {
        let uri = StaticIcon::new("data:,").data_uri().unwrap();
        assert_eq!(uri, "data:,");
    }
}
