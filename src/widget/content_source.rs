//! Resolving attachment bytes for the expanded preview
//!
//! The preview treats the source as a black box that may fail. Failures are
//! kept inside the preview that asked and drawn in place of the content.

use std::fmt;
use std::path::{Path, PathBuf};

/// What a content source produced for a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentContent {
    /// Decoded text, shown as-is
    Text(String),
    /// Bytes that cannot be shown in a terminal
    Binary { len: usize, is_pdf: bool },
}

impl DocumentContent {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let is_pdf = bytes.starts_with(b"%PDF");
        if is_pdf {
            return Self::Binary {
                len: bytes.len(),
                is_pdf,
            };
        }
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Binary {
                len: e.as_bytes().len(),
                is_pdf,
            },
        }
    }
}

/// The content source could not produce a document's bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedAttachmentError {
    pub document_id: String,
    pub url: String,
    pub reason: String,
}

impl fmt::Display for UnresolvedAttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot resolve document {} from {}: {}",
            self.document_id, self.url, self.reason
        )
    }
}

impl std::error::Error for UnresolvedAttachmentError {}

/// Resolves `(document_id, url)` to renderable content
pub trait ContentSource {
    fn resolve(
        &self,
        document_id: &str,
        url: &str,
    ) -> Result<DocumentContent, UnresolvedAttachmentError>;
}

/// Reads local paths and `file://` URLs, relative to a base directory
#[derive(Debug, Clone, Default)]
pub struct FileContentSource {
    base_dir: Option<PathBuf>,
}

impl FileContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `base_dir` (usually the transcript's folder)
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn locate(&self, url: &str) -> Result<PathBuf, String> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Err("remote documents are not fetched".to_string());
        }
        let raw = url.strip_prefix("file://").unwrap_or(url);
        let path = Path::new(raw);
        match &self.base_dir {
            Some(base) if path.is_relative() => Ok(base.join(path)),
            _ => Ok(path.to_path_buf()),
        }
    }
}

impl ContentSource for FileContentSource {
    fn resolve(
        &self,
        document_id: &str,
        url: &str,
    ) -> Result<DocumentContent, UnresolvedAttachmentError> {
        let unresolved = |reason: String| UnresolvedAttachmentError {
            document_id: document_id.to_string(),
            url: url.to_string(),
            reason,
        };

        let path = self.locate(url).map_err(unresolved)?;
        let bytes = std::fs::read(&path).map_err(|e| unresolved(e.to_string()))?;
        tracing::debug!(document_id, path = %path.display(), len = bytes.len(), "Resolved attachment");
        Ok(DocumentContent::from_bytes(bytes))
    }
}
