//! Backing file of a materialised page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extension of documents the graph treats as pages rather than attachments.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Reference to the document (or attachment) behind a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub path: String,
    /// Extension without the dot, as written; empty when the file has none.
    /// Matching is case-sensitive, so `Note.MD` is an attachment.
    pub extension: String,
    pub modified: DateTime<Utc>,
}

impl FileHandle {
    pub fn new(path: impl Into<String>, modified: DateTime<Utc>) -> Self {
        let path = path.into();
        let extension = std::path::Path::new(&path)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, extension, modified }
    }

    pub fn is_markdown(&self) -> bool {
        self.extension == MARKDOWN_EXTENSION
    }
}
