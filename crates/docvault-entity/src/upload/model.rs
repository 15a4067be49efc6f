//! Upload request and response models.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// HTTP status the storage API returns for an accepted file.
pub const CREATED_STATUS: u16 = 201;

/// A file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name as it will appear in the archive.
    pub name: String,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

impl UploadFile {
    /// Create an upload entry.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            data: data.into(),
        }
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Result of uploading one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// The file this response belongs to.
    pub file_name: String,
    /// HTTP status returned for this file (0 when no response arrived).
    pub status: u16,
    /// Error detail returned by the API, if any.
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadResponse {
    /// Create a response.
    pub fn new(file_name: impl Into<String>, status: u16) -> Self {
        Self {
            file_name: file_name.into(),
            status,
            message: None,
        }
    }

    /// Attach an error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether the API accepted the file.
    pub fn is_created(&self) -> bool {
        self.status == CREATED_STATUS
    }
}
