//! Attachment Models
//!
//! Uploaded files held in a session's file buffer.

use serde::{Deserialize, Serialize};

/// An uploaded file, ready to be attached to a chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// `{file_name}_{YYYYmmddHHMMSS}`
    pub id: String,
    /// Original file name
    pub name: String,
    /// Media type derived from the extension
    pub media_type: String,
    /// Size in bytes of the raw upload
    pub size: usize,
    /// Raw bytes, base64 encoded
    pub data: String,
    /// Decoded text for text-like media types; absent when decoding failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Summary of an uploaded file returned to the UI (no payload)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFileInfo {
    pub id: String,
    pub name: String,
    pub media_type: String,
    pub size: usize,
    pub has_text: bool,
}

impl From<&UploadedFile> for UploadedFileInfo {
    fn from(file: &UploadedFile) -> Self {
        Self {
            id: file.id.clone(),
            name: file.name.clone(),
            media_type: file.media_type.clone(),
            size: file.size,
            has_text: file.text_content.is_some(),
        }
    }
}
