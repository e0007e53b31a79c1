//! Attachment Service
//!
//! Ingests uploaded files into a session's file buffer and assembles the
//! multi-part user message sent to the model.
//!
//! ## Accepted uploads
//!
//! `png`, `jpg`, `jpeg`, `pdf`, `txt`, `csv`, `json`, `xlsx`. Images travel as
//! base64 image parts; text, CSV and JSON files travel as text parts carrying
//! their decoded content. Anything else is buffered but never attached.

use std::path::Path;

use base64::Engine;
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use scratchpad_chat_core::compact_timestamp;
use scratchpad_chat_llm::{Message, MessageContent};

use crate::models::attachment::UploadedFile;
use crate::utils::error::{AppError, AppResult};

/// Default size limit for path-based ingestion: 10 MiB
pub const DEFAULT_MAX_SIZE: usize = 10_485_760;

/// Extensions the uploader accepts
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "pdf", "txt", "csv", "json", "xlsx"];

// ============================================================================
// Helpers
// ============================================================================

fn media_type_from_extension(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

fn get_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Whether uploads of this media type carry a decoded text form.
pub fn has_text_form(media_type: &str) -> bool {
    media_type == "text/plain" || media_type == "text/csv" || media_type.contains("json")
}

fn decode_text(name: &str, bytes: &[u8]) -> AppResult<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| AppError::decode(format!("{} is not valid UTF-8: {}", name, e)))
}

/// Build an [`UploadedFile`] from raw bytes.
///
/// A text-like file that fails UTF-8 decoding is still accepted; its text
/// form is left absent.
pub fn ingest_bytes(name: &str, bytes: &[u8], now: DateTime<Local>) -> AppResult<UploadedFile> {
    let ext = get_extension(name);
    if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported file type: {} (accepted: {})",
            name,
            ACCEPTED_EXTENSIONS.join(", ")
        )));
    }

    let media_type = media_type_from_extension(&ext);
    let text_content = if has_text_form(media_type) {
        match decode_text(name, bytes) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(file = name, error = %e, "Keeping upload without text content");
                None
            }
        }
    } else {
        None
    };

    let file = UploadedFile {
        id: format!("{}_{}", name, compact_timestamp(&now)),
        name: name.to_string(),
        media_type: media_type.to_string(),
        size: bytes.len(),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
        text_content,
    };
    debug!(id = %file.id, media_type, size = file.size, "Ingested upload");
    Ok(file)
}

/// Read a file from disk and ingest it, enforcing `max_size` (default 10 MiB).
pub async fn ingest_path(path: &Path, max_size: Option<usize>) -> AppResult<UploadedFile> {
    let max = max_size.unwrap_or(DEFAULT_MAX_SIZE);

    let metadata = tokio::fs::metadata(path).await?;
    if !metadata.is_file() {
        return Err(AppError::validation(format!("Not a file: {}", path.display())));
    }

    let file_size = metadata.len();
    if file_size > max as u64 {
        return Err(AppError::validation(format!(
            "File too large: {} bytes (max {} bytes)",
            file_size, max
        )));
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::validation(format!("Invalid file name: {}", path.display())))?;
    let bytes = tokio::fs::read(path).await?;
    ingest_bytes(name, &bytes, Local::now())
}

/// Assemble the user message for one turn.
///
/// Without attachments this is a plain text message. Otherwise the text part
/// comes first, followed by one part per usable attachment in order.
pub fn build_user_message(text: &str, files: &[&UploadedFile]) -> Message {
    if files.is_empty() {
        return Message::user(text);
    }

    let mut parts = vec![MessageContent::text(text)];
    for file in files {
        if file.is_image() {
            parts.push(MessageContent::image(&file.media_type, &file.data));
        } else if let Some(content) = &file.text_content {
            parts.push(MessageContent::text(format!(
                "Content of file {}:\n\n{}",
                file.name, content
            )));
        } else {
            warn!(file = %file.name, media_type = %file.media_type, "Attachment has no sendable form, skipping");
        }
    }
    Message::user_parts(parts)
}

// ============================================================================
// FileBuffer
// ============================================================================

/// Uploaded files of one session, keyed by file id, in upload order.
#[derive(Debug, Clone, Default)]
pub struct FileBuffer {
    files: Vec<UploadedFile>,
}

impl FileBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; an upload with the same id replaces the earlier one.
    pub fn insert(&mut self, file: UploadedFile) -> String {
        let id = file.id.clone();
        match self.files.iter_mut().find(|f| f.id == id) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
        info!(id = %id, "File buffered");
        id
    }

    pub fn get(&self, id: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Look up every id, failing on the first unknown one.
    pub fn resolve(&self, ids: &[String]) -> AppResult<Vec<&UploadedFile>> {
        ids.iter()
            .map(|id| {
                self.get(id)
                    .ok_or_else(|| AppError::not_found(format!("Uploaded file '{}'", id)))
            })
            .collect()
    }

    pub fn remove(&mut self, id: &str) -> AppResult<UploadedFile> {
        let index = self
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| AppError::not_found(format!("Uploaded file '{}'", id)))?;
        Ok(self.files.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}
