//! File Commands
//!
//! Uploading files into the session buffer for use as chat attachments.

use std::path::PathBuf;

use chrono::Local;

use crate::models::attachment::UploadedFileInfo;
use crate::models::response::CommandResponse;
use crate::services::attachments::{ingest_bytes, ingest_path};
use crate::state::SessionState;
use crate::utils::error::AppResult;

/// Buffer an upload given as raw bytes
pub fn upload_file(
    session: &mut SessionState,
    name: &str,
    bytes: &[u8],
) -> CommandResponse<UploadedFileInfo> {
    let result: AppResult<UploadedFileInfo> = ingest_bytes(name, bytes, Local::now()).map(|file| {
        let info = UploadedFileInfo::from(&file);
        session.files.insert(file);
        info
    });
    result.into()
}

/// Buffer an upload read from disk (default limit 10 MiB)
pub async fn upload_file_from_path(
    session: &mut SessionState,
    path: String,
    max_size: Option<usize>,
) -> CommandResponse<UploadedFileInfo> {
    match ingest_path(&PathBuf::from(&path), max_size).await {
        Ok(file) => {
            let info = UploadedFileInfo::from(&file);
            session.files.insert(file);
            CommandResponse::ok(info)
        }
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Uploaded files, in upload order
pub fn list_files(session: &SessionState) -> CommandResponse<Vec<UploadedFileInfo>> {
    CommandResponse::ok(session.files.iter().map(UploadedFileInfo::from).collect())
}

/// Drop an uploaded file
pub fn remove_file(session: &mut SessionState, id: &str) -> CommandResponse<UploadedFileInfo> {
    session
        .files
        .remove(id)
        .map(|file| UploadedFileInfo::from(&file))
        .into()
}
