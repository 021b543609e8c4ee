use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Accepted container formats, lowercase extensions.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mp4"];

/// A user-selected media file that passed format validation but has not been
/// uploaded yet. Consumed by upload submission.
#[derive(Debug, Clone)]
pub struct PendingAsset {
    pub id: String,
    pub path: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("Unsupported file format '.{0}' (expected .mp4)")]
    UnsupportedFormat(String),

    #[error("File name has no extension")]
    MissingExtension,
}

/// Validate a local file against the accepted-format policy. Only the name is
/// inspected; reading the file's contents happens at upload time.
pub fn select(path: &Path) -> Result<PendingAsset, RejectionReason> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .ok_or(RejectionReason::MissingExtension)?;

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(RejectionReason::UnsupportedFormat(extension));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    tracing::info!("Selected {} for upload", file_name);

    Ok(PendingAsset {
        id: Uuid::new_v4().to_string(),
        path: path.to_path_buf(),
        file_name,
    })
}
