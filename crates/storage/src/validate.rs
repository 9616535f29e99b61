//! Upload validation shared by every backend.

use crate::error::StorageError;

/// MIME types the platform accepts for upload.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "video/mp4", "audio/mpeg"];

/// Default upload size cap (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Check the declared MIME type and payload size before persisting.
pub fn validate_upload(mime_type: &str, size: u64, limit: u64) -> Result<(), StorageError> {
    if !ACCEPTED_MIME_TYPES.contains(&mime_type) {
        return Err(StorageError::RejectedType(mime_type.to_string()));
    }
    if size > limit {
        return Err(StorageError::RejectedSize { size, limit });
    }
    Ok(())
}

/// Derive the file extension for a stored key from the MIME type. The
/// client-supplied filename is untrusted and only logged.
pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "video/mp4" => "mp4",
        "audio/mpeg" => "mp3",
        _ => "bin",
    }
}
