//! Errors from the attachment storage layer.

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The declared MIME type is not one the platform accepts.
    #[error("Unsupported media type '{0}'")]
    RejectedType(String),

    /// The upload exceeds the size cap.
    #[error("Upload of {size} bytes exceeds the {limit} byte limit")]
    RejectedSize { size: u64, limit: u64 },

    /// The local filesystem backend failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The S3 backend failed.
    #[error("S3 error: {0}")]
    S3(String),
}
