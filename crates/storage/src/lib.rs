//! Attachment storage backends.
//!
//! Uploaded media (photos, videos, audio) is validated against the accepted
//! MIME types and size cap, then persisted to a backend behind the
//! [`AttachmentStore`] trait. Two backends are provided: local filesystem
//! for development and S3 for deployment.

pub mod error;
pub mod local;
pub mod s3;
pub mod validate;

use async_trait::async_trait;

pub use error::StorageError;
pub use local::LocalStore;
pub use s3::S3Store;
pub use validate::{validate_upload, ACCEPTED_MIME_TYPES, DEFAULT_MAX_UPLOAD_BYTES};

/// A stored attachment, identified by an opaque backend reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttachment {
    /// Backend-specific reference, e.g. `local://photos/<key>` or
    /// `s3://bucket/photos/<key>`. Persisted verbatim on the entry.
    pub reference: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Persists uploaded attachment blobs.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Validate and persist one upload under the given namespace
    /// (`photos`, `videos`, `audio`, `observations`).
    async fn store(
        &self,
        namespace: &str,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredAttachment, StorageError>;
}
