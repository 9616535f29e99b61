//! Local filesystem backend, used in development and tests.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageError;
use crate::validate::{extension_for, validate_upload};
use crate::{AttachmentStore, StoredAttachment};

/// Stores attachments under `<base_path>/<namespace>/<uuid>.<ext>`.
pub struct LocalStore {
    base_path: PathBuf,
    max_upload_bytes: u64,
}

impl LocalStore {
    pub fn new(base_path: impl Into<PathBuf>, max_upload_bytes: u64) -> Self {
        LocalStore { base_path: base_path.into(), max_upload_bytes }
    }
}

#[async_trait]
impl AttachmentStore for LocalStore {
    async fn store(
        &self,
        namespace: &str,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredAttachment, StorageError> {
        validate_upload(mime_type, bytes.len() as u64, self.max_upload_bytes)?;

        let key = format!("{}.{}", Uuid::new_v4(), extension_for(mime_type));
        let dir = self.base_path.join(namespace);
        tokio::fs::create_dir_all(&dir).await?;
        let size_bytes = bytes.len() as u64;
        tokio::fs::write(dir.join(&key), bytes).await?;

        tracing::debug!(namespace, filename, key = %key, size_bytes, "Stored attachment locally");

        Ok(StoredAttachment {
            reference: format!("local://{namespace}/{key}"),
            mime_type: mime_type.to_string(),
            size_bytes,
        })
    }
}
