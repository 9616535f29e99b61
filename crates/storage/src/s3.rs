//! S3 backend for deployment.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use uuid::Uuid;

use crate::error::StorageError;
use crate::validate::{extension_for, validate_upload};
use crate::{AttachmentStore, StoredAttachment};

/// Stores attachments as `s3://<bucket>/<namespace>/<uuid>.<ext>`.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    max_upload_bytes: u64,
}

impl S3Store {
    /// Build a store from the ambient AWS environment (credentials chain,
    /// region, endpoint overrides for S3-compatible services).
    pub async fn from_env(bucket: String, max_upload_bytes: u64) -> Self {
        let config = aws_config::load_from_env().await;
        S3Store { client: aws_sdk_s3::Client::new(&config), bucket, max_upload_bytes }
    }
}

#[async_trait]
impl AttachmentStore for S3Store {
    async fn store(
        &self,
        namespace: &str,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredAttachment, StorageError> {
        validate_upload(mime_type, bytes.len() as u64, self.max_upload_bytes)?;

        let key = format!("{namespace}/{}.{}", Uuid::new_v4(), extension_for(mime_type));
        let size_bytes = bytes.len() as u64;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(mime_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        tracing::debug!(namespace, filename, key = %key, size_bytes, "Stored attachment in S3");

        Ok(StoredAttachment {
            reference: format!("s3://{}/{key}", self.bucket),
            mime_type: mime_type.to_string(),
            size_bytes,
        })
    }
}
