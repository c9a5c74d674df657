//! Attachment uploads for CV records (certificates, supporting documents,
//! profile photos). The store returns an `{url, key}` pair the wizard keeps
//! verbatim inside the owning record.

pub mod handlers;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::cv::document::Attachment;
use crate::cv::field_validation::AttachmentCategory;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("upload failed: {0}")]
    Upload(String),
}

/// A validated file ready to be stored.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub user_id: Uuid,
    pub category: AttachmentCategory,
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn upload(&self, upload: NewUpload) -> Result<Attachment, AttachmentError>;
}

/// Stores attachments in an S3-compatible bucket (MinIO locally, AWS in
/// production).
#[derive(Clone)]
pub struct S3AttachmentStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3AttachmentStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}

/// Object key for an upload: unique per call, grouped by user and slot.
pub fn object_key(user_id: Uuid, category: AttachmentCategory, file_name: &str) -> String {
    format!(
        "attachments/{}/{}/{}-{}",
        user_id,
        category.as_str(),
        Uuid::new_v4(),
        sanitize_file_name(file_name)
    )
}

fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[async_trait]
impl AttachmentStore for S3AttachmentStore {
    async fn upload(&self, upload: NewUpload) -> Result<Attachment, AttachmentError> {
        let key = object_key(upload.user_id, upload.category, &upload.file_name);
        let size = upload.body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(upload.body))
            .content_type(&upload.content_type)
            .send()
            .await
            .map_err(|e| AttachmentError::Upload(format!("S3 put_object failed: {e}")))?;

        info!(
            "Uploaded {} ({size} bytes) to s3://{}/{}",
            upload.category.as_str(),
            self.bucket,
            key
        );

        Ok(Attachment {
            url: self.public_url(&key),
            key,
        })
    }
}
