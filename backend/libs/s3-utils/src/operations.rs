/// S3 object operations
use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl, Client};
use std::sync::Arc;
use thiserror::Error;

use crate::config::S3Config;

#[derive(Debug, Error)]
pub enum S3Error {
    #[error("S3 upload failed for {key}: {reason}")]
    Upload { key: String, reason: String },
}

#[derive(Clone)]
pub struct S3Operations {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Operations {
    pub fn new(client: Arc<Client>, config: S3Config) -> Self {
        Self { client, config }
    }

    /// Upload a publicly readable object and return its URL
    pub async fn upload_public(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, S3Error> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| S3Error::Upload {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(bucket = %self.config.bucket, key = %key, size, "object uploaded");

        Ok(self.config.object_url(key))
    }
}
