//! S3-backed document store.

use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, Client};
use chrono::{DateTime, Utc};
use tracing::info;

use super::BlobStore;
use crate::{Error, Result};

pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::UpstreamFailure(format!(
                    "Failed to get s3://{}/{}: {}",
                    self.bucket, key, e
                )));
            }
        };

        let body = output.body.collect().await.map_err(|e| {
            Error::UpstreamFailure(format!(
                "Failed to read s3://{}/{}: {}",
                self.bucket, key, e
            ))
        })?;

        Ok(Some(body.into_bytes().to_vec()))
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        info!("Uploading s3://{}/{}", self.bucket, key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                Error::UpstreamFailure(format!(
                    "Failed to put s3://{}/{}: {}",
                    self.bucket, key, e
                ))
            })?;

        Ok(())
    }

    async fn last_modified(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let output = match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => {
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::UpstreamFailure(format!(
                    "Failed to head s3://{}/{}: {}",
                    self.bucket, key, e
                )));
            }
        };

        let modified = output
            .last_modified()
            .and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()))
            .ok_or_else(|| {
                Error::UpstreamFailure(format!(
                    "s3://{}/{} has no Last-Modified",
                    self.bucket, key
                ))
            })?;

        Ok(Some(modified))
    }
}
