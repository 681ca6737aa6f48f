//! Whole-document storage for per-user timelines and pricing records.

mod local;
mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::config::StorageConfig;
use crate::models::{Timeline, TransitInformation};
use crate::{Error, Result};

pub use local::LocalBlobStore;
pub use s3::S3BlobStore;

const JSON: &str = "application/json";

/// Opaque key-value store holding whole JSON documents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch a document, `None` if it does not exist
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrite a document
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Modification time of a document, `None` if it does not exist
    async fn last_modified(&self, key: &str) -> Result<Option<DateTime<Utc>>>;
}

/// Build the configured backend.
pub async fn from_config(config: &StorageConfig) -> Arc<dyn BlobStore> {
    match config {
        StorageConfig::S3 { bucket } => {
            let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            Arc::new(S3BlobStore::new(
                aws_sdk_s3::Client::new(&sdk_config),
                bucket.clone(),
            ))
        }
        StorageConfig::Local { root } => Arc::new(LocalBlobStore::new(root.clone())),
    }
}

pub fn timeline_key(username: &str) -> String {
    format!("date-events/{}.json", username)
}

pub fn transit_information_key(username: &str) -> String {
    format!("transit-informations/{}.json", username)
}

/// Typed access to the documents of one deployment.
#[derive(Clone)]
pub struct TimelineStore {
    blobs: Arc<dyn BlobStore>,
}

impl TimelineStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// The user's whole timeline, `None` if they never saved one.
    pub async fn get_timeline(&self, username: &str) -> Result<Option<Timeline>> {
        self.get_json(&timeline_key(username)).await
    }

    /// Replace the user's whole timeline.
    pub async fn put_timeline(&self, username: &str, timeline: &Timeline) -> Result<()> {
        let key = timeline_key(username);
        let body = serde_json::to_vec(timeline)?;
        debug!(key = %key, bytes = body.len(), "writing timeline");
        self.blobs.put(&key, body, JSON).await
    }

    pub async fn timeline_last_modified(&self, username: &str) -> Result<Option<DateTime<Utc>>> {
        self.blobs.last_modified(&timeline_key(username)).await
    }

    pub async fn get_transit_information(
        &self,
        username: &str,
    ) -> Result<Option<TransitInformation>> {
        self.get_json(&transit_information_key(username)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(body) = self.blobs.get(key).await? else {
            debug!(key = %key, "document not found");
            return Ok(None);
        };

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| Error::UpstreamFailure(format!("Stored document {} is invalid: {}", key, e)))
    }
}

/// In-memory store for tests.
#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct MemoryBlobStore {
        objects: Mutex<HashMap<String, (Vec<u8>, DateTime<Utc>)>>,
        failing: Mutex<bool>,
        pub(crate) puts: Mutex<Vec<String>>,
    }

    impl MemoryBlobStore {
        pub(crate) fn insert(&self, key: &str, body: &str, modified: DateTime<Utc>) {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (body.as_bytes().to_vec(), modified));
        }

        pub(crate) fn body(&self, key: &str) -> Option<String> {
            self.objects
                .lock()
                .unwrap()
                .get(key)
                .map(|(b, _)| String::from_utf8(b.clone()).unwrap())
        }

        pub(crate) fn fail_all(&self) {
            *self.failing.lock().unwrap() = true;
        }

        fn check(&self) -> Result<()> {
            if *self.failing.lock().unwrap() {
                return Err(Error::UpstreamFailure("store unavailable".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BlobStore for MemoryBlobStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.check()?;
            Ok(self.objects.lock().unwrap().get(key).map(|(b, _)| b.clone()))
        }

        async fn put(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<()> {
            self.check()?;
            self.puts.lock().unwrap().push(key.to_string());
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (body, Utc::now()));
            Ok(())
        }

        async fn last_modified(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
            self.check()?;
            Ok(self.objects.lock().unwrap().get(key).map(|(_, m)| *m))
        }
    }
}
