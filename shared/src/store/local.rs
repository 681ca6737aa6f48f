//! Directory-backed document store for running outside AWS.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::PathBuf;

use super::BlobStore;
use crate::{Error, Result};

/// Stores each key as a file below `root`, e.g. `data/date-events/alice.json`.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        if key.split('/').any(|segment| segment.is_empty() || segment == "..") {
            return Err(Error::InvalidInput(format!("Invalid document key: {}", key)));
        }
        Ok(self.root.join(key))
    }
}

fn io_failure(path: &std::path::Path, e: std::io::Error) -> Error {
    Error::UpstreamFailure(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key)?;
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_failure(&path, e)),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<()> {
        let path = self.path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_failure(parent, e))?;
        }

        // Write then rename so readers never see a half-written document.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| io_failure(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_failure(&path, e))
    }

    async fn last_modified(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let path = self.path(key)?;
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_failure(&path, e)),
        };

        let modified = metadata.modified().map_err(|e| io_failure(&path, e))?;
        Ok(Some(DateTime::<Utc>::from(modified)))
    }
}
