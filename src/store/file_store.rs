use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// Failure modes of the single-record store. "Never written" is
/// distinguishable from "written but unreadable".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record has been written")]
    NotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Durable holder of exactly one serialized token record behind a single
/// file path. Writes replace the record wholesale; there is no
/// partial-update API. Concurrent writers race with last-writer-wins,
/// which is sufficient for a single-tenant, low-frequency service.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn read(&self) -> Result<Vec<u8>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    pub async fn write(&self, bytes: &[u8]) -> Result<(), StoreError> {
        debug!("writing token record to {}", self.path.display());
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}
