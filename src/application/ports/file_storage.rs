use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage responded with {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Port for S3-compatible object storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Download object `key` into `destination`, returning the byte count
    async fn download(&self, key: &str, destination: &Path) -> Result<u64, StorageError>;

    /// Upload the file at `source` as object `key`
    async fn upload(&self, key: &str, source: &Path, content_type: &str)
        -> Result<u64, StorageError>;
}
