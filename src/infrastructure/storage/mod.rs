use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use thiserror::Error;

pub mod s3;

pub use s3::S3Storage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to reach bucket: {0}")]
    Bucket(String),
    #[error("failed to upload object: {0}")]
    Upload(String),
    #[error("failed to read object: {0}")]
    Download(String),
    #[error("failed to stat object: {0}")]
    Metadata(String),
    #[error("failed to delete object: {0}")]
    Delete(String),
    #[error("object not found: {0}")]
    NotFound(String),
}

/// An object fetched from storage, ready to be streamed to a client.
/// Dropping the stream releases the underlying connection.
pub struct StoredObject {
    pub stream: Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>,
    pub size: i64,
    pub content_type: String,
}

/// Durable blob store addressed by path-like string keys.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, body: Bytes) -> Result<(), StorageError>;

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError>;

    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
