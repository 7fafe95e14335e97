use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tokio_util::io::ReaderStream;
use tracing::info;

use super::{ObjectStorage, StorageError, StoredObject};

/// S3-compatible storage backed by MinIO.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub async fn connect(
        endpoint: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Result<Self, StorageError> {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO
            .build();

        let storage = Self {
            client: Client::from_conf(config),
            bucket: bucket.to_string(),
        };
        storage.ensure_bucket().await?;

        info!(bucket, "✅ Connected to S3 (MinIO)");
        Ok(storage)
    }

    async fn ensure_bucket(&self) -> Result<(), StorageError> {
        let missing = match self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
        {
            Ok(_) => false,
            Err(e) => match &e {
                SdkError::ServiceError(service_err)
                    if matches!(service_err.err(), HeadBucketError::NotFound(_)) =>
                {
                    true
                }
                _ => return Err(StorageError::Bucket(e.to_string())),
            },
        };

        if missing {
            self.client
                .create_bucket()
                .bucket(&self.bucket)
                .send()
                .await
                .map_err(|e| StorageError::Bucket(e.to_string()))?;
            info!(bucket = %self.bucket, "bucket created");
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, content_type: &str, body: Bytes) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    GetObjectError::NoSuchKey(_) => StorageError::NotFound(key.to_string()),
                    _ => StorageError::Download(e.to_string()),
                },
                _ => StorageError::Download(e.to_string()),
            })?;

        let size = resp.content_length().unwrap_or_default();
        let content_type = resp
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let stream = ReaderStream::new(resp.body.into_async_read());

        Ok(StoredObject {
            stream: Box::pin(stream),
            size,
            content_type,
        })
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    HeadObjectError::NotFound(_) => Ok(false),
                    _ => Err(StorageError::Metadata(e.to_string())),
                },
                _ => Err(StorageError::Metadata(e.to_string())),
            },
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;
        Ok(())
    }
}
