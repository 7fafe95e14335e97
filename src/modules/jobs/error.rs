use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::repository::RegistryError;
use super::validation::{FileKind, InvalidFormat};
use crate::infrastructure::queue::QueueError;
use crate::infrastructure::storage::StorageError;

/// Failure taxonomy of the job pipeline. Each external dependency failure is
/// surfaced immediately with its step; nothing here is retried.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("validation failed: {0}")]
    Validation(#[from] InvalidFormat),
    #[error("failed to upload {file}: {source}")]
    StorageUpload {
        file: FileKind,
        source: StorageError,
    },
    #[error("failed to read from storage: {0}")]
    StorageRead(StorageError),
    #[error("failed to create job: {0}")]
    Registration(#[from] RegistryError),
    #[error("failed to publish job: {0}")]
    Publish(#[from] QueueError),
    #[error("not found")]
    NotFound,
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        let status = match self {
            JobError::Validation(_) => StatusCode::BAD_REQUEST,
            JobError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
