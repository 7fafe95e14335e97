use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::JobStatus;

/// One file extracted from the multipart upload request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub uuid: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub uuid: Uuid,
    pub status: JobStatus,
    /// Download URL, present once the output artifact exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A completed artifact ready to stream back to the caller.
pub struct FileDownload {
    pub stream: Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>,
    pub size: i64,
    pub content_type: String,
    pub filename: String,
}
