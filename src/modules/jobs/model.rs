use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// One submitted media+audio pairing, tracked from submission through completion.
/// Records live only as long as the process; there is no durable job store.
#[derive(Debug, Clone)]
pub struct Job {
    pub uuid: Uuid,
    pub media_key: String,
    pub audio_key: String,
    pub status: JobStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Job {
    pub fn new(uuid: Uuid, media_key: String, audio_key: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            uuid,
            media_key,
            audio_key,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `Ready` is never written to the registry; it is inferred from the presence
/// of the output artifact in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Ready,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Ready => "ready",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
