use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Job, JobStatus};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("job already exists: {0}")]
    Duplicate(Uuid),
    #[error("job not found: {0}")]
    NotFound(Uuid),
}

/// In-process job registry, the exclusive owner of all Job records. The lock is
/// held only for the map mutation itself, never across storage or queue I/O.
#[derive(Clone, Default)]
pub struct JobRepository {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
}

impl JobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, job: Job) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.uuid) {
            return Err(RegistryError::Duplicate(job.uuid));
        }
        jobs.insert(job.uuid, job);
        Ok(())
    }

    pub async fn get(&self, uuid: Uuid) -> Result<Job, RegistryError> {
        let jobs = self.jobs.read().await;
        jobs.get(&uuid)
            .cloned()
            .ok_or(RegistryError::NotFound(uuid))
    }

    /// Overwrites the stored status without enforcing transitions; the worker
    /// side is trusted to advance status sensibly.
    pub async fn update_status(&self, uuid: Uuid, status: JobStatus) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&uuid).ok_or(RegistryError::NotFound(uuid))?;
        job.status = status;
        job.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }
}
