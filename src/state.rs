use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::queue::JobQueue;
use crate::infrastructure::storage::ObjectStorage;
use crate::modules::jobs::repository::JobRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub jobs: JobRepository,
    pub storage: Arc<dyn ObjectStorage>,
    pub queue: Arc<dyn JobQueue>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        jobs: JobRepository,
        storage: Arc<dyn ObjectStorage>,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            config,
            jobs,
            storage,
            queue,
        }
    }
}
