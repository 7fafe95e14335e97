use async_trait::async_trait;
use thiserror::Error;

use crate::modules::jobs::events::JobMessage;

pub mod rabbitmq;

pub use rabbitmq::RabbitMqQueue;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("failed to connect to RabbitMQ: {0}")]
    Connect(#[source] lapin::Error),
    #[error("failed to open channel: {0}")]
    Channel(#[source] lapin::Error),
    #[error("failed to declare queue: {0}")]
    Declare(#[source] lapin::Error),
    #[error("failed to publish message: {0}")]
    Publish(#[source] lapin::Error),
    #[error("failed to confirm publication: {0}")]
    Confirm(#[source] lapin::Error),
    #[error("failed to close queue connection: {0}")]
    Close(#[source] lapin::Error),
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Handoff channel to the processing worker. One named queue, one long-lived
/// connection owned by the implementation; `close` is called once at shutdown.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn publish(&self, message: &JobMessage) -> Result<(), QueueError>;

    async fn close(&self) -> Result<(), QueueError>;
}
