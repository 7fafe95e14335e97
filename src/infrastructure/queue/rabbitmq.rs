use async_trait::async_trait;
use lapin::types::{FieldTable, ShortString};
use lapin::{
    options::*, BasicProperties, Channel, Connection, ConnectionProperties,
};
use tracing::info;

use super::{JobQueue, QueueError};
use crate::modules::jobs::events::JobMessage;

const REPLY_SUCCESS: u16 = 200;

/// RabbitMQ publisher. The connection and channel are opened once at startup;
/// a publish failure is surfaced to the caller, never retried here.
pub struct RabbitMqQueue {
    conn: Connection,
    channel: Channel,
    queue: String,
}

impl RabbitMqQueue {
    pub async fn connect(url: &str, queue: &str) -> Result<Self, QueueError> {
        info!(url, "Connecting to RabbitMQ");
        let conn = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(QueueError::Connect)?;

        let channel = conn.create_channel().await.map_err(QueueError::Channel)?;

        channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(QueueError::Declare)?;

        info!(queue, "✅ Connected to RabbitMQ");

        Ok(Self {
            conn,
            channel,
            queue: queue.to_string(),
        })
    }
}

#[async_trait]
impl JobQueue for RabbitMqQueue {
    async fn publish(&self, message: &JobMessage) -> Result<(), QueueError> {
        let payload = serde_json::to_vec(message)?;

        self.channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default()
                    .with_content_type(ShortString::from("application/json"))
                    .with_delivery_mode(2), // persistent
            )
            .await
            .map_err(QueueError::Publish)?
            .await
            .map_err(QueueError::Confirm)?;

        Ok(())
    }

    async fn close(&self) -> Result<(), QueueError> {
        self.channel
            .close(REPLY_SUCCESS, "shutdown")
            .await
            .map_err(QueueError::Close)?;
        self.conn
            .close(REPLY_SUCCESS, "shutdown")
            .await
            .map_err(QueueError::Close)?;
        Ok(())
    }
}
