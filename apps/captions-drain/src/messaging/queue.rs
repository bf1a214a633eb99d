use async_trait::async_trait;
use lapin::{options::*, types::FieldTable, Channel};
use tracing::{debug, error, info};

/// One message fetched from the broker and not yet acked or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub delivery_tag: u64,
    pub payload: Vec<u8>,
    pub redelivered: bool,
    /// Messages still waiting in the queue behind this one, as reported by the broker.
    pub remaining: u32,
}

impl QueueMessage {
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Pull-style access to a single work queue.
///
/// Every message returned by `fetch_one` must be passed to exactly one of
/// `ack` or `requeue` before the next fetch.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    async fn fetch_one(&self) -> Result<Option<QueueMessage>, QueueError>;

    async fn ack(&self, message: &QueueMessage) -> Result<(), QueueError>;

    async fn requeue(&self, message: &QueueMessage) -> Result<(), QueueError>;
}

pub struct RabbitMqQueue {
    channel: Channel,
    queue_name: String,
}

impl RabbitMqQueue {
    pub fn new(channel: Channel, queue_name: String) -> Self {
        Self {
            channel,
            queue_name,
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Asserts the queue as durable. Matches how producers declare it, so
    /// repeated runs are a no-op on the broker.
    pub async fn declare(&self) -> Result<(), QueueError> {
        let queue = self
            .channel
            .queue_declare(
                &self.queue_name,
                QueueDeclareOptions {
                    durable: true,
                    passive: false,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| {
                error!(error = %e, queue = %self.queue_name, "Failed to declare queue");
                QueueError::DeclareFailed(e.to_string())
            })?;

        info!(
            queue = %self.queue_name,
            message_count = queue.message_count(),
            consumer_count = queue.consumer_count(),
            "Queue declared"
        );

        Ok(())
    }
}

#[async_trait]
impl WorkQueue for RabbitMqQueue {
    async fn fetch_one(&self) -> Result<Option<QueueMessage>, QueueError> {
        let message = self
            .channel
            .basic_get(&self.queue_name, BasicGetOptions { no_ack: false })
            .await
            .map_err(|e| {
                error!(error = %e, queue = %self.queue_name, "Failed to fetch message");
                QueueError::FetchFailed(e.to_string())
            })?;

        let Some(message) = message else {
            debug!(queue = %self.queue_name, "Queue is empty");
            return Ok(None);
        };

        let remaining = message.message_count;
        let delivery = message.delivery;

        debug!(
            delivery_tag = delivery.delivery_tag,
            redelivered = delivery.redelivered,
            remaining,
            payload_size = delivery.data.len(),
            "Fetched message"
        );

        Ok(Some(QueueMessage {
            delivery_tag: delivery.delivery_tag,
            payload: delivery.data,
            redelivered: delivery.redelivered,
            remaining,
        }))
    }

    async fn ack(&self, message: &QueueMessage) -> Result<(), QueueError> {
        let delivery_tag = message.delivery_tag;

        self.channel
            .basic_ack(delivery_tag, BasicAckOptions::default())
            .await
            .map_err(|e| {
                error!(error = %e, delivery_tag, "Failed to ack message");
                QueueError::AckFailed {
                    delivery_tag,
                    reason: e.to_string(),
                }
            })?;

        debug!(delivery_tag, "Message acked");
        Ok(())
    }

    async fn requeue(&self, message: &QueueMessage) -> Result<(), QueueError> {
        let delivery_tag = message.delivery_tag;

        self.channel
            .basic_nack(
                delivery_tag,
                BasicNackOptions {
                    multiple: false,
                    requeue: true,
                },
            )
            .await
            .map_err(|e| {
                error!(error = %e, delivery_tag, "Failed to requeue message");
                QueueError::RequeueFailed {
                    delivery_tag,
                    reason: e.to_string(),
                }
            })?;

        debug!(delivery_tag, "Message requeued");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Failed to declare queue: {0}")]
    DeclareFailed(String),

    #[error("Failed to fetch message: {0}")]
    FetchFailed(String),

    #[error("Failed to ack message {delivery_tag}: {reason}")]
    AckFailed { delivery_tag: u64, reason: String },

    #[error("Failed to requeue message {delivery_tag}: {reason}")]
    RequeueFailed { delivery_tag: u64, reason: String },
}
