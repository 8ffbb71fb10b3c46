use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use service_errors::AppError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::queue::{Queue, QueueMessage};

/// Pause before retrying after a failed poll
const POLL_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Processes one decoded message at a time
///
/// A failed handler never stops the loop: the message is dead-lettered when
/// a dead-letter queue is configured and acknowledged either way.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Decoded message type
    type Message: DeserializeOwned + Send;

    /// Handles one message
    ///
    /// # Errors
    /// Any error marks the message as failed; it is then forwarded to the
    /// dead-letter queue (when configured) and acknowledged.
    async fn handle(&self, message: Self::Message) -> anyhow::Result<()>;
}

/// Cancellation-aware long-poll consumer
///
/// Repeatedly receives a batch, handles each message independently, and
/// acknowledges every message after handling regardless of outcome.
/// Transient polling failures are logged and retried; only cancellation
/// ends the loop.
pub struct Consumer<H> {
    queue: Arc<Queue>,
    dead_letter: Option<Arc<Queue>>,
    handler: H,
    shutdown: CancellationToken,
}

impl<H: MessageHandler> Consumer<H> {
    /// Creates a consumer for a queue
    #[must_use]
    pub fn new(queue: Arc<Queue>, handler: H, shutdown: CancellationToken) -> Self {
        Self {
            queue,
            dead_letter: None,
            handler,
            shutdown,
        }
    }

    /// Forwards failed messages to this queue before acknowledging them
    #[must_use]
    pub fn with_dead_letter(mut self, queue: Arc<Queue>) -> Self {
        self.dead_letter = Some(queue);
        self
    }

    /// Runs the poll loop until the cancellation token fires
    pub async fn run(self) {
        info!(queue_url = %self.queue.url(), "Starting queue consumer");

        while !self.shutdown.is_cancelled() {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("Queue consumer shutting down");
                    break;
                }
                result = self.poll_once() => {
                    if let Err(err) = result {
                        error!(error = %err, queue_url = %self.queue.url(), "Queue poll failed");
                        // Transient failure: pause briefly, stay alive
                        tokio::select! {
                            () = self.shutdown.cancelled() => break,
                            () = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                        }
                    }
                }
            }
        }

        info!("Queue consumer shutdown complete");
    }

    async fn poll_once(&self) -> Result<(), AppError> {
        let messages = self.queue.receive().await?;

        for message in messages {
            self.process_and_ack(message).await;
        }

        Ok(())
    }

    /// Handles one message and acknowledges it unconditionally
    async fn process_and_ack(&self, message: QueueMessage) {
        let outcome = match serde_json::from_str::<H::Message>(&message.body) {
            Ok(decoded) => self.handler.handle(decoded).await,
            Err(err) => Err(anyhow::Error::from(err).context("undecodable message body")),
        };

        if let Err(err) = outcome {
            error!(
                error = ?err,
                message_id = %message.message_id,
                "Message handling failed"
            );

            if let Some(dead_letter) = &self.dead_letter {
                if let Err(forward_err) = dead_letter.enqueue_raw(message.body.clone()).await {
                    error!(
                        error = %forward_err,
                        message_id = %message.message_id,
                        "Dead-letter forwarding failed"
                    );
                }
            }
        }

        // Ack regardless of the handler outcome; redelivery is the
        // dead-letter queue's job, not the visibility timeout's.
        if let Err(err) = self.queue.ack(&message.receipt_handle).await {
            warn!(
                error = %err,
                message_id = %message.message_id,
                "Failed to acknowledge message"
            );
        }
    }
}
