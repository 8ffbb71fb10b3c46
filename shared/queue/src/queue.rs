use std::sync::Arc;

use aws_sdk_sqs::Client as SqsClient;
use serde::Serialize;
use service_errors::AppError;

use crate::config::QueueConfig;

/// A received message, still unacknowledged
#[derive(Debug, Clone)]
pub struct QueueMessage {
    /// Raw message body as delivered by SQS
    pub body: String,
    /// Receipt handle for acknowledging the message
    pub receipt_handle: String,
    /// Message ID
    pub message_id: String,
}

/// Handle to one SQS queue
#[derive(Clone)]
pub struct Queue {
    sqs_client: Arc<SqsClient>,
    config: QueueConfig,
}

impl Queue {
    /// Creates a queue handle from a pre-configured SQS client
    #[must_use]
    pub const fn new(sqs_client: Arc<SqsClient>, config: QueueConfig) -> Self {
        Self { sqs_client, config }
    }

    /// The queue URL this handle operates on
    #[must_use]
    pub fn url(&self) -> &str {
        &self.config.queue_url
    }

    /// Serializes and enqueues a message, returning its message id
    ///
    /// # Errors
    /// Returns `AppError(Validation)` when the payload cannot be serialized
    /// and `AppError(Server)` on transport failure, with the SDK error
    /// preserved as the source.
    pub async fn enqueue<T: Serialize + ?Sized>(&self, message: &T) -> Result<String, AppError> {
        let body = serde_json::to_string(message).map_err(|err| {
            AppError::validation("Queue message cannot be serialized").with_source(err)
        })?;
        self.enqueue_raw(body).await
    }

    /// Enqueues an already-serialized body, returning the message id
    ///
    /// # Errors
    /// Returns `AppError(Server)` on transport failure.
    pub async fn enqueue_raw(&self, body: String) -> Result<String, AppError> {
        let result = self
            .sqs_client
            .send_message()
            .queue_url(&self.config.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|err| {
                AppError::server("Failed to enqueue SQS message").with_source(err)
            })?;

        tracing::debug!(queue_url = %self.config.queue_url, "Message enqueued");

        Ok(result
            .message_id()
            .map(std::string::ToString::to_string)
            .unwrap_or_default())
    }

    /// Long-polls the queue for up to the configured batch of messages
    ///
    /// # Errors
    /// Returns `AppError(Server)` on transport failure.
    pub async fn receive(&self) -> Result<Vec<QueueMessage>, AppError> {
        let result = self
            .sqs_client
            .receive_message()
            .queue_url(&self.config.queue_url)
            .max_number_of_messages(self.config.max_messages)
            .visibility_timeout(self.config.visibility_timeout)
            .wait_time_seconds(self.config.wait_time_seconds)
            .send()
            .await
            .map_err(|err| {
                AppError::server("Failed to receive SQS messages").with_source(err)
            })?;

        let messages = result
            .messages()
            .iter()
            .filter_map(|msg| {
                // A message without a body or receipt handle cannot be
                // processed or acknowledged; skip it.
                Some(QueueMessage {
                    body: msg.body()?.to_owned(),
                    receipt_handle: msg.receipt_handle()?.to_owned(),
                    message_id: msg.message_id().unwrap_or_default().to_owned(),
                })
            })
            .collect();

        Ok(messages)
    }

    /// Acknowledges a message by deleting it from the queue
    ///
    /// # Errors
    /// Returns `AppError(Server)` on transport failure.
    pub async fn ack(&self, receipt_handle: &str) -> Result<(), AppError> {
        self.sqs_client
            .delete_message()
            .queue_url(&self.config.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|err| {
                AppError::server("Failed to acknowledge SQS message").with_source(err)
            })?;

        Ok(())
    }
}
