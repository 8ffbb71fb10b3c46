use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::Client as SqsClient;

/// SQS allows at most 10 messages per receive call
const MAX_RECEIVE_BATCH: i32 = 10;

/// Configuration for one queue
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Queue URL
    pub queue_url: String,
    /// Maximum number of messages per receive call (capped at 10)
    pub max_messages: i32,
    /// Long-poll wait time in seconds
    pub wait_time_seconds: i32,
    /// Visibility timeout for received messages, in seconds
    pub visibility_timeout: i32,
}

impl QueueConfig {
    /// Creates a configuration with the default polling parameters
    #[must_use]
    pub fn new(queue_url: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            max_messages: MAX_RECEIVE_BATCH,
            wait_time_seconds: 20,
            visibility_timeout: 30,
        }
    }

    /// Overrides the receive batch size, capped at the SQS maximum
    #[must_use]
    pub fn with_max_messages(mut self, max_messages: i32) -> Self {
        self.max_messages = max_messages.clamp(1, MAX_RECEIVE_BATCH);
        self
    }

    /// Overrides the long-poll wait time
    #[must_use]
    pub const fn with_wait_time_seconds(mut self, wait_time_seconds: i32) -> Self {
        self.wait_time_seconds = wait_time_seconds;
        self
    }

    /// Overrides the visibility timeout
    #[must_use]
    pub const fn with_visibility_timeout(mut self, visibility_timeout: i32) -> Self {
        self.visibility_timeout = visibility_timeout;
        self
    }
}

/// AWS configuration with retry and timeout settings
///
/// `endpoint_url` overrides the AWS endpoint, e.g. for LocalStack in
/// development.
pub async fn aws_config(endpoint_url: Option<&str>) -> aws_config::SdkConfig {
    let retry_config = RetryConfig::standard()
        .with_max_attempts(3)
        .with_initial_backoff(Duration::from_millis(50));

    let timeout_config = TimeoutConfig::builder()
        .operation_timeout(Duration::from_secs(30))
        .build();

    let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
        .await
        .to_builder()
        .retry_config(retry_config)
        .timeout_config(timeout_config);

    if let Some(endpoint_url) = endpoint_url {
        config_builder = config_builder.endpoint_url(endpoint_url);
    }

    config_builder.build()
}

/// SQS client over [`aws_config`]
pub async fn sqs_client(endpoint_url: Option<&str>) -> SqsClient {
    SqsClient::new(&aws_config(endpoint_url).await)
}
