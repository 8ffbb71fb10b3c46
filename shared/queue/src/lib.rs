//! SQS queue integration for backend services
//!
//! Thin wrappers over the AWS SDK: a [`Queue`] handle for sending,
//! receiving and acknowledging messages, and a [`Consumer`] long-poll loop
//! with per-message failure isolation, dead-letter forwarding and
//! cooperative shutdown.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Queue configuration and AWS client setup
pub mod config;
/// Long-poll consumption loop
pub mod consumer;
/// Send/receive/ack operations
pub mod queue;

pub use config::{aws_config, sqs_client, QueueConfig};
pub use consumer::{Consumer, MessageHandler};
pub use queue::{Queue, QueueMessage};
