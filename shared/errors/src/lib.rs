//! Shared error taxonomy and normalization pipeline for backend services
//!
//! Every service failure converges here: domain code raises an [`AppError`]
//! of a fixed [`ErrorKind`], infrastructure wrappers attach the underlying
//! cause to the `source()` chain, and the [`Normalizer`] collapses whatever
//! was caught into a stable [`NormalizedResponse`] envelope before it leaves
//! the service boundary.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// The `AppError` record and per-kind constructors
pub mod app_error;
/// Error kinds and their permanent status bindings
pub mod kind;
/// Failure normalization into the response envelope
pub mod normalizer;
/// Status-code to machine-code fallback registry
pub mod registry;
/// Axum response glue for the envelope
pub mod response;
/// Transport failures carrying a remote HTTP response
pub mod transport;

pub use app_error::AppError;
pub use kind::ErrorKind;
pub use normalizer::{error_handler, Failure, NormalizedResponse, Normalizer};
pub use registry::status_code_error;
pub use transport::TransportError;
