use std::error::Error as StdError;
use std::fmt;

use serde_json::{Map, Value};

use crate::kind::ErrorKind;

/// Structured application failure
///
/// An `AppError` is an instance of an [`ErrorKind`]: its HTTP status and
/// status message are derived from the kind and can never disagree with it.
/// The record is immutable after construction; the builder methods consume
/// and return the value, so they can only run at the raise site.
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    error_code: Option<String>,
    meta: Option<Map<String, Value>>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Creates an error of the given kind
    ///
    /// An empty message is replaced by the kind's canonical status message.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.status_message().to_owned()
        } else {
            message
        };

        Self {
            kind,
            message,
            error_code: None,
            meta: None,
            source: None,
        }
    }

    /// Creates an error of the given kind with its default message
    #[must_use]
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.status_message())
    }

    /// Validation failure (422)
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Authentication failure (401)
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Authorization failure (403)
    #[must_use]
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Missing resource (404)
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Expired token (498)
    #[must_use]
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Invalid token (499)
    #[must_use]
    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenInvalid, message)
    }

    /// Malformed request (400)
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// Internal or upstream failure (500)
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    /// Already-existing resource (409)
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Empty result (204)
    #[must_use]
    pub fn no_content(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoContent, message)
    }

    /// Overrides the machine-readable error code
    #[must_use]
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Attaches a diagnostic key/value pair to the metadata bag
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Preserves the underlying failure on the `source()` chain
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The kind this error was raised as
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status code, derived from the kind
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// Canonical status message, derived from the kind
    #[must_use]
    pub const fn status_message(&self) -> &'static str {
        self.kind.status_message()
    }

    /// Human-readable message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Machine-readable code: the override if one was set, else the kind's
    #[must_use]
    pub fn error_code(&self) -> &str {
        self.error_code
            .as_deref()
            .unwrap_or_else(|| self.kind.error_code())
    }

    /// Diagnostic metadata attached at the raise site
    #[must_use]
    pub const fn meta(&self) -> Option<&Map<String, Value>> {
        self.meta.as_ref()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::AppError;
    use crate::kind::ErrorKind;

    #[test]
    fn default_message_is_the_status_message() {
        for kind in ErrorKind::iter() {
            let error = AppError::from_kind(kind);
            assert_eq!(error.message(), kind.status_message());
            assert_eq!(error.status_code(), kind.status_code());
            assert_eq!(error.error_code(), kind.error_code());
        }
    }

    #[test]
    fn empty_message_falls_back_to_the_status_message() {
        let error = AppError::validation("");
        assert_eq!(error.message(), "Unprocessable Entity");

        let error = AppError::validation("   ");
        assert_eq!(error.message(), "Unprocessable Entity");
    }

    #[test]
    fn explicit_message_is_kept() {
        let error = AppError::not_found("user 42 does not exist");
        assert_eq!(error.message(), "user 42 does not exist");
        assert_eq!(error.to_string(), "user 42 does not exist");
        assert_eq!(error.status_code(), 404);
    }

    #[test]
    fn error_code_override_wins() {
        let error = AppError::validation("bad payload").with_error_code("PAYLOAD_ERROR");
        assert_eq!(error.error_code(), "PAYLOAD_ERROR");
        // Status stays bound to the kind
        assert_eq!(error.status_code(), 422);
    }

    #[test]
    fn meta_accumulates_entries() {
        let error = AppError::server("upstream down")
            .with_meta("attempt", 3)
            .with_meta("queue", "billing");

        let meta = error.meta().expect("meta should be present");
        assert_eq!(meta.get("attempt"), Some(&serde_json::json!(3)));
        assert_eq!(meta.get("queue"), Some(&serde_json::json!("billing")));
    }

    #[test]
    fn source_rides_the_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = AppError::server("Failed to connect to Redis").with_source(io);

        let source = error.source().expect("source should be preserved");
        assert!(source.to_string().contains("refused"));
    }
}
