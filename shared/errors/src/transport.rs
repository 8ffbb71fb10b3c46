use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;

/// Failure produced when a remote HTTP call answered with an error status
///
/// Carries whatever the remote service put in its response: the status code
/// and, when the body was readable JSON, the body itself with its `message`
/// and `error` fields lifted out. The [`crate::Normalizer`] recognizes this
/// type structurally, including through `source()` chains.
#[derive(Debug, Default)]
pub struct TransportError {
    status: Option<u16>,
    message: Option<String>,
    error_code: Option<String>,
    body: Option<Value>,
}

impl TransportError {
    /// Creates a transport failure for a response status
    #[must_use]
    pub const fn new(status: u16) -> Self {
        Self {
            status: Some(status),
            message: None,
            error_code: None,
            body: None,
        }
    }

    /// Creates a transport failure with no usable response status
    #[must_use]
    pub const fn without_status() -> Self {
        Self {
            status: None,
            message: None,
            error_code: None,
            body: None,
        }
    }

    /// Attaches the response body, lifting `message` and `error` fields
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);
        self.error_code = body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_owned);
        self.body = Some(body);
        self
    }

    /// Response status code, if one was received
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// `message` field of the response body, if present
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// `error` field of the response body, if present
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    /// Raw response body, if it was readable JSON
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.message.as_deref(), self.status) {
            (Some(message), _) => f.write_str(message),
            (None, Some(status)) => write!(f, "remote service responded with status {status}"),
            (None, None) => f.write_str("remote service request failed"),
        }
    }
}

impl StdError for TransportError {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::TransportError;

    #[test]
    fn body_fields_are_lifted() {
        let error = TransportError::new(409).with_body(json!({
            "message": "email already registered",
            "error": "ENTRY_EXISTS",
            "detail": {"field": "email"},
        }));

        assert_eq!(error.status(), Some(409));
        assert_eq!(error.message(), Some("email already registered"));
        assert_eq!(error.error_code(), Some("ENTRY_EXISTS"));
        assert_eq!(error.to_string(), "email already registered");
    }

    #[test]
    fn non_string_fields_are_ignored() {
        let error = TransportError::new(500).with_body(json!({
            "message": 42,
            "error": ["nope"],
        }));

        assert_eq!(error.message(), None);
        assert_eq!(error.error_code(), None);
        assert_eq!(error.to_string(), "remote service responded with status 500");
    }

    #[test]
    fn statusless_failure_still_displays() {
        let error = TransportError::without_status();
        assert_eq!(error.status(), None);
        assert_eq!(error.to_string(), "remote service request failed");
    }
}
