use std::error::Error as StdError;

use serde::Serialize;

use crate::app_error::AppError;
use crate::registry::status_code_error;
use crate::transport::TransportError;

/// Default machine code used when no failure shape supplies one
pub const FALLBACK_ERROR_CODE: &str = "FATAL_ERROR";

/// Default human message used when no failure shape supplies one
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Canonical response envelope for a normalized failure
///
/// A one-shot projection of a caught failure; nothing mutates it after
/// creation. Serializes with camelCase field names so every service emits
/// the same wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse {
    /// Always `false` on the failure path
    pub success: bool,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Machine-readable error code
    pub error: String,
    /// HTTP status code to respond with
    pub http_status_code: u16,
    /// Identifier of the emitting service
    pub service: String,
}

/// View over a caught failure of unknown origin
///
/// The normalizer never inspects concrete types directly; callers hand it
/// one of these three shapes and branching happens on structural checks.
#[derive(Clone, Copy)]
pub enum Failure<'a> {
    /// Nothing was actually caught
    Absent,
    /// Any error value; the chain is probed for known shapes
    Caught(&'a (dyn StdError + 'static)),
    /// A bare piece of text raised as a failure
    Text(&'a str),
}

impl<'a> Failure<'a> {
    /// Wraps an error value for normalization
    #[must_use]
    pub const fn caught(error: &'a (dyn StdError + 'static)) -> Self {
        Self::Caught(error)
    }
}

impl<'a> From<&'a AppError> for Failure<'a> {
    fn from(error: &'a AppError) -> Self {
        Self::Caught(error)
    }
}

impl<'a> From<&'a TransportError> for Failure<'a> {
    fn from(error: &'a TransportError) -> Self {
        Self::Caught(error)
    }
}

impl<'a> From<&'a str> for Failure<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a, T> From<Option<T>> for Failure<'a>
where
    T: Into<Failure<'a>>,
{
    fn from(failure: Option<T>) -> Self {
        failure.map_or(Self::Absent, Into::into)
    }
}

/// Collapses any caught failure into a [`NormalizedResponse`]
///
/// Configured once per call site with an explicit service identifier; the
/// normalizer never reads process-wide state. Normalization is a total,
/// pure, synchronous transform: it never fails itself and degrades to the
/// default envelope on any unexpected shape.
#[derive(Debug, Clone)]
pub struct Normalizer {
    service: String,
    fallback_code: String,
}

impl Normalizer {
    /// Creates a normalizer emitting the given service identifier
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            fallback_code: FALLBACK_ERROR_CODE.to_owned(),
        }
    }

    /// Overrides the machine code used when no failure supplies one
    #[must_use]
    pub fn with_fallback_code(mut self, code: impl Into<String>) -> Self {
        self.fallback_code = code.into();
        self
    }

    /// The default envelope: what normalization degrades to
    #[must_use]
    pub fn default_response(&self) -> NormalizedResponse {
        NormalizedResponse {
            success: false,
            message: FALLBACK_MESSAGE.to_owned(),
            error: self.fallback_code.clone(),
            http_status_code: 500,
            service: self.service.clone(),
        }
    }

    /// Normalizes a caught failure, branching on the first matching shape
    ///
    /// Priority order: application error, transport failure with a remote
    /// response, any other error, bare text. Application and transport
    /// errors are recognized anywhere on the `source()` chain, so wrapper
    /// errors do not hide them.
    #[must_use]
    pub fn normalize<'a>(&self, failure: impl Into<Failure<'a>>) -> NormalizedResponse {
        let mut response = self.default_response();

        match failure.into() {
            Failure::Absent => {}
            Failure::Text(text) => {
                if !text.is_empty() {
                    response.message = text.to_owned();
                }
            }
            Failure::Caught(error) => {
                if let Some(app) = find_in_chain::<AppError>(error) {
                    response.message = app.message().to_owned();
                    response.error = app.error_code().to_owned();
                    response.http_status_code = app.status_code();
                } else if let Some(transport) = find_in_chain::<TransportError>(error) {
                    let status = transport.status().unwrap_or(500);
                    response.http_status_code = status;
                    if let Some(message) = transport.message() {
                        response.message = message.to_owned();
                    }
                    response.error = transport.error_code().map_or_else(
                        || {
                            status_code_error(status)
                                .map_or_else(|| self.fallback_code.clone(), str::to_owned)
                        },
                        str::to_owned,
                    );
                } else {
                    // Generic runtime failure: keep the message, stay at 500.
                    // Rust errors carry no runtime class name, so the machine
                    // code stays at the configured fallback.
                    response.message = error.to_string();
                }
            }
        }

        response
    }
}

/// Normalizes a failure with a throwaway normalizer for the given service
#[must_use]
pub fn error_handler<'a>(
    failure: impl Into<Failure<'a>>,
    service: &str,
) -> NormalizedResponse {
    Normalizer::new(service).normalize(failure)
}

/// Walks the `source()` chain looking for a concrete failure shape
fn find_in_chain<'a, T: StdError + 'static>(
    error: &'a (dyn StdError + 'static),
) -> Option<&'a T> {
    let mut current = Some(error);
    while let Some(candidate) = current {
        if let Some(found) = candidate.downcast_ref::<T>() {
            return Some(found);
        }
        current = candidate.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::{error_handler, Failure, Normalizer};
    use crate::app_error::AppError;
    use crate::kind::ErrorKind;
    use crate::transport::TransportError;

    fn normalizer() -> Normalizer {
        Normalizer::new("billing-service")
    }

    #[test]
    fn absent_failure_yields_the_exact_default_envelope() {
        let response = normalizer().normalize(Failure::Absent);

        assert!(!response.success);
        assert_eq!(response.message, "Something went wrong");
        assert_eq!(response.error, "FATAL_ERROR");
        assert_eq!(response.http_status_code, 500);
        assert_eq!(response.service, "billing-service");
    }

    #[test]
    fn none_normalizes_like_absent() {
        let response = normalizer().normalize(None::<&AppError>);
        assert_eq!(response, normalizer().default_response());
    }

    #[test]
    fn every_kind_round_trips_code_and_status() {
        for kind in ErrorKind::iter() {
            let error = AppError::new(kind, "kaboom");
            let response = normalizer().normalize(&error);

            assert_eq!(response.message, "kaboom");
            assert_eq!(response.error, kind.error_code());
            assert_eq!(response.http_status_code, kind.status_code());
        }
    }

    #[test]
    fn app_error_code_override_survives_normalization() {
        let error = AppError::conflict("already there").with_error_code("DUPLICATE_ENTRY");
        let response = normalizer().normalize(&error);

        assert_eq!(response.error, "DUPLICATE_ENTRY");
        assert_eq!(response.http_status_code, 409);
    }

    #[test]
    fn transport_failure_uses_the_body_when_present() {
        let transport = TransportError::new(422).with_body(json!({
            "message": "amount must be positive",
            "error": "VALIDATION_ERROR",
        }));
        let response = normalizer().normalize(&transport);

        assert_eq!(response.message, "amount must be positive");
        assert_eq!(response.error, "VALIDATION_ERROR");
        assert_eq!(response.http_status_code, 422);
    }

    #[test]
    fn transport_failure_without_body_falls_back_to_the_registry() {
        let transport = TransportError::new(404);
        let response = normalizer().normalize(&transport);

        assert_eq!(response.error, "NOT_FOUND");
        assert_eq!(response.http_status_code, 404);
        assert_eq!(response.message, "Something went wrong");
    }

    #[test]
    fn transport_failure_with_unmapped_status_uses_the_fallback_code() {
        let transport = TransportError::new(503);
        let response = normalizer().normalize(&transport);

        assert_eq!(response.error, "FATAL_ERROR");
        assert_eq!(response.http_status_code, 503);
    }

    #[test]
    fn transport_failure_without_status_defaults_to_500() {
        let transport = TransportError::without_status();
        let response = normalizer().normalize(&transport);

        assert_eq!(response.http_status_code, 500);
        assert_eq!(response.error, "FATAL_ERROR");
    }

    #[test]
    fn buried_app_error_is_still_found() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer context")]
        struct Outer(#[source] AppError);

        let outer = Outer(AppError::authentication("session expired"));
        let response = normalizer().normalize(Failure::caught(&outer));

        assert_eq!(response.message, "session expired");
        assert_eq!(response.error, "AUTHENTICATION_ERROR");
        assert_eq!(response.http_status_code, 401);
    }

    #[test]
    fn app_error_outranks_transport_error_on_the_same_chain() {
        let transport = TransportError::new(404);
        let app = AppError::server("lookup failed").with_source(transport);
        let response = normalizer().normalize(&app);

        assert_eq!(response.error, "SERVER_ERROR");
        assert_eq!(response.http_status_code, 500);
    }

    #[test]
    fn generic_errors_keep_their_message_at_500() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let response = normalizer().normalize(Failure::caught(&io));

        assert_eq!(response.message, "pipe closed");
        assert_eq!(response.error, "FATAL_ERROR");
        assert_eq!(response.http_status_code, 500);
    }

    #[test]
    fn plain_text_becomes_the_message() {
        let response = normalizer().normalize("oops");

        assert_eq!(response.message, "oops");
        assert_eq!(response.error, "FATAL_ERROR");
        assert_eq!(response.http_status_code, 500);
    }

    #[test]
    fn custom_fallback_code_is_used_everywhere_a_code_is_missing() {
        let normalizer = Normalizer::new("ledger").with_fallback_code("LEDGER_ERROR");

        assert_eq!(normalizer.normalize(Failure::Absent).error, "LEDGER_ERROR");
        assert_eq!(normalizer.normalize("oops").error, "LEDGER_ERROR");
        assert_eq!(
            normalizer.normalize(&TransportError::new(503)).error,
            "LEDGER_ERROR"
        );
    }

    #[test]
    fn free_function_matches_the_struct() {
        let error = AppError::bad_request("no body");
        assert_eq!(
            error_handler(&error, "gateway"),
            Normalizer::new("gateway").normalize(&error)
        );
    }

    #[test]
    fn malformed_inputs_never_panic() {
        let normalizer = normalizer();
        let inputs = [
            "", " ", "\0", "{\"not\": \"handled specially\"}",
            "very very very long repeated text ",
        ];
        for text in inputs {
            let _ = normalizer.normalize(text);
        }

        // Deeply nested source chains terminate too
        let mut error = AppError::server("level 0");
        for level in 1..64 {
            error = AppError::server(format!("level {level}")).with_source(error);
        }
        let response = normalizer.normalize(&error);
        assert_eq!(response.message, "level 63");
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let response = normalizer().normalize(&AppError::validation("bad input"));
        let value = serde_json::to_value(&response).expect("envelope must serialize");

        assert_eq!(
            value,
            json!({
                "success": false,
                "message": "bad input",
                "error": "VALIDATION_ERROR",
                "httpStatusCode": 422,
                "service": "billing-service",
            })
        );
    }
}
