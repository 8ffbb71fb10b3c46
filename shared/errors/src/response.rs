//! Axum glue: write a normalized envelope as the HTTP response
//!
//! Error middleware normalizes whatever it caught with its own
//! [`crate::Normalizer`] (carrying the explicit service name) and returns
//! the envelope; this impl turns it into a JSON response with the
//! envelope's status code as the transport status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::normalizer::NormalizedResponse;

impl IntoResponse for NormalizedResponse {
    fn into_response(self) -> Response {
        match self.http_status_code {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.error,
                self.message
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.error,
                self.message
            ),
            _ => {}
        }

        let status = StatusCode::from_u16(self.http_status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use pretty_assertions::assert_eq;

    use crate::app_error::AppError;
    use crate::normalizer::Normalizer;

    #[test]
    fn envelope_status_becomes_the_transport_status() {
        let normalizer = Normalizer::new("media-service");
        let response = normalizer
            .normalize(&AppError::validation("bad upload"))
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn non_standard_token_statuses_survive() {
        let normalizer = Normalizer::new("auth-service");
        let response = normalizer
            .normalize(&AppError::token_expired("refresh required"))
            .into_response();

        assert_eq!(response.status().as_u16(), 498);
    }

    #[test]
    fn out_of_range_status_degrades_to_500() {
        let normalizer = Normalizer::new("auth-service");
        let mut envelope = normalizer.default_response();
        envelope.http_status_code = 42;

        let response = envelope.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
