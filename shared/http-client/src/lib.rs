//! Outbound HTTP request helper
//!
//! A thin wrapper over `reqwest` with the conventions every service shares:
//! an `X-Requested-With` marker header, bearer-token injection, JSON bodies
//! both ways, and remote failure statuses folded into the
//! [`TransportError`] shape the error normalizer recognizes.

use http::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use http::Method;
use serde_json::Value;
use service_errors::{AppError, TransportError};
use thiserror::Error;

const REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Failures raised by [`HttpClient::request`]
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// Invalid request input (bad header, out-of-range value)
    #[error("{0}")]
    App(#[from] AppError),
    /// The remote service answered with an error status
    #[error("{0}")]
    Transport(#[from] TransportError),
    /// The request never produced a usable response
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// An outbound request, built up before sending
#[derive(Debug, Clone)]
pub struct Request {
    url: String,
    method: Method,
    headers: Vec<(String, String)>,
    bearer_token: Option<String>,
    body: Option<Value>,
}

impl Request {
    /// Creates a request with the given method
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            bearer_token: None,
            body: None,
        }
    }

    /// GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// PUT request
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    /// PATCH request
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// DELETE request
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Adds a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sends the token as a bearer `Authorization` header
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Attaches a JSON body
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Shared outbound HTTP client
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Creates a client with the default connection pool
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends a request and returns the response body as JSON
    ///
    /// Non-JSON success bodies come back as a JSON string; an empty body
    /// becomes `null`.
    ///
    /// # Errors
    /// Returns [`HttpClientError::Transport`] when the remote answered with
    /// an error status (body merged in when readable),
    /// [`HttpClientError::Request`] when no response was produced, and
    /// [`HttpClientError::App`] for invalid request input.
    pub async fn request(&self, request: Request) -> Result<Value, HttpClientError> {
        let headers = build_headers(&request)?;

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(parse_body(&text));
        }

        tracing::warn!(
            status = status.as_u16(),
            url = %request.url,
            "Remote service responded with an error status"
        );

        let mut transport = TransportError::new(status.as_u16());
        if let Ok(body) = serde_json::from_str::<Value>(&text) {
            transport = transport.with_body(body);
        }

        Err(transport.into())
    }
}

/// Caller headers plus the shared conventions
fn build_headers(request: &Request) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();

    for (name, value) in &request.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| AppError::validation(format!("Invalid header name: {name}")).with_source(err))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|err| AppError::validation(format!("Invalid value for header: {name}")).with_source(err))?;
        headers.insert(header_name, header_value);
    }

    headers.insert(REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));

    if let Some(token) = &request.bearer_token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|err| AppError::validation("Invalid bearer token").with_source(err))?;
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use http::header::AUTHORIZATION;
    use http::Method;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use service_errors::{ErrorKind, Failure, Normalizer, TransportError};

    use super::{build_headers, parse_body, HttpClientError, Request};

    #[test]
    fn marker_header_is_always_injected() {
        let headers = build_headers(&Request::get("https://api.test/users")).unwrap();
        assert_eq!(headers.get("x-requested-with").unwrap(), "XMLHttpRequest");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn bearer_token_becomes_an_authorization_header() {
        let request = Request::post("https://api.test/users")
            .with_bearer_token("tok-123")
            .with_header("x-trace-id", "abc");
        let headers = build_headers(&request).unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok-123");
        assert_eq!(headers.get("x-trace-id").unwrap(), "abc");
    }

    #[test]
    fn invalid_headers_are_validation_errors() {
        let request = Request::get("https://api.test").with_header("bad header", "x");
        let err = build_headers(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let request = Request::get("https://api.test").with_header("x-ok", "bad\nvalue");
        let err = build_headers(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn bodies_parse_leniently() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body(r#"{"ok": true}"#), json!({"ok": true}));
        assert_eq!(parse_body("plain text"), json!("plain text"));
    }

    #[test]
    fn builders_compose() {
        let request = Request::new(Method::PATCH, "https://api.test/users/1")
            .with_body(json!({"name": "Ada"}));
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.body, Some(json!({"name": "Ada"})));
    }

    #[test]
    fn transport_failures_normalize_through_the_wrapper() {
        let err = HttpClientError::from(TransportError::new(404));
        let response = Normalizer::new("user-service").normalize(Failure::caught(&err));

        assert_eq!(response.error, "NOT_FOUND");
        assert_eq!(response.http_status_code, 404);
    }

    #[test]
    fn remote_error_bodies_win_over_the_registry() {
        let transport = TransportError::new(409).with_body(json!({
            "message": "email already registered",
            "error": "ENTRY_EXISTS",
        }));
        let err = HttpClientError::from(transport);
        let response = Normalizer::new("user-service").normalize(Failure::caught(&err));

        assert_eq!(response.message, "email already registered");
        assert_eq!(response.error, "ENTRY_EXISTS");
        assert_eq!(response.http_status_code, 409);
    }
}
