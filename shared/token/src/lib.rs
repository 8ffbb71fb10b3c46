//! JWT encode/decode helpers over HMAC signatures
//!
//! A thin wrapper around `jwt-compact`: callers bring their own claims type
//! and shared secret, and get back a compact token (or the verified
//! [`jwt_compact::Token`] on the way in). Missing inputs are validation
//! errors; verification failures map onto the TOKEN_EXPIRED /
//! TOKEN_INVALID kinds with the native error kept on the `source()` chain.

use chrono::Duration;
use jwt_compact::alg::{Hs256, Hs256Key, Hs384, Hs384Key, Hs512, Hs512Key};
use jwt_compact::{
    AlgorithmExt, Claims, CreationError, Header, TimeOptions, Token, UntrustedToken,
    ValidationError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use service_errors::AppError;

/// Default token lifetime: 24 hours
pub const DEFAULT_TTL_SECS: u64 = 86_400;

/// Supported HMAC signing algorithms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// HMAC-SHA256 (default)
    #[default]
    Hs256,
    /// HMAC-SHA384
    Hs384,
    /// HMAC-SHA512
    Hs512,
}

/// Signs claims into a compact JWT
///
/// The token carries `exp` and `iat` derived from `ttl_secs` (default 24
/// hours) alongside the caller's custom claims.
///
/// # Errors
/// Returns `AppError(Validation)` when the secret is empty and
/// `AppError(Server)` when signing fails.
pub fn encode<T: Serialize>(
    claims: &T,
    secret: &str,
    ttl_secs: Option<u64>,
    algorithm: Algorithm,
) -> Result<String, AppError> {
    if secret.is_empty() {
        return Err(AppError::validation(
            "Secret key is required for JWT encoding",
        ));
    }

    let ttl = i64::try_from(ttl_secs.unwrap_or(DEFAULT_TTL_SECS))
        .map_err(|_| AppError::validation("JWT lifetime is out of range"))?;
    let claims = Claims::new(claims)
        .set_duration_and_issuance(&TimeOptions::default(), Duration::seconds(ttl));

    sign(&claims, secret.as_bytes(), algorithm)
        .map_err(|err| AppError::server("Failed to sign JWT").with_source(err))
}

/// Verifies a compact JWT and returns the parsed token
///
/// Custom claims are available as `token.claims().custom`.
///
/// # Errors
/// Returns `AppError(Validation)` when the secret or token is empty,
/// `AppError(TokenExpired)` for an expired token and
/// `AppError(TokenInvalid)` for any other verification failure; the native
/// `jwt-compact` error stays on the `source()` chain.
pub fn decode<T: DeserializeOwned>(
    token: &str,
    secret: &str,
    algorithm: Algorithm,
) -> Result<Token<T>, AppError> {
    if secret.is_empty() {
        return Err(AppError::validation(
            "Secret key is required for JWT verification",
        ));
    }
    if token.is_empty() {
        return Err(AppError::validation("JWT token is required"));
    }

    let untrusted = UntrustedToken::new(token)
        .map_err(|err| AppError::token_invalid("Malformed JWT").with_source(err))?;

    let verified = verify(&untrusted, secret.as_bytes(), algorithm)
        .map_err(verification_failure)?;

    verified
        .claims()
        .validate_expiration(&TimeOptions::default())
        .map_err(verification_failure)?;

    Ok(verified)
}

fn sign<T: Serialize>(
    claims: &Claims<&T>,
    secret: &[u8],
    algorithm: Algorithm,
) -> Result<String, CreationError> {
    match algorithm {
        Algorithm::Hs256 => Hs256.token(&Header::empty(), claims, &Hs256Key::new(secret)),
        Algorithm::Hs384 => Hs384.token(&Header::empty(), claims, &Hs384Key::new(secret)),
        Algorithm::Hs512 => Hs512.token(&Header::empty(), claims, &Hs512Key::new(secret)),
    }
}

fn verify<T: DeserializeOwned>(
    untrusted: &UntrustedToken<'_>,
    secret: &[u8],
    algorithm: Algorithm,
) -> Result<Token<T>, ValidationError> {
    match algorithm {
        Algorithm::Hs256 => Hs256.validator(&Hs256Key::new(secret)).validate(untrusted),
        Algorithm::Hs384 => Hs384.validator(&Hs384Key::new(secret)).validate(untrusted),
        Algorithm::Hs512 => Hs512.validator(&Hs512Key::new(secret)).validate(untrusted),
    }
}

fn verification_failure(err: ValidationError) -> AppError {
    match err {
        ValidationError::Expired => {
            AppError::token_expired("Token has expired").with_source(err)
        }
        _ => AppError::token_invalid("Token verification failed").with_source(err),
    }
}
