//! Human-friendly TTL parsing
//!
//! TTLs arrive either as plain seconds or as strings of the form
//! `"<number> <unit>"` with unit in second(s), minute(s), hour(s), day(s).
//! A bare numeric string is treated as seconds.

use service_errors::AppError;

/// A time-to-live, in seconds or as a duration string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ttl {
    /// Plain seconds
    Seconds(u64),
    /// A `"<number> <unit>"` duration string, parsed lazily
    Spec(String),
}

impl Ttl {
    /// Resolves to whole seconds
    ///
    /// # Errors
    /// Returns `AppError(Validation)` when the spec's number or unit is not
    /// recognized.
    pub fn into_seconds(self) -> Result<u64, AppError> {
        match self {
            Self::Seconds(seconds) => Ok(seconds),
            Self::Spec(spec) => parse_duration(&spec),
        }
    }
}

impl From<u64> for Ttl {
    fn from(seconds: u64) -> Self {
        Self::Seconds(seconds)
    }
}

impl From<&str> for Ttl {
    fn from(spec: &str) -> Self {
        Self::Spec(spec.to_owned())
    }
}

impl From<String> for Ttl {
    fn from(spec: String) -> Self {
        Self::Spec(spec)
    }
}

/// Parses a `"<number> <unit>"` duration string into seconds
///
/// # Errors
/// Returns `AppError(Validation)` on a malformed number, an unknown unit or
/// trailing input.
pub fn parse_duration(spec: &str) -> Result<u64, AppError> {
    let mut parts = spec.split_whitespace();

    let value: u64 = parts
        .next()
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| AppError::validation(format!("Invalid duration format: {spec}")))?;

    let Some(unit) = parts.next() else {
        // A bare number is already seconds
        return Ok(value);
    };

    if parts.next().is_some() {
        return Err(AppError::validation(format!("Invalid duration format: {spec}")));
    }

    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "second" | "seconds" => 1,
        "minute" | "minutes" => 60,
        "hour" | "hours" => 3_600,
        "day" | "days" => 86_400,
        _ => return Err(AppError::validation(format!("Invalid duration unit: {unit}"))),
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| AppError::validation(format!("Duration overflows: {spec}")))
}
