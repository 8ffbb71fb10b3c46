//! Fallback machine codes for failures that only carry an HTTP status
//!
//! Used when a failure originates outside the [`crate::AppError`] taxonomy
//! (typically a remote HTTP response) and the body did not supply an error
//! code of its own.

/// Static status-code to machine-code bindings
const STATUS_CODE_ERRORS: &[(u16, &str)] = &[
    (400, "VALIDATION_ERROR"),
    (401, "AUTHENTICATION_ERROR"),
    (402, "PAYMENT_REQUIRED_ERROR"),
    (403, "AUTHORIZATION_ERROR"),
    (404, "NOT_FOUND"),
    (409, "ENTRY_EXISTS"),
    (422, "VALIDATION_ERROR"),
    (498, "TOKEN_EXPIRED"),
    (499, "TOKEN_INVALID"),
    (500, "FATAL_ERROR"),
];

/// Looks up the generic machine code for an HTTP status code
#[must_use]
pub fn status_code_error(status: u16) -> Option<&'static str> {
    STATUS_CODE_ERRORS
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, name)| *name)
}
