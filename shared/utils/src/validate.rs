//! Schema validation mapped onto the shared error taxonomy

use service_errors::AppError;
use validator::Validate;

/// Runs `validator` checks and folds the first failure into a
/// validation [`AppError`]
///
/// The reported message is the first custom message found on a failing
/// field; fields without one fall back to `"{field} is invalid"`.
///
/// # Errors
/// Returns a 422 validation error when any field check fails.
pub fn validate<T: Validate>(input: &T) -> Result<(), AppError> {
    let Err(errors) = input.validate() else {
        return Ok(());
    };

    let message = errors
        .field_errors()
        .into_iter()
        .next()
        .map_or_else(
            || "Request validation failed".to_owned(),
            |(field, failures)| {
                failures
                    .first()
                    .and_then(|failure| failure.message.as_ref())
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
            },
        );

    Err(AppError::validation(message).with_source(errors))
}
