use strum::EnumIter;

/// Closed set of application failure categories
///
/// Each kind is permanently bound to exactly one HTTP status code, one
/// default status message and one machine-readable error code. The binding
/// lives here and nowhere else; callers can never set a status that
/// disagrees with the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ErrorKind {
    /// Input failed schema or domain validation (422)
    Validation,
    /// Caller is not authenticated (401)
    Authentication,
    /// Caller is authenticated but not allowed (403)
    Authorization,
    /// Requested resource does not exist (404)
    NotFound,
    /// Presented token has expired (498)
    TokenExpired,
    /// Presented token failed verification (499)
    TokenInvalid,
    /// Request is malformed (400)
    BadRequest,
    /// Internal or upstream failure (500)
    Server,
    /// Resource already exists (409)
    Conflict,
    /// Nothing to return (204)
    NoContent,
}

impl ErrorKind {
    /// HTTP status code bound to this kind
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Validation => 422,
            Self::Authentication => 401,
            Self::Authorization => 403,
            Self::NotFound => 404,
            Self::TokenExpired => 498,
            Self::TokenInvalid => 499,
            Self::BadRequest => 400,
            Self::Server => 500,
            Self::Conflict => 409,
            Self::NoContent => 204,
        }
    }

    /// Canonical status message bound to this kind
    #[must_use]
    pub const fn status_message(self) -> &'static str {
        match self {
            Self::Validation => "Unprocessable Entity",
            Self::Authentication => "Unauthorized",
            Self::Authorization => "Forbidden",
            Self::NotFound => "Not Found",
            Self::TokenExpired => "Token Expired",
            Self::TokenInvalid => "Token Invalid",
            Self::BadRequest => "Bad Request",
            Self::Server => "Internal Server Error",
            Self::Conflict => "Conflict",
            Self::NoContent => "No Content",
        }
    }

    /// Machine-readable error code bound to this kind
    #[must_use]
    pub const fn error_code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "AUTHENTICATION_ERROR",
            Self::Authorization => "AUTHORIZATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::BadRequest => "BAD_REQUEST",
            Self::Server => "SERVER_ERROR",
            Self::Conflict => "ENTRY_EXISTS",
            Self::NoContent => "NO_CONTENT",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::ErrorKind;

    #[test]
    fn status_bindings_are_fixed() {
        assert_eq!(ErrorKind::Validation.status_code(), 422);
        assert_eq!(ErrorKind::Authentication.status_code(), 401);
        assert_eq!(ErrorKind::Authorization.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::TokenExpired.status_code(), 498);
        assert_eq!(ErrorKind::TokenInvalid.status_code(), 499);
        assert_eq!(ErrorKind::BadRequest.status_code(), 400);
        assert_eq!(ErrorKind::Server.status_code(), 500);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::NoContent.status_code(), 204);
    }

    #[test]
    fn every_kind_has_message_and_code() {
        for kind in ErrorKind::iter() {
            assert!(!kind.status_message().is_empty());
            assert!(!kind.error_code().is_empty());
            // Machine codes are SCREAMING_SNAKE_CASE
            assert!(kind
                .error_code()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn conflict_and_validation_codes_match_registry_style() {
        assert_eq!(ErrorKind::Conflict.error_code(), "ENTRY_EXISTS");
        assert_eq!(ErrorKind::Validation.error_code(), "VALIDATION_ERROR");
    }
}
