//! Server error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use entities::TodoTextError;
use serde_json::json;
use todo_store::StoreError;

/// Machine-readable error codes returned in error bodies.
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const DUPLICATE_EMAIL: &str = "DUPLICATE_EMAIL";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Malformed input.
    #[error("{0}")]
    Validation(String),

    /// Email already registered.
    #[error("User already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password. The two are not distinguished.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed, invalid or expired token.
    #[error("Not authorized, no valid token")]
    Unauthenticated,

    /// Referenced todo does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Todo exists but belongs to someone else.
    #[error("Not authorized")]
    Forbidden,

    /// Persistence, hashing or signing failure. Details stay in server logs.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            // Only the actor can be a missing user: a token outlived its account.
            StoreError::NotFound {
                entity_type: "User",
                ..
            } => ServerError::Unauthenticated,
            StoreError::NotFound { entity_type, .. } => {
                ServerError::NotFound(format!("{entity_type} not found"))
            }
            // Email is the only unique attribute a client controls.
            StoreError::AlreadyExists { .. } => ServerError::DuplicateEmail,
            StoreError::Validation(e) => e.into(),
            StoreError::Database(_) | StoreError::Other(_) => {
                ServerError::Infrastructure(e.to_string())
            }
        }
    }
}

impl From<auth::AuthError> for ServerError {
    fn from(e: auth::AuthError) -> Self {
        if e.is_token_rejection() {
            ServerError::Unauthenticated
        } else {
            ServerError::Infrastructure(e.to_string())
        }
    }
}

impl From<TodoTextError> for ServerError {
    fn from(e: TodoTextError) -> Self {
        ServerError::Validation(e.to_string())
    }
}

impl ServerError {
    /// Returns the HTTP status and error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            ServerError::DuplicateEmail => (StatusCode::BAD_REQUEST, error_codes::DUPLICATE_EMAIL),
            ServerError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, error_codes::INVALID_CREDENTIALS)
            }
            ServerError::Unauthenticated => (StatusCode::UNAUTHORIZED, error_codes::UNAUTHENTICATED),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
            ServerError::Forbidden => (StatusCode::UNAUTHORIZED, error_codes::FORBIDDEN),
            ServerError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let message = match &self {
            ServerError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        let not_found: ServerError = StoreError::not_found("Todo", "abc").into();
        assert!(matches!(not_found, ServerError::NotFound(ref m) if m == "Todo not found"));

        let missing_actor: ServerError = StoreError::not_found("User", "abc").into();
        assert!(matches!(missing_actor, ServerError::Unauthenticated));

        let duplicate: ServerError = StoreError::already_exists("User", "a@x.com").into();
        assert!(matches!(duplicate, ServerError::DuplicateEmail));

        let invalid: ServerError = StoreError::Validation(TodoTextError::Empty).into();
        assert!(matches!(invalid, ServerError::Validation(_)));

        let other: ServerError = StoreError::Other("disk on fire".to_string()).into();
        assert!(matches!(other, ServerError::Infrastructure(_)));
    }

    #[test]
    fn test_token_errors_are_unauthenticated() {
        let expired: ServerError = auth::AuthError::TokenExpired.into();
        let invalid: ServerError = auth::AuthError::InvalidToken.into();
        assert!(matches!(expired, ServerError::Unauthenticated));
        assert!(matches!(invalid, ServerError::Unauthenticated));

        let hashing: ServerError = auth::AuthError::PasswordHash("boom".to_string()).into();
        assert!(matches!(hashing, ServerError::Infrastructure(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServerError::Validation("x".into()).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServerError::DuplicateEmail.status_and_code().0, StatusCode::BAD_REQUEST);
        assert_eq!(ServerError::InvalidCredentials.status_and_code().0, StatusCode::UNAUTHORIZED);
        assert_eq!(ServerError::Unauthenticated.status_and_code().0, StatusCode::UNAUTHORIZED);
        assert_eq!(ServerError::Forbidden.status_and_code(), (StatusCode::UNAUTHORIZED, "FORBIDDEN"));
        assert_eq!(
            ServerError::NotFound("Todo not found".into()).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::Infrastructure("db".into()).status_and_code().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
