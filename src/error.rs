use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy surfaced at the HTTP boundary.
///
/// `InvalidCredentials` deliberately covers both an unknown phone and a
/// wrong PIN so a caller cannot probe which numbers are registered.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Phone number already registered")]
    DuplicateIdentity,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    Unauthenticated,
    #[error("identity store unavailable")]
    StoreUnavailable,
    #[error("unexpected server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateIdentity => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // 5xx bodies carry a sanitized `error` string; the raw cause is
        // only ever logged at the point of failure.
        let body = if status.is_server_error() {
            json!({ "message": "Internal Server Error", "error": self.to_string() })
        } else {
            json!({ "message": self.to_string() })
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            ApiError::Validation("bad phone".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::DuplicateIdentity.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn store_errors_map_to_500() {
        assert_eq!(
            ApiError::StoreUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_credentials_message_is_uniform() {
        // Same display whatever the underlying cause was
        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn server_error_body_never_echoes_internals() {
        let msg = ApiError::StoreUnavailable.to_string();
        assert!(!msg.contains("postgres"));
        assert!(!msg.contains("sqlx"));
    }
}
