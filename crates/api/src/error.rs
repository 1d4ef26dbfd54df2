use auth::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error body returned on every failure path: a human message plus a
/// stable machine-readable kind.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// Response adapter for [`AuthError`]; handlers bubble service errors with
/// `?` and this picks the status and code.
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError(err)
    }
}

impl From<store::StoreError> for ApiError {
    fn from(err: store::StoreError) -> Self {
        ApiError(AuthError::Store(err))
    }
}

pub(crate) fn status_and_code(err: &AuthError) -> (StatusCode, &'static str) {
    match err {
        AuthError::MissingField(_) => (StatusCode::BAD_REQUEST, "missing_field"),
        AuthError::DuplicateEmail => (StatusCode::CONFLICT, "duplicate_email"),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
        AuthError::TokenInvalid => (StatusCode::FORBIDDEN, "token_invalid"),
        AuthError::TokenExpired => (StatusCode::FORBIDDEN, "token_expired"),
        AuthError::Store(e) if e.is_transient() => {
            (StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable")
        }
        AuthError::Store(_) | AuthError::Hashing(_) | AuthError::Signing(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = status_and_code(&self.0);

        // Server-side failures keep their detail in the log, not the body
        let error = if status.is_server_error() {
            tracing::error!(code, "request failed: {}", self.0);
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(ErrorResponse { error, code })).into_response()
    }
}
