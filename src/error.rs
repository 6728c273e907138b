use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// ApiError
///
/// The full failure taxonomy of the API. Every handler returns
/// `Result<_, ApiError>`; no failure reaches a framework error page.
/// Each variant maps to a stable message string and an HTTP status, and the
/// response body always uses the `{ success: false, message }` envelope the
/// client expects.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input (missing fields, content too short).
    #[error("{0}")]
    Validation(String),

    /// Duplicate email or duplicate post title.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or a missing/invalid/expired session token.
    #[error("{0}")]
    Auth(String),

    /// Authenticated, but not authorized for this resource.
    #[error("{0}")]
    Forbidden(String),

    /// Resource absent.
    #[error("{0}")]
    NotFound(String),

    /// Persistence failure. Logged server-side, never leaked to the caller.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Any other unexpected failure, surfaced with the given public message.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this failure class.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                "Internal server error".to_string()
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                msg.clone()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
