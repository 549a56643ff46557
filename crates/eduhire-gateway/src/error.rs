use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eduhire_core::EduhireError;
use serde_json::json;
use tracing::warn;

/// Wraps the shared error so handlers can use `?` on any subsystem error.
///
/// Body: `{"error": "<CODE>", "message": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub EduhireError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EduhireError::NotFound { .. } => StatusCode::NOT_FOUND,
            EduhireError::Conflict(_) => StatusCode::CONFLICT,
            EduhireError::InvalidInput(_) | EduhireError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            EduhireError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            EduhireError::Forbidden(_) => StatusCode::FORBIDDEN,
            EduhireError::Config(_)
            | EduhireError::Database(_)
            | EduhireError::Io(_)
            | EduhireError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        let body = json!({
            "error": self.0.code(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<EduhireError> for ApiError {
    fn from(err: EduhireError) -> Self {
        ApiError(err)
    }
}

impl From<eduhire_users::UserError> for ApiError {
    fn from(err: eduhire_users::UserError) -> Self {
        ApiError(err.into())
    }
}

impl From<eduhire_learning::LearningError> for ApiError {
    fn from(err: eduhire_learning::LearningError) -> Self {
        ApiError(err.into())
    }
}

impl From<eduhire_jobs::JobError> for ApiError {
    fn from(err: eduhire_jobs::JobError) -> Self {
        ApiError(err.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError(EduhireError::InvalidInput(err.to_string()))
    }
}
