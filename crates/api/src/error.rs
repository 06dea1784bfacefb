use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::{AppError, CoreError};

/// API error wrapper that implements IntoResponse. This is the only
/// place in the codebase that maps an error kind to an HTTP status.
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_code = self.0.error_code();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(error = ?self.0, "internal error");
        }

        let conflict_details = match &self.0 {
            AppError::Core(CoreError::Conflict { details, .. }) => details.clone(),
            _ => None,
        };

        let body = json!({
            "error": error_code,
            "message": message,
            "conflictDetails": conflict_details,
        });

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(AppError::Core(err))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
