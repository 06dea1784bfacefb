use super::CoreError;
use thiserror::Error;

/// Application-level errors (core errors plus infrastructure failures).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Service temporarily unavailable: {0}")]
    Unavailable(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Core(e) => match e {
                CoreError::BadRequest(_) => 400,
                CoreError::Forbidden(_) => 403,
                CoreError::NotFound(_) => 404,
                CoreError::Conflict { .. } => 409,
                CoreError::Internal(_) => 500,
            },
            AppError::Database(_) => 500,
            AppError::Unavailable(_) => 503,
        }
    }

    /// Get a machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Core(e) => match e {
                CoreError::BadRequest(_) => "BAD_REQUEST",
                CoreError::Forbidden(_) => "FORBIDDEN",
                CoreError::NotFound(_) => "NOT_FOUND",
                CoreError::Conflict { .. } => "CONFLICT",
                CoreError::Internal(_) => "INTERNAL_ERROR",
            },
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("database error: {:?}", err);
        AppError::Database(err.to_string())
    }
}

/// Result type alias for application operations
#[allow(dead_code)]
pub type AppResult<T> = Result<T, AppError>;
