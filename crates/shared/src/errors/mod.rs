mod app_error;
mod core_error;

pub use app_error::{AppError, AppResult};
pub use core_error::{ConflictDetails, CoreError};
