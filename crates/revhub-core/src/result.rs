//! Convenience result type alias for RevHub.

use crate::error::AppError;

/// A specialized `Result` type for RevHub operations.
pub type AppResult<T> = Result<T, AppError>;
