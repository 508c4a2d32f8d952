//! Convenience result type alias for panplug.

use crate::error::AppError;

/// A specialized `Result` type for panplug operations.
pub type AppResult<T> = Result<T, AppError>;
