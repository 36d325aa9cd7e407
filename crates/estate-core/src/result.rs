//! Convenience result type alias for the Estate portal.

use crate::error::AppError;

/// A specialized `Result` type for Estate operations.
pub type AppResult<T> = Result<T, AppError>;
