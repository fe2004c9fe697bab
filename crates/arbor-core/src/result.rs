//! Convenience result type alias for Arbor.

use crate::error::AppError;

/// A specialized `Result` type for Arbor operations.
pub type AppResult<T> = Result<T, AppError>;
