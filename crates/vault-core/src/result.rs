//! Workspace-wide result alias.

use crate::error::AppError;

/// `Result` specialized to [`AppError`], used by every fallible operation
/// in the vault.
pub type AppResult<T> = Result<T, AppError>;
