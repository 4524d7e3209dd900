//! Ownership enforcement.
//!
//! These two checks are the only gate between "request carries a valid
//! token" and "request may touch a specific owner's data". Both are pure
//! string comparisons over the stringified owner id: neither confirms that
//! the compared identifier belongs to a real account, and a mismatch is
//! always 403, never 404, so the existence of other accounts is not leaked.
//!
//! Single-task operations run both checks: the path owner can match the
//! token while the task id actually belongs to someone else (a guessed id
//! under the caller's own path prefix), so the fetched record's stored owner
//! is compared independently.

use crate::error::AppError;
use crate::models::Task;

const FORBIDDEN_MESSAGE: &str = "You do not have permission to access this resource.";

/// Compares the owner named in the request path against the verified token
/// subject.
pub fn require_path_owner(path_owner_id: &str, subject_id: &str) -> Result<(), AppError> {
    if path_owner_id != subject_id {
        return Err(AppError::Forbidden(FORBIDDEN_MESSAGE.into()));
    }
    Ok(())
}

/// Compares a fetched task's stored owner against the verified token
/// subject.
pub fn require_record_owner(task: &Task, subject_id: &str) -> Result<(), AppError> {
    if task.user_id != subject_id {
        return Err(AppError::Forbidden(FORBIDDEN_MESSAGE.into()));
    }
    Ok(())
}
