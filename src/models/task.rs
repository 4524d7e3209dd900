//! Task model and owner-scoped repository.
//!
//! `find` fetches by id alone, with no owner filter, so handlers can
//! distinguish a task that does not exist (404) from a task that exists but
//! belongs to someone else (403).
//! Every caller of `find` must run the record-owner check from
//! [`crate::auth::guard`] before touching the row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use validator::{Validate, ValidationError};

use crate::error::AppError;

const TASK_COLUMNS: &str = "id, user_id, title, description, completed, created_at, updated_at";

/// A task as stored and as returned by the API. `user_id` is the stringified
/// identifier of the owner, copied from the verified token subject at
/// creation and never reassigned.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task. Carries no owner field: the owner always comes
/// from the authenticated subject, so anything a client injects under
/// `user_id` in the body is ignored at deserialization.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    #[validate(length(min = 1, max = 200), custom = "title_not_blank")]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Input for a full replace of a task's mutable fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200), custom = "title_not_blank")]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub completed: bool,
}

fn title_not_blank(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title_blank"));
    }
    Ok(())
}

/// Trims the title and rejects it when nothing remains. The trimmed form is
/// what gets stored.
pub fn normalize_title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::Validation(
            "Title cannot be empty or whitespace only".into(),
        ));
    }
    Ok(title.to_string())
}

impl Task {
    /// All tasks whose stored owner equals `owner_id`, in insertion order.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        owner_id: &str,
    ) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY id",
            TASK_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(executor)
        .await
    }

    /// Inserts a task owned by `owner_id`. The owner column is set from this
    /// argument and nothing else; `created_at` and `updated_at` both default
    /// to the same transaction timestamp.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        owner_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (user_id, title, description) VALUES ($1, $2, $3) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .fetch_one(executor)
        .await
    }

    /// Fetch by id alone, without an owner filter. See the module docs.
    pub async fn find(
        executor: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Full replace of the three mutable fields. `updated_at` is refreshed
    /// unconditionally, whether or not any value changed.
    pub async fn replace(
        executor: impl PgExecutor<'_>,
        id: i32,
        title: &str,
        description: Option<&str>,
        completed: bool,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET title = $1, description = $2, completed = $3, updated_at = NOW() \
             WHERE id = $4 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(title)
        .bind(description)
        .bind(completed)
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Hard delete. Returns the number of rows removed so callers can map
    /// zero to 404.
    pub async fn remove(executor: impl PgExecutor<'_>, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Flips `completed` in a single statement, so no partial state is
    /// visible to concurrent requests mid-toggle.
    pub async fn toggle(
        executor: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET completed = NOT completed, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}
