//! Task endpoints, all mounted under `/api/{user_id}/...`.
//!
//! Every handler first checks the path owner against the token subject.
//! Single-task handlers then fetch the row by id alone and check the stored
//! owner a second time, so a task id guessed under the caller's own path
//! prefix still comes back 403 rather than leaking or mutating foreign data.
//! An absent id is 404 for everyone; an existing foreign task is 403.
//!
//! Read-modify-write handlers (update, delete, toggle) run inside one sqlx
//! transaction per request; dropping the transaction on an error exit path
//! rolls it back before the connection returns to the pool.

use crate::{
    auth::{guard, AuthenticatedUser},
    error::AppError,
    models::{task::normalize_title, Task, TaskCreate, TaskUpdate},
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Retrieves all tasks owned by the authenticated user, in insertion order.
#[get("/{user_id}/tasks")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user_id = path.into_inner();
    guard::require_path_owner(&user_id, &auth.0)?;

    let tasks = Task::list(&**pool, &auth.0).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task for the authenticated user.
///
/// The stored owner is always the token subject; the request body carries no
/// owner field and any injected one is ignored.
#[post("/{user_id}/tasks")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    task_data: web::Json<TaskCreate>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user_id = path.into_inner();
    guard::require_path_owner(&user_id, &auth.0)?;

    task_data.validate()?;
    let title = normalize_title(&task_data.title)?;

    let task = Task::insert(&**pool, &auth.0, &title, task_data.description.as_deref()).await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a single task by id.
#[get("/{user_id}/tasks/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i32)>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    guard::require_path_owner(&user_id, &auth.0)?;

    let task = Task::find(&**pool, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    guard::require_record_owner(&task, &auth.0)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Full replace of a task's title, description, and completed flag.
/// `updated_at` is refreshed whether or not any value changed.
#[put("/{user_id}/tasks/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i32)>,
    task_data: web::Json<TaskUpdate>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    guard::require_path_owner(&user_id, &auth.0)?;

    task_data.validate()?;
    let title = normalize_title(&task_data.title)?;

    let mut tx = pool.begin().await?;

    let task = Task::find(&mut *tx, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    guard::require_record_owner(&task, &auth.0)?;

    let updated = Task::replace(
        &mut *tx,
        task_id,
        &title,
        task_data.description.as_deref(),
        task_data.completed,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    tx.commit().await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Hard-deletes a task. Irreversible.
#[delete("/{user_id}/tasks/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i32)>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    guard::require_path_owner(&user_id, &auth.0)?;

    let mut tx = pool.begin().await?;

    let task = Task::find(&mut *tx, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    guard::require_record_owner(&task, &auth.0)?;

    let removed = Task::remove(&mut *tx, task_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    tx.commit().await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Flips the task's completed flag and refreshes `updated_at`.
#[patch("/{user_id}/tasks/{id}/complete")]
pub async fn toggle_completion(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i32)>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    guard::require_path_owner(&user_id, &auth.0)?;

    let mut tx = pool.begin().await?;

    let task = Task::find(&mut *tx, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    guard::require_record_owner(&task, &auth.0)?;

    let toggled = Task::toggle(&mut *tx, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    tx.commit().await?;

    Ok(HttpResponse::Ok().json(toggled))
}
