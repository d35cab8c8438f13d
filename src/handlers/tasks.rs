use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    middleware::CurrentUser,
    models::{CompleteTaskResponse, CreateTask, Task, TaskStatus, UpdateTask},
};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

async fn fetch_owned_task(
    pool: &SqlitePool,
    task_id: &str,
    owner_email: &str,
) -> Result<Task, AppError> {
    // Scoped by owner: an id belonging to another user is indistinguishable
    // from a missing one.
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE task_id = ? AND user_email = ?")
        .bind(task_id)
        .bind(owner_email)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::TaskNotFound(task_id.to_string()))
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTask,
    responses(
        (status = 200, description = "Task created successfully", body = Task),
        (status = 400, description = "Required fields missing"),
        (status = 409, description = "Task ID already exists for this user"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn create_task(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateTask>,
) -> Result<Json<Task>, AppError> {
    let mut missing = Vec::new();
    for (field, value) in [
        ("task_id", &payload.task_id),
        ("name", &payload.name),
        ("description", &payload.description),
    ] {
        if value.trim().is_empty() {
            missing.push(field);
        }
    }
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing.join(", ")));
    }

    // La clave primaria (user_email, task_id) hace la unicidad por dueño
    // atómica en el insert.
    sqlx::query(
        "INSERT INTO tasks (task_id, name, description, deadline, priority, linked_goal, \
         status, streak, created_at, user_email) \
         VALUES (?, ?, ?, ?, ?, ?, 'pending', 0, ?, ?)",
    )
    .bind(&payload.task_id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.deadline)
    .bind(payload.priority)
    .bind(&payload.linked_goal)
    .bind(Utc::now().naive_utc())
    .bind(&user.email)
    .execute(&pool)
    .await
    .map_err(|e| AppError::or_conflict(e, AppError::DuplicateTaskId(payload.task_id.clone())))?;

    let task = fetch_owned_task(&pool, &payload.task_id, &user.email).await?;

    Ok(Json(task))
}

#[utoipa::path(
    get,
    path = "/tasks",
    params(Pagination),
    responses(
        (status = 200, description = "List the current user's tasks", body = Vec<Task>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn get_tasks(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<Pagination>,
) -> Result<Json<Vec<Task>>, AppError> {
    let skip = params.skip.unwrap_or(0);
    // LIMIT -1 means "no limit" in SQLite; the default view is the full set.
    let limit = params.limit.unwrap_or(-1);

    let tasks = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE user_email = ? ORDER BY created_at LIMIT ? OFFSET ?",
    )
    .bind(&user.email)
    .bind(limit)
    .bind(skip)
    .fetch_all(&pool)
    .await?;

    Ok(Json(tasks))
}

#[utoipa::path(
    get,
    path = "/tasks/{task_id}",
    params(
        ("task_id" = String, Path, description = "User-chosen task identifier")
    ),
    responses(
        (status = 200, description = "Get task details", body = Task),
        (status = 404, description = "Task not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn get_task(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = fetch_owned_task(&pool, &task_id, &user.email).await?;

    Ok(Json(task))
}

#[utoipa::path(
    put,
    path = "/tasks/{task_id}",
    params(
        ("task_id" = String, Path, description = "User-chosen task identifier")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 404, description = "Task not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn update_task(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<String>,
    Json(payload): Json<UpdateTask>,
) -> Result<Json<Task>, AppError> {
    // Primero verificamos que exista y pertenezca al usuario
    let _ = fetch_owned_task(&pool, &task_id, &user.email).await?;

    // COALESCE(NULL, col) keeps the stored value, so omitted fields are
    // untouched. task_id, status, streak and created_at are not editable.
    sqlx::query(
        "UPDATE tasks SET \
            name = COALESCE(?, name), \
            description = COALESCE(?, description), \
            deadline = COALESCE(?, deadline), \
            priority = COALESCE(?, priority), \
            linked_goal = COALESCE(?, linked_goal) \
        WHERE task_id = ? AND user_email = ?",
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.deadline)
    .bind(payload.priority)
    .bind(&payload.linked_goal)
    .bind(&task_id)
    .bind(&user.email)
    .execute(&pool)
    .await?;

    let task = fetch_owned_task(&pool, &task_id, &user.email).await?;

    Ok(Json(task))
}

#[utoipa::path(
    post,
    path = "/tasks/{task_id}/complete",
    params(
        ("task_id" = String, Path, description = "User-chosen task identifier")
    ),
    responses(
        (status = 200, description = "Task completed (or already was)", body = CompleteTaskResponse),
        (status = 404, description = "Task not found"),
        (status = 409, description = "Deadline has passed"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn complete_task(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<String>,
) -> Result<Json<CompleteTaskResponse>, AppError> {
    let task = fetch_owned_task(&pool, &task_id, &user.email).await?;

    if task.status == TaskStatus::Completed {
        return Ok(Json(CompleteTaskResponse {
            newly_completed: false,
            message: format!("Task '{}' was already completed", task.name),
            task,
        }));
    }

    // Completion is only permitted while the deadline has not passed.
    if task.deadline < Utc::now().date_naive() {
        return Err(AppError::DeadlinePassed(task_id));
    }

    sqlx::query(
        "UPDATE tasks SET status = 'completed', streak = streak + 1, completed_at = ? \
         WHERE task_id = ? AND user_email = ?",
    )
    .bind(Utc::now().naive_utc())
    .bind(&task_id)
    .bind(&user.email)
    .execute(&pool)
    .await?;

    let task = fetch_owned_task(&pool, &task_id, &user.email).await?;

    // The celebration itself (sound, balloons) is the client's job.
    tracing::info!("task '{}' completed by {}", task.name, user.email);

    Ok(Json(CompleteTaskResponse {
        newly_completed: true,
        message: format!("Task '{}' completed! 🎉", task.name),
        task,
    }))
}

#[utoipa::path(
    delete,
    path = "/tasks/{task_id}",
    params(
        ("task_id" = String, Path, description = "User-chosen task identifier")
    ),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 404, description = "Task not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn delete_task(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE task_id = ? AND user_email = ?")
        .bind(&task_id)
        .bind(&user.email)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::TaskNotFound(task_id));
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}
