use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
};
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{NewTask, Task, TaskPatch, User};

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = state.repository.list_tasks(&user.id).await?;
    tracing::debug!("Listing {} tasks for {}", tasks.len(), user.id);
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(new_task): Json<NewTask>,
) -> AppResult<Json<Task>> {
    new_task.validate().map_err(AppError::Validation)?;

    let task = new_task.into_task(uuid::Uuid::new_v4().to_string(), user.id);
    state.repository.save_task(&task).await.map_err(|e| {
        tracing::error!("Failed to save task {}: {}", task.id, e);
        AppError::Storage(e)
    })?;

    tracing::info!("Created task {} for {}", task.id, task.user_id);
    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> AppResult<Json<Task>> {
    let mut task = owned_task(&state, &user, &task_id).await?;
    patch.apply(&mut task);
    state.repository.save_task(&task).await?;

    tracing::debug!("Updated task {}", task_id);
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<String>,
) -> AppResult<StatusCode> {
    let task = owned_task(&state, &user, &task_id).await?;
    state.repository.delete_task(&task).await.map_err(|e| {
        tracing::error!("Failed to delete task {}: {}", task_id, e);
        AppError::Storage(e)
    })?;

    tracing::info!("Deleted task {} for {}", task_id, user.id);
    Ok(StatusCode::NO_CONTENT)
}

// Loads a task and checks that the caller owns it
async fn owned_task(state: &AppState, user: &User, task_id: &str) -> AppResult<Task> {
    let task = state
        .repository
        .get_task(task_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Task not found: {}", task_id);
            AppError::NotFound(format!("Task not found with ID: {}", task_id))
        })?;

    if task.user_id != user.id {
        tracing::warn!("User {} tried to touch task {} owned by {}", user.id, task_id, task.user_id);
        return Err(AppError::Forbidden("Resource belongs to another user.".into()));
    }

    Ok(task)
}
