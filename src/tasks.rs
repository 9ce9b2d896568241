// src/tasks.rs

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::current_user;
use crate::error::ApiError;
use crate::models::task::{completed_at_change, count_by_status, overdue_tasks};
use crate::models::{
    CreateTaskRequest, Task, TaskPatch, TaskPriority, TaskStatus, UpdateTaskRequest,
};
use crate::rate_limit::Op;
use crate::storage::Storage;
use crate::validation::{is_valid_task_description, is_valid_task_title};

/// CREATE a task. Status defaults to `todo`, priority to `medium`; a task
/// created directly as `completed` gets its completion stamp immediately.
pub async fn create_task(
    req: HttpRequest,
    data: web::Data<AppState>,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    data.limiter.check(Op::CreateTask, &user_id).await?;

    if !is_valid_task_title(&payload.title) {
        return Err(ApiError::InvalidTaskTitle);
    }
    if let Some(description) = &payload.description {
        if !is_valid_task_description(description) {
            return Err(ApiError::InvalidTaskDescription);
        }
    }

    let now = Utc::now();
    let status = payload.status.unwrap_or(TaskStatus::Todo);
    let task = Task {
        task_id: Uuid::new_v4().to_string(),
        user_id,
        title: payload.title.trim().to_string(),
        description: payload.description.as_ref().map(|d| d.trim().to_string()),
        status,
        priority: payload.priority.unwrap_or(TaskPriority::Medium),
        due_date: payload.due_date,
        completed_at: (status == TaskStatus::Completed).then_some(now),
        created_at: now,
        updated_at: now,
    };
    data.storage.insert_task(&task).await?;

    info!("task created: {}", task.task_id);
    Ok(HttpResponse::Ok().json(task))
}

/// LIST all of the caller's tasks, newest first.
pub async fn list_tasks(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    let tasks = data.storage.tasks_by_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Per-status totals for the caller.
pub async fn task_counts(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    let tasks = data.storage.tasks_by_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(count_by_status(&tasks)))
}

/// Tasks still `todo` whose due date has passed.
pub async fn list_overdue(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    let todo = data
        .storage
        .tasks_by_user_and_status(&user_id, TaskStatus::Todo)
        .await?;
    Ok(HttpResponse::Ok().json(overdue_tasks(todo, Utc::now())))
}

pub async fn list_by_status(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    let status: TaskStatus = path.parse().map_err(|_| ApiError::InvalidStatus)?;
    let tasks = data
        .storage
        .tasks_by_user_and_status(&user_id, status)
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

pub async fn list_by_priority(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    let priority = path.parse().map_err(|_| ApiError::InvalidPriority)?;
    let tasks = data
        .storage
        .tasks_by_user_and_priority(&user_id, priority)
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// GET a single task.
pub async fn get_task(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    let task = data
        .storage
        .task_by_id(&path)
        .await?
        .ok_or(ApiError::TaskNotFound)?;
    if task.user_id != user_id {
        return Err(ApiError::NotTaskOwner("view"));
    }
    Ok(HttpResponse::Ok().json(task))
}

/// UPDATE a task. Partial: absent fields stay as they are, and an empty
/// payload still refreshes `updated_at`.
pub async fn update_task(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    data.limiter.check(Op::UpdateTask, &user_id).await?;

    let mut task = data
        .storage
        .task_by_id(&path)
        .await?
        .ok_or(ApiError::TaskNotFound)?;
    if task.user_id != user_id {
        return Err(ApiError::NotTaskOwner("update"));
    }

    if let Some(title) = &payload.title {
        if !is_valid_task_title(title) {
            return Err(ApiError::InvalidTaskTitle);
        }
    }
    if let Some(description) = &payload.description {
        if !is_valid_task_description(description) {
            return Err(ApiError::InvalidTaskDescription);
        }
    }

    let now = Utc::now();
    let patch = TaskPatch {
        title: payload.title.as_ref().map(|t| t.trim().to_string()),
        description: payload.description.as_ref().map(|d| d.trim().to_string()),
        status: payload.status,
        priority: payload.priority,
        due_date: payload.due_date,
        completed_at: completed_at_change(task.status, payload.status, now),
        updated_at: now,
    };
    patch.apply(&mut task);
    data.storage.replace_task(&task).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// DELETE a task and every tag attached to it. The tag sweep runs first;
/// the two deletes are separate writes, not a transaction.
pub async fn delete_task(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    data.limiter.check(Op::DeleteTask, &user_id).await?;

    let task = data
        .storage
        .task_by_id(&path)
        .await?
        .ok_or(ApiError::TaskNotFound)?;
    if task.user_id != user_id {
        return Err(ApiError::NotTaskOwner("delete"));
    }

    let removed_tags = data.storage.delete_tags_by_task(&task.task_id).await?;
    data.storage.delete_task(&task.task_id).await?;

    info!("task deleted: {} ({} tags swept)", task.task_id, removed_tags);
    Ok(HttpResponse::Ok().body("Task deleted successfully"))
}
