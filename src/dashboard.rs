// src/dashboard.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::auth::current_user;
use crate::error::ApiError;
use crate::models::task::recent_tasks;
use crate::models::{DEFAULT_RECENT_LIMIT, MAX_PAGE_SIZE};
use crate::storage::Storage;

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_records: u64,
    pub per_table: PerTableCounts,
    pub primary_table_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PerTableCounts {
    pub tasks: u64,
    pub task_tags: u64,
    pub user_preferences: u64,
}

/// Record totals across the caller's three tables; tasks are the primary
/// table the dashboard headlines.
pub async fn summary(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;

    let tasks = data.storage.task_count(&user_id).await?;
    let task_tags = data.storage.tag_count(&user_id).await?;
    let user_preferences = data.storage.preferences_count(&user_id).await?;

    Ok(HttpResponse::Ok().json(DashboardSummary {
        total_records: tasks + task_tags + user_preferences,
        per_table: PerTableCounts {
            tasks,
            task_tags,
            user_preferences,
        },
        primary_table_count: tasks,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// The caller's most recently touched tasks, default 10, capped at the
/// page-size ceiling.
pub async fn recent(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<RecentQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT).min(MAX_PAGE_SIZE);
    let tasks = data.storage.tasks_by_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(recent_tasks(tasks, limit)))
}
