use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::current_user;
use crate::error::ApiError;
use crate::models::tag::distinct_tag_names;
use crate::models::{CreateTagRequest, TagPatch, TaskTag, UpdateTagRequest};
use crate::rate_limit::Op;
use crate::storage::Storage;
use crate::validation::{is_valid_hex_color, is_valid_tag_name};

/// CREATE a tag on a task. Tagging goes through the task so ownership is
/// checked against the task record, which keeps tag owner and task owner
/// in lockstep.
pub async fn create_tag(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<CreateTagRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    data.limiter.check(Op::CreateTag, &user_id).await?;

    let task = data
        .storage
        .task_by_id(&path)
        .await?
        .ok_or(ApiError::TaskNotFound)?;
    if task.user_id != user_id {
        return Err(ApiError::NotTaskOwner("add tags to"));
    }

    if !is_valid_tag_name(&payload.name) {
        return Err(ApiError::InvalidTagName);
    }
    if let Some(color) = &payload.color {
        if !is_valid_hex_color(color) {
            return Err(ApiError::InvalidTagColor);
        }
    }

    let tag = TaskTag {
        tag_id: Uuid::new_v4().to_string(),
        task_id: task.task_id.clone(),
        user_id,
        name: payload.name.trim().to_string(),
        color: payload.color.clone(),
        created_at: Utc::now(),
    };
    data.storage.insert_tag(&tag).await?;

    info!("tag created: {} on task {}", tag.tag_id, tag.task_id);
    Ok(HttpResponse::Ok().json(tag))
}

/// LIST the tags on one task, oldest first.
pub async fn list_task_tags(
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
        return Err(ApiError::NotTaskOwner("view tags for"));
    }
    let tags = data.storage.tags_by_task(&task.task_id).await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// Distinct tag names across all of the caller's tags.
pub async fn list_tag_names(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    let tags = data.storage.tags_by_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(distinct_tag_names(&tags)))
}

/// UPDATE a tag's name or color.
pub async fn update_tag(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<UpdateTagRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    data.limiter.check(Op::UpdateTag, &user_id).await?;

    let mut tag = data
        .storage
        .tag_by_id(&path)
        .await?
        .ok_or(ApiError::TagNotFound)?;
    if tag.user_id != user_id {
        return Err(ApiError::NotTagOwner("update"));
    }

    if let Some(name) = &payload.name {
        if !is_valid_tag_name(name) {
            return Err(ApiError::InvalidTagName);
        }
    }
    if let Some(color) = &payload.color {
        if !is_valid_hex_color(color) {
            return Err(ApiError::InvalidTagColor);
        }
    }

    let patch = TagPatch {
        name: payload.name.as_ref().map(|n| n.trim().to_string()),
        color: payload.color.clone(),
    };
    patch.apply(&mut tag);
    data.storage.replace_tag(&tag).await?;

    Ok(HttpResponse::Ok().json(tag))
}

/// DELETE a single tag.
pub async fn delete_tag(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = current_user(&req)?;
    data.limiter.check(Op::DeleteTag, &user_id).await?;

    let tag = data
        .storage
        .tag_by_id(&path)
        .await?
        .ok_or(ApiError::TagNotFound)?;
    if tag.user_id != user_id {
        return Err(ApiError::NotTagOwner("delete"));
    }

    data.storage.delete_tag(&tag.tag_id).await?;
    info!("tag deleted: {}", tag.tag_id);
    Ok(HttpResponse::Ok().body("Tag deleted successfully"))
}
