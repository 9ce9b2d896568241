use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::storage::StorageError;

/// Every failure a handler can surface, with its HTTP status.
///
/// Message texts are part of the API contract; clients match on them, so
/// they stay stable even when the variant shape changes.
#[derive(Error, Debug)]
pub enum ApiError {
    // 401
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // 403
    #[error("Not authorized to {0} this task")]
    NotTaskOwner(&'static str),

    #[error("Not authorized to {0} this tag")]
    NotTagOwner(&'static str),

    // 404
    #[error("Task not found")]
    TaskNotFound,

    #[error("Tag not found")]
    TagNotFound,

    // 400
    #[error("Invalid task title. Must be 1-200 characters.")]
    InvalidTaskTitle,

    #[error("Invalid task description. Must be less than 2000 characters.")]
    InvalidTaskDescription,

    #[error("Invalid tag name. Must be 1-50 characters.")]
    InvalidTagName,

    #[error("Invalid color. Must be a valid hex color (e.g., #FF0000).")]
    InvalidTagColor,

    #[error("Invalid status. Must be one of: todo, in_progress, completed.")]
    InvalidStatus,

    #[error("Invalid priority. Must be one of: low, medium, high.")]
    InvalidPriority,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    // 409
    #[error("An account with this email already exists")]
    EmailTaken,

    // 429
    #[error(
        "Rate limit exceeded. Please try again in {} seconds.",
        retry_after_secs(.retry_after)
    )]
    RateLimited { retry_after: Duration },

    // 500
    #[error("Database error: {0}")]
    Storage(#[from] StorageError),

    #[error("Error hashing password")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Error creating token")]
    TokenCreation(#[from] jsonwebtoken::errors::Error),
}

/// Rounds a retry-after up to whole seconds, so 5.5s reads as "6 seconds".
fn retry_after_secs(retry_after: &Duration) -> u64 {
    retry_after.as_millis().div_ceil(1000) as u64
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotAuthenticated | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }

            ApiError::NotTaskOwner(_) | ApiError::NotTagOwner(_) => StatusCode::FORBIDDEN,

            ApiError::TaskNotFound | ApiError::TagNotFound => StatusCode::NOT_FOUND,

            ApiError::InvalidTaskTitle
            | ApiError::InvalidTaskDescription
            | ApiError::InvalidTagName
            | ApiError::InvalidTagColor
            | ApiError::InvalidStatus
            | ApiError::InvalidPriority
            | ApiError::InvalidEmail
            | ApiError::PasswordTooShort => StatusCode::BAD_REQUEST,

            ApiError::EmailTaken => StatusCode::CONFLICT,

            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,

            ApiError::Storage(_) | ApiError::Hash(_) | ApiError::TokenCreation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Wire shape of an error response.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
