#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{Duration, Utc};
use uuid::Uuid;

use todo_backend::app_state::AppState;
use todo_backend::auth::create_jwt;
use todo_backend::config::Config;
use todo_backend::models::{Task, TaskPriority, TaskStatus, TaskTag, User};
use todo_backend::rate_limit::RateLimiter;
use todo_backend::storage::{MemoryStorage, Storage};

pub const TEST_SECRET: &str = "test-secret";

/// Assembles the same `App` the server binary runs, over test state.
#[macro_export]
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .wrap(todo_backend::auth::Authentication)
                .configure(todo_backend::routes::configure),
        )
        .await
    };
}

/// bcrypt at minimum cost; these hashes only need to round-trip in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Fresh in-memory application state.
pub fn state() -> web::Data<AppState> {
    web::Data::new(AppState {
        storage: Arc::new(MemoryStorage::new()),
        limiter: Arc::new(RateLimiter::new()),
        config: Config {
            mongo_uri: String::new(),
            database_name: "todo_test".to_string(),
            jwt_secret: TEST_SECRET.to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
        },
    })
}

/// Inserts a user directly into storage and mints a bearer token for it,
/// skipping the signup endpoint.
pub async fn seed_user(state: &web::Data<AppState>, email: &str) -> (String, String) {
    let user = User {
        user_id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        password_hash: bcrypt::hash("password123", TEST_BCRYPT_COST).unwrap(),
        created_at: Utc::now(),
    };
    state.storage.insert_user(&user).await.unwrap();
    let token = create_jwt(&user.user_id, TEST_SECRET).unwrap();
    (user.user_id, token)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// A task inserted straight into storage. `age_secs` pushes the creation
/// and update stamps into the past so ordering tests have distinct times.
pub async fn seed_task(
    state: &web::Data<AppState>,
    user_id: &str,
    status: TaskStatus,
    age_secs: i64,
) -> Task {
    let at = Utc::now() - Duration::seconds(age_secs);
    let task = Task {
        task_id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: format!("task-{}", age_secs),
        description: None,
        status,
        priority: TaskPriority::Medium,
        due_date: None,
        completed_at: (status == TaskStatus::Completed).then_some(at),
        created_at: at,
        updated_at: at,
    };
    state.storage.insert_task(&task).await.unwrap();
    task
}

/// A tag inserted straight into storage, backdated like [`seed_task`].
pub async fn seed_tag(
    state: &web::Data<AppState>,
    task: &Task,
    name: &str,
    age_secs: i64,
) -> TaskTag {
    let tag = TaskTag {
        tag_id: Uuid::new_v4().to_string(),
        task_id: task.task_id.clone(),
        user_id: task.user_id.clone(),
        name: name.to_string(),
        color: None,
        created_at: Utc::now() - Duration::seconds(age_secs),
    };
    state.storage.insert_tag(&tag).await.unwrap();
    tag
}
