//! Multi-user to-do backend.
//!
//! Users sign up with email and password, then manage personal tasks,
//! per-task tags, and UI preferences over a JSON API. A dashboard rolls
//! the same records up into counts and recent activity. Every record
//! belongs to exactly one user; handlers enforce ownership on each read
//! and write, and mutations pass through a per-user token-bucket rate
//! limiter.
//!
//! The crate is a library so the integration tests can assemble the same
//! actix `App` the server binary runs, with storage swapped behind the
//! [`storage::Storage`] trait.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod preferences;
pub mod rate_limit;
pub mod routes;
pub mod storage;
pub mod tags;
pub mod tasks;
pub mod validation;
