pub mod preferences;
pub mod tag;
pub mod task;
pub mod user;

pub use preferences::{PreferencesPatch, Theme, UpdatePreferencesRequest, UserPreferences, ViewMode};
pub use tag::{CreateTagRequest, TagPatch, TaskTag, UpdateTagRequest};
pub use task::{
    CreateTaskRequest, Task, TaskCounts, TaskPatch, TaskPriority, TaskStatus, UpdateTaskRequest,
};
pub use user::{AuthResponse, LoginRequest, SignupRequest, User, UserProfile};

/// Suggested colors offered by the UI when tagging a task.
pub const DEFAULT_TAG_COLORS: [&str; 8] = [
    "#ef4444", // red
    "#f97316", // orange
    "#facc15", // yellow
    "#16a34a", // green
    "#0ea5e9", // blue
    "#6366f1", // indigo
    "#a855f7", // purple
    "#ec4899", // pink
];

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;

/// How many tasks the dashboard shows when no limit is given.
pub const DEFAULT_RECENT_LIMIT: usize = 10;
