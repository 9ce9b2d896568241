use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(()),
        }
    }
}

/// A single to-do item, owned by exactly one user.
///
/// `completed_at` is set exactly while `status` is [`TaskStatus::Completed`];
/// the transition logic lives in [`completed_at_change`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a task. Status and priority fall back to
/// `todo` / `medium` when omitted.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Request payload for a partial task update. Omitted fields are untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// The fields a task update may change. `completed_at` is tri-state:
/// `None` leaves it alone, `Some(None)` clears it, `Some(Some(t))` sets it.
/// `updated_at` is stamped on every patch.
#[derive(Debug, Clone)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub updated_at: DateTime<Utc>,
}

impl TaskPatch {
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
        task.updated_at = self.updated_at;
    }
}

/// Decides what an update does to `completed_at`.
///
/// Moving to `completed` stamps the current time, even when the task was
/// already completed. Leaving `completed` clears the stamp. Any other
/// transition, or an update without a status, leaves it untouched.
pub fn completed_at_change(
    current: TaskStatus,
    requested: Option<TaskStatus>,
    now: DateTime<Utc>,
) -> Option<Option<DateTime<Utc>>> {
    match requested {
        Some(TaskStatus::Completed) => Some(Some(now)),
        Some(_) if current == TaskStatus::Completed => Some(None),
        _ => None,
    }
}

/// Per-status totals over one user's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Single pass partition of a task list into per-status counts.
pub fn count_by_status(tasks: &[Task]) -> TaskCounts {
    let mut counts = TaskCounts {
        total: tasks.len(),
        todo: 0,
        in_progress: 0,
        completed: 0,
    };
    for task in tasks {
        match task.status {
            TaskStatus::Todo => counts.todo += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Completed => counts.completed += 1,
        }
    }
    counts
}

/// Keeps the tasks that are still `todo` with a due date strictly before `now`.
pub fn overdue_tasks(tasks: Vec<Task>, now: DateTime<Utc>) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| {
            task.status == TaskStatus::Todo
                && task.due_date.map(|due| due < now).unwrap_or(false)
        })
        .collect()
}

/// The `limit` most recently touched tasks, newest first. Ordered by
/// `updated_at` (which equals `created_at` until the first update), ties
/// broken by `created_at`.
pub fn recent_tasks(mut tasks: Vec<Task>, limit: usize) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then(b.created_at.cmp(&a.created_at))
    });
    tasks.truncate(limit);
    tasks
}
