use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A label attached to a task. Tags carry the id of the user who created
/// them so they can be authorized without re-reading the task they sit on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTag {
    pub tag_id: String,
    pub task_id: String,
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Fields a tag update may change, already trimmed and validated.
#[derive(Debug, Clone)]
pub struct TagPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl TagPatch {
    pub fn apply(&self, tag: &mut TaskTag) {
        if let Some(name) = &self.name {
            tag.name = name.clone();
        }
        if let Some(color) = &self.color {
            tag.color = Some(color.clone());
        }
    }
}

/// Deduplicated tag names, sorted for a stable response order.
pub fn distinct_tag_names(tags: &[TaskTag]) -> Vec<String> {
    let mut names: Vec<String> = tags.iter().map(|tag| tag.name.clone()).collect();
    names.sort();
    names.dedup();
    names
}
