// src/validation.rs

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static HEX_COLOR: OnceLock<Regex> = OnceLock::new();

fn hex_color_pattern() -> &'static Regex {
    HEX_COLOR.get_or_init(|| {
        Regex::new(r"^#([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").expect("hex color pattern")
    })
}

/// A task title must be non-empty after trimming and at most 200 characters raw.
pub fn is_valid_task_title(title: &str) -> bool {
    !title.trim().is_empty() && title.chars().count() <= 200
}

/// A task description may be empty but is capped at 2000 characters.
pub fn is_valid_task_description(description: &str) -> bool {
    description.chars().count() <= 2000
}

/// A tag name must be non-empty after trimming and at most 50 characters raw.
pub fn is_valid_tag_name(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().count() <= 50
}

/// A tag color is `#` followed by exactly 3 or 6 hex digits.
pub fn is_valid_hex_color(color: &str) -> bool {
    hex_color_pattern().is_match(color)
}

/// A due date must lie strictly in the future.
pub fn is_valid_due_date(due_date: DateTime<Utc>) -> bool {
    due_date > Utc::now()
}
