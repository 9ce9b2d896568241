use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    List,
    Board,
    Calendar,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Board => "board",
            ViewMode::Calendar => "calendar",
        }
    }
}

/// Per-user UI settings. At most one record per user; the handlers enforce
/// that with a lookup before insert, there is no storage-level constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    pub preferences_id: String,
    pub user_id: String,
    pub theme: Theme,
    pub default_view: ViewMode,
    pub notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserPreferences {
    /// Fresh record with the stock defaults.
    pub fn with_defaults(user_id: &str, now: DateTime<Utc>) -> Self {
        UserPreferences {
            preferences_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            theme: Theme::System,
            default_view: ViewMode::List,
            notifications: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub theme: Option<Theme>,
    pub default_view: Option<ViewMode>,
    pub notifications: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub default_view: Option<ViewMode>,
    pub notifications: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl PreferencesPatch {
    pub fn apply(&self, prefs: &mut UserPreferences) {
        if let Some(theme) = self.theme {
            prefs.theme = theme;
        }
        if let Some(view) = self.default_view {
            prefs.default_view = view;
        }
        if let Some(notifications) = self.notifications {
            prefs.notifications = notifications;
        }
        prefs.updated_at = self.updated_at;
    }
}
