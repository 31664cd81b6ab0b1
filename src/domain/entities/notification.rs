use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification type tags as stored in the database.
pub mod kinds {
    pub const TASK_MESSAGE: &str = "TASK_MESSAGE";
    pub const TASK_CLOSE_REQUEST: &str = "TASK_CLOSE_REQUEST";
    pub const TASK_CLOSED: &str = "TASK_CLOSED";
    pub const TASK_FOLLOWUP: &str = "TASK_FOLLOWUP";
    pub const MEETING_REMINDER: &str = "MEETING_REMINDER";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub kind: String,
    pub title: String,
    pub message: Option<String>,
    pub user_id: Option<i64>,
    pub meeting_id: Option<i64>,
    pub task_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: String,
    pub title: String,
    pub message: Option<String>,
    pub user_id: i64,
    pub meeting_id: Option<i64>,
    pub task_id: Option<i64>,
}
