use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::types::{TaskPriority, TaskStatus};

/// Minimal reference to a user attached to a task or message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub date: Option<NaiveDate>,
    pub assigned_to: Option<UserRef>,
    pub created_by: Option<UserRef>,
    pub close_requested: bool,
    pub close_requested_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub closed_by: Option<UserRef>,
    pub follow_up_enabled: bool,
    pub follow_up_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_assignee(&self, user_id: i64) -> bool {
        self.assigned_to.as_ref().map(|u| u.id) == Some(user_id)
    }

    pub fn is_creator(&self, user_id: i64) -> bool {
        self.created_by.as_ref().map(|u| u.id) == Some(user_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub date: Option<NaiveDate>,
    pub assigned_to_id: i64,
    pub created_by_id: i64,
    pub follow_up_enabled: bool,
    pub follow_up_at: Option<DateTime<Utc>>,
}

/// In-task message between assignee and creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMessage {
    pub id: i64,
    pub task_id: i64,
    pub sender: UserRef,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
