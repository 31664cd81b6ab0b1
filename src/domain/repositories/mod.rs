use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::entities::*;
use crate::shared::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn exists_by_email(&self, email: &str) -> Result<bool>;
    async fn list_all(&self) -> Result<Vec<User>>;
    async fn list_by_manager(&self, manager_id: i64) -> Result<Vec<User>>;
    async fn update(&self, user: &User) -> Result<()>;
    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: NewTask) -> Result<Task>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>>;
    /// Tasks where the user is assignee or creator, newest first.
    async fn list_visible(&self, user_id: i64) -> Result<Vec<Task>>;
    async fn list_assigned_to(&self, user_id: i64) -> Result<Vec<Task>>;
    async fn list_created_by(&self, user_id: i64) -> Result<Vec<Task>>;
    /// Tasks assigned to the user that are already done, newest first.
    async fn list_done_by(&self, user_id: i64) -> Result<Vec<Task>>;
    async fn update(&self, task: &Task) -> Result<()>;
    async fn delete(&self, id: i64) -> Result<()>;
    /// Follow-ups due in (min, now], excluding done tasks.
    async fn list_due_follow_ups(
        &self,
        now: DateTime<Utc>,
        min: DateTime<Utc>,
    ) -> Result<Vec<Task>>;
}

#[async_trait]
pub trait TaskMessageRepository: Send + Sync {
    async fn create(&self, task_id: i64, sender: &User, body: &str) -> Result<TaskMessage>;
    async fn list_for_task(&self, task_id: i64) -> Result<Vec<TaskMessage>>;
}

#[async_trait]
pub trait MeetingRepository: Send + Sync {
    async fn create(&self, owner_id: i64, draft: MeetingDraft) -> Result<Meeting>;
    async fn find_for_owner(&self, id: i64, owner_id: i64) -> Result<Option<Meeting>>;
    async fn list_for_owner_in_range(
        &self,
        owner_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Meeting>>;
    /// All meetings in the date range regardless of owner, for the reminder scheduler.
    async fn list_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Meeting>>;
    async fn update(&self, id: i64, owner_id: i64, draft: MeetingDraft) -> Result<Meeting>;
    async fn delete(&self, id: i64, owner_id: i64) -> Result<()>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: NewNotification) -> Result<Notification>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Notification>>;
    /// The user's most recent notifications, capped at `limit`.
    async fn list_for_user(&self, user_id: i64, limit: u64) -> Result<Vec<Notification>>;
    async fn mark_read(&self, id: i64, at: DateTime<Utc>) -> Result<()>;
}

#[async_trait]
pub trait ReminderLogRepository: Send + Sync {
    async fn exists(&self, meeting_id: i64, minutes_before: i32) -> Result<bool>;
    async fn record(&self, meeting_id: i64, minutes_before: i32) -> Result<()>;
}

#[async_trait]
pub trait TaskFollowUpLogRepository: Send + Sync {
    async fn exists(&self, task_id: i64, follow_up_at: DateTime<Utc>) -> Result<bool>;
    async fn record(&self, task_id: i64, follow_up_at: DateTime<Utc>) -> Result<()>;
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn create(&self, record: NewAuditRecord) -> Result<()>;
}
