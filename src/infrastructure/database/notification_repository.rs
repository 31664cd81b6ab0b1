use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::entities::{NewNotification, Notification};
use crate::domain::repositories::{
    NotificationRepository, ReminderLogRepository, TaskFollowUpLogRepository,
};
use crate::infrastructure::database::entity::{
    in_app_notifications, reminder_log, task_followup_log,
};
use crate::shared::{Result, TaskchiError};

pub struct SeaOrmNotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmNotificationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(model: in_app_notifications::Model) -> Notification {
    Notification {
        id: model.id,
        kind: model.kind,
        title: model.title,
        message: model.message,
        user_id: model.user_id,
        meeting_id: model.meeting_id,
        task_id: model.task_id,
        created_at: model.created_at,
        read_at: model.read_at,
    }
}

#[async_trait]
impl NotificationRepository for SeaOrmNotificationRepository {
    async fn create(&self, notification: NewNotification) -> Result<Notification> {
        let model = in_app_notifications::ActiveModel {
            kind: Set(notification.kind),
            title: Set(notification.title),
            message: Set(notification.message),
            user_id: Set(Some(notification.user_id)),
            meeting_id: Set(notification.meeting_id),
            task_id: Set(notification.task_id),
            created_at: Set(Utc::now()),
            read_at: Set(None),
            ..Default::default()
        };

        let inserted = in_app_notifications::Entity::insert(model)
            .exec_with_returning(self.db.as_ref())
            .await?;

        Ok(to_domain(inserted))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Notification>> {
        Ok(in_app_notifications::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(to_domain))
    }

    async fn list_for_user(&self, user_id: i64, limit: u64) -> Result<Vec<Notification>> {
        let rows = in_app_notifications::Entity::find()
            .filter(in_app_notifications::Column::UserId.eq(user_id))
            .order_by_desc(in_app_notifications::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn mark_read(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let model = in_app_notifications::ActiveModel {
            id: Set(id),
            read_at: Set(Some(at)),
            ..Default::default()
        };

        model.update(self.db.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotFound(_) => TaskchiError::NotFound {
                resource: format!("Notification with id: {}", id),
            },
            other => TaskchiError::Database {
                message: format!("Failed to mark notification read: {}", other),
            },
        })?;

        Ok(())
    }
}

pub struct SeaOrmReminderLogRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmReminderLogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReminderLogRepository for SeaOrmReminderLogRepository {
    async fn exists(&self, meeting_id: i64, minutes_before: i32) -> Result<bool> {
        let count = reminder_log::Entity::find()
            .filter(reminder_log::Column::MeetingId.eq(meeting_id))
            .filter(reminder_log::Column::MinutesBefore.eq(minutes_before))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn record(&self, meeting_id: i64, minutes_before: i32) -> Result<()> {
        let model = reminder_log::ActiveModel {
            meeting_id: Set(meeting_id),
            minutes_before: Set(minutes_before),
            fired_at: Set(Utc::now()),
            ..Default::default()
        };
        reminder_log::Entity::insert(model)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}

pub struct SeaOrmTaskFollowUpLogRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTaskFollowUpLogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskFollowUpLogRepository for SeaOrmTaskFollowUpLogRepository {
    async fn exists(&self, task_id: i64, follow_up_at: DateTime<Utc>) -> Result<bool> {
        let count = task_followup_log::Entity::find()
            .filter(task_followup_log::Column::TaskId.eq(task_id))
            .filter(task_followup_log::Column::FollowUpAt.eq(follow_up_at))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn record(&self, task_id: i64, follow_up_at: DateTime<Utc>) -> Result<()> {
        let model = task_followup_log::ActiveModel {
            task_id: Set(task_id),
            follow_up_at: Set(follow_up_at),
            fired_at: Set(Utc::now()),
            ..Default::default()
        };
        task_followup_log::Entity::insert(model)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
