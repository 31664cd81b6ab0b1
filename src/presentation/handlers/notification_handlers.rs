use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::entities::Notification;
use crate::presentation::handlers::user_handlers::{require_user, AuthenticatedUser};
use crate::shared::{AppState, Result, TaskchiError};

const FEED_LIMIT: u64 = 200;

#[derive(Debug, Serialize)]
pub struct NotificationDto {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: Option<String>,
    pub meeting_id: Option<i64>,
    pub task_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<&Notification> for NotificationDto {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind.clone(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            meeting_id: notification.meeting_id,
            task_id: notification.task_id,
            created_at: notification.created_at,
            read_at: notification.read_at,
        }
    }
}

/// The caller's notification feed, newest first.
pub async fn list_mine(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<NotificationDto>>> {
    let me = require_user(&app_state, user_id).await?;

    let notifications = app_state.notifications.list_for_user(me.id, FEED_LIMIT).await?;
    Ok(Json(
        notifications.iter().map(NotificationDto::from).collect(),
    ))
}

/// Mark one notification as read. Only the owner or an admin may.
pub async fn mark_read(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let me = require_user(&app_state, user_id).await?;

    let notification = app_state
        .notifications
        .find_by_id(id)
        .await?
        .ok_or_else(|| TaskchiError::NotFound {
            resource: format!("Notification with id: {}", id),
        })?;

    let allowed = me.is_admin() || notification.user_id == Some(me.id);
    if !allowed {
        return Err(TaskchiError::Forbidden {
            reason: "Not allowed".to_string(),
        });
    }

    app_state.notifications.mark_read(notification.id, Utc::now()).await?;
    Ok(StatusCode::NO_CONTENT)
}
