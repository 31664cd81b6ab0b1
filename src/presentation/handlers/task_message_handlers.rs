use axum::{
    extract::{Path, State},
    response::Json,
    Json as JsonExtractor,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::entities::{kinds, NewNotification, Task, TaskMessage, User};
use crate::presentation::handlers::user_handlers::{require_user, AuthenticatedUser};
use crate::shared::{AppState, Result, TaskchiError};

const MAX_MESSAGE_LEN: usize = 4000;
const PREVIEW_LEN: usize = 220;

#[derive(Debug, Serialize)]
pub struct TaskMessageDto {
    pub id: i64,
    pub task_id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<&TaskMessage> for TaskMessageDto {
    fn from(message: &TaskMessage) -> Self {
        Self {
            id: message.id,
            task_id: message.task_id,
            sender_id: message.sender.id,
            sender_name: message.sender.full_name.clone(),
            body: message.body.clone(),
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskMessageRequest {
    pub body: Option<String>,
}

/// In-task messaging between assignee and creator; admins can monitor.
fn can_access_task(me: &User, task: &Task) -> bool {
    me.is_admin() || task.is_assignee(me.id) || task.is_creator(me.id)
}

async fn find_task(state: &AppState, id: i64) -> Result<Task> {
    state
        .tasks
        .find_by_id(id)
        .await?
        .ok_or_else(|| TaskchiError::NotFound {
            resource: format!("Task with id: {}", id),
        })
}

pub async fn list_messages(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Path(task_id): Path<i64>,
) -> Result<Json<Vec<TaskMessageDto>>> {
    let me = require_user(&app_state, user_id).await?;
    let task = find_task(&app_state, task_id).await?;

    if !can_access_task(&me, &task) {
        return Err(TaskchiError::Forbidden {
            reason: "Not allowed".to_string(),
        });
    }

    let messages = app_state.task_messages.list_for_task(task.id).await?;
    Ok(Json(messages.iter().map(TaskMessageDto::from).collect()))
}

pub async fn create_message(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Path(task_id): Path<i64>,
    JsonExtractor(request): JsonExtractor<CreateTaskMessageRequest>,
) -> Result<Json<TaskMessageDto>> {
    let me = require_user(&app_state, user_id).await?;
    let task = find_task(&app_state, task_id).await?;

    if !can_access_task(&me, &task) {
        return Err(TaskchiError::Forbidden {
            reason: "Not allowed".to_string(),
        });
    }

    let body = request
        .body
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| TaskchiError::ValidationError {
            field: "body".to_string(),
            message: "body is required".to_string(),
        })?;

    if body.chars().count() > MAX_MESSAGE_LEN {
        return Err(TaskchiError::ValidationError {
            field: "body".to_string(),
            message: "message is too long".to_string(),
        });
    }

    let message = app_state.task_messages.create(task.id, &me, body).await?;

    // notify the other participants
    notify_participants(&app_state, &task, &me, body).await?;

    Ok(Json(TaskMessageDto::from(&message)))
}

async fn notify_participants(
    state: &AppState,
    task: &Task,
    sender: &User,
    body: &str,
) -> Result<()> {
    let mut recipient_ids = BTreeSet::new();
    if let Some(creator) = &task.created_by {
        recipient_ids.insert(creator.id);
    }
    if let Some(assignee) = &task.assigned_to {
        recipient_ids.insert(assignee.id);
    }
    recipient_ids.remove(&sender.id);

    if recipient_ids.is_empty() {
        return Ok(());
    }

    let title = format!("پیام جدید درباره تسک: {}", task.title);
    let preview = build_preview(&sender.full_name, body);

    for recipient_id in recipient_ids {
        state
            .notifications
            .create(NewNotification {
                kind: kinds::TASK_MESSAGE.to_string(),
                title: title.clone(),
                message: Some(preview.clone()),
                user_id: recipient_id,
                meeting_id: None,
                task_id: Some(task.id),
            })
            .await?;
    }

    Ok(())
}

fn build_preview(sender_name: &str, body: &str) -> String {
    let text = body.replace('\n', " ").trim().to_string();
    let text = if text.chars().count() > PREVIEW_LEN {
        let truncated: String = text.chars().take(PREVIEW_LEN).collect();
        format!("{}…", truncated)
    } else {
        text
    };
    format!("{}: {}", sender_name, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_previews_are_untouched() {
        let preview = build_preview("سارا", "سلام");
        assert_eq!(preview, "سارا: سلام");
    }

    #[test]
    fn newlines_collapse_and_long_bodies_truncate() {
        let body = format!("اول\nدوم {}", "x".repeat(400));
        let preview = build_preview("علی", &body);
        assert!(!preview.contains('\n'));
        assert!(preview.ends_with('…'));
        assert!(preview.chars().count() <= PREVIEW_LEN + "علی: …".chars().count());
    }
}
