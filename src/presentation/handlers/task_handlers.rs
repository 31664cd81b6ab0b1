use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as JsonExtractor,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::domain::entities::{kinds, NewNotification, NewTask, Task, User, UserRef};
use crate::domain::services::UserHierarchyService;
use crate::presentation::handlers::user_handlers::{require_user, AuthenticatedUser};
use crate::shared::types::{TaskPriority, TaskStatus};
use crate::shared::{AppState, Result, TaskchiError};

#[derive(Debug, Serialize)]
pub struct TaskDto {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub date: Option<NaiveDate>,
    pub assigned_to_id: Option<i64>,
    pub assigned_to_name: Option<String>,
    pub created_by_id: Option<i64>,
    pub created_by_name: Option<String>,
    pub follow_up_enabled: bool,
    pub follow_up_at: Option<DateTime<Utc>>,
    pub close_requested: bool,
    pub close_requested_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub closed_by_id: Option<i64>,
    pub closed_by_name: Option<String>,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        fn split(user: &Option<UserRef>) -> (Option<i64>, Option<String>) {
            match user {
                Some(u) => (Some(u.id), Some(u.full_name.clone())),
                None => (None, None),
            }
        }

        let (assigned_to_id, assigned_to_name) = split(&task.assigned_to);
        let (created_by_id, created_by_name) = split(&task.created_by);
        let (closed_by_id, closed_by_name) = split(&task.closed_by);

        Self {
            id: task.id,
            title: task.title.clone(),
            status: task.status,
            priority: task.priority,
            date: task.date,
            assigned_to_id,
            assigned_to_name,
            created_by_id,
            created_by_name,
            follow_up_enabled: task.follow_up_enabled,
            follow_up_at: task.follow_up_at,
            close_requested: task.close_requested,
            close_requested_at: task.close_requested_at,
            closed_at: task.closed_at,
            closed_by_id,
            closed_by_name,
        }
    }
}

/// Check that `me` may assign a task to `assignee`. Nobody assigns to an
/// admin other than themselves; non-admins only reach their own subtree.
async fn check_assignment(
    me: &User,
    assignee: &User,
    hierarchy: &UserHierarchyService,
) -> Result<()> {
    if assignee.is_admin() && assignee.id != me.id {
        return Err(TaskchiError::Forbidden {
            reason: "Cannot assign tasks to admin".to_string(),
        });
    }

    if !me.is_admin() {
        let can_assign =
            me.id == assignee.id || hierarchy.is_manager_of(me.id, assignee.id).await?;
        if !can_assign {
            return Err(TaskchiError::Forbidden {
                reason: "Not allowed to assign to this user".to_string(),
            });
        }
    }

    Ok(())
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

/// Tasks visible to the caller: assigned to or created by them.
pub async fn list_tasks(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskDto>>> {
    let me = require_user(&app_state, user_id).await?;
    let tasks = app_state.tasks.list_visible(me.id).await?;
    Ok(Json(tasks.iter().map(TaskDto::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct MyTasksParams {
    #[serde(rename = "type")]
    pub kind: String,
}

/// The caller's tasks by view: assigned, created or done.
pub async fn list_my_tasks(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<MyTasksParams>,
) -> Result<Json<Vec<TaskDto>>> {
    let me = require_user(&app_state, user_id).await?;

    let tasks = match params.kind.as_str() {
        "assigned" => app_state.tasks.list_assigned_to(me.id).await?,
        "created" => app_state.tasks.list_created_by(me.id).await?,
        "done" => app_state.tasks.list_done_by(me.id).await?,
        _ => {
            return Err(TaskchiError::ValidationError {
                field: "type".to_string(),
                message: "type must be assigned|created|done".to_string(),
            })
        }
    };

    Ok(Json(tasks.iter().map(TaskDto::from).collect()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub date: Option<NaiveDate>,
    pub assigned_to_id: Option<i64>,
    #[serde(default)]
    pub follow_up_enabled: bool,
    pub follow_up_at: Option<DateTime<Utc>>,
}

pub async fn create_task(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<CreateTaskRequest>,
) -> Result<Json<TaskDto>> {
    let me = require_user(&app_state, user_id).await?;
    request.validate()?;

    let assigned_to_id = request.assigned_to_id.ok_or_else(|| {
        TaskchiError::ValidationError {
            field: "assigned_to_id".to_string(),
            message: "assigned_to_id is required".to_string(),
        }
    })?;

    let assignee = app_state
        .users
        .find_by_id(assigned_to_id)
        .await?
        .ok_or_else(|| TaskchiError::ValidationError {
            field: "assigned_to_id".to_string(),
            message: "assignee not found".to_string(),
        })?;

    check_assignment(&me, &assignee, &app_state.hierarchy).await?;

    let (follow_up_enabled, follow_up_at) = match (request.follow_up_enabled, request.follow_up_at)
    {
        (_, Some(at)) => (true, Some(at)),
        (true, None) => {
            return Err(TaskchiError::ValidationError {
                field: "follow_up_at".to_string(),
                message: "follow_up_at is required when follow_up_enabled=true".to_string(),
            })
        }
        (false, None) => (false, None),
    };

    let task = app_state
        .tasks
        .create(NewTask {
            title: request.title,
            status: request.status.unwrap_or(TaskStatus::Todo),
            priority: request.priority.unwrap_or(TaskPriority::Medium),
            date: request.date,
            assigned_to_id: assignee.id,
            created_by_id: me.id,
            follow_up_enabled,
            follow_up_at,
        })
        .await?;

    info!("User {} created task {}", me.id, task.id);
    Ok(Json(TaskDto::from(&task)))
}

#[derive(Debug, Deserialize, Default)]
pub struct TaskPatchRequest {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<i64>,
    // Follow-up reminder for the creator/assigner
    pub follow_up_enabled: Option<bool>,
    pub follow_up_at: Option<DateTime<Utc>>,
}

pub async fn patch_task(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonExtractor(request): JsonExtractor<TaskPatchRequest>,
) -> Result<Json<TaskDto>> {
    let me = require_user(&app_state, user_id).await?;
    let mut task = find_task(&app_state, id).await?;

    let is_assignee = task.is_assignee(me.id);
    let is_creator = task.is_creator(me.id);

    if !(me.is_admin() || is_assignee || is_creator) {
        return Err(TaskchiError::Forbidden {
            reason: "Not allowed to update this task".to_string(),
        });
    }

    if task.status == TaskStatus::Done {
        return Err(TaskchiError::Conflict {
            message: "Task is already closed".to_string(),
        });
    }

    if request.status == Some(TaskStatus::Done) {
        return Err(TaskchiError::ValidationError {
            field: "status".to_string(),
            message: "Only creator can close task (use /api/tasks/{id}/close)".to_string(),
        });
    }

    if is_assignee && !me.is_admin() && !is_creator {
        // Plain assignees may only move the status
        if request.priority.is_some()
            || request.assignee_id.is_some()
            || request.follow_up_enabled.is_some()
            || request.follow_up_at.is_some()
        {
            return Err(TaskchiError::Forbidden {
                reason: "Assignee can only update status".to_string(),
            });
        }
        if let Some(status) = request.status {
            task.status = status;
        }
    } else {
        if let Some(status) = request.status {
            task.status = status;
        }
        if let Some(priority) = request.priority {
            task.priority = priority;
        }

        if let Some(assignee_id) = request.assignee_id {
            let assignee = app_state
                .users
                .find_by_id(assignee_id)
                .await?
                .ok_or_else(|| TaskchiError::ValidationError {
                    field: "assignee_id".to_string(),
                    message: "assignee not found".to_string(),
                })?;

            check_assignment(&me, &assignee, &app_state.hierarchy).await?;

            task.assigned_to = Some(UserRef {
                id: assignee.id,
                full_name: assignee.full_name,
            });
        }

        if let Some(enabled) = request.follow_up_enabled {
            task.follow_up_enabled = enabled;
            if !enabled {
                task.follow_up_at = None;
            }
        }
        if let Some(at) = request.follow_up_at {
            task.follow_up_at = Some(at);
            task.follow_up_enabled = true;
        }

        if task.follow_up_enabled && task.follow_up_at.is_none() {
            return Err(TaskchiError::ValidationError {
                field: "follow_up_at".to_string(),
                message: "follow_up_at is required when follow_up_enabled=true".to_string(),
            });
        }
    }

    app_state.tasks.update(&task).await?;
    let task = find_task(&app_state, task.id).await?;
    Ok(Json(TaskDto::from(&task)))
}

/// Assignee asks the creator to close the task. Idempotent.
pub async fn request_close(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskDto>> {
    let me = require_user(&app_state, user_id).await?;
    let mut task = find_task(&app_state, id).await?;

    if !(me.is_admin() || task.is_assignee(me.id)) {
        return Err(TaskchiError::Forbidden {
            reason: "Only assignee can request close".to_string(),
        });
    }

    if task.status == TaskStatus::Done {
        return Err(TaskchiError::Conflict {
            message: "Task is already closed".to_string(),
        });
    }

    if !task.close_requested {
        task.close_requested = true;
        task.close_requested_at = Some(Utc::now());
        app_state.tasks.update(&task).await?;

        if let Some(creator) = task.created_by.as_ref().filter(|c| c.id != me.id) {
            app_state
                .notifications
                .create(NewNotification {
                    kind: kinds::TASK_CLOSE_REQUEST.to_string(),
                    title: format!("درخواست بستن تسک: {}", task.title),
                    message: Some(format!(
                        "{} درخواست بستن این تسک را ثبت کرد.\nبرای بستن نهایی، تسک را باز کن.",
                        me.full_name
                    )),
                    user_id: creator.id,
                    meeting_id: None,
                    task_id: Some(task.id),
                })
                .await?;
        }
    }

    let task = find_task(&app_state, task.id).await?;
    Ok(Json(TaskDto::from(&task)))
}

/// Creator or admin closes the task. Non-admin creators need a prior close
/// request unless the task is assigned to themselves.
pub async fn close_task(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskDto>> {
    let me = require_user(&app_state, user_id).await?;
    let mut task = find_task(&app_state, id).await?;

    let is_creator = task.is_creator(me.id);
    let is_assignee = task.is_assignee(me.id);

    if !(me.is_admin() || is_creator) {
        return Err(TaskchiError::Forbidden {
            reason: "Only creator or admin can close task".to_string(),
        });
    }

    if task.status == TaskStatus::Done {
        return Ok(Json(TaskDto::from(&task)));
    }

    if !me.is_admin() {
        let self_task = is_creator && is_assignee;
        if !self_task && !task.close_requested {
            return Err(TaskchiError::Conflict {
                message: "Assignee must request close first".to_string(),
            });
        }
    }

    let now = Utc::now();
    task.status = TaskStatus::Done;
    task.closed_at = Some(now);
    task.closed_by = Some(UserRef {
        id: me.id,
        full_name: me.full_name.clone(),
    });
    if !task.close_requested {
        task.close_requested = true;
        task.close_requested_at = Some(now);
    }

    app_state.tasks.update(&task).await?;

    if let Some(assignee) = task.assigned_to.as_ref().filter(|a| a.id != me.id) {
        app_state
            .notifications
            .create(NewNotification {
                kind: kinds::TASK_CLOSED.to_string(),
                title: format!("تسک بسته شد: {}", task.title),
                message: Some(format!("{} این تسک را بست.", me.full_name)),
                user_id: assignee.id,
                meeting_id: None,
                task_id: Some(task.id),
            })
            .await?;
    }

    info!("User {} closed task {}", me.id, task.id);

    let task = find_task(&app_state, task.id).await?;
    Ok(Json(TaskDto::from(&task)))
}

/// Creator or admin deletes the task.
pub async fn delete_task(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let me = require_user(&app_state, user_id).await?;
    let task = find_task(&app_state, id).await?;

    if !me.is_admin() && !task.is_creator(me.id) {
        return Err(TaskchiError::Forbidden {
            reason: "Only creator or admin can delete task".to_string(),
        });
    }

    app_state.tasks.delete(task.id).await?;
    info!("User {} deleted task {}", me.id, task.id);
    Ok(StatusCode::NO_CONTENT)
}
