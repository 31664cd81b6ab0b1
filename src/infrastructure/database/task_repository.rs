use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::entities::{NewTask, Task, TaskMessage, User, UserRef};
use crate::domain::repositories::{TaskMessageRepository, TaskRepository};
use crate::infrastructure::database::entity::{task_messages, tasks, users};
use crate::shared::types::{TaskPriority, TaskStatus};
use crate::shared::{Result, TaskchiError};

pub struct SeaOrmTaskRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTaskRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Resolve the user references of a batch of task rows with one lookup.
    async fn attach_people(&self, models: Vec<tasks::Model>) -> Result<Vec<Task>> {
        let mut ids: HashSet<i64> = HashSet::new();
        for m in &models {
            ids.extend(m.assigned_to_id);
            ids.extend(m.created_by_id);
            ids.extend(m.closed_by_id);
        }

        let names = load_user_names(self.db.as_ref(), ids).await?;
        models.into_iter().map(|m| to_domain(m, &names)).collect()
    }
}

async fn load_user_names(
    db: &DatabaseConnection,
    ids: HashSet<i64>,
) -> Result<HashMap<i64, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|u| (u.id, u.full_name)).collect())
}

fn user_ref(id: Option<i64>, names: &HashMap<i64, String>) -> Option<UserRef> {
    id.and_then(|id| {
        names.get(&id).map(|full_name| UserRef {
            id,
            full_name: full_name.clone(),
        })
    })
}

fn to_domain(model: tasks::Model, names: &HashMap<i64, String>) -> Result<Task> {
    let status = TaskStatus::parse(&model.status).ok_or_else(|| TaskchiError::Database {
        message: format!("Unknown status '{}' for task {}", model.status, model.id),
    })?;
    let priority = TaskPriority::parse(&model.priority).ok_or_else(|| TaskchiError::Database {
        message: format!("Unknown priority '{}' for task {}", model.priority, model.id),
    })?;

    Ok(Task {
        id: model.id,
        title: model.title,
        status,
        priority,
        date: model.date,
        assigned_to: user_ref(model.assigned_to_id, names),
        created_by: user_ref(model.created_by_id, names),
        close_requested: model.close_requested,
        close_requested_at: model.close_requested_at,
        closed_at: model.closed_at,
        closed_by: user_ref(model.closed_by_id, names),
        follow_up_enabled: model.follow_up_enabled,
        follow_up_at: model.follow_up_at,
        created_at: model.created_at,
    })
}

#[async_trait]
impl TaskRepository for SeaOrmTaskRepository {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let model = tasks::ActiveModel {
            title: Set(task.title),
            status: Set(task.status.as_str().to_string()),
            priority: Set(task.priority.as_str().to_string()),
            date: Set(task.date),
            assigned_to_id: Set(Some(task.assigned_to_id)),
            created_by_id: Set(Some(task.created_by_id)),
            close_requested: Set(false),
            close_requested_at: Set(None),
            closed_at: Set(None),
            closed_by_id: Set(None),
            follow_up_enabled: Set(task.follow_up_enabled),
            follow_up_at: Set(task.follow_up_at),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = tasks::Entity::insert(model)
            .exec_with_returning(self.db.as_ref())
            .await?;

        self.attach_people(vec![inserted])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TaskchiError::Internal {
                message: "Created task vanished".to_string(),
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        let model = tasks::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        match model {
            Some(model) => Ok(self.attach_people(vec![model]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn list_visible(&self, user_id: i64) -> Result<Vec<Task>> {
        let models = tasks::Entity::find()
            .filter(
                Condition::any()
                    .add(tasks::Column::AssignedToId.eq(user_id))
                    .add(tasks::Column::CreatedById.eq(user_id)),
            )
            .order_by_desc(tasks::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        self.attach_people(models).await
    }

    async fn list_assigned_to(&self, user_id: i64) -> Result<Vec<Task>> {
        let models = tasks::Entity::find()
            .filter(tasks::Column::AssignedToId.eq(user_id))
            .order_by_desc(tasks::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        self.attach_people(models).await
    }

    async fn list_created_by(&self, user_id: i64) -> Result<Vec<Task>> {
        let models = tasks::Entity::find()
            .filter(tasks::Column::CreatedById.eq(user_id))
            .order_by_desc(tasks::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        self.attach_people(models).await
    }

    async fn list_done_by(&self, user_id: i64) -> Result<Vec<Task>> {
        let models = tasks::Entity::find()
            .filter(tasks::Column::AssignedToId.eq(user_id))
            .filter(tasks::Column::Status.eq(TaskStatus::Done.as_str()))
            .order_by_desc(tasks::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        self.attach_people(models).await
    }

    async fn update(&self, task: &Task) -> Result<()> {
        let model = tasks::ActiveModel {
            id: Set(task.id),
            title: Set(task.title.clone()),
            status: Set(task.status.as_str().to_string()),
            priority: Set(task.priority.as_str().to_string()),
            date: Set(task.date),
            assigned_to_id: Set(task.assigned_to.as_ref().map(|u| u.id)),
            created_by_id: Set(task.created_by.as_ref().map(|u| u.id)),
            close_requested: Set(task.close_requested),
            close_requested_at: Set(task.close_requested_at),
            closed_at: Set(task.closed_at),
            closed_by_id: Set(task.closed_by.as_ref().map(|u| u.id)),
            follow_up_enabled: Set(task.follow_up_enabled),
            follow_up_at: Set(task.follow_up_at),
            created_at: Set(task.created_at),
        };

        tasks::Entity::update(model)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotFound(_) => TaskchiError::NotFound {
                    resource: format!("Task with id: {}", task.id),
                },
                other => TaskchiError::Database {
                    message: format!("Failed to update task: {}", other),
                },
            })?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = tasks::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            return Err(TaskchiError::NotFound {
                resource: format!("Task with id: {}", id),
            });
        }
        Ok(())
    }

    async fn list_due_follow_ups(
        &self,
        now: DateTime<Utc>,
        min: DateTime<Utc>,
    ) -> Result<Vec<Task>> {
        let models = tasks::Entity::find()
            .filter(tasks::Column::FollowUpEnabled.eq(true))
            .filter(tasks::Column::FollowUpAt.is_not_null())
            .filter(tasks::Column::FollowUpAt.lte(now))
            .filter(tasks::Column::FollowUpAt.gte(min))
            .filter(tasks::Column::Status.ne(TaskStatus::Done.as_str()))
            .order_by_asc(tasks::Column::FollowUpAt)
            .all(self.db.as_ref())
            .await?;
        self.attach_people(models).await
    }
}

pub struct SeaOrmTaskMessageRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTaskMessageRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskMessageRepository for SeaOrmTaskMessageRepository {
    async fn create(&self, task_id: i64, sender: &User, body: &str) -> Result<TaskMessage> {
        let model = task_messages::ActiveModel {
            task_id: Set(task_id),
            sender_id: Set(sender.id),
            body: Set(body.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = task_messages::Entity::insert(model)
            .exec_with_returning(self.db.as_ref())
            .await?;

        Ok(TaskMessage {
            id: inserted.id,
            task_id: inserted.task_id,
            sender: UserRef {
                id: sender.id,
                full_name: sender.full_name.clone(),
            },
            body: inserted.body,
            created_at: inserted.created_at,
        })
    }

    async fn list_for_task(&self, task_id: i64) -> Result<Vec<TaskMessage>> {
        let rows = task_messages::Entity::find()
            .filter(task_messages::Column::TaskId.eq(task_id))
            .order_by_asc(task_messages::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let sender_ids: HashSet<i64> = rows.iter().map(|m| m.sender_id).collect();
        let names = load_user_names(self.db.as_ref(), sender_ids).await?;

        Ok(rows
            .into_iter()
            .map(|m| {
                let full_name = names.get(&m.sender_id).cloned().unwrap_or_default();
                TaskMessage {
                    id: m.id,
                    task_id: m.task_id,
                    sender: UserRef {
                        id: m.sender_id,
                        full_name,
                    },
                    body: m.body,
                    created_at: m.created_at,
                }
            })
            .collect())
    }
}
