use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::infrastructure::database::entity::users;
use crate::shared::types::Role;
use crate::shared::{Result, TaskchiError};

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(model: users::Model) -> Result<User> {
    let role = Role::parse(&model.role).ok_or_else(|| TaskchiError::Database {
        message: format!("Unknown role '{}' for user {}", model.role, model.id),
    })?;

    Ok(User {
        id: model.id,
        email: model.email,
        full_name: model.full_name,
        password_hash: model.password_hash,
        role,
        active: model.active,
        manager_id: model.manager_id,
    })
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let model = users::ActiveModel {
            email: Set(user.email),
            full_name: Set(user.full_name),
            password_hash: Set(user.password_hash),
            role: Set(user.role.as_str().to_string()),
            active: Set(user.active),
            manager_id: Set(user.manager_id),
            ..Default::default()
        };

        let inserted = users::Entity::insert(model)
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(|e| {
                if e.to_string().contains("duplicate key") {
                    TaskchiError::ValidationError {
                        field: "email".to_string(),
                        message: "Email already exists".to_string(),
                    }
                } else {
                    TaskchiError::Database {
                        message: format!("Failed to create user: {}", e),
                    }
                }
            })?;

        to_domain(inserted)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        users::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn list_by_manager(&self, manager_id: i64) -> Result<Vec<User>> {
        users::Entity::find()
            .filter(users::Column::ManagerId.eq(manager_id))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn update(&self, user: &User) -> Result<()> {
        let model = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            full_name: Set(user.full_name.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_string()),
            active: Set(user.active),
            manager_id: Set(user.manager_id),
        };

        model.update(self.db.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotFound(_) => TaskchiError::NotFound {
                resource: format!("User with id: {}", user.id),
            },
            other => TaskchiError::Database {
                message: format!("Failed to update user: {}", other),
            },
        })?;

        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count = users::Entity::find().count(self.db.as_ref()).await?;
        Ok(count as i64)
    }
}
