use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::domain::entities::NewAuditRecord;
use crate::domain::repositories::AuditLogRepository;
use crate::infrastructure::database::entity::audit_log;
use crate::shared::Result;

pub struct SeaOrmAuditLogRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAuditLogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditLogRepository for SeaOrmAuditLogRepository {
    async fn create(&self, record: NewAuditRecord) -> Result<()> {
        let model = audit_log::ActiveModel {
            actor_user_id: Set(record.actor_user_id),
            entity_type: Set(record.entity_type),
            entity_id: Set(record.entity_id),
            action: Set(record.action),
            before_json: Set(record.before_json),
            after_json: Set(record.after_json),
            ip: Set(record.ip),
            user_agent: Set(record.user_agent),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        audit_log::Entity::insert(model).exec(self.db.as_ref()).await?;
        Ok(())
    }
}
