use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::warn;

use crate::domain::entities::{NewAuditRecord, User};
use crate::domain::repositories::AuditLogRepository;

/// Records an audit trail for admin mutations. A failed audit write must
/// never fail the audited operation, so errors are logged and swallowed.
pub struct AuditService {
    repo: Arc<dyn AuditLogRepository>,
}

impl AuditService {
    pub fn new(repo: Arc<dyn AuditLogRepository>) -> Self {
        Self { repo }
    }

    pub async fn log(
        &self,
        actor: &User,
        entity_type: &str,
        entity_id: &str,
        action: &str,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
        headers: &HeaderMap,
    ) {
        let record = NewAuditRecord {
            actor_user_id: Some(actor.id),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            action: action.to_string(),
            before_json: before,
            after_json: after,
            ip: client_ip(headers),
            user_agent: header_value(headers, "user-agent"),
        };

        if let Err(e) = self.repo.create(record).await {
            warn!("Failed to write audit log entry: {}", e);
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// First hop of X-Forwarded-For when present, set by the reverse proxy.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .map(|v| v.split(',').next().unwrap_or(&v).trim().to_string())
}
