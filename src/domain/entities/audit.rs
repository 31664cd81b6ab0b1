/// A single audit trail entry, recorded for admin mutations.
#[derive(Debug, Clone)]
pub struct NewAuditRecord {
    pub actor_user_id: Option<i64>,
    pub entity_type: String,
    pub entity_id: String,
    pub action: String,
    pub before_json: Option<serde_json::Value>,
    pub after_json: Option<serde_json::Value>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
