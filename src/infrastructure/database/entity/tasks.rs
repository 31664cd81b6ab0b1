use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub date: Option<Date>,
    pub assigned_to_id: Option<i64>,
    pub created_by_id: Option<i64>,
    // Close workflow
    pub close_requested: bool,
    pub close_requested_at: Option<DateTimeUtc>,
    pub closed_at: Option<DateTimeUtc>,
    pub closed_by_id: Option<i64>,
    // Follow-up reminder for the creator
    pub follow_up_enabled: bool,
    pub follow_up_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
