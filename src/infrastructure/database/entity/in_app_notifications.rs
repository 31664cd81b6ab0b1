use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "in_app_notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// e.g. MEETING_REMINDER, TASK_MESSAGE
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    /// Owner of the notification
    pub user_id: Option<i64>,
    pub meeting_id: Option<i64>,
    pub task_id: Option<i64>,
    pub created_at: DateTimeUtc,
    pub read_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
