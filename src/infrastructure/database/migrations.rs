//! Versioned schema migrations, applied programmatically at startup

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_users::Migration),
            Box::new(m20250801_000002_create_tasks::Migration),
            Box::new(m20250801_000003_create_task_messages::Migration),
            Box::new(m20250801_000004_create_meetings::Migration),
            Box::new(m20250801_000005_create_notifications::Migration),
            Box::new(m20250801_000006_create_audit_log::Migration),
        ]
    }
}

mod m20250801_000001_create_users {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Email)
                                .string_len(80)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::FullName).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::ManagerId).big_integer())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_users_manager")
                                .from(Users::Table, Users::ManagerId)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Email,
        FullName,
        PasswordHash,
        Role,
        Active,
        ManagerId,
    }
}

mod m20250801_000002_create_tasks {
    use super::m20250801_000001_create_users::Users;
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tasks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Tasks::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Tasks::Title).string_len(200).not_null())
                        .col(ColumnDef::new(Tasks::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Tasks::Priority).string_len(20).not_null())
                        .col(ColumnDef::new(Tasks::Date).date())
                        .col(ColumnDef::new(Tasks::AssignedToId).big_integer())
                        .col(ColumnDef::new(Tasks::CreatedById).big_integer())
                        .col(
                            ColumnDef::new(Tasks::CloseRequested)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Tasks::CloseRequestedAt).timestamp_with_time_zone())
                        .col(ColumnDef::new(Tasks::ClosedAt).timestamp_with_time_zone())
                        .col(ColumnDef::new(Tasks::ClosedById).big_integer())
                        .col(
                            ColumnDef::new(Tasks::FollowUpEnabled)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Tasks::FollowUpAt).timestamp_with_time_zone())
                        .col(
                            ColumnDef::new(Tasks::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tasks_assigned_to")
                                .from(Tasks::Table, Tasks::AssignedToId)
                                .to(Users::Table, Users::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tasks_created_by")
                                .from(Tasks::Table, Tasks::CreatedById)
                                .to(Users::Table, Users::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tasks_closed_by")
                                .from(Tasks::Table, Tasks::ClosedById)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("ix_tasks_assigned_to")
                        .table(Tasks::Table)
                        .col(Tasks::AssignedToId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("ix_tasks_created_by")
                        .table(Tasks::Table)
                        .col(Tasks::CreatedById)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tasks::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Tasks {
        Table,
        Id,
        Title,
        Status,
        Priority,
        Date,
        AssignedToId,
        CreatedById,
        CloseRequested,
        CloseRequestedAt,
        ClosedAt,
        ClosedById,
        FollowUpEnabled,
        FollowUpAt,
        CreatedAt,
    }
}

mod m20250801_000003_create_task_messages {
    use super::m20250801_000001_create_users::Users;
    use super::m20250801_000002_create_tasks::Tasks;
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TaskMessages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TaskMessages::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(TaskMessages::TaskId).big_integer().not_null())
                        .col(
                            ColumnDef::new(TaskMessages::SenderId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TaskMessages::Body).text().not_null())
                        .col(
                            ColumnDef::new(TaskMessages::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_messages_task")
                                .from(TaskMessages::Table, TaskMessages::TaskId)
                                .to(Tasks::Table, Tasks::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_messages_sender")
                                .from(TaskMessages::Table, TaskMessages::SenderId)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("ix_task_messages_task")
                        .table(TaskMessages::Table)
                        .col(TaskMessages::TaskId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TaskMessages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TaskMessages {
        Table,
        Id,
        TaskId,
        SenderId,
        Body,
        CreatedAt,
    }
}

mod m20250801_000004_create_meetings {
    use super::m20250801_000001_create_users::Users;
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Meetings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Meetings::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Meetings::Title).string_len(140).not_null())
                        .col(ColumnDef::new(Meetings::Date).date().not_null())
                        .col(ColumnDef::new(Meetings::StartTime).time())
                        .col(ColumnDef::new(Meetings::EndTime).time())
                        .col(
                            ColumnDef::new(Meetings::AllDay)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Meetings::AlarmEnabled)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Meetings::Location).string_len(180))
                        .col(ColumnDef::new(Meetings::Content).text())
                        .col(ColumnDef::new(Meetings::Outcome).text())
                        .col(ColumnDef::new(Meetings::CreatedById).big_integer())
                        .col(
                            ColumnDef::new(Meetings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Meetings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_meetings_created_by")
                                .from(Meetings::Table, Meetings::CreatedById)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("ix_meetings_date")
                        .table(Meetings::Table)
                        .col(Meetings::Date)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MeetingReminders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MeetingReminders::MeetingId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MeetingReminders::SortIndex)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MeetingReminders::MinutesBefore)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(MeetingReminders::MeetingId)
                                .col(MeetingReminders::SortIndex),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_meeting_reminders_meeting")
                                .from(MeetingReminders::Table, MeetingReminders::MeetingId)
                                .to(Meetings::Table, Meetings::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MeetingReminders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Meetings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Meetings {
        Table,
        Id,
        Title,
        Date,
        StartTime,
        EndTime,
        AllDay,
        AlarmEnabled,
        Location,
        Content,
        Outcome,
        CreatedById,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum MeetingReminders {
        Table,
        MeetingId,
        SortIndex,
        MinutesBefore,
    }
}

mod m20250801_000005_create_notifications {
    use super::m20250801_000001_create_users::Users;
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InAppNotifications::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InAppNotifications::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InAppNotifications::Type)
                                .string_len(40)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InAppNotifications::Title)
                                .string_len(180)
                                .not_null(),
                        )
                        .col(ColumnDef::new(InAppNotifications::Message).text())
                        .col(ColumnDef::new(InAppNotifications::UserId).big_integer())
                        .col(ColumnDef::new(InAppNotifications::MeetingId).big_integer())
                        .col(ColumnDef::new(InAppNotifications::TaskId).big_integer())
                        .col(
                            ColumnDef::new(InAppNotifications::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(ColumnDef::new(InAppNotifications::ReadAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_in_app_notifications_user")
                                .from(InAppNotifications::Table, InAppNotifications::UserId)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("ix_in_app_notifications_user_created")
                        .table(InAppNotifications::Table)
                        .col(InAppNotifications::UserId)
                        .col(InAppNotifications::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ReminderLog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ReminderLog::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ReminderLog::MeetingId).big_integer().not_null())
                        .col(
                            ColumnDef::new(ReminderLog::MinutesBefore)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReminderLog::FiredAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uk_meeting_minutes")
                        .table(ReminderLog::Table)
                        .col(ReminderLog::MeetingId)
                        .col(ReminderLog::MinutesBefore)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TaskFollowupLog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TaskFollowupLog::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(TaskFollowupLog::TaskId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TaskFollowupLog::FollowUpAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TaskFollowupLog::FiredAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uk_task_followup")
                        .table(TaskFollowupLog::Table)
                        .col(TaskFollowupLog::TaskId)
                        .col(TaskFollowupLog::FollowUpAt)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TaskFollowupLog::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ReminderLog::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InAppNotifications::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InAppNotifications {
        Table,
        Id,
        Type,
        Title,
        Message,
        UserId,
        MeetingId,
        TaskId,
        CreatedAt,
        ReadAt,
    }

    #[derive(DeriveIden)]
    enum ReminderLog {
        Table,
        Id,
        MeetingId,
        MinutesBefore,
        FiredAt,
    }

    #[derive(DeriveIden)]
    enum TaskFollowupLog {
        Table,
        Id,
        TaskId,
        FollowUpAt,
        FiredAt,
    }
}

mod m20250801_000006_create_audit_log {
    use super::m20250801_000001_create_users::Users;
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AuditLog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AuditLog::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(AuditLog::ActorUserId).big_integer())
                        .col(
                            ColumnDef::new(AuditLog::EntityType)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(ColumnDef::new(AuditLog::EntityId).string_len(50).not_null())
                        .col(ColumnDef::new(AuditLog::Action).string_len(50).not_null())
                        .col(ColumnDef::new(AuditLog::BeforeJson).json_binary())
                        .col(ColumnDef::new(AuditLog::AfterJson).json_binary())
                        .col(ColumnDef::new(AuditLog::Ip).string_len(100))
                        .col(ColumnDef::new(AuditLog::UserAgent).string_len(300))
                        .col(
                            ColumnDef::new(AuditLog::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_audit_log_actor")
                                .from(AuditLog::Table, AuditLog::ActorUserId)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AuditLog::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum AuditLog {
        Table,
        Id,
        ActorUserId,
        EntityType,
        EntityId,
        Action,
        BeforeJson,
        AfterJson,
        Ip,
        UserAgent,
        CreatedAt,
    }
}
