pub mod connection;
pub mod entity;
pub mod migrations;

pub mod audit_repository;
pub mod meeting_repository;
pub mod notification_repository;
pub mod task_repository;
pub mod user_repository;

pub use connection::Database;
pub use audit_repository::SeaOrmAuditLogRepository;
pub use meeting_repository::SeaOrmMeetingRepository;
pub use notification_repository::{
    SeaOrmNotificationRepository, SeaOrmReminderLogRepository, SeaOrmTaskFollowUpLogRepository,
};
pub use task_repository::{SeaOrmTaskMessageRepository, SeaOrmTaskRepository};
pub use user_repository::SeaOrmUserRepository;
