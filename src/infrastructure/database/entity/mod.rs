//! SeaORM entities for the application tables

pub mod audit_log;
pub mod in_app_notifications;
pub mod meeting_reminders;
pub mod meetings;
pub mod reminder_log;
pub mod task_followup_log;
pub mod task_messages;
pub mod tasks;
pub mod users;
