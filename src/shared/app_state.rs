use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::repositories::{
    MeetingRepository, NotificationRepository, ReminderLogRepository, TaskFollowUpLogRepository,
    TaskMessageRepository, TaskRepository, UserRepository,
};
use crate::domain::services::{AuthService, UserHierarchyService};
use crate::infrastructure::auth_service_impl::AuthServiceImpl;
use crate::infrastructure::calendar::HolidayClient;
use crate::infrastructure::database::{
    Database, SeaOrmAuditLogRepository, SeaOrmMeetingRepository, SeaOrmNotificationRepository,
    SeaOrmReminderLogRepository, SeaOrmTaskFollowUpLogRepository, SeaOrmTaskMessageRepository,
    SeaOrmTaskRepository, SeaOrmUserRepository,
};
use crate::infrastructure::AuditService;
use crate::shared::Result;

// Application state for dependency injection
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub database: Database,
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub task_messages: Arc<dyn TaskMessageRepository>,
    pub meetings: Arc<dyn MeetingRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub reminder_log: Arc<dyn ReminderLogRepository>,
    pub followup_log: Arc<dyn TaskFollowUpLogRepository>,
    pub auth_service: Arc<dyn AuthService>,
    pub hierarchy: Arc<UserHierarchyService>,
    pub audit: Arc<AuditService>,
    pub holidays: Arc<HolidayClient>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        // Initialize the database connection and bring the schema up to date
        let database = Database::new(&config.database).await?;
        database.run_migrations().await?;

        let db = database.connection();

        // Create repositories
        let users: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let tasks: Arc<dyn TaskRepository> = Arc::new(SeaOrmTaskRepository::new(db.clone()));
        let task_messages: Arc<dyn TaskMessageRepository> =
            Arc::new(SeaOrmTaskMessageRepository::new(db.clone()));
        let meetings: Arc<dyn MeetingRepository> =
            Arc::new(SeaOrmMeetingRepository::new(db.clone()));
        let notifications: Arc<dyn NotificationRepository> =
            Arc::new(SeaOrmNotificationRepository::new(db.clone()));
        let reminder_log: Arc<dyn ReminderLogRepository> =
            Arc::new(SeaOrmReminderLogRepository::new(db.clone()));
        let followup_log: Arc<dyn TaskFollowUpLogRepository> =
            Arc::new(SeaOrmTaskFollowUpLogRepository::new(db.clone()));

        // Create services
        let auth_service: Arc<dyn AuthService> =
            Arc::new(AuthServiceImpl::new(config.auth.clone(), users.clone()));
        let hierarchy = Arc::new(UserHierarchyService::new(users.clone()));
        let audit = Arc::new(AuditService::new(Arc::new(SeaOrmAuditLogRepository::new(
            db,
        ))));
        let holidays = Arc::new(HolidayClient::new(
            config.calendar.holiday_api_base_url.clone(),
        ));

        Ok(Self {
            config,
            database,
            users,
            tasks,
            task_messages,
            meetings,
            notifications,
            reminder_log,
            followup_log,
            auth_service,
            hierarchy,
            audit,
            holidays,
        })
    }
}
