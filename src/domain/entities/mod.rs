pub mod audit;
pub mod meeting;
pub mod notification;
pub mod task;
pub mod user;

pub use audit::NewAuditRecord;
pub use meeting::{Meeting, MeetingDraft};
pub use notification::{kinds, NewNotification, Notification};
pub use task::{NewTask, Task, TaskMessage, UserRef};
pub use user::{NewUser, User};
