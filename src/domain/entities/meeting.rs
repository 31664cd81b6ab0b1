use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    /// When false no reminders fire, including the mandatory same-day alert.
    pub alarm_enabled: bool,
    pub location: Option<String>,
    pub content: Option<String>,
    pub outcome: Option<String>,
    pub created_by_id: Option<i64>,
    /// Reminder offsets in minutes before meeting start, descending.
    pub reminder_minutes_before: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated meeting fields, ready to insert or apply to an existing meeting.
#[derive(Debug, Clone)]
pub struct MeetingDraft {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub alarm_enabled: bool,
    pub location: Option<String>,
    pub content: Option<String>,
    pub outcome: Option<String>,
    pub reminder_minutes_before: Vec<i32>,
}
