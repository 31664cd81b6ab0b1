use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, FixedOffset, NaiveTime, TimeZone, Utc};
use tokio::time::{interval, sleep};
use tracing::{error, info, warn};

use crate::domain::entities::{kinds, Meeting, NewNotification, Task};
use crate::shared::{AppState, Result};

/// How late a reminder may still fire after downtime.
fn max_late() -> chrono::Duration {
    chrono::Duration::hours(48)
}
/// Meetings are scanned this many days ahead.
const LOOKAHEAD_DAYS: u64 = 30;
/// All-day meetings (or meetings without a start time) alert at 09:00 local.
fn default_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Background loops for meeting reminders and task follow-ups.
pub struct Schedulers {
    app_state: Arc<AppState>,
    is_running: bool,
}

impl Schedulers {
    pub fn new(app_state: Arc<AppState>) -> Self {
        Self {
            app_state,
            is_running: false,
        }
    }

    /// Spawn both loops. Each ticks every 60 seconds and backs off briefly
    /// on error.
    pub fn start(&mut self) {
        if self.is_running {
            warn!("Schedulers are already running");
            return;
        }
        self.is_running = true;
        info!("Starting reminder schedulers");

        let app_state = self.app_state.clone();
        tokio::spawn(async move {
            Self::meeting_reminder_loop(app_state).await;
        });

        let app_state = self.app_state.clone();
        tokio::spawn(async move {
            Self::follow_up_loop(app_state).await;
        });
    }

    async fn meeting_reminder_loop(app_state: Arc<AppState>) {
        let mut timer = interval(Duration::from_secs(60));
        loop {
            timer.tick().await;
            if let Err(e) = Self::fire_due_meeting_reminders(app_state.clone()).await {
                error!("Error processing meeting reminders: {}", e);
                sleep(Duration::from_secs(10)).await;
            }
        }
    }

    async fn follow_up_loop(app_state: Arc<AppState>) {
        let mut timer = interval(Duration::from_secs(60));
        loop {
            timer.tick().await;
            if let Err(e) = Self::fire_due_follow_ups(app_state.clone()).await {
                error!("Error processing task follow-ups: {}", e);
                sleep(Duration::from_secs(10)).await;
            }
        }
    }

    async fn fire_due_meeting_reminders(state: Arc<AppState>) -> Result<()> {
        let now = Utc::now();
        let offset = state.config.local_offset();
        let today = now.with_timezone(&offset).date_naive();

        let from = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        let to = today
            .checked_add_days(Days::new(LOOKAHEAD_DAYS))
            .unwrap_or(today);

        let meetings = state.meetings.list_in_range(from, to).await?;

        for meeting in meetings {
            // In-app notifications need an owner
            let Some(owner_id) = meeting.created_by_id else {
                continue;
            };
            if !meeting.alarm_enabled {
                continue;
            }

            let Some(start) = meeting_start(&meeting, offset) else {
                continue;
            };

            for minutes_before in reminder_triggers(&meeting.reminder_minutes_before) {
                let reminder_at = start - chrono::Duration::minutes(minutes_before as i64);
                if !is_due(reminder_at, now) {
                    continue;
                }

                if state
                    .reminder_log
                    .exists(meeting.id, minutes_before)
                    .await?
                {
                    continue;
                }

                state
                    .notifications
                    .create(NewNotification {
                        kind: kinds::MEETING_REMINDER.to_string(),
                        title: format!("یادآوری رویداد: {}", meeting.title),
                        message: Some(meeting_reminder_message(&meeting, minutes_before)),
                        user_id: owner_id,
                        meeting_id: Some(meeting.id),
                        task_id: None,
                    })
                    .await?;

                state.reminder_log.record(meeting.id, minutes_before).await?;
                metrics::counter!("taskchi_meeting_reminders_fired_total").increment(1);
                info!(
                    "Fired reminder for meeting {} ({} minutes before)",
                    meeting.id, minutes_before
                );
            }
        }

        Ok(())
    }

    async fn fire_due_follow_ups(state: Arc<AppState>) -> Result<()> {
        let now = Utc::now();
        let min = now - max_late();

        let due = state.tasks.list_due_follow_ups(now, min).await?;

        for task in due {
            let Some(creator) = task.created_by.as_ref() else {
                continue;
            };
            let Some(follow_up_at) = task.follow_up_at else {
                continue;
            };
            if !task.follow_up_enabled {
                continue;
            }

            if state.followup_log.exists(task.id, follow_up_at).await? {
                continue;
            }

            state
                .notifications
                .create(NewNotification {
                    kind: kinds::TASK_FOLLOWUP.to_string(),
                    title: format!("یادآوری پیگیری تسک: {}", task.title),
                    message: Some(follow_up_message(
                        &task,
                        follow_up_at,
                        state.config.local_offset(),
                    )),
                    user_id: creator.id,
                    meeting_id: None,
                    task_id: Some(task.id),
                })
                .await?;

            state.followup_log.record(task.id, follow_up_at).await?;
            metrics::counter!("taskchi_task_followups_fired_total").increment(1);
            info!("Fired follow-up reminder for task {}", task.id);
        }

        Ok(())
    }
}

/// The meeting's start instant in UTC, or None for dates that do not exist
/// in the configured offset.
fn meeting_start(meeting: &Meeting, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let start = if meeting.all_day {
        default_start()
    } else {
        meeting.start_time.unwrap_or_else(default_start)
    };
    offset
        .from_local_datetime(&meeting.date.and_time(start))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Mandatory same-day alert (offset 0) plus the configured offsets,
/// deduplicated in order. Negative offsets are dropped.
fn reminder_triggers(configured: &[i32]) -> Vec<i32> {
    let mut triggers = vec![0];
    for &minutes in configured {
        if minutes >= 0 && !triggers.contains(&minutes) {
            triggers.push(minutes);
        }
    }
    triggers
}

/// Fire when due (or late after downtime), but not more than 48h late.
fn is_due(reminder_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    reminder_at <= now && reminder_at >= now - max_late()
}

fn humanize_offset(minutes_before: i32) -> String {
    if minutes_before == 0 {
        "یادآوری اجباری همان‌روز".to_string()
    } else if minutes_before % (24 * 60) == 0 {
        format!("{} روز قبل", minutes_before / (24 * 60))
    } else if minutes_before % 60 == 0 {
        format!("{} ساعت قبل", minutes_before / 60)
    } else {
        format!("{} دقیقه قبل", minutes_before)
    }
}

fn meeting_reminder_message(meeting: &Meeting, minutes_before: i32) -> String {
    let when = if meeting.all_day {
        "تمام روز".to_string()
    } else {
        meeting
            .start_time
            .unwrap_or_else(default_start)
            .format("%H:%M")
            .to_string()
    };

    let location = meeting
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| format!(" • {}", l))
        .unwrap_or_default();

    format!(
        "رویداد در تاریخ {} ساعت {}{}\nتنظیم یادآوری: {}",
        meeting.date,
        when,
        location,
        humanize_offset(minutes_before)
    )
}

fn follow_up_message(task: &Task, follow_up_at: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = follow_up_at.with_timezone(&offset);
    let when = local.format("%Y-%m-%d %H:%M").to_string();

    let assignee = task
        .assigned_to
        .as_ref()
        .map(|u| u.full_name.clone())
        .unwrap_or_else(|| "(نامشخص)".to_string());

    format!(
        "این تسک به \"{}\" ارجاع داده شده است.\nزمان پیگیری: {}\nبرای مشاهده/پیگیری، وارد همان تسک شوید.",
        assignee, when
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserRef;
    use crate::shared::types::{TaskPriority, TaskStatus};
    use chrono::NaiveDate;

    fn meeting(all_day: bool, start_time: Option<NaiveTime>, reminders: Vec<i32>) -> Meeting {
        Meeting {
            id: 1,
            title: "جلسه هفتگی".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(),
            start_time,
            end_time: None,
            all_day,
            alarm_enabled: true,
            location: Some("اتاق ۲".to_string()),
            content: None,
            outcome: None,
            created_by_id: Some(1),
            reminder_minutes_before: reminders,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tehran() -> FixedOffset {
        FixedOffset::east_opt(210 * 60).unwrap()
    }

    #[test]
    fn all_day_meetings_start_at_nine_local() {
        let m = meeting(true, None, vec![]);
        let start = meeting_start(&m, tehran()).unwrap();
        // 09:00 +03:30 is 05:30 UTC
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 8, 10, 5, 30, 0).unwrap());
    }

    #[test]
    fn timed_meetings_use_their_start_time() {
        let m = meeting(false, NaiveTime::from_hms_opt(14, 30, 0), vec![]);
        let start = meeting_start(&m, tehran()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 8, 10, 11, 0, 0).unwrap());
    }

    #[test]
    fn trigger_set_always_contains_the_same_day_alert() {
        assert_eq!(reminder_triggers(&[]), vec![0]);
        assert_eq!(reminder_triggers(&[2880, 120]), vec![0, 2880, 120]);
        // duplicates and negatives are dropped
        assert_eq!(reminder_triggers(&[0, 120, 120, -5]), vec![0, 120]);
    }

    #[test]
    fn due_window_is_48_hours() {
        let now = Utc.with_ymd_and_hms(2025, 8, 10, 12, 0, 0).unwrap();
        assert!(is_due(now, now));
        assert!(is_due(now - chrono::Duration::hours(47), now));
        assert!(!is_due(now - chrono::Duration::hours(49), now));
        assert!(!is_due(now + chrono::Duration::minutes(1), now));
    }

    #[test]
    fn offsets_humanize_in_persian() {
        assert_eq!(humanize_offset(0), "یادآوری اجباری همان‌روز");
        assert_eq!(humanize_offset(2880), "2 روز قبل");
        assert_eq!(humanize_offset(120), "2 ساعت قبل");
        assert_eq!(humanize_offset(45), "45 دقیقه قبل");
    }

    #[test]
    fn follow_up_message_names_the_assignee() {
        let task = Task {
            id: 9,
            title: "گزارش ماهانه".to_string(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            date: None,
            assigned_to: Some(UserRef {
                id: 2,
                full_name: "سارا محمدی".to_string(),
            }),
            created_by: Some(UserRef {
                id: 1,
                full_name: "مدیر".to_string(),
            }),
            close_requested: false,
            close_requested_at: None,
            closed_at: None,
            closed_by: None,
            follow_up_enabled: true,
            follow_up_at: Some(Utc.with_ymd_and_hms(2025, 8, 10, 5, 30, 0).unwrap()),
            created_at: Utc::now(),
        };

        let message = follow_up_message(
            &task,
            Utc.with_ymd_and_hms(2025, 8, 10, 5, 30, 0).unwrap(),
            tehran(),
        );
        assert!(message.contains("سارا محمدی"));
        assert!(message.contains("2025-08-10 09:00"));
    }
}
