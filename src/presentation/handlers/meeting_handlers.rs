use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as JsonExtractor,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::entities::{Meeting, MeetingDraft};
use crate::presentation::handlers::user_handlers::{require_user, AuthenticatedUser};
use crate::shared::{AppState, Result, TaskchiError};

/// Hard safety cap on reminder offsets: 365 days.
const MAX_REMINDER_MINUTES: i32 = 365 * 24 * 60;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct MeetingDto {
    pub id: Option<i64>,
    pub title: Option<String>,
    /// yyyy-MM-dd, required
    pub date: Option<String>,
    /// HH:MM, required when all_day=false
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    /// Defaults to true on create; preserved on update when omitted
    pub alarm_enabled: Option<bool>,
    pub location: Option<String>,
    /// full notes
    pub content: Option<String>,
    /// conclusion / action items
    pub outcome: Option<String>,
    /// e.g. [2880, 1440, 120]
    pub reminder_minutes_before: Option<Vec<i32>>,
}

impl From<&Meeting> for MeetingDto {
    fn from(meeting: &Meeting) -> Self {
        Self {
            id: Some(meeting.id),
            title: Some(meeting.title.clone()),
            date: Some(meeting.date.to_string()),
            start_time: meeting.start_time.map(|t| t.format("%H:%M").to_string()),
            end_time: meeting.end_time.map(|t| t.format("%H:%M").to_string()),
            all_day: meeting.all_day,
            alarm_enabled: Some(meeting.alarm_enabled),
            location: meeting.location.clone(),
            content: meeting.content.clone(),
            outcome: meeting.outcome.clone(),
            reminder_minutes_before: Some(meeting.reminder_minutes_before.clone()),
        }
    }
}

fn bad_request(field: &str, message: &str) -> TaskchiError {
    TaskchiError::ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn parse_time(raw: &str, field: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| bad_request(field, &format!("{} must be HH:MM", field)))
}

fn trimmed(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Dedup, keep positive offsets only, cap at a year, store descending.
fn normalize_reminders(input: Option<&Vec<i32>>) -> Vec<i32> {
    let mut set = BTreeSet::new();
    if let Some(values) = input {
        for &minutes in values {
            if minutes <= 0 || minutes > MAX_REMINDER_MINUTES {
                continue;
            }
            set.insert(minutes);
        }
    }
    set.into_iter().rev().collect()
}

/// Validate a DTO into insertable fields. `existing` carries the values
/// preserved when an update omits them.
fn build_draft(dto: &MeetingDto, existing: Option<&Meeting>) -> Result<MeetingDraft> {
    let title = trimmed(dto.title.as_ref()).ok_or_else(|| bad_request("title", "title is required"))?;

    let date_raw = dto
        .date
        .as_deref()
        .ok_or_else(|| bad_request("date", "date is required"))?;
    let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
        .map_err(|_| bad_request("date", "date must be yyyy-MM-dd"))?;

    let all_day = dto.all_day;

    let alarm_enabled = match (dto.alarm_enabled, existing) {
        (Some(enabled), _) => enabled,
        (None, Some(meeting)) => meeting.alarm_enabled,
        (None, None) => true,
    };

    let mut start = None;
    let mut end = None;

    if !all_day {
        let start_raw = dto
            .start_time
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| bad_request("start_time", "start_time is required when all_day=false"))?;
        let parsed_start = parse_time(start_raw, "start_time")?;
        start = Some(parsed_start);

        if let Some(end_raw) = dto.end_time.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let parsed_end = parse_time(end_raw, "end_time")?;
            if parsed_end <= parsed_start {
                return Err(bad_request("end_time", "end_time must be after start_time"));
            }
            end = Some(parsed_end);
        }
    }

    Ok(MeetingDraft {
        title,
        date,
        start_time: start,
        end_time: end,
        all_day,
        alarm_enabled,
        location: trimmed(dto.location.as_ref()),
        content: dto.content.clone(),
        outcome: dto.outcome.clone(),
        reminder_minutes_before: normalize_reminders(dto.reminder_minutes_before.as_ref()),
    })
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub from: String,
    pub to: String,
}

/// The caller's meetings in a date range.
pub async fn list_meetings(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<MeetingDto>>> {
    let me = require_user(&app_state, user_id).await?;

    let from = NaiveDate::parse_from_str(&params.from, "%Y-%m-%d")
        .map_err(|_| bad_request("from", "from must be yyyy-MM-dd"))?;
    let to = NaiveDate::parse_from_str(&params.to, "%Y-%m-%d")
        .map_err(|_| bad_request("to", "to must be yyyy-MM-dd"))?;

    let meetings = app_state
        .meetings
        .list_for_owner_in_range(me.id, from, to)
        .await?;

    Ok(Json(meetings.iter().map(MeetingDto::from).collect()))
}

pub async fn get_meeting(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MeetingDto>> {
    let me = require_user(&app_state, user_id).await?;

    let meeting = app_state
        .meetings
        .find_for_owner(id, me.id)
        .await?
        .ok_or_else(|| TaskchiError::NotFound {
            resource: format!("Meeting with id: {}", id),
        })?;

    Ok(Json(MeetingDto::from(&meeting)))
}

pub async fn create_meeting(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    JsonExtractor(dto): JsonExtractor<MeetingDto>,
) -> Result<Json<MeetingDto>> {
    let me = require_user(&app_state, user_id).await?;

    let draft = build_draft(&dto, None)?;
    let created = app_state.meetings.create(me.id, draft).await?;

    Ok(Json(MeetingDto::from(&created)))
}

pub async fn update_meeting(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonExtractor(dto): JsonExtractor<MeetingDto>,
) -> Result<Json<MeetingDto>> {
    let me = require_user(&app_state, user_id).await?;

    let existing = app_state
        .meetings
        .find_for_owner(id, me.id)
        .await?
        .ok_or_else(|| TaskchiError::NotFound {
            resource: format!("Meeting with id: {}", id),
        })?;

    let draft = build_draft(&dto, Some(&existing))?;
    let updated = app_state.meetings.update(existing.id, me.id, draft).await?;

    Ok(Json(MeetingDto::from(&updated)))
}

pub async fn delete_meeting(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let me = require_user(&app_state, user_id).await?;
    app_state.meetings.delete(id, me.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_dto() -> MeetingDto {
        MeetingDto {
            title: Some("جلسه".to_string()),
            date: Some("2025-08-10".to_string()),
            all_day: true,
            ..Default::default()
        }
    }

    #[test]
    fn reminders_are_deduped_capped_and_sorted_descending() {
        let input = vec![120, 2880, 120, -10, 0, MAX_REMINDER_MINUTES + 1, 1440];
        assert_eq!(normalize_reminders(Some(&input)), vec![2880, 1440, 120]);
        assert!(normalize_reminders(None).is_empty());
    }

    #[test]
    fn title_and_date_are_required() {
        let mut dto = minimal_dto();
        dto.title = Some("   ".to_string());
        assert!(build_draft(&dto, None).is_err());

        let mut dto = minimal_dto();
        dto.date = Some("10-08-2025".to_string());
        assert!(build_draft(&dto, None).is_err());
    }

    #[test]
    fn timed_meetings_need_a_start_time() {
        let mut dto = minimal_dto();
        dto.all_day = false;
        assert!(build_draft(&dto, None).is_err());

        dto.start_time = Some("14:30".to_string());
        let draft = build_draft(&dto, None).unwrap();
        assert_eq!(draft.start_time, NaiveTime::from_hms_opt(14, 30, 0));
        assert!(draft.alarm_enabled); // default on create
    }

    #[test]
    fn end_time_must_follow_start_time() {
        let mut dto = minimal_dto();
        dto.all_day = false;
        dto.start_time = Some("14:30".to_string());
        dto.end_time = Some("14:30".to_string());
        assert!(build_draft(&dto, None).is_err());

        dto.end_time = Some("15:00".to_string());
        let draft = build_draft(&dto, None).unwrap();
        assert_eq!(draft.end_time, NaiveTime::from_hms_opt(15, 0, 0));
    }
}
