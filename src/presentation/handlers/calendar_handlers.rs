use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::infrastructure::calendar::{HolidayDto, JalaliDay};
use crate::shared::{AppState, Result};

#[derive(Debug, Deserialize)]
pub struct HolidayRangeParams {
    /// Jalali YYYYMMDD
    pub start: String,
    /// Jalali YYYYMMDD
    pub end: String,
}

/// Official Iranian holidays between two Jalali day-ids, inclusive.
/// Example: /api/calendar/holidays/range?start=14040101&end=14040131
pub async fn holidays_range(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<HolidayRangeParams>,
) -> Result<Json<Vec<HolidayDto>>> {
    let start = JalaliDay::parse(&params.start)?;
    let end = JalaliDay::parse(&params.end)?;

    let holidays = app_state.holidays.holidays_in_range(&start, &end).await?;
    Ok(Json(holidays))
}
