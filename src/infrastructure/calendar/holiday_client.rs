//! Client for holidayapi.ir (data extracted from time.ir)

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::infrastructure::calendar::jalali::{days_inclusive, JalaliDay};
use crate::shared::Result;

/// One official holiday in a queried range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayDto {
    pub day_id: String,
    pub holiday: bool,
    pub cause: String,
    pub events: Vec<String>,
}

/// Response schema of holidayapi.ir
#[derive(Debug, Deserialize)]
struct HolidayApiResponse {
    #[serde(default)]
    events: Vec<HolidayApiEvent>,
}

#[derive(Debug, Deserialize)]
struct HolidayApiEvent {
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "is_holiday")]
    is_holiday: bool,
}

/// holidayapi.ir marks every Friday as a holiday because "جمعه" itself is a
/// holiday event. A day only counts as an official holiday here when it has
/// a holiday event other than Friday.
const FRIDAY_EVENT: &str = "جمعه";

pub struct HolidayClient {
    http: reqwest::Client,
    base_url: String,
    cache: DashMap<String, Vec<HolidayDto>>,
}

impl HolidayClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: DashMap::new(),
        }
    }

    /// Official holidays between two Jalali days, inclusive. Results are
    /// cached per range. A failed sweep degrades to an empty list; the UI
    /// then only has Fridays to color.
    pub async fn holidays_in_range(
        &self,
        start: &JalaliDay,
        end: &JalaliDay,
    ) -> Result<Vec<HolidayDto>> {
        let key = format!("{}_{}", start.day_id(), end.day_id());
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let holidays = match self.fetch_range(start, end).await {
            Ok(holidays) => holidays,
            Err(e) => {
                warn!(
                    "Failed to fetch holidays {}..{}: {}",
                    start.day_id(),
                    end.day_id(),
                    e
                );
                Vec::new()
            }
        };

        self.cache.insert(key, holidays.clone());
        Ok(holidays)
    }

    /// holidayapi.ir has no range endpoint; iterate Jalali days and query
    /// the per-day endpoint.
    async fn fetch_range(&self, start: &JalaliDay, end: &JalaliDay) -> Result<Vec<HolidayDto>> {
        let mut out = Vec::new();
        for day in days_inclusive(start, end)? {
            if let Some(dto) = self.fetch_day(&day).await {
                out.push(dto);
            }
        }
        Ok(out)
    }

    /// One day's holiday status. A failed or unparsable response skips the
    /// day instead of failing the range.
    async fn fetch_day(&self, day: &JalaliDay) -> Option<HolidayDto> {
        let url = format!(
            "{}/jalali/{}/{:02}/{:02}",
            self.base_url, day.year, day.month, day.day
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?
            .json::<HolidayApiResponse>()
            .await
            .ok()?;

        let mut events = Vec::new();
        let mut holiday_events = Vec::new();

        for event in response.events {
            let description = event.description.unwrap_or_default().trim().to_string();
            if description.is_empty() {
                continue;
            }

            if description != FRIDAY_EVENT {
                events.push(description.clone());
            }
            if event.is_holiday && description != FRIDAY_EVENT {
                holiday_events.push(description);
            }
        }

        let cause = holiday_events.first()?.clone();

        Some(HolidayDto {
            day_id: day.day_id(),
            holiday: true,
            cause,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn event(description: &str, is_holiday: bool) -> serde_json::Value {
        json!({
            "description": description,
            "additional_description": "",
            "is_holiday": is_holiday,
            "is_religious": false,
        })
    }

    #[tokio::test]
    async fn reports_official_holidays_and_skips_fridays() {
        let server = MockServer::start_async().await;

        // 1403-01-01: Nowruz, official holiday
        server
            .mock_async(|when, then| {
                when.method(GET).path("/jalali/1403/01/01");
                then.status(200).json_body(json!({
                    "is_holiday": true,
                    "events": [event("جشن نوروز", true)],
                }));
            })
            .await;
        // 1403-01-02: only the synthetic Friday event
        server
            .mock_async(|when, then| {
                when.method(GET).path("/jalali/1403/01/02");
                then.status(200).json_body(json!({
                    "is_holiday": true,
                    "events": [event("جمعه", true)],
                }));
            })
            .await;
        // 1403-01-03: ordinary day with a non-holiday event
        server
            .mock_async(|when, then| {
                when.method(GET).path("/jalali/1403/01/03");
                then.status(200).json_body(json!({
                    "is_holiday": false,
                    "events": [event("روز جهانی آب", false)],
                }));
            })
            .await;

        let client = HolidayClient::new(server.base_url());
        let start = JalaliDay::parse("14030101").unwrap();
        let end = JalaliDay::parse("14030103").unwrap();

        let holidays = client.holidays_in_range(&start, &end).await.unwrap();
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].day_id, "14030101");
        assert!(holidays[0].holiday);
        assert_eq!(holidays[0].cause, "جشن نوروز");
    }

    #[tokio::test]
    async fn server_failure_degrades_to_empty_and_is_cached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/jalali/");
                then.status(500);
            })
            .await;

        let client = HolidayClient::new(server.base_url());
        let start = JalaliDay::parse("14030101").unwrap();
        let end = JalaliDay::parse("14030102").unwrap();

        let first = client.holidays_in_range(&start, &end).await.unwrap();
        assert!(first.is_empty());

        let hits_after_first = mock.hits_async().await;
        let second = client.holidays_in_range(&start, &end).await.unwrap();
        assert!(second.is_empty());
        assert_eq!(mock.hits_async().await, hits_after_first); // served from cache
    }
}
