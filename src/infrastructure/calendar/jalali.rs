//! Jalali (Persian solar) calendar day handling on top of ICU

use chrono::NaiveDate;
use icu_calendar::persian::Persian;
use icu_calendar::Date;

use crate::shared::{Result, TaskchiError};

/// One Jalali calendar day, as carried in `YYYYMMDD` day-ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JalaliDay {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl JalaliDay {
    /// Parse a `YYYYMMDD` Jalali day-id.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(raw, "expected YYYYMMDD (Jalali)"));
        }

        let year: i32 = raw[0..4].parse().map_err(|_| invalid(raw, "bad year"))?;
        let month: u8 = raw[4..6].parse().map_err(|_| invalid(raw, "bad month"))?;
        let day: u8 = raw[6..8].parse().map_err(|_| invalid(raw, "bad day"))?;

        if !(1..=12).contains(&month) {
            return Err(invalid(raw, "month must be 1..=12"));
        }
        if !(1..=31).contains(&day) {
            return Err(invalid(raw, "day must be 1..=31"));
        }

        Ok(Self { year, month, day })
    }

    pub fn day_id(&self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }

    /// Convert to the Gregorian day, rejecting dates that do not exist
    /// (e.g. Esfand 30 in a non-leap year).
    pub fn to_gregorian(&self) -> Result<NaiveDate> {
        let persian = Date::try_new_persian_date(self.year, self.month, self.day)
            .map_err(|_| invalid(&self.day_id(), "no such Jalali date"))?;
        let iso = persian.to_iso();

        let year = iso.year().number;
        let month = iso.month().ordinal;
        let day = iso.day_of_month().0;

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| TaskchiError::Internal {
            message: format!("ISO date out of range for {}", self.day_id()),
        })
    }

    pub fn from_gregorian(date: NaiveDate) -> Result<Self> {
        use chrono::Datelike;

        let month = u8::try_from(date.month()).map_err(|_| TaskchiError::Internal {
            message: format!("Month out of range for {}", date),
        })?;
        let day = u8::try_from(date.day()).map_err(|_| TaskchiError::Internal {
            message: format!("Day out of range for {}", date),
        })?;

        let iso = Date::try_new_iso_date(date.year(), month, day).map_err(|_| {
            TaskchiError::Internal {
                message: format!("Unrepresentable ISO date {}", date),
            }
        })?;
        let persian = iso.to_calendar(Persian);

        Ok(Self {
            year: persian.year().number,
            month: u8::try_from(persian.month().ordinal).map_err(|_| TaskchiError::Internal {
                message: format!("Jalali month out of range for {}", date),
            })?,
            day: u8::try_from(persian.day_of_month().0).map_err(|_| TaskchiError::Internal {
                message: format!("Jalali day out of range for {}", date),
            })?,
        })
    }
}

fn invalid(raw: &str, detail: &str) -> TaskchiError {
    TaskchiError::ValidationError {
        field: "dayId".to_string(),
        message: format!("Invalid Jalali day-id '{}': {}", raw, detail),
    }
}

/// All Jalali days from `start` to `end` inclusive. Empty when `start`
/// is after `end`.
pub fn days_inclusive(start: &JalaliDay, end: &JalaliDay) -> Result<Vec<JalaliDay>> {
    let mut cursor = start.to_gregorian()?;
    let last = end.to_gregorian()?;

    let mut out = Vec::new();
    while cursor <= last {
        out.push(JalaliDay::from_gregorian(cursor)?);
        match cursor.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_day_ids() {
        let day = JalaliDay::parse("14030101").unwrap();
        assert_eq!((day.year, day.month, day.day), (1403, 1, 1));
        assert_eq!(day.day_id(), "14030101");
    }

    #[test]
    fn rejects_malformed_day_ids() {
        assert!(JalaliDay::parse("1403011").is_err());
        assert!(JalaliDay::parse("abcd0101").is_err());
        assert!(JalaliDay::parse("14031301").is_err()); // month 13
        assert!(JalaliDay::parse("14030132").is_err()); // day 32
        assert!(JalaliDay::parse("14030100").is_err()); // day 0
    }

    #[test]
    fn nowruz_1403_is_march_20_2024() {
        let nowruz = JalaliDay::parse("14030101").unwrap();
        let gregorian = nowruz.to_gregorian().unwrap();
        assert_eq!(gregorian, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert_eq!(JalaliDay::from_gregorian(gregorian).unwrap(), nowruz);
    }

    #[test]
    fn gregorian_round_trip_over_a_year() {
        let mut date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        for _ in 0..370 {
            let jalali = JalaliDay::from_gregorian(date).unwrap();
            assert_eq!(jalali.to_gregorian().unwrap(), date);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn iterates_days_inclusively() {
        let start = JalaliDay::parse("14030101").unwrap();
        let end = JalaliDay::parse("14030107").unwrap();
        let days = days_inclusive(&start, &end).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].day_id(), "14030101");
        assert_eq!(days[6].day_id(), "14030107");
    }

    #[test]
    fn reversed_range_is_empty() {
        let start = JalaliDay::parse("14030110").unwrap();
        let end = JalaliDay::parse("14030101").unwrap();
        assert!(days_inclusive(&start, &end).unwrap().is_empty());
    }
}
