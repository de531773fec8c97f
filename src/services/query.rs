//! Query engine: a validated `AttendanceQuery` turned into a bounded, ordered read.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{AttendanceError, InvalidParameter};
use crate::models::AttendanceEvent;
use crate::services::eventstore::EventStore;
use crate::utils::date;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Upper bound on records returned by a window query.
pub const MAX_WINDOW_RESULTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceQuery {
    /// Every event on one UTC calendar day.
    ByDate(NaiveDate),
    /// Events from the last `days` days up to now, capped at `MAX_WINDOW_RESULTS`.
    ByWindow { days: u32 },
}

impl Default for AttendanceQuery {
    fn default() -> Self {
        AttendanceQuery::ByWindow {
            days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl AttendanceQuery {
    /// Build a query from raw request parameters. A present, non-empty `date` wins over `days`,
    /// but both are validated when given.
    pub fn from_params(date: Option<&str>, days: Option<&str>) -> Result<Self, InvalidParameter> {
        let days = match days.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_days(raw)?,
            None => DEFAULT_WINDOW_DAYS,
        };

        match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => date::parse_date(raw)
                .map(AttendanceQuery::ByDate)
                .ok_or_else(|| InvalidParameter::Date(raw.to_string())),
            None => Ok(AttendanceQuery::ByWindow { days }),
        }
    }

    pub async fn execute(
        &self,
        store: &dyn EventStore,
        now: DateTime<Utc>,
    ) -> Result<Vec<AttendanceEvent>, AttendanceError> {
        match *self {
            AttendanceQuery::ByDate(day) => Ok(store.find_by_date(day).await?),
            AttendanceQuery::ByWindow { days } => {
                let start = window_start(days, now)?;
                Ok(store.find_in_range(start, now, MAX_WINDOW_RESULTS).await?)
            }
        }
    }
}

/// `now - days`, or an error when that instant is not representable.
pub fn window_start(days: u32, now: DateTime<Utc>) -> Result<DateTime<Utc>, InvalidParameter> {
    Duration::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or(InvalidParameter::DaysOutOfRange(days))
}

/// Digits only: `u32::from_str` alone would also accept a leading `+`.
fn parse_days(raw: &str) -> Result<u32, InvalidParameter> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidParameter::Days(raw.to_string()));
    }
    raw.parse::<u32>()
        .map_err(|_| InvalidParameter::Days(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn defaults_to_seven_day_window() {
        assert_eq!(
            AttendanceQuery::from_params(None, None),
            Ok(AttendanceQuery::ByWindow { days: 7 })
        );
        assert_eq!(
            AttendanceQuery::from_params(Some(""), Some("")),
            Ok(AttendanceQuery::ByWindow { days: 7 })
        );
    }

    #[test]
    fn date_takes_precedence_over_days() {
        assert_eq!(
            AttendanceQuery::from_params(Some("2024-11-10"), Some("30")),
            Ok(AttendanceQuery::ByDate(NaiveDate::from_ymd_opt(2024, 11, 10).unwrap()))
        );
    }

    #[test]
    fn rejects_malformed_parameters() {
        assert_eq!(
            AttendanceQuery::from_params(None, Some("seven")),
            Err(InvalidParameter::Days("seven".to_string()))
        );
        assert_eq!(
            AttendanceQuery::from_params(None, Some("-1")),
            Err(InvalidParameter::Days("-1".to_string()))
        );
        assert_eq!(
            AttendanceQuery::from_params(None, Some("7.5")),
            Err(InvalidParameter::Days("7.5".to_string()))
        );
        assert_eq!(
            AttendanceQuery::from_params(Some("2024-11-10"), Some("abc")),
            Err(InvalidParameter::Days("abc".to_string()))
        );
        assert_eq!(
            AttendanceQuery::from_params(None, Some("+5")),
            Err(InvalidParameter::Days("+5".to_string()))
        );
        assert_eq!(
            AttendanceQuery::from_params(None, Some("5 days")),
            Err(InvalidParameter::Days("5 days".to_string()))
        );
        assert_eq!(
            AttendanceQuery::from_params(Some("10/11/2024"), None),
            Err(InvalidParameter::Date("10/11/2024".to_string()))
        );
    }

    #[test]
    fn zero_days_is_allowed() {
        assert_eq!(
            AttendanceQuery::from_params(None, Some("0")),
            Ok(AttendanceQuery::ByWindow { days: 0 })
        );
    }

    #[test]
    fn window_start_subtracts_whole_days() {
        let now = Utc.with_ymd_and_hms(2024, 11, 10, 12, 0, 0).unwrap();
        assert_eq!(
            window_start(7, now),
            Ok(Utc.with_ymd_and_hms(2024, 11, 3, 12, 0, 0).unwrap())
        );
        assert_eq!(window_start(0, now), Ok(now));
        assert_eq!(window_start(u32::MAX, now), Err(InvalidParameter::DaysOutOfRange(u32::MAX)));
    }
}
