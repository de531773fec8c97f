use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::ids::EventId;
use crate::utils::date;

/// One persisted check-in. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    pub id: EventId,
    pub name: String,
    pub identity: String,
    #[sqlx(rename = "checked_in_at")]
    pub timestamp: DateTime<Utc>,
    /// UTC calendar day of `timestamp`, derived at write time.
    #[sqlx(rename = "check_in_date")]
    #[serde(with = "crate::utils::date")]
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /attendance`. Check-in devices still send the legacy `Name`/`UID`/`Time` keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckInRequest {
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "UID")]
    pub identity: Option<String>,
    #[serde(default, alias = "Time")]
    pub timestamp: Option<String>,
}

impl CheckInRequest {
    pub fn new(name: impl Into<String>, identity: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            identity: Some(identity.into()),
            timestamp: Some(timestamp.into()),
        }
    }
}

/// A check-in that passed validation and is ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIn {
    pub name: String,
    pub identity: String,
    pub timestamp: DateTime<Utc>,
}

impl CheckIn {
    pub fn validate(request: &CheckInRequest) -> Result<Self, ValidationError> {
        let name = non_empty(request.name.as_deref());
        let identity = non_empty(request.identity.as_deref());
        let timestamp = non_empty(request.timestamp.as_deref());

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if identity.is_none() {
            missing.push("identity");
        }
        if timestamp.is_none() {
            missing.push("timestamp");
        }
        let (Some(name), Some(identity), Some(raw_timestamp)) = (name, identity, timestamp) else {
            return Err(ValidationError::MissingFields(missing));
        };

        let timestamp = date::parse_instant(raw_timestamp)
            .ok_or_else(|| ValidationError::InvalidTimestamp(raw_timestamp.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            identity: identity.to_string(),
            timestamp,
        })
    }

    pub fn date(&self) -> NaiveDate {
        date::utc_date(&self.timestamp)
    }

    pub fn into_event(self, id: EventId, created_at: DateTime<Utc>) -> AttendanceEvent {
        let date = self.date();
        AttendanceEvent {
            id,
            name: self.name,
            identity: self.identity,
            timestamp: self.timestamp,
            date,
            created_at,
        }
    }
}

impl TryFrom<&CheckInRequest> for CheckIn {
    type Error = ValidationError;

    fn try_from(request: &CheckInRequest) -> Result<Self, Self::Error> {
        Self::validate(request)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn validate_reports_every_missing_field() {
        let request = CheckInRequest {
            name: Some("  ".to_string()),
            identity: None,
            timestamp: Some("2024-11-10T09:30:00Z".to_string()),
        };
        assert_eq!(
            CheckIn::validate(&request),
            Err(ValidationError::MissingFields(vec!["name", "identity"]))
        );
    }

    #[test]
    fn validate_rejects_unparseable_timestamp() {
        let request = CheckInRequest::new("John Doe", "STU001", "not a time");
        assert_eq!(
            CheckIn::validate(&request),
            Err(ValidationError::InvalidTimestamp("not a time".to_string()))
        );
    }

    #[test]
    fn into_event_derives_utc_date() {
        let check_in = CheckIn::validate(&CheckInRequest::new(" John Doe ", "STU001", "2024-11-10T21:00:00-08:00")).unwrap();
        assert_eq!(check_in.name, "John Doe");

        let created_at = Utc.with_ymd_and_hms(2024, 11, 12, 0, 0, 0).unwrap();
        let event = check_in.into_event(EventId::nil(), created_at);
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 11, 11).unwrap());
        assert_eq!(event.timestamp, Utc.with_ymd_and_hms(2024, 11, 11, 5, 0, 0).unwrap());
        assert_eq!(event.created_at, created_at);
    }

    #[test]
    fn legacy_field_names_deserialize() {
        let request: CheckInRequest = serde_json::from_str(
            r#"{"Name": "Jane Smith", "UID": "STU002", "Time": "2024-11-10T08:15:00Z"}"#,
        )
        .unwrap();
        assert_eq!(request.name.as_deref(), Some("Jane Smith"));
        assert_eq!(request.identity.as_deref(), Some("STU002"));
        assert_eq!(request.timestamp.as_deref(), Some("2024-11-10T08:15:00Z"));
    }

    #[test]
    fn event_serializes_with_camel_case_and_plain_date() {
        let created_at = Utc.with_ymd_and_hms(2024, 11, 10, 9, 31, 0).unwrap();
        let event = CheckIn::validate(&CheckInRequest::new("John Doe", "STU001", "2024-11-10T09:30:00Z"))
            .unwrap()
            .into_event(EventId::nil(), created_at);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2024-11-10");
        assert_eq!(json["timestamp"], "2024-11-10T09:30:00Z");
        assert_eq!(json["createdAt"], "2024-11-10T09:31:00Z");
        assert_eq!(json["identity"], "STU001");
    }
}
