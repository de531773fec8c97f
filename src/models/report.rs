//! Weekly report types produced by `services::aggregator`.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidParameter;

pub const DEFAULT_DAILY_TARGET: u32 = 20;

/// Expected check-ins per day. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DailyTarget(NonZeroU32);

impl DailyTarget {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for DailyTarget {
    fn default() -> Self {
        Self(NonZeroU32::MIN.saturating_add(DEFAULT_DAILY_TARGET - 1))
    }
}

impl TryFrom<u32> for DailyTarget {
    type Error = InvalidParameter;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| InvalidParameter::Target(value.to_string()))
    }
}

impl From<DailyTarget> for u32 {
    fn from(target: DailyTarget) -> Self {
        target.get()
    }
}

impl FromStr for DailyTarget {
    type Err = InvalidParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidParameter::Target(s.to_string()))
    }
}

impl fmt::Display for DailyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Qualitative classification of a day's percentage of target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Band {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p >= 90 => Band::Excellent,
            p if p >= 75 => Band::Good,
            p if p >= 50 => Band::Average,
            _ => Band::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Excellent => "excellent",
            Band::Good => "good",
            Band::Average => "average",
            Band::Poor => "poor",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendance {
    #[serde(with = "crate::utils::date")]
    pub date: NaiveDate,
    /// Abbreviated weekday, e.g. "Mon".
    pub label: String,
    pub count: u32,
    pub target: DailyTarget,
    pub percentage: u32,
    pub band: Band,
    /// "count/target", as shown in the weekly table.
    pub display_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    #[serde(with = "crate::utils::date")]
    pub anchor_date: NaiveDate,
    pub target: DailyTarget,
    /// Oldest first; the last entry is the anchor date.
    pub days: Vec<DailyAttendance>,
    pub weekly_total: u32,
    pub weekly_average: u32,
    pub unique_count: u32,
    pub today_count: u32,
}

/// What the dashboard poller publishes after each successful refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub report: WeeklyReport,
    pub refreshed_at: DateTime<Utc>,
}
