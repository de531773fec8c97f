//! Reduces a set of events into the fixed 7-day weekly report. Pure; no I/O, no clock.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};

use crate::models::{AttendanceEvent, Band, DailyAttendance, DailyTarget, WeeklyReport};

pub const WINDOW_DAYS: u32 = 7;

/// Build the weekly report for the window `anchor - 6 ..= anchor`.
///
/// `unique_count` covers every event passed in, not only those inside the window; callers pass
/// the event set they want counted.
pub fn summarize(events: &[AttendanceEvent], anchor: NaiveDate, target: DailyTarget) -> WeeklyReport {
    let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
    for event in events {
        *per_day.entry(event.date).or_insert(0) += 1;
    }

    let days: Vec<DailyAttendance> = window(anchor)
        .into_iter()
        .map(|day| {
            let count = per_day.get(&day).copied().unwrap_or(0);
            let percentage = percentage_of_target(count, target);
            DailyAttendance {
                date: day,
                label: day.format("%a").to_string(),
                count,
                target,
                percentage,
                band: Band::from_percentage(percentage),
                display_text: format!("{}/{}", count, target),
            }
        })
        .collect();

    let weekly_total: u32 = days.iter().map(|d| d.count).sum();
    let today_count = days.last().map(|d| d.count).unwrap_or(0);
    let unique_count = events
        .iter()
        .map(|event| event.identity.as_str())
        .collect::<HashSet<_>>()
        .len() as u32;

    WeeklyReport {
        anchor_date: anchor,
        target,
        weekly_average: round_div(u64::from(weekly_total), u64::from(WINDOW_DAYS)),
        weekly_total,
        unique_count,
        today_count,
        days,
    }
}

/// The seven dates ending at `anchor`, oldest first.
fn window(anchor: NaiveDate) -> Vec<NaiveDate> {
    (0..WINDOW_DAYS)
        .rev()
        .filter_map(|back| anchor.checked_sub_days(Days::new(u64::from(back))))
        .collect()
}

/// `round(count / target * 100)`, half up.
pub fn percentage_of_target(count: u32, target: DailyTarget) -> u32 {
    round_div(u64::from(count) * 100, u64::from(target.get()))
}

/// Integer `round(numerator / denominator)` with halves rounded up. `denominator` must be > 0.
fn round_div(numerator: u64, denominator: u64) -> u32 {
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventId;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(identity: &str, day: NaiveDate) -> AttendanceEvent {
        let timestamp = Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).unwrap());
        AttendanceEvent {
            id: EventId::new_v4(),
            name: format!("Student {identity}"),
            identity: identity.to_string(),
            timestamp,
            date: day,
            created_at: timestamp,
        }
    }

    fn target(value: u32) -> DailyTarget {
        DailyTarget::new(value).unwrap()
    }

    #[test]
    fn window_is_seven_days_ending_at_anchor() {
        let report = summarize(&[], date(2024, 11, 10), target(20));
        let dates: Vec<NaiveDate> = report.days.iter().map(|d| d.date).collect();
        assert_eq!(dates, (4..=10).map(|d| date(2024, 11, d)).collect::<Vec<_>>());
        let labels: Vec<&str> = report.days.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    }

    #[test]
    fn empty_days_are_zero_and_poor() {
        let report = summarize(&[], date(2024, 11, 10), target(20));
        for day in &report.days {
            assert_eq!(day.count, 0);
            assert_eq!(day.percentage, 0);
            assert_eq!(day.band, Band::Poor);
            assert_eq!(day.display_text, "0/20");
        }
        assert_eq!(report.weekly_total, 0);
        assert_eq!(report.weekly_average, 0);
        assert_eq!(report.unique_count, 0);
        assert_eq!(report.today_count, 0);
    }

    #[test]
    fn monday_heavy_week() {
        let monday = date(2024, 11, 4);
        let sunday = date(2024, 11, 10);
        let events: Vec<AttendanceEvent> = (1..=8).map(|i| event(&format!("STU{i:03}"), monday)).collect();

        let report = summarize(&events, sunday, target(20));

        let mon = &report.days[0];
        assert_eq!((mon.label.as_str(), mon.count, mon.percentage, mon.band), ("Mon", 8, 40, Band::Poor));
        let sun = &report.days[6];
        assert_eq!((sun.label.as_str(), sun.count, sun.percentage, sun.band), ("Sun", 0, 0, Band::Poor));
        assert_eq!(report.weekly_total, 8);
        assert_eq!(report.weekly_average, 1);
        assert_eq!(report.today_count, 0);
        assert_eq!(report.unique_count, 8);
    }

    #[test]
    fn one_event_per_day_hits_band_boundaries() {
        let anchor = date(2024, 11, 10);
        let events: Vec<AttendanceEvent> = (4..=10).map(|d| event("STU001", date(2024, 11, d))).collect();

        // One check-in per day against targets 2, 1 and 3.
        for (t, expected_pct, expected_band) in [(2, 50, Band::Average), (1, 100, Band::Excellent), (3, 33, Band::Poor)] {
            let report = summarize(&events, anchor, target(t));
            for day in &report.days {
                assert_eq!(day.count, 1);
                assert_eq!(day.percentage, expected_pct, "target {t}");
                assert_eq!(day.band, expected_band, "target {t}");
            }
        }

        let three: Vec<AttendanceEvent> = (0..3).map(|i| event(&format!("A{i}"), anchor)).collect();
        let report = summarize(&three, anchor, target(4));
        assert_eq!((report.today_count, report.days[6].percentage, report.days[6].band), (3, 75, Band::Good));

        let nine: Vec<AttendanceEvent> = (0..9).map(|i| event(&format!("B{i}"), anchor)).collect();
        let report = summarize(&nine, anchor, target(10));
        assert_eq!((report.days[6].percentage, report.days[6].band), (90, Band::Excellent));
    }

    #[test]
    fn percentage_rounds_half_up_and_may_exceed_hundred() {
        assert_eq!(percentage_of_target(1, target(8)), 13); // 12.5
        assert_eq!(percentage_of_target(1, target(3)), 33);
        assert_eq!(percentage_of_target(2, target(3)), 67);
        assert_eq!(percentage_of_target(30, target(20)), 150);
    }

    #[test]
    fn weekly_average_rounds_half_up() {
        let anchor = date(2024, 11, 10);
        // 4 / 7 = 0.57 -> 1
        let events: Vec<AttendanceEvent> = (0..4).map(|i| event(&format!("S{i}"), anchor)).collect();
        assert_eq!(summarize(&events, anchor, target(20)).weekly_average, 1);
        // 3 / 7 = 0.43 -> 0
        assert_eq!(summarize(&events[..3], anchor, target(20)).weekly_average, 0);
    }

    #[test]
    fn unique_count_ignores_duplicates_and_window_bounds() {
        let anchor = date(2024, 11, 10);
        let events = vec![
            event("STU001", anchor),
            event("STU001", anchor),
            event("STU001", date(2024, 11, 9)),
            event("STU002", anchor),
            // Outside the window but still counted as a unique identity.
            event("STU003", date(2024, 10, 1)),
        ];
        let report = summarize(&events, anchor, target(20));
        assert_eq!(report.unique_count, 3);
        assert_eq!(report.weekly_total, 4);
        assert_eq!(report.today_count, 3);
    }

    #[test]
    fn summarize_is_order_independent() {
        let anchor = date(2024, 11, 10);
        let mut events = vec![
            event("STU001", anchor),
            event("STU002", date(2024, 11, 8)),
            event("STU003", date(2024, 11, 5)),
        ];
        let first = summarize(&events, anchor, target(20));
        events.reverse();
        assert_eq!(summarize(&events, anchor, target(20)), first);
    }
}
