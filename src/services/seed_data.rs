//! Sample check-ins for demos and local dashboards.

use chrono::{Datelike, Days, NaiveDate, SecondsFormat, TimeZone, Utc, Weekday};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::CheckInRequest;

const ROSTER: &[&str] = &[
    "John Doe",
    "Jane Smith",
    "Bob Johnson",
    "Alice Brown",
    "Charlie Davis",
    "Eva Wilson",
    "Frank Miller",
    "Grace Lee",
    "Henry Taylor",
    "Iris Clark",
];

const WEEKDAY_BASE: u32 = 8;
const WEEKEND_BASE: u32 = 5;

/// Check-ins for the seven days ending at `today`: a weekday/weekend base count plus up to four
/// extra, each between 08:00 and 10:59 UTC.
pub fn generate_week<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> Vec<CheckInRequest> {
    let mut records = Vec::new();
    for back in (0..7u64).rev() {
        let Some(day) = today.checked_sub_days(Days::new(back)) else {
            continue;
        };
        let base = match day.weekday() {
            Weekday::Sat | Weekday::Sun => WEEKEND_BASE,
            _ => WEEKDAY_BASE,
        };
        let count = base + rng.gen_range(0..5);
        for i in 0..count {
            let Some(time) = day.and_hms_opt(rng.gen_range(8..11), rng.gen_range(0..60), 0) else {
                continue;
            };
            let name = ROSTER.choose(rng).copied().unwrap_or("John Doe");
            records.push(CheckInRequest::new(
                name,
                format!("STU{:03}", i + 1),
                Utc.from_utc_datetime(&time).to_rfc3339_opts(SecondsFormat::Millis, true),
            ));
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckIn;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn generated_week_respects_daily_bases_and_hours() {
        let today = NaiveDate::from_ymd_opt(2024, 11, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let records = generate_week(today, &mut rng);

        let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
        for record in &records {
            let check_in = CheckIn::validate(record).expect("generated record is valid");
            let hour = check_in.timestamp.format("%H").to_string();
            assert!(["08", "09", "10"].contains(&hour.as_str()));
            *per_day.entry(check_in.date()).or_insert(0) += 1;
        }

        assert_eq!(per_day.len(), 7);
        for (day, count) in per_day {
            let base = if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) { 5 } else { 8 };
            assert!((base..base + 5).contains(&count), "{day}: {count}");
        }
    }
}
