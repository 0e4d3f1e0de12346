//! Collapse a 3-hourly forecast timeline into one sample per future day.

use chrono::{Local, NaiveDate, TimeZone};
use std::collections::HashSet;

use crate::model::ForecastSample;

/// Maximum number of forecast days shown.
pub const MAX_DAYS: usize = 5;

/// Daily digest using the viewer's local time zone.
pub fn daily_digest(samples: &[ForecastSample]) -> Vec<ForecastSample> {
    daily_digest_in(samples, &Local)
}

/// Keep the first sample of each calendar date in `tz`, in input order, then
/// drop the first date (today) and return at most [`MAX_DAYS`] of the rest.
pub fn daily_digest_in<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<ForecastSample> {
    first_per_date(samples, tz)
        .into_iter()
        .skip(1)
        .take(MAX_DAYS)
        .collect()
}

fn first_per_date<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<ForecastSample> {
    let mut seen: HashSet<NaiveDate> = HashSet::new();

    samples
        .iter()
        .filter(|sample| match local_date(sample, tz) {
            Some(date) => seen.insert(date),
            None => {
                tracing::debug!(timestamp = sample.timestamp, "skipping unrepresentable sample");
                false
            }
        })
        .cloned()
        .collect()
}

fn local_date<Tz: TimeZone>(sample: &ForecastSample, tz: &Tz) -> Option<NaiveDate> {
    sample
        .datetime()
        .map(|utc| utc.with_timezone(tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    const HOUR: i64 = 3600;
    const DAY: i64 = 24 * HOUR;
    // 2024-01-01T00:00:00Z
    const JAN_1: i64 = 1_704_067_200;

    fn sample(timestamp: i64, category: &str) -> ForecastSample {
        ForecastSample {
            timestamp,
            temperature: 20.0,
            category: category.into(),
        }
    }

    /// Every three hours for `days` days starting at `start`.
    fn timeline(start: i64, days: i64) -> Vec<ForecastSample> {
        (0..days * 8)
            .map(|i| sample(start + i * 3 * HOUR, "Clear"))
            .collect()
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(daily_digest_in(&[], &Utc).is_empty());
        assert!(daily_digest(&[]).is_empty());
    }

    #[test]
    fn keeps_first_sample_per_date() {
        let samples = vec![
            sample(JAN_1 + 9 * HOUR, "d1-morning"),
            sample(JAN_1 + 15 * HOUR, "d1-afternoon"),
            sample(JAN_1 + DAY + 9 * HOUR, "d2-morning"),
        ];

        let firsts = first_per_date(&samples, &Utc);
        let categories: Vec<_> = firsts.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(categories, ["d1-morning", "d2-morning"]);

        let digest = daily_digest_in(&samples, &Utc);
        assert_eq!(digest.len(), 1);
        assert_eq!(digest[0].category, "d2-morning");
    }

    #[test]
    fn five_day_timeline_yields_next_days() {
        // Starts at noon: today plus five more dates, the last one partial.
        let samples = timeline(JAN_1 + 12 * HOUR, 5);
        let digest = daily_digest_in(&samples, &Utc);

        assert_eq!(digest.len(), 5);
        for (i, day) in digest.iter().enumerate() {
            assert_eq!(day.timestamp, JAN_1 + (i as i64 + 1) * DAY);
        }
    }

    #[test]
    fn never_more_than_five_days() {
        let samples = timeline(JAN_1, 10);
        assert_eq!(daily_digest_in(&samples, &Utc).len(), MAX_DAYS);
    }

    #[test]
    fn first_date_is_always_dropped() {
        let samples = vec![sample(JAN_1, "today")];
        assert!(daily_digest_in(&samples, &Utc).is_empty());

        let samples = timeline(JAN_1, 3);
        let digest = daily_digest_in(&samples, &Utc);
        assert_eq!(digest.len(), 2);
        assert!(digest.iter().all(|s| s.timestamp >= JAN_1 + DAY));
    }

    #[test]
    fn dates_follow_the_given_time_zone() {
        // 22:00Z and 23:00Z on Jan 1 are Jan 2 in UTC+8.
        let samples = vec![
            sample(JAN_1 + 13 * HOUR, "a"),
            sample(JAN_1 + 22 * HOUR, "b"),
            sample(JAN_1 + 23 * HOUR, "c"),
        ];

        let manila = FixedOffset::east_opt(8 * 3600).expect("valid offset");
        let digest = daily_digest_in(&samples, &manila);
        assert_eq!(digest.len(), 1);
        assert_eq!(digest[0].category, "b");

        assert!(daily_digest_in(&samples, &Utc).is_empty());
    }

    #[test]
    fn order_of_first_encounter_is_preserved() {
        let samples = vec![
            sample(JAN_1, "d1"),
            sample(JAN_1 + 2 * DAY, "d3"),
            sample(JAN_1 + DAY, "d2"),
            sample(JAN_1 + 2 * DAY + HOUR, "d3-late"),
        ];

        let categories: Vec<_> = daily_digest_in(&samples, &Utc)
            .into_iter()
            .map(|s| s.category)
            .collect();
        assert_eq!(categories, ["d3", "d2"]);
    }

    #[test]
    fn unrepresentable_timestamps_are_skipped() {
        let samples = vec![sample(JAN_1, "d1"), sample(i64::MAX, "bad"), sample(JAN_1 + DAY, "d2")];
        let digest = daily_digest_in(&samples, &Utc);
        assert_eq!(digest.len(), 1);
        assert_eq!(digest[0].category, "d2");
    }
}
