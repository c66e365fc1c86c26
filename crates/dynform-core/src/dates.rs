//! Calendar-day helpers used by the date-coupled fields.
//!
//! All arithmetic is on [`NaiveDate`]: form dates carry no time of day and no
//! zone, so a "day" is always a calendar day.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

/// Accepted plain-date layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date as a date picker or a JSON document would hand it over.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339 timestamps and naive
/// `YYYY-MM-DDTHH:MM:SS` timestamps. Timestamps keep only their calendar date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Whole days from `earlier` to `later`. Negative when `later` precedes `earlier`.
pub fn difference_in_days(later: NaiveDate, earlier: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

/// `date` shifted by `days` (may be negative). `None` if the result leaves
/// the representable calendar.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let step = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_plain_dates() {
        assert_eq!(parse_date("2024-01-01"), Some(d(2024, 1, 1)));
        assert_eq!(parse_date(" 2024/02/29 "), Some(d(2024, 2, 29)));
    }

    #[test]
    fn parse_timestamps_keep_calendar_date() {
        assert_eq!(parse_date("2024-03-10T23:30:00Z"), Some(d(2024, 3, 10)));
        assert_eq!(parse_date("2024-03-10T08:00:00"), Some(d(2024, 3, 10)));
        assert_eq!(
            parse_date("2024-03-10T23:30:00-05:00"),
            Some(d(2024, 3, 10))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("next tuesday"), None);
        assert_eq!(parse_date("2023-02-29"), None);
    }

    #[test]
    fn difference_is_signed() {
        assert_eq!(difference_in_days(d(2024, 1, 10), d(2024, 1, 1)), 9);
        assert_eq!(difference_in_days(d(2024, 1, 1), d(2024, 1, 10)), -9);
        assert_eq!(difference_in_days(d(2024, 1, 1), d(2024, 1, 1)), 0);
    }

    #[test]
    fn difference_crosses_leap_day() {
        assert_eq!(difference_in_days(d(2024, 3, 1), d(2024, 2, 28)), 2);
        assert_eq!(difference_in_days(d(2023, 3, 1), d(2023, 2, 28)), 1);
    }

    #[test]
    fn add_days_both_directions() {
        assert_eq!(add_days(d(2024, 1, 1), 5), Some(d(2024, 1, 6)));
        assert_eq!(add_days(d(2024, 1, 1), -1), Some(d(2023, 12, 31)));
        assert_eq!(add_days(d(2024, 1, 1), 0), Some(d(2024, 1, 1)));
    }

    #[test]
    fn add_days_overflow_is_none() {
        assert_eq!(add_days(NaiveDate::MAX, 1), None);
        assert_eq!(add_days(d(2024, 1, 1), i64::MIN), None);
    }

    #[test]
    fn add_then_difference_round_trips() {
        let start = d(2024, 1, 1);
        for n in [-400, -31, -1, 0, 1, 5, 59, 366, 10_000] {
            let end = add_days(start, n).unwrap();
            assert_eq!(difference_in_days(end, start), n, "offset {n}");
        }
    }
}
