use crate::error::{google_calendar_error, AppResult};
use chrono::{DateTime, Datelike, TimeZone, Utc};

/// UTC window covering the current calendar month
///
/// Returns `[first day 00:00, first day of next month 00:00)`. The upper
/// bound is exclusive when passed as `timeMax`, so an event starting exactly
/// at next month's midnight is not included.
pub fn month_window(now: DateTime<Utc>) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .ok_or_else(|| google_calendar_error("Failed to compute month start"))?;

    let (next_year, next_month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };

    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| google_calendar_error("Failed to compute month end"))?;

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn window_spans_the_current_month() {
        let (start, end) = month_window(utc(2024, 6, 17, 13)).unwrap();
        assert_eq!(start, utc(2024, 6, 1, 0));
        assert_eq!(end, utc(2024, 7, 1, 0));
    }

    #[test]
    fn december_rolls_into_january() {
        let (start, end) = month_window(utc(2023, 12, 31, 23)).unwrap();
        assert_eq!(start, utc(2023, 12, 1, 0));
        assert_eq!(end, utc(2024, 1, 1, 0));
    }

    #[test]
    fn first_instant_of_month_is_inside_the_window() {
        let now = utc(2024, 3, 1, 0);
        let (start, end) = month_window(now).unwrap();
        assert_eq!(start, now);
        assert!(now < end);
    }
}
