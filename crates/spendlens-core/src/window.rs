//! Lookback window arithmetic
//!
//! Every read operation shares one window convention: `days` counts back
//! from today (UTC), the calendar range `[today - days, today]` is inclusive
//! (`days + 1` dates), and timestamp comparison is half-open — rows match
//! when `start_bound() <= ts < end_bound()`, so any timestamp on the final
//! calendar day is included.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{Error, Result};

/// Lookback values accepted by the row-listing endpoints.
pub const ALLOWED_LOOKBACK_DAYS: [i64; 5] = [1, 2, 7, 15, 20];

/// Inclusive calendar date range derived from a lookback in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl QueryWindow {
    /// Explicit window. Fixtures and tests use this; production windows come
    /// from [`QueryWindow::last_days`].
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Window ending today (UTC) and starting `days` calendar days earlier.
    pub fn last_days(days: i64) -> Result<Self> {
        if days <= 0 {
            return Err(Error::InvalidDays(days));
        }
        let end_date = Utc::now().date_naive();
        Ok(Self {
            start_date: end_date - Duration::days(days),
            end_date,
        })
    }

    /// As [`QueryWindow::last_days`], restricted to the allow-list used by
    /// the detailed-usage and recent-messages endpoints.
    pub fn last_days_restricted(days: i64) -> Result<Self> {
        if !ALLOWED_LOOKBACK_DAYS.contains(&days) {
            return Err(Error::InvalidDays(days));
        }
        Self::last_days(days)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Inclusive timestamp lower bound: midnight on the first day.
    pub fn start_bound(&self) -> NaiveDateTime {
        self.start_date.and_time(NaiveTime::MIN)
    }

    /// Exclusive timestamp upper bound: midnight after the last day.
    pub fn end_bound(&self) -> NaiveDateTime {
        (self.end_date + Duration::days(1)).and_time(NaiveTime::MIN)
    }

    /// Whether `ts` falls inside the window.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.start_bound() && ts < self.end_bound()
    }

    /// Every calendar date in the window, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }

    /// Number of lookback days (one less than the number of dates).
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_days_spans_days_plus_one_dates() {
        for days in ALLOWED_LOOKBACK_DAYS {
            let window = QueryWindow::last_days(days).unwrap();
            assert_eq!(window.dates().count() as i64, days + 1);
            assert_eq!(window.num_days(), days);
            assert_eq!(window.end_date(), Utc::now().date_naive());
        }
    }

    #[test]
    fn last_days_rejects_non_positive() {
        assert!(matches!(
            QueryWindow::last_days(0),
            Err(Error::InvalidDays(0))
        ));
        assert!(matches!(
            QueryWindow::last_days(-3),
            Err(Error::InvalidDays(-3))
        ));
    }

    #[test]
    fn restricted_rejects_values_outside_allow_list() {
        assert!(matches!(
            QueryWindow::last_days_restricted(3),
            Err(Error::InvalidDays(3))
        ));
        assert!(matches!(
            QueryWindow::last_days_restricted(30),
            Err(Error::InvalidDays(30))
        ));
        assert!(QueryWindow::last_days_restricted(7).is_ok());
    }

    #[test]
    fn bounds_are_half_open_over_the_final_day() {
        let window = QueryWindow::new(date(2024, 3, 1), date(2024, 3, 8));

        let last_moment = date(2024, 3, 8).and_hms_opt(23, 59, 59).unwrap();
        assert!(window.contains(last_moment));

        let next_midnight = date(2024, 3, 9).and_hms_opt(0, 0, 0).unwrap();
        assert!(!window.contains(next_midnight));

        let first_moment = date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap();
        assert!(window.contains(first_moment));
    }

    #[test]
    fn dates_have_no_gaps() {
        let window = QueryWindow::new(date(2024, 2, 27), date(2024, 3, 2));
        let dates: Vec<NaiveDate> = window.dates().collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 2, 27),
                date(2024, 2, 28),
                date(2024, 2, 29),
                date(2024, 3, 1),
                date(2024, 3, 2),
            ]
        );
    }
}
