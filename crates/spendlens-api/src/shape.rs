//! Response shaping
//!
//! Timeline responses carry one entry per calendar day in the window,
//! whether or not the store returned a row for that day. The
//! left-join-with-defaults happens here in application code rather than in
//! SQL, which keeps it testable without a database.

use std::collections::HashMap;

use chrono::NaiveDate;
use spendlens_core::{
    spend_store::{DailySessionRow, DailyTokenRow},
    QueryWindow,
};

use crate::models::{DailySessionActivity, DailyTokenUsage, DateRange};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn date_range(window: QueryWindow) -> DateRange {
    DateRange {
        start_date: format_date(window.start_date()),
        end_date: format_date(window.end_date()),
    }
}

/// One entry per window date; dates the store had no row for get 0 sessions.
pub fn fill_daily_sessions(
    window: QueryWindow,
    rows: &[DailySessionRow],
) -> Vec<DailySessionActivity> {
    let by_date: HashMap<NaiveDate, i64> = rows.iter().map(|r| (r.date, r.sessions)).collect();

    window
        .dates()
        .map(|date| DailySessionActivity {
            date: format_date(date),
            sessions: by_date.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// One entry per window date; missing dates get zero token counts.
pub fn fill_daily_tokens(window: QueryWindow, rows: &[DailyTokenRow]) -> Vec<DailyTokenUsage> {
    let by_date: HashMap<NaiveDate, (i64, i64)> = rows
        .iter()
        .map(|r| (r.date, (r.prompt_tokens, r.completion_tokens)))
        .collect();

    window
        .dates()
        .map(|date| {
            let (prompt_tokens, completion_tokens) =
                by_date.get(&date).copied().unwrap_or((0, 0));
            DailyTokenUsage {
                date: format_date(date),
                prompt_tokens,
                completion_tokens,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fills_every_window_date_with_zero_defaults() {
        let window = QueryWindow::new(date(2024, 3, 1), date(2024, 3, 8));
        let rows = vec![DailySessionRow {
            date: date(2024, 3, 4),
            sessions: 3,
        }];

        let filled = fill_daily_sessions(window, &rows);

        assert_eq!(filled.len(), 8);
        assert_eq!(filled[0].date, "2024-03-01");
        assert_eq!(filled[7].date, "2024-03-08");
        for entry in &filled {
            if entry.date == "2024-03-04" {
                assert_eq!(entry.sessions, 3);
            } else {
                assert_eq!(entry.sessions, 0);
            }
        }
    }

    #[test]
    fn token_fill_zeroes_both_fields() {
        let window = QueryWindow::new(date(2024, 3, 1), date(2024, 3, 3));
        let rows = vec![DailyTokenRow {
            date: date(2024, 3, 2),
            prompt_tokens: 120,
            completion_tokens: 45,
        }];

        let filled = fill_daily_tokens(window, &rows);

        assert_eq!(
            filled,
            vec![
                DailyTokenUsage {
                    date: "2024-03-01".to_string(),
                    prompt_tokens: 0,
                    completion_tokens: 0,
                },
                DailyTokenUsage {
                    date: "2024-03-02".to_string(),
                    prompt_tokens: 120,
                    completion_tokens: 45,
                },
                DailyTokenUsage {
                    date: "2024-03-03".to_string(),
                    prompt_tokens: 0,
                    completion_tokens: 0,
                },
            ]
        );
    }

    #[test]
    fn empty_rows_produce_an_all_zero_series() {
        let window = QueryWindow::new(date(2024, 3, 1), date(2024, 3, 8));
        let filled = fill_daily_tokens(window, &[]);
        assert_eq!(filled.len(), 8);
        assert!(filled
            .iter()
            .all(|e| e.prompt_tokens == 0 && e.completion_tokens == 0));
    }

    #[test]
    fn rows_outside_the_window_are_ignored() {
        let window = QueryWindow::new(date(2024, 3, 1), date(2024, 3, 2));
        let rows = vec![DailySessionRow {
            date: date(2024, 2, 28),
            sessions: 9,
        }];

        let filled = fill_daily_sessions(window, &rows);
        assert_eq!(filled.len(), 2);
        assert!(filled.iter().all(|e| e.sessions == 0));
    }

    #[test]
    fn daily_token_sums_match_totals() {
        let window = QueryWindow::new(date(2024, 3, 1), date(2024, 3, 8));
        let rows = vec![
            DailyTokenRow {
                date: date(2024, 3, 2),
                prompt_tokens: 100,
                completion_tokens: 40,
            },
            DailyTokenRow {
                date: date(2024, 3, 5),
                prompt_tokens: 250,
                completion_tokens: 90,
            },
        ];

        let filled = fill_daily_tokens(window, &rows);
        let prompt_sum: i64 = filled.iter().map(|e| e.prompt_tokens).sum();
        let completion_sum: i64 = filled.iter().map(|e| e.completion_tokens).sum();
        assert_eq!(prompt_sum, 350);
        assert_eq!(completion_sum, 130);
    }
}
