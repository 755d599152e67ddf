//! Command implementations for timetrack.
//!
//! Each command opens the session store, performs one operation, and
//! returns the text to print.

mod categories;
mod completions;
mod report;
mod sessions;
mod timer;

pub use categories::categories;
pub use completions::completions;
pub use report::report;
pub use sessions::{add, delete, edit, list, remove};
pub use timer::{pause, resume, start, status, stop};

use chrono::{Datelike, Duration, NaiveDate};

use crate::cli::args::Period;
use crate::core::iso_week_start;
use crate::error::TimetrackError;
use crate::tracking::{parse_duration, SessionFilter};

/// Resolve a period (or an explicit ISO week of the current year) to a
/// filter and a display title.
fn period_filter(
    period: Period,
    week: Option<u32>,
    today: NaiveDate,
) -> Result<(SessionFilter, String), TimetrackError> {
    if let Some(week) = week {
        let year = today.iso_week().year();
        if iso_week_start(year, week).is_none() {
            return Err(TimetrackError::InvalidInput(format!(
                "{year} has no ISO week {week}"
            )));
        }
        return Ok((SessionFilter::in_week(year, week), format!("Week {week}, {year}")));
    }

    Ok(match period {
        Period::Today => (SessionFilter::on_day(today), "Today".to_string()),
        Period::Week => {
            let iso = today.iso_week();
            (
                SessionFilter::in_week(iso.year(), iso.week()),
                format!("This Week (W{:02})", iso.week()),
            )
        }
        Period::Month => (
            SessionFilter::between(today - Duration::days(29), today),
            "Last 30 Days".to_string(),
        ),
        Period::All => (SessionFilter::all(), "All Sessions".to_string()),
    })
}

fn parse_duration_arg(input: &str) -> Result<Duration, TimetrackError> {
    parse_duration(input)
        .ok_or_else(|| TimetrackError::InvalidInput(format!("cannot parse duration '{input}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_filter_today() {
        let (filter, title) = period_filter(Period::Today, None, date(2024, 3, 6)).unwrap();
        assert_eq!(filter, SessionFilter::on_day(date(2024, 3, 6)));
        assert_eq!(title, "Today");
    }

    #[test]
    fn test_period_filter_week_is_iso_week() {
        let (filter, _) = period_filter(Period::Week, None, date(2024, 3, 6)).unwrap();
        assert_eq!(filter, SessionFilter::in_week(2024, 10));
    }

    #[test]
    fn test_period_filter_month_is_thirty_days() {
        let (filter, _) = period_filter(Period::Month, None, date(2024, 3, 30)).unwrap();
        assert_eq!(filter, SessionFilter::between(date(2024, 3, 1), date(2024, 3, 30)));
    }

    #[test]
    fn test_explicit_week_overrides_period() {
        let (filter, title) = period_filter(Period::All, Some(2), date(2024, 3, 6)).unwrap();
        assert_eq!(filter, SessionFilter::in_week(2024, 2));
        assert_eq!(title, "Week 2, 2024");
    }

    #[test]
    fn test_invalid_week_number() {
        assert!(period_filter(Period::All, Some(0), date(2024, 3, 6)).is_err());
        assert!(period_filter(Period::All, Some(54), date(2024, 3, 6)).is_err());
    }

    #[test]
    fn test_parse_duration_arg() {
        assert_eq!(parse_duration_arg("90").unwrap(), Duration::minutes(90));
        assert!(matches!(
            parse_duration_arg("soon").unwrap_err(),
            TimetrackError::InvalidInput(_)
        ));
    }
}
