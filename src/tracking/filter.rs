//! Session selection by date and category.

use chrono::{Datelike, NaiveDate, TimeZone};

use super::session::Session;

/// Criteria for listing, reporting on, or removing sessions.
///
/// Dates are calendar dates in the timezone passed to [`SessionFilter::matches_in`],
/// compared against each session's start. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    /// First day to include
    pub from: Option<NaiveDate>,
    /// Last day to include
    pub to: Option<NaiveDate>,
    /// ISO (year, week) to include
    pub iso_week: Option<(i32, u32)>,
    /// Category name, matched case-insensitively
    pub category: Option<String>,
}

impl SessionFilter {
    /// Match everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Sessions started on `date`.
    #[must_use]
    pub fn on_day(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    /// Sessions started between `from` and `to`, inclusive.
    #[must_use]
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    /// Sessions started in ISO week `week` of ISO year `year`.
    #[must_use]
    pub fn in_week(year: i32, week: u32) -> Self {
        Self {
            iso_week: Some((year, week)),
            ..Self::default()
        }
    }

    /// Restrict to one category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check a session against every criterion, using `tz` for calendar dates.
    #[must_use]
    pub fn matches_in<Tz: TimeZone>(&self, session: &Session, tz: &Tz) -> bool {
        let date = session.start.with_timezone(tz).date_naive();

        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        if self.to.is_some_and(|to| date > to) {
            return false;
        }
        if let Some((year, week)) = self.iso_week {
            let iso = date.iso_week();
            if iso.year() != year || iso.week() != week {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !session.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session_on(y: i32, m: u32, d: u32, category: &str) -> Session {
        Session::new(
            1,
            category.to_string(),
            None,
            String::new(),
            Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = SessionFilter::all();
        assert_eq!(filter, SessionFilter::default());
        assert!(filter.matches_in(&session_on(2024, 3, 4, "Sales"), &Utc));
    }

    #[test]
    fn test_day_and_range() {
        let session = session_on(2024, 3, 5, "Sales");
        assert!(SessionFilter::on_day(date(2024, 3, 5)).matches_in(&session, &Utc));
        assert!(!SessionFilter::on_day(date(2024, 3, 4)).matches_in(&session, &Utc));
        assert!(SessionFilter::between(date(2024, 3, 1), date(2024, 3, 5)).matches_in(&session, &Utc));
        assert!(!SessionFilter::between(date(2024, 3, 6), date(2024, 3, 9)).matches_in(&session, &Utc));
    }

    #[test]
    fn test_iso_week() {
        // 2024-03-04..2024-03-10 is ISO week 10
        assert!(SessionFilter::in_week(2024, 10).matches_in(&session_on(2024, 3, 10, "Sales"), &Utc));
        assert!(!SessionFilter::in_week(2024, 10).matches_in(&session_on(2024, 3, 11, "Sales"), &Utc));
        assert!(!SessionFilter::in_week(2023, 10).matches_in(&session_on(2024, 3, 5, "Sales"), &Utc));
    }

    #[test]
    fn test_category_is_case_insensitive() {
        let filter = SessionFilter::all().with_category("sales");
        assert!(filter.matches_in(&session_on(2024, 3, 4, "Sales"), &Utc));
        assert!(!filter.matches_in(&session_on(2024, 3, 4, "Marketing"), &Utc));
    }
}
