//! Time reports.
//!
//! Pure transforms from a list of sessions to report data. Nothing here
//! touches storage; callers select sessions with a
//! [`SessionFilter`](super::SessionFilter) first.
//!
//! Each session is attributed whole to the calendar day (or ISO week) of its
//! local start time. Durations exclude paused time, and active sessions are
//! measured up to `now`.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::duration::hours;
use super::session::{Session, SessionId};
use crate::core::week_start;

/// Bucket size for summary reports.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar day
    #[default]
    Day,
    /// One bucket per ISO week, Monday to Sunday
    Week,
}

impl Granularity {
    fn bucket_of(self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Day => (date, date),
            Self::Week => {
                let start = week_start(date);
                (start, start + Duration::days(6))
            }
        }
    }

    fn label(self, start: NaiveDate) -> String {
        match self {
            Self::Day => start.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let iso = start.iso_week();
                format!("{}-W{:02}", iso.year(), iso.week())
            }
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
        }
    }
}

/// Time spent on one subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryTotal {
    /// Subcategory name (None for sessions without one)
    pub subcategory: Option<String>,
    /// Active time in seconds
    pub seconds: i64,
    /// Number of sessions
    pub sessions: usize,
}

/// Time spent on one category, broken down by subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Category name
    pub category: String,
    /// Active time in seconds
    pub seconds: i64,
    /// Number of sessions
    pub sessions: usize,
    /// Per-subcategory totals, largest first
    pub subcategories: Vec<SubcategoryTotal>,
}

/// One day or week of a summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// `YYYY-MM-DD` or `YYYY-Www`
    pub label: String,
    /// First day covered
    pub start: NaiveDate,
    /// Last day covered
    pub end: NaiveDate,
    /// Active time in seconds
    pub seconds: i64,
    /// Per-category totals, largest first
    pub categories: Vec<CategoryTotal>,
}

/// Summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Bucket size
    pub granularity: Granularity,
    /// Buckets in chronological order; empty buckets are omitted
    pub buckets: Vec<Bucket>,
    /// Active time across all buckets, in seconds
    pub total_seconds: i64,
}

impl Report {
    /// Check if the report covers no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Summarize sessions in the local timezone as of now.
#[must_use]
pub fn summarize(sessions: &[Session], granularity: Granularity) -> Report {
    summarize_in(sessions, granularity, &Local, Utc::now())
}

/// Summarize sessions, using `tz` for calendar dates and `now` for active sessions.
#[must_use]
pub fn summarize_in<Tz: TimeZone>(
    sessions: &[Session],
    granularity: Granularity,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Report {
    // bucket start -> category -> subcategory -> (seconds, sessions)
    type Tally = BTreeMap<String, BTreeMap<Option<String>, (i64, usize)>>;
    let mut buckets: BTreeMap<NaiveDate, Tally> = BTreeMap::new();

    for session in sessions {
        let date = session.start.with_timezone(tz).date_naive();
        let (start, _) = granularity.bucket_of(date);
        let seconds = session.duration_at(now).num_seconds();

        let entry = buckets
            .entry(start)
            .or_default()
            .entry(session.category.clone())
            .or_default()
            .entry(session.subcategory.clone())
            .or_default();
        entry.0 += seconds;
        entry.1 += 1;
    }

    let buckets: Vec<Bucket> = buckets
        .into_iter()
        .map(|(start, tally)| {
            let (_, end) = granularity.bucket_of(start);
            let mut categories: Vec<CategoryTotal> = tally
                .into_iter()
                .map(|(category, subs)| {
                    let mut subcategories: Vec<SubcategoryTotal> = subs
                        .into_iter()
                        .map(|(subcategory, (seconds, sessions))| SubcategoryTotal {
                            subcategory,
                            seconds,
                            sessions,
                        })
                        .collect();
                    // BTreeMap order already breaks ties alphabetically
                    subcategories.sort_by(|a, b| b.seconds.cmp(&a.seconds));

                    CategoryTotal {
                        category,
                        seconds: subcategories.iter().map(|s| s.seconds).sum(),
                        sessions: subcategories.iter().map(|s| s.sessions).sum(),
                        subcategories,
                    }
                })
                .collect();
            categories.sort_by(|a, b| b.seconds.cmp(&a.seconds));

            Bucket {
                label: granularity.label(start),
                start,
                end,
                seconds: categories.iter().map(|c| c.seconds).sum(),
                categories,
            }
        })
        .collect();

    Report {
        granularity,
        total_seconds: buckets.iter().map(|b| b.seconds).sum(),
        buckets,
    }
}

/// One session in a detailed report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedRow {
    /// Session ID
    pub id: SessionId,
    /// Category name
    pub category: String,
    /// Subcategory name
    pub subcategory: Option<String>,
    /// Description
    pub description: String,
    /// Active time in hours
    pub hours: f64,
    /// Local start date
    pub date: NaiveDate,
    /// ISO week number of the start date
    pub week: u32,
    /// Whether the session is still active
    pub active: bool,
}

/// Per-session report with a grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedReport {
    /// Rows in the order given
    pub rows: Vec<DetailedRow>,
    /// Sum of all rows, in hours
    pub total_hours: f64,
}

/// Build a detailed report, using `tz` for dates and `now` for active sessions.
#[must_use]
pub fn detailed_in<Tz: TimeZone>(
    sessions: &[Session],
    tz: &Tz,
    now: DateTime<Utc>,
) -> DetailedReport {
    let rows: Vec<DetailedRow> = sessions
        .iter()
        .map(|s| {
            let date = s.start.with_timezone(tz).date_naive();
            DetailedRow {
                id: s.id,
                category: s.category.clone(),
                subcategory: s.subcategory.clone(),
                description: s.description.clone(),
                hours: hours(s.duration_at(now)),
                date,
                week: date.iso_week().week(),
                active: s.is_active(),
            }
        })
        .collect();

    let total = sessions
        .iter()
        .map(|s| s.duration_at(now))
        .fold(Duration::zero(), |acc, d| acc + d);

    DetailedReport {
        rows,
        total_hours: hours(total),
    }
}

/// One line of a cospend report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CospendEntry {
    /// "Category - Subcategory"
    pub label: String,
    /// Description
    pub description: String,
    /// Active time in hours
    pub hours: f64,
}

/// Sessions of one day in a cospend report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CospendDay {
    /// Local date
    pub date: NaiveDate,
    /// Entries in session order
    pub entries: Vec<CospendEntry>,
}

/// Group sessions by local start date for pasting into an expense tool.
#[must_use]
pub fn cospend_in<Tz: TimeZone>(
    sessions: &[Session],
    tz: &Tz,
    now: DateTime<Utc>,
) -> Vec<CospendDay> {
    let mut days: BTreeMap<NaiveDate, Vec<CospendEntry>> = BTreeMap::new();
    for s in sessions {
        days.entry(s.start.with_timezone(tz).date_naive())
            .or_default()
            .push(CospendEntry {
                label: s.label(),
                description: s.description.clone(),
                hours: hours(s.duration_at(now)),
            });
    }
    days.into_iter()
        .map(|(date, entries)| CospendDay { date, entries })
        .collect()
}
