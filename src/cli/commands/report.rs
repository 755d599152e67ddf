//! Report command implementation.

use chrono::{Local, Utc};

use super::period_filter;
use crate::cli::args::{OutputFormat, Period, ReportArgs, ReportFormat};
use crate::config::{Config, Paths};
use crate::core::today_local;
use crate::error::TimetrackError;
use crate::output::{format_cospend, format_detailed, format_report};
use crate::tracking::{cospend_in, detailed_in, summarize, Granularity, SessionStore};

/// Default bucket size when neither `--by` nor the config picks one.
const fn default_granularity(period: Period, week: Option<u32>) -> Granularity {
    match (period, week) {
        (_, Some(_)) | (Period::Today | Period::Week, None) => Granularity::Day,
        (Period::Month | Period::All, None) => Granularity::Week,
    }
}

/// Generate a report for a period.
///
/// # Errors
///
/// Returns `InvalidInput` for an impossible week number, or an error if the
/// session log cannot be read.
pub fn report(
    paths: &Paths,
    config: &Config,
    args: &ReportArgs,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    let (filter, title) = period_filter(args.period, args.week, today_local())?;
    let filter = match &args.category {
        Some(category) => filter.with_category(category.as_str()),
        None => filter,
    };

    let store = SessionStore::open(paths)?;
    let sessions = store.list(&filter);
    let now = Utc::now();

    tracing::debug!(sessions = sessions.len(), period = %title, "building report");

    match args.format.unwrap_or(config.report.default_format) {
        ReportFormat::Summary => {
            let granularity = args
                .by
                .or(config.report.default_granularity)
                .unwrap_or_else(|| default_granularity(args.period, args.week));
            format_report(&summarize(&sessions, granularity), &title, format)
        }
        ReportFormat::Detailed => {
            format_detailed(&detailed_in(&sessions, &Local, now), &title, format)
        }
        ReportFormat::Cospend => format_cospend(&cospend_in(&sessions, &Local, now), &title, format),
    }
}
