//! After-the-fact session commands: add, edit, delete, remove, list.

use chrono::{Datelike, Local, Utc};
use colored::Colorize;
use serde_json::json;

use super::{parse_duration_arg, period_filter};
use crate::cli::args::{AddArgs, EditArgs, ListArgs, OutputFormat, RemoveArgs};
use crate::config::Paths;
use crate::core::{add_days, parse_local_datetime, today_local};
use crate::error::TimetrackError;
use crate::output::{format_session, format_sessions, session_value, to_json};
use crate::tracking::{SessionEdit, SessionId, SessionStore};

/// Add a completed session.
///
/// # Errors
///
/// Returns `InvalidInput` for unparseable times, `InvalidRange` if the end
/// precedes the start, `InvalidCategory` for unknown categories.
pub fn add(paths: &Paths, args: &AddArgs, format: OutputFormat) -> Result<String, TimetrackError> {
    let now = Utc::now();
    let start = parse_local_datetime(&args.start, now, &Local)?;
    let end = match (&args.end, &args.duration) {
        (Some(end), _) => parse_local_datetime(end, now, &Local)?,
        (None, Some(duration)) => start
            .checked_add_signed(parse_duration_arg(duration)?)
            .ok_or_else(|| {
                TimetrackError::InvalidInput(format!("duration '{duration}' is out of range"))
            })?,
        (None, None) => {
            return Err(TimetrackError::InvalidInput(
                "give either --end or --duration".to_string(),
            ))
        }
    };

    let mut store = SessionStore::open(paths)?;
    let id = store.add(
        &args.category,
        args.subcategory.as_deref(),
        &args.description,
        start,
        end,
    )?;
    let session = store.get(id)?;

    match format {
        OutputFormat::Json => format_session(session, now, format),
        OutputFormat::Pretty => Ok(format!(
            "{}\n{}",
            format!("Added session {id}").green(),
            format_session(session, now, format)?
        )),
    }
}

/// Edit fields of a session.
///
/// # Errors
///
/// Returns `NotFound`, `InvalidInput` if nothing would change or a value
/// cannot be parsed, and any error from [`SessionStore::edit`].
pub fn edit(paths: &Paths, args: &EditArgs, format: OutputFormat) -> Result<String, TimetrackError> {
    let now = Utc::now();
    let edit = SessionEdit {
        category: args.category.clone(),
        subcategory: if args.clear_subcategory {
            Some(None)
        } else {
            args.subcategory.clone().map(Some)
        },
        description: args.description.clone(),
        start: args
            .start
            .as_deref()
            .map(|s| parse_local_datetime(s, now, &Local))
            .transpose()?,
        end: args
            .end
            .as_deref()
            .map(|s| parse_local_datetime(s, now, &Local))
            .transpose()?,
        duration: args.duration.as_deref().map(parse_duration_arg).transpose()?,
    };

    if edit.is_empty() {
        return Err(TimetrackError::InvalidInput(
            "nothing to change; see 'timetrack edit --help'".to_string(),
        ));
    }

    let mut store = SessionStore::open(paths)?;
    let session = store.edit(args.id, &edit)?;

    match format {
        OutputFormat::Json => format_session(&session, now, format),
        OutputFormat::Pretty => Ok(format!(
            "{}\n{}",
            format!("Updated session {}", session.id).green(),
            format_session(&session, now, format)?
        )),
    }
}

/// Delete one session.
///
/// # Errors
///
/// Returns `NotFound` if there is no such session.
pub fn delete(paths: &Paths, id: SessionId, format: OutputFormat) -> Result<String, TimetrackError> {
    let mut store = SessionStore::open(paths)?;
    let removed = store.delete(id)?;

    match format {
        OutputFormat::Json => to_json(&json!({
            "deleted": session_value(&removed, Utc::now())?
        })),
        OutputFormat::Pretty => Ok(format!(
            "Deleted session {} ({})",
            removed.id,
            removed.label()
        )),
    }
}

/// Remove sessions in bulk by day offset, week offset, or all at once.
///
/// # Errors
///
/// Returns `StorageWrite` if the log cannot be saved.
pub fn remove(
    paths: &Paths,
    args: &RemoveArgs,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    let mut store = SessionStore::open(paths)?;
    let today = today_local();

    let shifted = |days: Option<i64>| {
        days.and_then(|d| add_days(today, d))
            .ok_or_else(|| TimetrackError::InvalidInput("offset is out of range".to_string()))
    };

    let (count, scope) = if args.all {
        (store.remove_all()?, "in total".to_string())
    } else if let Some(offset) = args.day {
        let date = shifted(Some(offset))?;
        (store.remove_on_day(date)?, format!("from {date}"))
    } else if let Some(offset) = args.week {
        let iso = shifted(offset.checked_mul(7))?.iso_week();
        (
            store.remove_in_week(iso.year(), iso.week())?,
            format!("from week {} of {}", iso.week(), iso.year()),
        )
    } else {
        return Err(TimetrackError::InvalidInput(
            "give one of --all, --day, or --week".to_string(),
        ));
    };

    match format {
        OutputFormat::Json => to_json(&json!({ "removed": count })),
        OutputFormat::Pretty => Ok(format!(
            "Removed {count} session{} {scope}",
            if count == 1 { "" } else { "s" }
        )),
    }
}

/// List sessions for a period.
///
/// # Errors
///
/// Returns `InvalidInput` for an impossible week number.
pub fn list(paths: &Paths, args: &ListArgs, format: OutputFormat) -> Result<String, TimetrackError> {
    let (filter, title) = period_filter(args.period, args.week, today_local())?;
    let filter = match &args.category {
        Some(category) => filter.with_category(category.as_str()),
        None => filter,
    };

    let store = SessionStore::open(paths)?;
    let sessions = store.list(&filter);
    format_sessions(&sessions, &title, Utc::now(), format)
}
