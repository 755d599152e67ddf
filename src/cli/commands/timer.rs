//! Live timer commands: start, pause, resume, stop, status.

use chrono::{Duration, Utc};
use colored::Colorize;
use serde_json::json;

use super::parse_duration_arg;
use crate::cli::args::{OutputFormat, StartArgs};
use crate::config::Paths;
use crate::core::backdate;
use crate::error::TimetrackError;
use crate::output::{format_status, session_value, to_json};
use crate::tracking::{format_hms, Session, SessionStore};

/// Start a timer, optionally stopping the active one first.
///
/// # Errors
///
/// Returns `AlreadyRunning` if a timer is active and `--switch` was not
/// given, `InvalidCategory` for unknown or missing categories, and
/// `InvalidInput` for a bad offset.
pub fn start(
    paths: &Paths,
    args: &StartArgs,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    let mut store = SessionStore::open(paths)?;
    let now = Utc::now();

    let Some(category) = args.category() else {
        let valid = store.categories().names().collect::<Vec<_>>().join(", ");
        return Err(TimetrackError::InvalidCategory(format!(
            "No category given. Valid categories are: {valid}"
        )));
    };

    let offset = match &args.offset {
        Some(offset) => parse_duration_arg(offset)?,
        None => Duration::zero(),
    };
    let started = backdate(now, offset)?;

    let (stopped, id) = if args.switch {
        store.switch_at(category, args.subcategory(), &args.description, started, now)?
    } else {
        let id = store.start_at(category, args.subcategory(), &args.description, started)?;
        (None, id)
    };
    let session = store.get(id)?;

    match format {
        OutputFormat::Json => {
            let stopped = stopped.map(|s| session_value(&s, now)).transpose()?;
            to_json(&json!({
                "stopped": stopped,
                "started": session_value(session, now)?
            }))
        }
        OutputFormat::Pretty => {
            let mut output = Vec::new();

            if let Some(stopped) = &stopped {
                output.push(stopped_line(stopped, now));
            }

            output.push(
                format!("▶ Started {} (session {})", session.label(), session.id)
                    .green()
                    .to_string(),
            );
            if !session.description.is_empty() {
                output.push(format!("   Description: {}", session.description));
            }
            if offset > Duration::zero() {
                output.push(format!(
                    "   Backdated to {}",
                    session.start_local().format("%H:%M")
                ));
            }

            output.push(String::new());
            output.push("   Use 'timetrack pause' to take a break".dimmed().to_string());
            output.push("   Use 'timetrack stop' when done".dimmed().to_string());

            Ok(output.join("\n"))
        }
    }
}

/// Pause the running timer.
///
/// # Errors
///
/// Returns `NoActiveSession` or `AlreadyPaused`.
pub fn pause(paths: &Paths, format: OutputFormat) -> Result<String, TimetrackError> {
    let mut store = SessionStore::open(paths)?;
    let now = Utc::now();
    let session = store.pause_at(now)?;

    match format {
        OutputFormat::Json => to_json(&session_value(&session, now)?),
        OutputFormat::Pretty => Ok(format!(
            "⏸  Paused {} at {}\n   {}",
            session.label(),
            format_hms(session.duration_at(now)),
            "Use 'timetrack resume' to continue".dimmed()
        )),
    }
}

/// Resume the paused timer.
///
/// # Errors
///
/// Returns `NoActiveSession` or `NotPaused`.
pub fn resume(paths: &Paths, format: OutputFormat) -> Result<String, TimetrackError> {
    let mut store = SessionStore::open(paths)?;
    let now = Utc::now();
    let session = store.resume_at(now)?;

    match format {
        OutputFormat::Json => to_json(&session_value(&session, now)?),
        OutputFormat::Pretty => Ok(format!(
            "▶ Resumed {} ({} so far)",
            session.label(),
            format_hms(session.duration_at(now))
        )),
    }
}

/// Stop the active timer.
///
/// # Errors
///
/// Returns `NoActiveSession`.
pub fn stop(paths: &Paths, format: OutputFormat) -> Result<String, TimetrackError> {
    let mut store = SessionStore::open(paths)?;
    let now = Utc::now();
    let session = store.stop_at(now)?;

    match format {
        OutputFormat::Json => to_json(&session_value(&session, now)?),
        OutputFormat::Pretty => Ok(stopped_line(&session, now)),
    }
}

/// Show the active timer.
///
/// # Errors
///
/// Returns an error if the session log cannot be read.
pub fn status(paths: &Paths, format: OutputFormat) -> Result<String, TimetrackError> {
    let store = SessionStore::open(paths)?;
    format_status(store.active(), Utc::now(), format)
}

fn stopped_line(session: &Session, now: chrono::DateTime<Utc>) -> String {
    format!(
        "■ Stopped {} (session {}) after {}",
        session.label(),
        session.id,
        format_hms(session.duration_at(now)).bold()
    )
}
