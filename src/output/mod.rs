//! Output formatting for timetrack.
//!
//! This module provides formatters for displaying sessions, reports, and
//! categories in various formats.

mod json;
mod pretty;

use chrono::{DateTime, Utc};

use crate::cli::args::OutputFormat;
use crate::error::TimetrackError;
use crate::tracking::{Categories, CospendDay, DetailedReport, Report, Session};

pub use json::*;
pub use pretty::*;

/// Format a single session based on output format
///
/// # Errors
///
/// Returns `TimetrackError::Json` if JSON serialization fails.
pub fn format_session(
    session: &Session,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(session, now)),
        OutputFormat::Json => format_session_json(session, now),
    }
}

/// Format sessions based on output format
///
/// # Errors
///
/// Returns `TimetrackError::Json` if JSON serialization fails.
pub fn format_sessions(
    sessions: &[Session],
    title: &str,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions, title, now)),
        OutputFormat::Json => format_sessions_json(sessions, title, now),
    }
}

/// Format the active session based on output format
///
/// # Errors
///
/// Returns `TimetrackError::Json` if JSON serialization fails.
pub fn format_status(
    active: Option<&Session>,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(active, now)),
        OutputFormat::Json => format_status_json(active, now),
    }
}

/// Format a summary report based on output format
///
/// # Errors
///
/// Returns `TimetrackError::Json` if JSON serialization fails.
pub fn format_report(
    report: &Report,
    title: &str,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_report_pretty(report, title)),
        OutputFormat::Json => format_report_json(report, title),
    }
}

/// Format a detailed report based on output format
///
/// # Errors
///
/// Returns `TimetrackError::Json` if JSON serialization fails.
pub fn format_detailed(
    report: &DetailedReport,
    title: &str,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_detailed_pretty(report, title)),
        OutputFormat::Json => format_detailed_json(report, title),
    }
}

/// Format a cospend report based on output format
///
/// # Errors
///
/// Returns `TimetrackError::Json` if JSON serialization fails.
pub fn format_cospend(
    days: &[CospendDay],
    title: &str,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_cospend_pretty(days, title)),
        OutputFormat::Json => format_cospend_json(days, title),
    }
}

/// Format category configuration based on output format
///
/// # Errors
///
/// Returns `TimetrackError::Json` if JSON serialization fails.
pub fn format_categories(
    categories: &Categories,
    format: OutputFormat,
) -> Result<String, TimetrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_categories_pretty(categories)),
        OutputFormat::Json => format_categories_json(categories),
    }
}
