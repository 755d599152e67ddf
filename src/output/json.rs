//! JSON output formatting for timetrack.
//!
//! Sessions are emitted with their stored fields plus the derived `state`
//! and `duration_seconds`, so scripts never have to recompute pauses.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::TimetrackError;
use crate::tracking::{Categories, CospendDay, DetailedReport, Report, Session};

/// A session with its derived fields, as a JSON value.
///
/// # Errors
///
/// Returns `TimetrackError::Json` if serialization fails.
pub fn session_value(session: &Session, now: DateTime<Utc>) -> Result<Value, TimetrackError> {
    let mut value = serde_json::to_value(session)?;
    if let Value::Object(map) = &mut value {
        map.insert("state".to_string(), serde_json::to_value(session.state())?);
        map.insert(
            "duration_seconds".to_string(),
            json!(session.duration_at(now).num_seconds()),
        );
    }
    Ok(value)
}

/// Format a single session as JSON
///
/// # Errors
///
/// Returns `TimetrackError::Json` if serialization fails.
pub fn format_session_json(session: &Session, now: DateTime<Utc>) -> Result<String, TimetrackError> {
    to_json(&session_value(session, now)?)
}

/// Format sessions as JSON
///
/// # Errors
///
/// Returns `TimetrackError::Json` if serialization fails.
pub fn format_sessions_json(
    sessions: &[Session],
    title: &str,
    now: DateTime<Utc>,
) -> Result<String, TimetrackError> {
    let items = sessions
        .iter()
        .map(|s| session_value(s, now))
        .collect::<Result<Vec<_>, _>>()?;
    let total: i64 = sessions.iter().map(|s| s.duration_at(now).num_seconds()).sum();

    let output = json!({
        "list": title,
        "count": sessions.len(),
        "total_seconds": total,
        "items": items
    });
    to_json(&output)
}

/// Format the active session (or `null`) as JSON
///
/// # Errors
///
/// Returns `TimetrackError::Json` if serialization fails.
pub fn format_status_json(
    active: Option<&Session>,
    now: DateTime<Utc>,
) -> Result<String, TimetrackError> {
    match active {
        Some(session) => format_session_json(session, now),
        None => Ok("null".to_string()),
    }
}

/// Format a summary report as JSON
///
/// # Errors
///
/// Returns `TimetrackError::Json` if serialization fails.
pub fn format_report_json(report: &Report, title: &str) -> Result<String, TimetrackError> {
    let output = json!({
        "period": title,
        "report": report
    });
    to_json(&output)
}

/// Format a detailed report as JSON
///
/// # Errors
///
/// Returns `TimetrackError::Json` if serialization fails.
pub fn format_detailed_json(report: &DetailedReport, title: &str) -> Result<String, TimetrackError> {
    let output = json!({
        "period": title,
        "count": report.rows.len(),
        "total_hours": report.total_hours,
        "items": report.rows
    });
    to_json(&output)
}

/// Format a cospend report as JSON
///
/// # Errors
///
/// Returns `TimetrackError::Json` if serialization fails.
pub fn format_cospend_json(days: &[CospendDay], title: &str) -> Result<String, TimetrackError> {
    let output = json!({
        "period": title,
        "days": days
    });
    to_json(&output)
}

/// Format category configuration as JSON
///
/// # Errors
///
/// Returns `TimetrackError::Json` if serialization fails.
pub fn format_categories_json(categories: &Categories) -> Result<String, TimetrackError> {
    // Serialized directly; a `json!` object would re-sort the keys
    #[derive(Serialize)]
    struct Output<'a> {
        count: usize,
        categories: &'a Categories,
    }

    to_json(&Output {
        count: categories.len(),
        categories,
    })
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `TimetrackError::Json` if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, TimetrackError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_session_value_has_derived_fields() {
        let mut session = Session::new(3, "Sales".to_string(), None, String::new(), t0());
        session.pause(t0() + Duration::minutes(10)).unwrap();

        let value = session_value(&session, t0() + Duration::minutes(30)).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["state"], "paused");
        assert_eq!(value["duration_seconds"], 600);
    }

    #[test]
    fn test_sessions_json_envelope() {
        let mut session = Session::new(1, "Sales".to_string(), None, String::new(), t0());
        session.stop(t0() + Duration::minutes(45));

        let out = format_sessions_json(&[session], "All", t0()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["total_seconds"], 45 * 60);
        assert_eq!(value["items"][0]["state"], "stopped");
    }

    #[test]
    fn test_status_json_idle_is_null() {
        assert_eq!(format_status_json(None, t0()).unwrap(), "null");
    }

    #[test]
    fn test_categories_json_keeps_order() {
        let out = format_categories_json(&Categories::default()).unwrap();
        let product = out.find("Product dev").unwrap();
        let other = out.find("\"Other\"").unwrap();
        assert!(product < other);
    }
}
