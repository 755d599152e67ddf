//! Date and time parsing utilities.
//!
//! Timestamps given on the command line are local wall-clock times and are
//! converted to UTC before they reach the session store.

use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Utc, Weekday,
};

use crate::error::TimetrackError;

/// Parse a date expression relative to `today`.
///
/// Supports:
/// - `today`, `yesterday`, `tomorrow`
/// - `-N` / `+N` day offsets (`-1` is yesterday)
/// - `2024-12-15` (ISO format)
#[must_use]
pub fn parse_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "today" | "t" => return Some(today),
        "yesterday" | "y" => return today.pred_opt(),
        "tomorrow" => return today.succ_opt(),
        _ => {}
    }

    if input.starts_with('-') || input.starts_with('+') {
        if let Ok(offset) = input.parse::<i64>() {
            return add_days(today, offset);
        }
    }

    NaiveDate::parse_from_str(&input, "%Y-%m-%d").ok()
}

/// Parse a time of day like `9:30`, `09:30`, or `14:05:10`.
#[must_use]
pub fn parse_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .ok()
}

/// Parse a local timestamp expression relative to `now`.
///
/// Supports:
/// - `now`
/// - `HH:MM` (today)
/// - `<date> HH:MM` where `<date>` is anything [`parse_date`] accepts
/// - `YYYY-MM-DDTHH:MM[:SS]`
/// - RFC 3339 with an explicit offset
///
/// # Errors
///
/// Returns `InvalidInput` if the expression cannot be parsed or names a
/// local time that does not exist.
pub fn parse_local_datetime<Tz: TimeZone>(
    input: &str,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<DateTime<Utc>, TimetrackError> {
    let trimmed = input.trim();
    let invalid = || TimetrackError::InvalidInput(format!("cannot parse time '{trimmed}'"));

    if trimmed.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Ok(explicit) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(explicit.with_timezone(&Utc));
    }

    let today = now.with_timezone(tz).date_naive();

    let naive = if let Some(time) = parse_time(trimmed) {
        NaiveDateTime::new(today, time)
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        dt
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M") {
        dt
    } else {
        let (date_part, time_part) = trimmed.rsplit_once(' ').ok_or_else(invalid)?;
        let date = parse_date(date_part, today).ok_or_else(invalid)?;
        let time = parse_time(time_part).ok_or_else(invalid)?;
        NaiveDateTime::new(date, time)
    };

    local_to_utc(&naive, tz).ok_or_else(|| {
        TimetrackError::InvalidInput(format!("'{trimmed}' does not exist in the local timezone"))
    })
}

/// Convert a local wall-clock time to UTC, taking the earlier instant when
/// the time is ambiguous.
#[must_use]
pub fn local_to_utc<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, _) => Some(earlier.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// `date` moved by `days`, or `None` if the result is out of range.
#[must_use]
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|d| date.checked_add_signed(d))
}

/// The instant `offset` before `now`.
///
/// # Errors
///
/// Returns `InvalidInput` if the result is out of range.
pub fn backdate(now: DateTime<Utc>, offset: Duration) -> Result<DateTime<Utc>, TimetrackError> {
    now.checked_sub_signed(offset)
        .ok_or_else(|| TimetrackError::InvalidInput(format!("offset of {offset} is out of range")))
}

/// Monday of the ISO week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Monday of ISO week `week` in ISO year `year`.
#[must_use]
pub fn iso_week_start(year: i32, week: u32) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

/// Current local date.
#[must_use]
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}
