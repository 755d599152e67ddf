//! Duration parsing and formatting.

use chrono::Duration;

/// Format a duration as HH:MM:SS.
#[must_use]
pub fn format_hms(d: Duration) -> String {
    let total_seconds = d.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Format a duration as a short string (e.g., "25m", "1h 30m").
#[must_use]
pub fn format_duration_short(d: Duration) -> String {
    let total_minutes = d.num_minutes();
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Duration in fractional hours, the unit reports are printed in.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hours(d: Duration) -> f64 {
    d.num_seconds() as f64 / 3600.0
}

/// Parse a duration string like "25m", "1h30m", "90s", or "1.5h".
///
/// A bare integer is minutes; a bare decimal is hours. Values too large to
/// represent give `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    if let Ok(minutes) = s.parse::<i64>() {
        return if minutes >= 0 {
            Duration::try_minutes(minutes)
        } else {
            None
        };
    }

    // "1.5" or "1.5h"
    let decimal = s.strip_suffix('h').unwrap_or(&s);
    if decimal.contains('.') {
        let hours: f64 = decimal.parse().ok()?;
        let seconds = (hours * 3600.0).round();
        if !seconds.is_finite() || seconds < 0.0 || seconds >= i64::MAX as f64 {
            return None;
        }
        return Duration::try_seconds(seconds as i64);
    }

    let mut total_seconds: i64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            if current_num.is_empty() {
                return None;
            }
            let num: i64 = current_num.parse().ok()?;
            current_num.clear();

            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total_seconds = total_seconds.checked_add(num.checked_mul(unit)?)?;
        }
    }

    // Trailing number without unit is minutes
    if !current_num.is_empty() {
        let num: i64 = current_num.parse().ok()?;
        total_seconds = total_seconds.checked_add(num.checked_mul(60)?)?;
    }

    if total_seconds > 0 {
        Duration::try_seconds(total_seconds)
    } else {
        None
    }
}
