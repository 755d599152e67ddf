use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};

use crate::tracking::{
    format_duration, format_hms, hours, Categories, CospendDay, DetailedReport, Report, Session,
    SessionState,
};

const RULE_WIDTH: usize = 72;

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

fn state_badge(state: SessionState) -> ColoredString {
    match state {
        SessionState::Running => "▶ Running".green(),
        SessionState::Paused => "⏸ Paused".yellow(),
        SessionState::Stopped => "■ Stopped".dimmed(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

fn hours_str(seconds: i64) -> String {
    format!("{:.2}h", hours(chrono::Duration::seconds(seconds)))
}

/// Format a single session as pretty output
pub fn format_session_pretty(session: &Session, now: DateTime<Utc>) -> String {
    let mut output = format!(
        "{} {}\n",
        state_badge(session.state()),
        session.label().bold()
    );
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), session.id));

    if !session.description.is_empty() {
        output.push_str(&format!(
            "  {}: {}\n",
            "Description".dimmed(),
            session.description
        ));
    }

    output.push_str(&format!(
        "  {}: {}\n",
        "Started".dimmed(),
        session.start_local().format("%Y-%m-%d %H:%M")
    ));

    if let Some(end) = session.end_local() {
        output.push_str(&format!(
            "  {}: {}\n",
            "Ended".dimmed(),
            end.format("%Y-%m-%d %H:%M")
        ));
    }

    output.push_str(&format!(
        "  {}: {} ({})\n",
        "Duration".dimmed(),
        format_hms(session.duration_at(now)),
        format_duration(session.duration_at(now))
    ));

    let paused = session.paused_duration_at(now);
    if paused > chrono::Duration::zero() {
        output.push_str(&format!(
            "  {}: {}\n",
            "Paused".dimmed(),
            format_hms(paused)
        ));
    }

    output
}

/// Format the active session, or a hint when idle
pub fn format_status_pretty(active: Option<&Session>, now: DateTime<Utc>) -> String {
    match active {
        Some(session) => {
            let mut output = format!("{}\n{}\n", "Active Timer".bold(), rule());
            output.push_str(&format_session_pretty(session, now));
            output
        }
        None => format!(
            "No active timer.\n\n{}",
            "Start one with: timetrack start <category> [subcategory]".dimmed()
        ),
    }
}

/// Format a list of sessions as a table
pub fn format_sessions_pretty(sessions: &[Session], title: &str, now: DateTime<Utc>) -> String {
    if sessions.is_empty() {
        return format!("{title} (0 sessions)\n  No sessions");
    }

    let mut output = format!("{} ({} sessions)\n", title.bold(), sessions.len());
    output.push_str(&rule());
    output.push('\n');
    output.push_str(&format!(
        "{:<5} {:<11} {:<6} {:<6} {:>9}  {}\n",
        "ID", "Date", "Start", "End", "Duration", "Category"
    ));
    output.push_str(&rule());
    output.push('\n');

    let mut total = chrono::Duration::zero();
    for session in sessions {
        let duration = session.duration_at(now);
        total = total + duration;

        let end = match (session.end_local(), session.state()) {
            (Some(end), _) => end.format("%H:%M").to_string(),
            (None, SessionState::Paused) => "paused".to_string(),
            (None, _) => "now".to_string(),
        };

        let mut line = format!(
            "{:<5} {:<11} {:<6} {:<6} {:>9}  {}",
            session.id,
            session.start_local().format("%Y-%m-%d"),
            session.start_local().format("%H:%M"),
            end,
            format_hms(duration),
            session.label()
        );
        if !session.description.is_empty() {
            line.push_str(&format!("  {}", truncate(&session.description, 30).dimmed()));
        }
        if session.is_active() {
            line = line.green().to_string();
        }

        output.push_str(&line);
        output.push('\n');
    }

    output.push_str(&rule());
    output.push('\n');
    output.push_str(&format!("{} {}", "Total:".bold(), format_hms(total)));
    output
}

/// Format a summary report
pub fn format_report_pretty(report: &Report, title: &str) -> String {
    if report.is_empty() {
        return format!("{title}\n  No sessions");
    }

    let mut output = format!("{}\n", format!("Time Tracking Summary: {title}").bold());
    output.push_str(&rule());
    output.push('\n');

    for bucket in &report.buckets {
        output.push_str(&format!(
            "\n{}  {}\n",
            bucket.label.cyan().bold(),
            hours_str(bucket.seconds)
        ));

        for category in &bucket.categories {
            output.push_str(&format!(
                "  {:<40} {:>8}\n",
                category.category.bold(),
                hours_str(category.seconds)
            ));
            for sub in &category.subcategories {
                let name = sub.subcategory.as_deref().unwrap_or("(none)");
                output.push_str(&format!(
                    "    - {:<36} {:>8}\n",
                    name,
                    hours_str(sub.seconds)
                ));
            }
        }
    }

    output.push('\n');
    output.push_str(&rule());
    output.push('\n');
    output.push_str(&format!(
        "{} {}",
        "Total Hours:".bold(),
        hours_str(report.total_seconds)
    ));
    output
}

/// Format a detailed report, one row per session
pub fn format_detailed_pretty(report: &DetailedReport, title: &str) -> String {
    if report.rows.is_empty() {
        return format!("{title}\n  No sessions");
    }

    let mut output = format!("{}\n", format!("Detailed Time Tracking Report: {title}").bold());
    output.push_str(&"─".repeat(112));
    output.push('\n');
    output.push_str(&format!(
        "{:<5} {:<15} {:<29} {:<30} {:<10} {:<12} {:<5}\n",
        "ID", "Category", "Subcategory", "Description", "Duration", "Date", "Week"
    ));
    output.push_str(&"─".repeat(112));
    output.push('\n');

    for row in &report.rows {
        let duration = format!("{:.2}h{}", row.hours, if row.active { "*" } else { "" });
        output.push_str(&format!(
            "{:<5} {:<15} {:<29} {:<30} {:<10} {:<12} {:<5}\n",
            row.id,
            truncate(&row.category, 15),
            truncate(row.subcategory.as_deref().unwrap_or(""), 29),
            truncate(&row.description, 28),
            duration,
            row.date.format("%Y-%m-%d"),
            row.week
        ));
    }

    output.push_str(&"─".repeat(112));
    output.push('\n');
    output.push_str(&format!(
        "{} {:.3}h",
        "Total Hours:".bold(),
        report.total_hours
    ));
    if report.rows.iter().any(|r| r.active) {
        output.push_str(&format!("\n{}", "* still running".dimmed()));
    }
    output
}

/// Format a cospend report, sessions grouped by date
pub fn format_cospend_pretty(days: &[CospendDay], title: &str) -> String {
    if days.is_empty() {
        return format!("{title}\n  No sessions");
    }

    let mut output = format!("{}\n", format!("Cospend Time Tracking Report: {title}").bold());
    output.push_str(&"-".repeat(50));
    output.push('\n');

    for day in days {
        output.push_str(&format!("\nDate: {}\n", day.date.format("%Y-%m-%d")));
        for entry in &day.entries {
            output.push_str(&format!(
                "{}: {} ({:.2})\n",
                entry.label, entry.description, entry.hours
            ));
        }
    }

    output.push_str(&"-".repeat(50));
    output
}

/// Format all categories
pub fn format_categories_pretty(categories: &Categories) -> String {
    if categories.is_empty() {
        return "Categories (0)\n  No categories".to_string();
    }

    let mut output = format!("Categories ({})\n", categories.len());
    output.push_str(&rule());
    output.push('\n');

    for (name, subs) in categories.iter() {
        output.push_str(&format!(
            "{}  {}\n",
            name.bold(),
            format!("({} subcategories)", subs.len()).dimmed()
        ));
    }

    output
}

/// Format the subcategories of one category
pub fn format_subcategories_pretty(category: &str, subcategories: &[String]) -> String {
    if subcategories.is_empty() {
        return format!("No subcategories found for '{category}'");
    }

    let mut output = format!("Subcategories for {}\n", category.bold());
    output.push_str(&rule());
    output.push('\n');
    for sub in subcategories {
        output.push_str(&format!("- {sub}\n"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{cospend_in, detailed_in, summarize_in, Granularity};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn completed(id: u64, category: &str, sub: Option<&str>, minutes: i64) -> Session {
        let mut s = Session::new(
            id,
            category.to_string(),
            sub.map(str::to_string),
            "notes".to_string(),
            t0(),
        );
        s.stop(t0() + Duration::minutes(minutes));
        s
    }

    #[test]
    fn test_status_idle() {
        colored::control::set_override(false);
        let out = format_status_pretty(None, t0());
        assert!(out.contains("No active timer"));
    }

    #[test]
    fn test_session_pretty_shows_label_and_duration() {
        colored::control::set_override(false);
        let out = format_session_pretty(&completed(4, "Sales", Some("CRM work"), 90), t0());
        assert!(out.contains("Sales - CRM work"));
        assert!(out.contains("01:30:00"));
        assert!(out.contains("Stopped"));
    }

    #[test]
    fn test_sessions_table_total() {
        colored::control::set_override(false);
        let sessions = [completed(1, "Sales", None, 30), completed(2, "Other", None, 45)];
        let out = format_sessions_pretty(&sessions, "All", t0());
        assert!(out.contains("All (2 sessions)"));
        assert!(out.contains("Total: 01:15:00"));
    }

    #[test]
    fn test_empty_lists() {
        assert!(format_sessions_pretty(&[], "Today", t0()).contains("No sessions"));
        assert!(format_categories_pretty(&Categories::empty()).contains("No categories"));
        assert!(format_subcategories_pretty("Sales", &[]).contains("No subcategories"));
    }

    #[test]
    fn test_report_pretty_lists_categories() {
        colored::control::set_override(false);
        let sessions = [
            completed(1, "Sales", Some("CRM work"), 90),
            completed(2, "Marketing", None, 30),
        ];
        let report = summarize_in(&sessions, Granularity::Day, &Utc, t0());
        let out = format_report_pretty(&report, "Today");

        assert!(out.contains("2024-03-04"));
        assert!(out.find("Sales").unwrap() < out.find("Marketing").unwrap());
        assert!(out.contains("(none)"));
        assert!(out.contains("Total Hours: 2.00h"));
    }

    #[test]
    fn test_detailed_and_cospend() {
        colored::control::set_override(false);
        let sessions = [completed(1, "Sales", Some("CRM work"), 90)];

        let detailed = format_detailed_pretty(&detailed_in(&sessions, &Utc, t0()), "All");
        assert!(detailed.contains("1.50h"));
        assert!(detailed.contains("Total Hours: 1.500h"));

        let cospend = format_cospend_pretty(&cospend_in(&sessions, &Utc, t0()), "All");
        assert!(cospend.contains("Date: 2024-03-04"));
        assert!(cospend.contains("Sales - CRM work: notes (1.50)"));
    }
}
