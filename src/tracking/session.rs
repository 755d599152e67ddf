//! Session records and lifecycle.
//!
//! A session is created running, may be paused and resumed any number of
//! times, and is stopped exactly once. State is derived from the record
//! itself so a reloaded log always agrees with what was saved.

use chrono::{DateTime, Datelike, Duration, IsoWeek, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimetrackError;

/// Identifier of a session. Assigned by the store, never reused.
pub type SessionId = u64;

/// State of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Timer is running
    Running,
    /// Timer is paused
    Paused,
    /// Session has ended
    Stopped,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

/// A span during which the timer was paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PauseInterval {
    /// When the pause began
    pub paused_at: DateTime<Utc>,
    /// When the timer resumed (None while still paused)
    pub resumed_at: Option<DateTime<Utc>>,
}

impl PauseInterval {
    /// Paused time within `[start, end]`, never negative.
    #[must_use]
    pub fn clamped_span(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
        let from = self.paused_at.max(start);
        let to = self.resumed_at.unwrap_or(end).min(end);
        (to - from).max(Duration::zero())
    }
}

/// A tracked work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Session {
    /// Session ID
    pub id: SessionId,
    /// Category name (canonical spelling)
    pub category: String,
    /// Optional subcategory name
    pub subcategory: Option<String>,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// When the session started
    pub start: DateTime<Utc>,
    /// When the session ended (None while active)
    pub end: Option<DateTime<Utc>>,
    /// Pause intervals in chronological order
    #[serde(default)]
    pub pauses: Vec<PauseInterval>,
}

impl Session {
    /// Create a running session.
    #[must_use]
    pub fn new(
        id: SessionId,
        category: String,
        subcategory: Option<String>,
        description: String,
        start: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            category,
            subcategory,
            description,
            start,
            end: None,
            pauses: Vec::new(),
        }
    }

    /// Current state, derived from `end` and the last pause interval.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.end.is_some() {
            SessionState::Stopped
        } else if self.open_pause().is_some() {
            SessionState::Paused
        } else {
            SessionState::Running
        }
    }

    /// Check if the session is active (running or paused).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.end.is_none()
    }

    fn open_pause(&self) -> Option<&PauseInterval> {
        self.pauses.last().filter(|p| p.resumed_at.is_none())
    }

    /// Open a pause interval at `at`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPaused` if a pause is open, `InvalidRange` if the
    /// session has ended. A timestamp earlier than the last recorded event
    /// is moved up to it.
    pub fn pause(&mut self, at: DateTime<Utc>) -> Result<(), TimetrackError> {
        match self.state() {
            SessionState::Paused => return Err(TimetrackError::AlreadyPaused(self.id)),
            SessionState::Stopped => {
                return Err(TimetrackError::InvalidRange(format!(
                    "session {} has already ended",
                    self.id
                )))
            }
            SessionState::Running => {}
        }
        let at = at.max(self.last_event());
        self.pauses.push(PauseInterval {
            paused_at: at,
            resumed_at: None,
        });
        Ok(())
    }

    /// Close the open pause interval at `at`.
    ///
    /// # Errors
    ///
    /// Returns `NotPaused` if the session is not paused.
    pub fn resume(&mut self, at: DateTime<Utc>) -> Result<(), TimetrackError> {
        let id = self.id;
        let ended = self.end.is_some();
        match self.pauses.last_mut() {
            Some(pause) if pause.resumed_at.is_none() && !ended => {
                pause.resumed_at = Some(at.max(pause.paused_at));
                Ok(())
            }
            _ => Err(TimetrackError::NotPaused(id)),
        }
    }

    /// End the session at `at`, closing any open pause.
    pub fn stop(&mut self, at: DateTime<Utc>) {
        let at = at.max(self.last_event());
        if let Some(pause) = self.pauses.last_mut() {
            if pause.resumed_at.is_none() {
                pause.resumed_at = Some(at);
            }
        }
        self.end = Some(at);
    }

    /// Latest timestamp recorded on this session.
    fn last_event(&self) -> DateTime<Utc> {
        self.pauses
            .last()
            .map_or(self.start, |p| p.resumed_at.unwrap_or(p.paused_at))
            .max(self.start)
    }

    /// Total paused time, with open pauses and active sessions measured up to `now`.
    #[must_use]
    pub fn paused_duration_at(&self, now: DateTime<Utc>) -> Duration {
        let end = self.end.unwrap_or(now).max(self.start);
        self.pauses
            .iter()
            .map(|p| p.clamped_span(self.start, end))
            .fold(Duration::zero(), |acc, d| acc + d)
    }

    /// Active (non-paused) duration, measuring an active session up to `now`.
    #[must_use]
    pub fn duration_at(&self, now: DateTime<Utc>) -> Duration {
        let end = self.end.unwrap_or(now).max(self.start);
        ((end - self.start) - self.paused_duration_at(now)).max(Duration::zero())
    }

    /// Active duration as of the current time.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration_at(Utc::now())
    }

    /// Move the end of a finished session so its active duration is `duration`.
    ///
    /// Active time is counted from the start, skipping pauses. The end lands
    /// where `duration` of it has elapsed; pauses that begin at or after the
    /// new end are dropped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` if the session is active or `duration` is
    /// negative, `InvalidInput` if the new end is out of range.
    pub fn set_active_duration(&mut self, duration: Duration) -> Result<(), TimetrackError> {
        if self.is_active() {
            return Err(TimetrackError::InvalidRange(format!(
                "session {} is still active; stop it instead of setting an end",
                self.id
            )));
        }
        if duration < Duration::zero() {
            return Err(TimetrackError::InvalidRange(
                "duration cannot be negative".to_string(),
            ));
        }

        let mut cursor = self.start;
        let mut remaining = duration;
        let mut kept = 0;
        for pause in &self.pauses {
            let stretch = (pause.paused_at - cursor).max(Duration::zero());
            if remaining <= stretch {
                break;
            }
            remaining = remaining - stretch;
            cursor = pause.resumed_at.unwrap_or(pause.paused_at).max(cursor);
            kept += 1;
        }

        let end = cursor.checked_add_signed(remaining).ok_or_else(|| {
            TimetrackError::InvalidInput(format!("duration of {duration} is out of range"))
        })?;
        self.pauses.truncate(kept);
        self.end = Some(end);
        Ok(())
    }

    /// Check the record's range invariants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` describing the first violation found.
    pub fn validate(&self) -> Result<(), TimetrackError> {
        let id = self.id;
        if let Some(end) = self.end {
            if end < self.start {
                return Err(TimetrackError::InvalidRange(format!(
                    "session {id} ends before it starts"
                )));
            }
        }

        let mut cursor = self.start;
        let last = self.pauses.len().saturating_sub(1);
        for (i, pause) in self.pauses.iter().enumerate() {
            if pause.paused_at < cursor {
                return Err(TimetrackError::InvalidRange(format!(
                    "session {id} has a pause that overlaps its start or a previous pause"
                )));
            }
            match pause.resumed_at {
                Some(resumed) if resumed < pause.paused_at => {
                    return Err(TimetrackError::InvalidRange(format!(
                        "session {id} has a pause that resumes before it begins"
                    )));
                }
                Some(resumed) => cursor = resumed,
                None if i != last || self.end.is_some() => {
                    return Err(TimetrackError::InvalidRange(format!(
                        "session {id} has an unterminated pause"
                    )));
                }
                None => cursor = pause.paused_at,
            }
        }

        if let Some(end) = self.end {
            if cursor > end {
                return Err(TimetrackError::InvalidRange(format!(
                    "session {id} has a pause after its end"
                )));
            }
        }
        Ok(())
    }

    /// "Category - Subcategory", or just the category.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.subcategory {
            Some(sub) => format!("{} - {sub}", self.category),
            None => self.category.clone(),
        }
    }

    /// Get start time in local timezone.
    #[must_use]
    pub fn start_local(&self) -> DateTime<Local> {
        self.start.with_timezone(&Local)
    }

    /// Get end time in local timezone.
    #[must_use]
    pub fn end_local(&self) -> Option<DateTime<Local>> {
        self.end.map(|t| t.with_timezone(&Local))
    }

    /// ISO week of the local start date.
    #[must_use]
    pub fn iso_week(&self) -> IsoWeek {
        self.start_local().iso_week()
    }
}
