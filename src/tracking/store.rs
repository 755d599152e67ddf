//! Session store.
//!
//! Owns the session log and category configuration for the duration of one
//! invocation. Every mutating operation rewrites `sessions.json` in full
//! (load, modify, save); there is no append log. An exclusive lock on the
//! data directory is held from `open` until the store is dropped.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::categories::Categories;
use super::filter::SessionFilter;
use super::session::{Session, SessionId, SessionState};
use crate::config::Paths;
use crate::core::backdate;
use crate::error::TimetrackError;
use crate::storage::{self, DataLock};

/// The persisted session collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionLog {
    /// Next ID to assign
    #[serde(default = "first_id")]
    pub next_id: SessionId,
    /// The active (running or paused) session, if any
    pub active: Option<SessionId>,
    /// All sessions, in insertion order
    pub sessions: Vec<Session>,
}

const fn first_id() -> SessionId {
    1
}

impl Default for SessionLog {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            active: None,
            sessions: Vec::new(),
        }
    }
}

impl SessionLog {
    /// Check structural invariants, repairing only `next_id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageRead` naming `path` on duplicate IDs, invalid ranges,
    /// or an active pointer that disagrees with the records.
    fn validate(&mut self, path: &Path) -> Result<(), TimetrackError> {
        let mut seen = HashSet::new();
        for session in &self.sessions {
            if !seen.insert(session.id) {
                return Err(TimetrackError::read(
                    path,
                    format!("duplicate session id {}", session.id),
                ));
            }
            session
                .validate()
                .map_err(|e| TimetrackError::read(path, e))?;
        }

        let open: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.id)
            .collect();

        match (self.active, open.as_slice()) {
            (None, []) => {}
            (Some(active), [only]) if active == *only => {}
            (Some(active), []) => {
                return Err(TimetrackError::read(
                    path,
                    format!("active session {active} is missing or already ended"),
                ));
            }
            _ => {
                return Err(TimetrackError::read(
                    path,
                    format!(
                        "active pointer {:?} does not match unfinished sessions {open:?}",
                        self.active
                    ),
                ));
            }
        }

        let max_id = self.sessions.iter().map(|s| s.id).max().unwrap_or(0);
        let after_max = max_id.checked_add(1).ok_or_else(|| {
            TimetrackError::read(path, format!("session id {max_id} leaves no ids to assign"))
        })?;
        self.next_id = self.next_id.max(after_max);
        Ok(())
    }

    fn allocate_id(&mut self) -> Result<SessionId, TimetrackError> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| TimetrackError::InvalidInput("no session ids left to assign".to_string()))?;
        Ok(id)
    }

    fn position(&self, id: SessionId) -> Result<usize, TimetrackError> {
        self.sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or(TimetrackError::NotFound(id))
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// The active session, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Session> {
        self.active.and_then(|id| self.get(id))
    }

    fn active_mut(&mut self) -> Result<&mut Session, TimetrackError> {
        let id = self.active.ok_or(TimetrackError::NoActiveSession)?;
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TimetrackError::NoActiveSession)
    }
}

/// Field changes applied by [`SessionStore::edit`].
#[derive(Debug, Clone, Default)]
pub struct SessionEdit {
    /// New category
    pub category: Option<String>,
    /// New subcategory; `Some(None)` clears it
    pub subcategory: Option<Option<String>>,
    /// New description
    pub description: Option<String>,
    /// New start time
    pub start: Option<DateTime<Utc>>,
    /// New end time
    pub end: Option<DateTime<Utc>>,
    /// New active duration; moves the end time
    pub duration: Option<Duration>,
}

impl SessionEdit {
    /// Check if no fields would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.subcategory.is_none()
            && self.description.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.duration.is_none()
    }
}

/// JSON-backed session store.
#[derive(Debug)]
pub struct SessionStore {
    paths: Paths,
    log: SessionLog,
    categories: Categories,
    _lock: DataLock,
}

impl SessionStore {
    /// Lock the data directory and load the session log and categories.
    ///
    /// # Errors
    ///
    /// Returns `StorageRead` if either file is malformed, `StorageWrite` if
    /// the lock cannot be taken.
    pub fn open(paths: &Paths) -> Result<Self, TimetrackError> {
        paths.ensure_dirs()?;
        let lock = DataLock::acquire(&paths.lock)?;

        let mut log: SessionLog = storage::read_json(&paths.sessions)?.unwrap_or_default();
        log.validate(&paths.sessions)?;
        let categories = Categories::load(&paths.categories)?;

        tracing::debug!(
            sessions = log.sessions.len(),
            active = ?log.active,
            categories = categories.len(),
            "opened session store"
        );

        Ok(Self {
            paths: paths.clone(),
            log,
            categories,
            _lock: lock,
        })
    }

    fn save(&self) -> Result<(), TimetrackError> {
        storage::write_json_atomic(&self.paths.sessions, &self.log)
    }

    fn save_categories(&self) -> Result<(), TimetrackError> {
        self.categories.save(&self.paths.categories)
    }

    /// The loaded session log.
    #[must_use]
    pub const fn log(&self) -> &SessionLog {
        &self.log
    }

    /// The loaded category configuration.
    #[must_use]
    pub const fn categories(&self) -> &Categories {
        &self.categories
    }

    /// The active session, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Session> {
        self.log.active()
    }

    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent.
    pub fn get(&self, id: SessionId) -> Result<&Session, TimetrackError> {
        self.log.get(id).ok_or(TimetrackError::NotFound(id))
    }

    fn ensure_idle(&self) -> Result<(), TimetrackError> {
        match self.log.active() {
            Some(active) => Err(TimetrackError::AlreadyRunning {
                id: active.id,
                label: active.label(),
            }),
            None => Ok(()),
        }
    }

    /// Start a session `offset` before now.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` if a session is active, `InvalidCategory` if
    /// the category or subcategory is unknown, `InvalidInput` if the offset
    /// reaches outside the supported date range.
    pub fn start(
        &mut self,
        category: &str,
        subcategory: Option<&str>,
        description: &str,
        offset: Duration,
    ) -> Result<SessionId, TimetrackError> {
        self.start_at(category, subcategory, description, backdate(Utc::now(), offset)?)
    }

    /// Start a session at `started`.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::start`].
    pub fn start_at(
        &mut self,
        category: &str,
        subcategory: Option<&str>,
        description: &str,
        started: DateTime<Utc>,
    ) -> Result<SessionId, TimetrackError> {
        self.ensure_idle()?;
        let (category, subcategory) = self.categories.resolve(category, subcategory)?;

        let id = self.log.allocate_id()?;
        let session = Session::new(
            id,
            category,
            subcategory,
            description.trim().to_string(),
            started,
        );
        tracing::debug!(id, label = %session.label(), start = %started, "starting session");

        self.log.sessions.push(session);
        self.log.active = Some(id);
        self.save()?;
        Ok(id)
    }

    /// Stop the active session (if any) now, then start a new one `offset` before now.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::switch_at`].
    pub fn switch(
        &mut self,
        category: &str,
        subcategory: Option<&str>,
        description: &str,
        offset: Duration,
    ) -> Result<(Option<Session>, SessionId), TimetrackError> {
        let now = Utc::now();
        self.switch_at(category, subcategory, description, backdate(now, offset)?, now)
    }

    /// Stop the active session (if any) at `now`, then start a new one at `started`.
    ///
    /// Returns the stopped session and the new session's ID.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCategory` if the category or subcategory is unknown;
    /// nothing is stopped in that case.
    pub fn switch_at(
        &mut self,
        category: &str,
        subcategory: Option<&str>,
        description: &str,
        started: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(Option<Session>, SessionId), TimetrackError> {
        self.categories.resolve(category, subcategory)?;

        let stopped = if self.log.active.is_some() {
            let session = self.log.active_mut()?;
            session.stop(now);
            let stopped = session.clone();
            self.log.active = None;
            Some(stopped)
        } else {
            None
        };

        let id = self.start_at(category, subcategory, description, started)?;
        Ok((stopped, id))
    }

    /// Pause the active session now.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession` if none is active, `AlreadyPaused` if it is
    /// already paused.
    pub fn pause(&mut self) -> Result<Session, TimetrackError> {
        self.pause_at(Utc::now())
    }

    /// Pause the active session at `now`.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::pause`].
    pub fn pause_at(&mut self, now: DateTime<Utc>) -> Result<Session, TimetrackError> {
        let session = self.log.active_mut()?;
        session.pause(now)?;
        let paused = session.clone();
        tracing::debug!(id = paused.id, at = %now, "paused session");
        self.save()?;
        Ok(paused)
    }

    /// Resume the paused session now.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession` if none is active, `NotPaused` if it is
    /// running.
    pub fn resume(&mut self) -> Result<Session, TimetrackError> {
        self.resume_at(Utc::now())
    }

    /// Resume the paused session at `now`.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::resume`].
    pub fn resume_at(&mut self, now: DateTime<Utc>) -> Result<Session, TimetrackError> {
        let session = self.log.active_mut()?;
        session.resume(now)?;
        let resumed = session.clone();
        tracing::debug!(id = resumed.id, at = %now, "resumed session");
        self.save()?;
        Ok(resumed)
    }

    /// Stop the active session now.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession` if none is active.
    pub fn stop(&mut self) -> Result<Session, TimetrackError> {
        self.stop_at(Utc::now())
    }

    /// Stop the active session at `now`, closing any open pause.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::stop`].
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Result<Session, TimetrackError> {
        let session = self.log.active_mut()?;
        session.stop(now);
        let stopped = session.clone();
        self.log.active = None;
        tracing::debug!(id = stopped.id, duration_secs = stopped.duration_at(now).num_seconds(), "stopped session");
        self.save()?;
        Ok(stopped)
    }

    /// Insert an already-completed session.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` if `end` precedes `start`, `InvalidCategory` if
    /// the category or subcategory is unknown.
    pub fn add(
        &mut self,
        category: &str,
        subcategory: Option<&str>,
        description: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SessionId, TimetrackError> {
        if end < start {
            return Err(TimetrackError::InvalidRange(format!(
                "end {end} is earlier than start {start}"
            )));
        }
        let (category, subcategory) = self.categories.resolve(category, subcategory)?;

        let id = self.log.allocate_id()?;
        let mut session = Session::new(
            id,
            category,
            subcategory,
            description.trim().to_string(),
            start,
        );
        session.end = Some(end);
        tracing::debug!(id, label = %session.label(), "added session");

        self.log.sessions.push(session);
        self.save()?;
        Ok(id)
    }

    /// Apply `edit` to session `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent, `InvalidCategory` if a changed category
    /// or subcategory is unknown, `InvalidRange` if the result breaks a range
    /// invariant or sets an end on the active session, `InvalidInput` if
    /// both `end` and `duration` are given.
    pub fn edit(&mut self, id: SessionId, edit: &SessionEdit) -> Result<Session, TimetrackError> {
        let index = self.log.position(id)?;
        let mut session = self.log.sessions[index].clone();

        if edit.category.is_some() || edit.subcategory.is_some() {
            let category = edit.category.as_deref().unwrap_or(&session.category);
            let subcategory = match &edit.subcategory {
                Some(sub) => sub.as_deref(),
                None => session.subcategory.as_deref(),
            };
            let (category, subcategory) = self.categories.resolve(category, subcategory)?;
            session.category = category;
            session.subcategory = subcategory;
        }

        if let Some(description) = &edit.description {
            session.description = description.trim().to_string();
        }

        if let Some(start) = edit.start {
            session.start = start;
        }

        if edit.end.is_some() && edit.duration.is_some() {
            return Err(TimetrackError::InvalidInput(
                "give either an end time or a duration, not both".to_string(),
            ));
        }

        if edit.end.is_some() || edit.duration.is_some() {
            if session.is_active() {
                return Err(TimetrackError::InvalidRange(format!(
                    "session {id} is still active; stop it instead of setting an end"
                )));
            }
            if let Some(end) = edit.end {
                session.end = Some(end);
            }
            if let Some(duration) = edit.duration {
                session.set_active_duration(duration)?;
            }
        }

        session.validate()?;

        tracing::debug!(id, "edited session");
        self.log.sessions[index] = session.clone();
        self.save()?;
        Ok(session)
    }

    /// Delete session `id`, clearing the active pointer if it was active.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent.
    pub fn delete(&mut self, id: SessionId) -> Result<Session, TimetrackError> {
        let index = self.log.position(id)?;
        let removed = self.log.sessions.remove(index);
        if self.log.active == Some(id) {
            self.log.active = None;
        }
        tracing::debug!(id, "deleted session");
        self.save()?;
        Ok(removed)
    }

    /// Remove every session matching `filter` (local calendar dates).
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the log cannot be saved.
    pub fn remove_matching(&mut self, filter: &SessionFilter) -> Result<usize, TimetrackError> {
        self.remove_matching_in(filter, &Local)
    }

    /// Remove every session matching `filter`, using `tz` for calendar dates.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the log cannot be saved.
    pub fn remove_matching_in<Tz: TimeZone>(
        &mut self,
        filter: &SessionFilter,
        tz: &Tz,
    ) -> Result<usize, TimetrackError> {
        let before = self.log.sessions.len();
        self.log.sessions.retain(|s| !filter.matches_in(s, tz));
        let removed = before - self.log.sessions.len();

        if let Some(active) = self.log.active {
            if self.log.get(active).is_none() {
                self.log.active = None;
            }
        }

        tracing::debug!(removed, "removed sessions");
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    /// Remove all sessions.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the log cannot be saved.
    pub fn remove_all(&mut self) -> Result<usize, TimetrackError> {
        self.remove_matching_in(&SessionFilter::all(), &Utc)
    }

    /// Remove sessions started on local date `date`.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the log cannot be saved.
    pub fn remove_on_day(&mut self, date: NaiveDate) -> Result<usize, TimetrackError> {
        self.remove_matching(&SessionFilter::on_day(date))
    }

    /// Remove sessions started in ISO week `week` of `year`.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the log cannot be saved.
    pub fn remove_in_week(&mut self, year: i32, week: u32) -> Result<usize, TimetrackError> {
        self.remove_matching(&SessionFilter::in_week(year, week))
    }

    /// Sessions matching `filter` (local calendar dates), oldest first.
    #[must_use]
    pub fn list(&self, filter: &SessionFilter) -> Vec<Session> {
        self.list_in(filter, &Local)
    }

    /// Sessions matching `filter`, using `tz` for calendar dates, oldest first.
    #[must_use]
    pub fn list_in<Tz: TimeZone>(&self, filter: &SessionFilter, tz: &Tz) -> Vec<Session> {
        let mut sessions: Vec<Session> = self
            .log
            .sessions
            .iter()
            .filter(|s| filter.matches_in(s, tz))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));
        sessions
    }

    /// Add a category or extend it with subcategories, and save.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCategory` for blank names, `StorageWrite` if the
    /// configuration cannot be saved.
    pub fn add_category(
        &mut self,
        category: &str,
        subcategories: &[String],
    ) -> Result<Vec<String>, TimetrackError> {
        let added = self.categories.add(category, subcategories)?;
        self.save_categories()?;
        Ok(added)
    }

    /// Remove a category and save. Existing sessions keep their category.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCategory` if unknown, `StorageWrite` if the
    /// configuration cannot be saved.
    pub fn remove_category(&mut self, category: &str) -> Result<String, TimetrackError> {
        let name = self.categories.remove(category)?;
        self.save_categories()?;
        Ok(name)
    }

    /// Remove a subcategory and save.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCategory` if unknown, `StorageWrite` if the
    /// configuration cannot be saved.
    pub fn remove_subcategory(
        &mut self,
        category: &str,
        subcategory: &str,
    ) -> Result<(String, String), TimetrackError> {
        let removed = self.categories.remove_subcategory(category, subcategory)?;
        self.save_categories()?;
        Ok(removed)
    }

    /// State of the active session, or `None` when idle.
    #[must_use]
    pub fn state(&self) -> Option<SessionState> {
        self.active().map(Session::state)
    }
}
