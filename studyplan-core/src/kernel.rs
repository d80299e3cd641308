//! Planning kernel: the scheduling entry point.
//!
//! Wires the repositories to the pure scheduler. The kernel owns no state of
//! its own; each `plan` call reads one snapshot from each store.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::StoreResult;
use crate::scheduler::{generate, Schedule};
use crate::store::{SessionStore, TaskStore};
use crate::time::today_in;

#[derive(Debug, Clone)]
pub struct PlanningKernel<T: TaskStore, S: SessionStore> {
    tasks: T,
    sessions: S,
}

impl<T: TaskStore, S: SessionStore> PlanningKernel<T, S> {
    pub fn new(tasks: T, sessions: S) -> Self {
        Self { tasks, sessions }
    }

    pub fn tasks(&self) -> &T {
        &self.tasks
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Produce the schedule for `today`.
    ///
    /// Store failures propagate as-is; no partial schedule is returned.
    pub fn plan(&self, today: NaiveDate) -> StoreResult<Schedule> {
        let sessions = self.sessions.list_sessions_on_or_after(today)?;
        let pending = self.tasks.list_pending_tasks()?;

        let entries = generate(today, &sessions, &pending);
        debug!(
            %today,
            sessions = sessions.len(),
            pending = pending.len(),
            entries = entries.len(),
            "schedule generated"
        );

        Ok(Schedule::from(entries))
    }

    /// Same as [`plan`](Self::plan), with "today" taken as the calendar date
    /// of `now` in `tz`.
    pub fn plan_for_tz(&self, tz: Tz, now: DateTime<Utc>) -> StoreResult<Schedule> {
        self.plan(today_in(tz, now))
    }
}
