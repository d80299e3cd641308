//! Session scheduler: greedy per-session fill by due date.
//!
//! Algorithm (deterministic, pure):
//! 1) keep sessions dated on or after `today`, in input order
//! 2) for each session, take every pending task
//! 3) stable-sort by due_date ASC (input order breaks ties)
//! 4) walk once with `hours_left = available_hours`:
//!    - stop the session once `hours_left <= 0`
//!    - emit + subtract when the task fits
//!    - otherwise skip and keep walking
//! 5) concatenate per-session entries in session order
//!
//! Tasks are not removed from the pool once placed, so one task can appear
//! under several sessions. A skipped task is never revisited within the same
//! session.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::session::{Session, SessionId};
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub session_id: SessionId,
    /// Title as it was when the schedule was generated.
    pub task_title: String,
    pub planned_hours: f64,
}

/// Response envelope: `{"schedule": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.schedule.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    pub fn entries_for(&self, session_id: SessionId) -> impl Iterator<Item = &ScheduleEntry> {
        self.schedule.iter().filter(move |e| e.session_id == session_id)
    }

    /// Total planned hours for one session.
    pub fn planned_hours_for(&self, session_id: SessionId) -> f64 {
        self.entries_for(session_id).map(|e| e.planned_hours).sum()
    }
}

impl From<Vec<ScheduleEntry>> for Schedule {
    fn from(schedule: Vec<ScheduleEntry>) -> Self {
        Self { schedule }
    }
}

/// Build the schedule for `today` from full store snapshots.
///
/// Neither slice is mutated; calling twice with the same inputs yields the
/// same output.
pub fn generate(today: NaiveDate, sessions: &[Session], tasks: &[Task]) -> Vec<ScheduleEntry> {
    let mut out = Vec::new();

    for session in sessions.iter().filter(|s| s.is_on_or_after(today)) {
        fill_session(session, tasks, &mut out);
    }

    out
}

fn fill_session(session: &Session, tasks: &[Task], out: &mut Vec<ScheduleEntry>) {
    let mut candidates: Vec<&Task> = tasks.iter().filter(|t| t.is_pending()).collect();
    // sort_by_key is stable
    candidates.sort_by_key(|t| t.due_date);

    let mut hours_left = session.available_hours;
    for task in candidates {
        if hours_left <= 0.0 {
            break;
        }
        if task.estimated_time <= hours_left {
            out.push(ScheduleEntry {
                session_id: session.id,
                task_title: task.title.clone(),
                planned_hours: task.estimated_time,
            });
            hours_left -= task.estimated_time;
        }
    }
}
