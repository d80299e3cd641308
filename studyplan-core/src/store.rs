//! Repository contracts for tasks and sessions, plus an in-memory backend.
//!
//! Invariants:
//! - Ids come from a per-collection monotonic counter, never reused.
//! - Counter bump and map insert happen under the same lock.
//! - List operations return records in ascending id order.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::session::{NewSession, Session, SessionId};
use crate::task::{NewTask, Task, TaskId, TaskPatch, ValidationPolicy};

pub trait TaskStore {
    fn create_task(&self, task: NewTask) -> StoreResult<Task>;
    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>>;
    fn list_tasks(&self) -> StoreResult<Vec<Task>>;
    fn update_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task>;
    fn set_done(&self, id: TaskId, done: bool) -> StoreResult<Task>;

    fn list_pending_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.list_tasks()?.into_iter().filter(Task::is_pending).collect())
    }

    fn toggle_done(&self, id: TaskId) -> StoreResult<Task> {
        let task = self.get_task(id)?.ok_or(StoreError::NotFound(id))?;
        self.set_done(id, !task.done)
    }
}

pub trait SessionStore {
    fn create_session(&self, session: NewSession) -> StoreResult<Session>;
    fn list_sessions(&self) -> StoreResult<Vec<Session>>;

    fn list_sessions_on_or_after(&self, day: NaiveDate) -> StoreResult<Vec<Session>> {
        Ok(self
            .list_sessions()?
            .into_iter()
            .filter(|s| s.is_on_or_after(day))
            .collect())
    }
}

impl<T: TaskStore + ?Sized> TaskStore for &T {
    fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        (**self).create_task(task)
    }
    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        (**self).get_task(id)
    }
    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        (**self).list_tasks()
    }
    fn update_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        (**self).update_task(id, patch)
    }
    fn set_done(&self, id: TaskId, done: bool) -> StoreResult<Task> {
        (**self).set_done(id, done)
    }
    fn list_pending_tasks(&self) -> StoreResult<Vec<Task>> {
        (**self).list_pending_tasks()
    }
    fn toggle_done(&self, id: TaskId) -> StoreResult<Task> {
        (**self).toggle_done(id)
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn create_session(&self, session: NewSession) -> StoreResult<Session> {
        (**self).create_session(session)
    }
    fn list_sessions(&self) -> StoreResult<Vec<Session>> {
        (**self).list_sessions()
    }
    fn list_sessions_on_or_after(&self, day: NaiveDate) -> StoreResult<Vec<Session>> {
        (**self).list_sessions_on_or_after(day)
    }
}

/// Both collections plus their id counters. Shared by the in-memory and
/// JSON-file backends.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub(crate) struct Collections {
    #[serde(default)]
    pub next_task_id: u64,
    #[serde(default)]
    pub next_session_id: u64,
    #[serde(default)]
    pub tasks: BTreeMap<TaskId, Task>,
    #[serde(default)]
    pub sessions: BTreeMap<SessionId, Session>,
}

impl Collections {
    pub fn insert_task(&mut self, task: NewTask, policy: ValidationPolicy) -> StoreResult<Task> {
        task.validate(policy)?;
        // Documents written by hand may lack counters; never go below the max id.
        let floor = self.tasks.keys().next_back().map_or(0, |id| id.0);
        self.next_task_id = self.next_task_id.max(floor) + 1;
        let task = task.into_task(TaskId(self.next_task_id));
        self.tasks.insert(task.id, task.clone());
        debug!(task_id = %task.id, title = %task.title, "task created");
        Ok(task)
    }

    pub fn insert_session(&mut self, session: NewSession) -> StoreResult<Session> {
        session.validate()?;
        let floor = self.sessions.keys().next_back().map_or(0, |id| id.0);
        self.next_session_id = self.next_session_id.max(floor) + 1;
        let session = session.into_session(SessionId(self.next_session_id));
        self.sessions.insert(session.id, session.clone());
        debug!(session_id = %session.id, date = %session.date, "session logged");
        Ok(session)
    }

    pub fn patch_task(&mut self, id: TaskId, patch: TaskPatch, policy: ValidationPolicy) -> StoreResult<Task> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        task.apply(patch, policy)?;
        debug!(task_id = %id, "task updated");
        Ok(task.clone())
    }

    pub fn mark(&mut self, id: TaskId, done: bool) -> StoreResult<Task> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        task.done = done;
        debug!(task_id = %id, done, "task status changed");
        Ok(task.clone())
    }
}

/// Process-local store. Cheap to build in tests; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Collections>,
    policy: ValidationPolicy,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self {
            inner: Mutex::default(),
            policy,
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Collections>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

impl TaskStore for InMemoryStore {
    fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        self.lock()?.insert_task(task, self.policy)
    }

    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.lock()?.tasks.get(&id).cloned())
    }

    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.lock()?.tasks.values().cloned().collect())
    }

    fn update_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        self.lock()?.patch_task(id, patch, self.policy)
    }

    fn set_done(&self, id: TaskId, done: bool) -> StoreResult<Task> {
        self.lock()?.mark(id, done)
    }

    fn toggle_done(&self, id: TaskId) -> StoreResult<Task> {
        let mut guard = self.lock()?;
        let done = guard.tasks.get(&id).ok_or(StoreError::NotFound(id))?.done;
        guard.mark(id, !done)
    }
}

impl SessionStore for InMemoryStore {
    fn create_session(&self, session: NewSession) -> StoreResult<Session> {
        self.lock()?.insert_session(session)
    }

    fn list_sessions(&self) -> StoreResult<Vec<Session>> {
        Ok(self.lock()?.sessions.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::session::EnergyLevel;
    use std::sync::Arc;
    use std::thread;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let store = InMemoryStore::new();
        let a = store.create_task(NewTask::new("a", day(1), 1.0)).unwrap();
        let b = store.create_task(NewTask::new("b", day(2), 1.0)).unwrap();
        assert_eq!((a.id, b.id), (TaskId(1), TaskId(2)));
        assert!(!a.done);

        let s = store
            .create_session(NewSession::new("u1", day(1), EnergyLevel::Score(3.0), 2.0))
            .unwrap();
        assert_eq!(s.id, SessionId(1));
    }

    #[test]
    fn rejected_task_consumes_no_id() {
        let store = InMemoryStore::new();
        let err = store.create_task(NewTask::new("", day(1), 1.0)).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyTitle)));
        assert!(store.list_tasks().unwrap().is_empty());

        let ok = store.create_task(NewTask::new("x", day(1), 1.0)).unwrap();
        assert_eq!(ok.id, TaskId(1));
    }

    #[test]
    fn strict_policy_rejects_zero_estimate() {
        let store = InMemoryStore::with_policy(ValidationPolicy::strict());
        let err = store.create_task(NewTask::new("x", day(1), 0.0)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::NonPositiveEstimate(_))
        ));
    }

    #[test]
    fn pending_excludes_done() {
        let store = InMemoryStore::new();
        let a = store.create_task(NewTask::new("a", day(1), 1.0)).unwrap();
        store.create_task(NewTask::new("b", day(2), 1.0)).unwrap();
        store.set_done(a.id, true).unwrap();

        let pending: Vec<_> = store
            .list_pending_tasks()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(pending, vec!["b"]);
    }

    #[test]
    fn toggle_flips_and_unknown_is_not_found() {
        let store = InMemoryStore::new();
        let a = store.create_task(NewTask::new("a", day(1), 1.0)).unwrap();
        assert!(store.toggle_done(a.id).unwrap().done);
        assert!(!store.toggle_done(a.id).unwrap().done);
        assert!(matches!(store.toggle_done(TaskId(99)), Err(StoreError::NotFound(TaskId(99)))));
    }

    #[test]
    fn sessions_filtered_by_date_inclusive() {
        let store = InMemoryStore::new();
        for d in [3, 5, 4, 6] {
            store
                .create_session(NewSession::new("u1", day(d), EnergyLevel::Label("ok".into()), 1.0))
                .unwrap();
        }
        let dates: Vec<_> = store
            .list_sessions_on_or_after(day(4))
            .unwrap()
            .into_iter()
            .map(|s| s.date)
            .collect();
        assert_eq!(dates, vec![day(5), day(4), day(6)]);
    }

    #[test]
    fn concurrent_creates_get_unique_ids() {
        let store = Arc::new(InMemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..25 {
                        store
                            .create_task(NewTask::new(format!("t{i}-{j}"), day(1), 1.0))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let ids: Vec<_> = store.list_tasks().unwrap().into_iter().map(|t| t.id.0).collect();
        assert_eq!(ids, (1..=200).collect::<Vec<_>>());
    }
}
