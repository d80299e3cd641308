//! JSON-file repository.
//!
//! The whole document is read, mutated and rewritten on every write. A
//! missing file is an empty store. There is no journaling: a crash mid-write
//! can lose the last change.

use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::session::{NewSession, Session};
use crate::store::{Collections, SessionStore, TaskStore};
use crate::task::{NewTask, Task, TaskId, TaskPatch, ValidationPolicy};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    policy: ValidationPolicy,
    // Serializes read-modify-write cycles within this process.
    gate: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_policy(path, ValidationPolicy::lenient())
    }

    pub fn with_policy(path: impl Into<PathBuf>, policy: ValidationPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            gate: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn gate(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.gate
            .lock()
            .map_err(|_| StoreError::Unavailable(format!("lock poisoned for {}", self.path.display())))
    }

    fn load(&self) -> StoreResult<Collections> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Collections::default()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Collections::default());
        }
        trace!(path = %self.path.display(), bytes = raw.len(), "store loaded");
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, doc: &Collections) -> StoreResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> StoreResult<T> {
        let _g = self.gate()?;
        Ok(f(&self.load()?))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Collections) -> StoreResult<T>) -> StoreResult<T> {
        let _g = self.gate()?;
        let mut doc = self.load()?;
        let out = f(&mut doc)?;
        self.save(&doc)?;
        Ok(out)
    }
}

impl TaskStore for JsonFileStore {
    fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let policy = self.policy;
        self.write(|doc| doc.insert_task(task, policy))
    }

    fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        self.read(|doc| doc.tasks.get(&id).cloned())
    }

    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.read(|doc| doc.tasks.values().cloned().collect())
    }

    fn update_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        let policy = self.policy;
        self.write(|doc| doc.patch_task(id, patch, policy))
    }

    fn set_done(&self, id: TaskId, done: bool) -> StoreResult<Task> {
        self.write(|doc| doc.mark(id, done))
    }

    fn toggle_done(&self, id: TaskId) -> StoreResult<Task> {
        self.write(|doc| {
            let done = doc.tasks.get(&id).ok_or(StoreError::NotFound(id))?.done;
            doc.mark(id, !done)
        })
    }
}

impl SessionStore for JsonFileStore {
    fn create_session(&self, session: NewSession) -> StoreResult<Session> {
        self.write(|doc| doc.insert_session(session))
    }

    fn list_sessions(&self) -> StoreResult<Vec<Session>> {
        self.read(|doc| doc.sessions.values().cloned().collect())
    }

    fn list_sessions_on_or_after(&self, day: NaiveDate) -> StoreResult<Vec<Session>> {
        self.read(|doc| {
            doc.sessions
                .values()
                .filter(|s| s.is_on_or_after(day))
                .cloned()
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EnergyLevel;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nope.json"));
        assert!(store.list_tasks().unwrap().is_empty());
        assert!(store.list_sessions().unwrap().is_empty());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        {
            let store = JsonFileStore::open(&path);
            let t = store.create_task(NewTask::new("essay", day(2), 2.0)).unwrap();
            store.set_done(t.id, true).unwrap();
            store.create_task(NewTask::new("lab", day(3), 1.0)).unwrap();
            store
                .create_session(NewSession::new("u1", day(2), EnergyLevel::Label("high".into()), 3.0))
                .unwrap();
        }

        let store = JsonFileStore::open(&path);
        let tasks = store.list_tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].done);
        assert_eq!(store.list_pending_tasks().unwrap()[0].title, "lab");

        let next = store.create_task(NewTask::new("quiz", day(4), 0.5)).unwrap();
        assert_eq!(next.id, TaskId(3));
        assert_eq!(
            store.list_sessions().unwrap()[0].energy_level,
            EnergyLevel::Label("high".into())
        );
    }

    #[test]
    fn document_uses_id_keyed_maps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path);
        store.create_task(NewTask::new("essay", day(2), 2.0)).unwrap();

        let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["tasks"]["1"]["title"], "essay");
        assert_eq!(v["tasks"]["1"]["due_date"], "2026-05-02");
        assert_eq!(v["next_task_id"], 1);
    }

    #[test]
    fn hand_written_document_without_counters_keeps_ids_unique() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(
            &path,
            r#"{"tasks":{"4":{"id":4,"title":"old","due_date":"2026-05-01","estimated_time":1.0}}}"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path);
        let t = store.create_task(NewTask::new("new", day(2), 1.0)).unwrap();
        assert_eq!(t.id, TaskId(5));
    }

    #[test]
    fn sessions_filtered_by_date_inclusive_in_id_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json"));
        for d in [6, 3, 4, 5, 2] {
            store
                .create_session(NewSession::new("u1", day(d), EnergyLevel::Score(2.0), 1.0))
                .unwrap();
        }

        let kept: Vec<_> = store
            .list_sessions_on_or_after(day(4))
            .unwrap()
            .into_iter()
            .map(|s| (s.id.0, s.date))
            .collect();
        assert_eq!(kept, vec![(1, day(6)), (3, day(4)), (4, day(5))]);
        assert!(store.list_sessions_on_or_after(day(7)).unwrap().is_empty());
        assert_eq!(store.list_sessions_on_or_after(day(1)).unwrap().len(), 5);
    }

    #[test]
    fn garbage_file_reports_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert!(matches!(store.list_pending_tasks(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn failed_write_leaves_document_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path);
        store.create_task(NewTask::new("a", day(1), 1.0)).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        assert!(store.update_task(TaskId(1), TaskPatch {
            title: Some("  ".into()),
            ..Default::default()
        })
        .is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
