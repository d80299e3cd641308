//! studyplan-core: task/session model, repositories and the session scheduler.

pub mod error;
pub mod file_store;
pub mod import;
pub mod kernel;
pub mod listing;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod task;
pub mod time;

pub use error::{StoreError, StoreResult, ValidationError};
pub use file_store::JsonFileStore;
pub use import::{import_tasks_csv, parse_tasks_csv, ImportError};
pub use kernel::PlanningKernel;
pub use listing::{progress, view, Progress, TaskFilter, TaskSort};
pub use scheduler::{generate, Schedule, ScheduleEntry};
pub use session::{EnergyLevel, NewSession, Session, SessionId};
pub use store::{InMemoryStore, SessionStore, TaskStore};
pub use task::{NewTask, Task, TaskId, TaskPatch, ValidationPolicy};
