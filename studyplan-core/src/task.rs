//! Task model: the unit of work the planner allocates into sessions.
//!
//! Storage lives behind `crate::store`; this module only knows the record
//! shape and the submission/edit validation rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,

    /// Hours.
    pub estimated_time: f64,

    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Builds a record directly, bypassing a store. Mostly useful for fixtures.
    pub fn new(id: u64, title: impl Into<String>, due_date: NaiveDate, estimated_time: f64) -> Self {
        Self {
            id: TaskId(id),
            title: title.into(),
            description: String::new(),
            due_date,
            estimated_time,
            done: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn is_pending(&self) -> bool {
        !self.done
    }

    /// Apply an edit in place, then re-check the record.
    pub fn apply(&mut self, patch: TaskPatch, policy: ValidationPolicy) -> Result<(), ValidationError> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = title;
        }
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(due_date) = patch.due_date {
            next.due_date = due_date;
        }
        if let Some(hours) = patch.estimated_time {
            next.estimated_time = hours;
        }
        check_fields(&next.title, next.estimated_time, policy)?;
        *self = next;
        Ok(())
    }
}

/// Whether non-positive estimates are accepted at creation/edit time.
///
/// Lenient (the default) keeps them: the scheduler treats such tasks as free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationPolicy {
    pub reject_non_positive_estimates: bool,
}

impl ValidationPolicy {
    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            reject_non_positive_estimates: true,
        }
    }
}

/// Task submission. The id and `done` flag are owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    pub estimated_time: f64,
}

impl NewTask {
    pub fn new(title: impl Into<String>, due_date: NaiveDate, estimated_time: f64) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date,
            estimated_time,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self, policy: ValidationPolicy) -> Result<(), ValidationError> {
        check_fields(&self.title, self.estimated_time, policy)
    }

    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            estimated_time: self.estimated_time,
            done: false,
        }
    }
}

/// Partial edit of a task. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub estimated_time: Option<f64>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.estimated_time.is_none()
    }
}

fn check_fields(title: &str, estimated_time: f64, policy: ValidationPolicy) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if !estimated_time.is_finite() {
        return Err(ValidationError::NonFiniteHours("estimated_time"));
    }
    if policy.reject_non_positive_estimates && estimated_time <= 0.0 {
        return Err(ValidationError::NonPositiveEstimate(estimated_time));
    }
    Ok(())
}
