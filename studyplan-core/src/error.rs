//! Error types shared by the model and repository layers.

use thiserror::Error;

use crate::task::TaskId;

/// A submission or edit that cannot be stored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("user_id must not be empty")]
    EmptyUserId,

    #[error("{0} must be a finite number")]
    NonFiniteHours(&'static str),

    #[error("estimated_time must be positive (got {0})")]
    NonPositiveEstimate(f64),

    #[error("available_hours must not be negative (got {0})")]
    NegativeCapacity(f64),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The store cannot serve requests (e.g. a writer panicked mid-update).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store io: {0}")]
    Io(#[from] std::io::Error),

    #[error("store document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
