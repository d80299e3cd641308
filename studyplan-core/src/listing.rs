//! Task listing views: filter, sort, and completion progress.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskFilter {
    #[default]
    All,
    Done,
    NotDone,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Done => task.done,
            TaskFilter::NotDone => !task.done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskSort {
    #[default]
    DueDate,
    EstimatedTime,
    Title,
}

/// Filter then stable-sort. Input order breaks ties.
pub fn view(tasks: &[Task], filter: TaskFilter, sort: TaskSort) -> Vec<Task> {
    let mut out: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    match sort {
        TaskSort::DueDate => out.sort_by_key(|t| t.due_date),
        TaskSort::EstimatedTime => out.sort_by(|a, b| {
            a.estimated_time
                .partial_cmp(&b.estimated_time)
                .unwrap_or(Ordering::Equal)
        }),
        TaskSort::Title => out.sort_by_cached_key(|t| t.title.to_lowercase()),
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// 0-100, rounded.
    pub percent: u8,
}

pub fn progress(tasks: &[Task]) -> Progress {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.done).count();
    let percent = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u8
    };
    Progress {
        completed,
        total,
        percent,
    }
}
