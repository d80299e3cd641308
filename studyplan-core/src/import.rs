//! Bulk task import from CSV.
//!
//! Expected header: `title,description,due_date,estimated_time`.
//! `description` may be empty or the column omitted entirely. Dates are
//! `YYYY-MM-DD`, estimates are hours.

use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::error::StoreError;
use crate::store::TaskStore;
use crate::task::{NewTask, Task};
use crate::time::parse_date;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("reading csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {message}")]
    Row { line: u64, message: String },

    #[error("line {line}: {source}")]
    Store {
        line: u64,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, serde::Deserialize)]
struct Row {
    title: String,
    #[serde(default)]
    description: String,
    due_date: String,
    estimated_time: String,
}

/// Parse every row up front. Nothing is stored if any row is bad.
pub fn parse_tasks_csv(reader: impl Read) -> Result<Vec<(u64, NewTask)>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let row: Row = record.deserialize(Some(&headers))?;
        let due_date = parse_date(&row.due_date).map_err(|e| ImportError::Row {
            line,
            message: e.to_string(),
        })?;
        let estimated_time: f64 = row.estimated_time.parse().map_err(|_| ImportError::Row {
            line,
            message: format!("invalid estimated_time '{}'", row.estimated_time),
        })?;

        out.push((
            line,
            NewTask::new(row.title, due_date, estimated_time).with_description(row.description),
        ));
    }
    Ok(out)
}

/// Parse `path` and create each task in `store`, in file order.
///
/// Rows are validated by the store as they are created; the first rejection
/// stops the import, leaving earlier rows stored.
pub fn import_tasks_csv(store: &impl TaskStore, path: impl AsRef<Path>) -> Result<Vec<Task>, ImportError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    let rows = parse_tasks_csv(file)?;

    let mut created = Vec::with_capacity(rows.len());
    for (line, task) in rows {
        let task = store
            .create_task(task)
            .map_err(|source| ImportError::Store { line, source })?;
        created.push(task);
    }

    info!(path = %path.display(), count = created.len(), "tasks imported");
    Ok(created)
}
