use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use studyplan_core::{
    import_tasks_csv, progress, view, NewTask, Task, TaskFilter, TaskId, TaskPatch, TaskSort,
    TaskStore,
};
use studyplan_core::time::parse_date;

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task; prints {"success":true,"task_id":N}
    Add {
        #[arg(long)]
        title: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        due: NaiveDate,

        /// Estimated effort in hours
        #[arg(long, allow_hyphen_values = true)]
        hours: f64,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List tasks
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,

        #[arg(long, value_enum, default_value_t = SortArg::DueDate)]
        sort: SortArg,

        /// Print JSON instead of text lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Mark a task as done
    Done { id: u64 },

    /// Flip a task between done and not done
    Toggle { id: u64 },

    /// Edit any subset of a task's fields
    Edit {
        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,

        #[arg(long, allow_hyphen_values = true)]
        hours: Option<f64>,
    },

    /// Bulk-add tasks from a CSV (title,description,due_date,estimated_time)
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Done,
    NotDone,
}

impl From<FilterArg> for TaskFilter {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::All => TaskFilter::All,
            FilterArg::Done => TaskFilter::Done,
            FilterArg::NotDone => TaskFilter::NotDone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    DueDate,
    EstimatedTime,
    Title,
}

impl From<SortArg> for TaskSort {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::DueDate => TaskSort::DueDate,
            SortArg::EstimatedTime => TaskSort::EstimatedTime,
            SortArg::Title => TaskSort::Title,
        }
    }
}

pub fn run(store: &impl TaskStore, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add {
            title,
            due,
            hours,
            description,
        } => {
            let task = store
                .create_task(NewTask::new(title, due, hours).with_description(description))
                .context("add task")?;
            println!("{}", json!({ "success": true, "task_id": task.id }));
        }

        TaskCommand::List { filter, sort, json } => {
            let tasks = view(&store.list_tasks()?, filter.into(), sort.into());
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("(no tasks)");
            } else {
                for t in &tasks {
                    println!("{}", format_task_line(t));
                }
            }
        }

        TaskCommand::Done { id } => {
            let task = store.set_done(TaskId(id), true)?;
            println!("Marked done: #{} {}", task.id, task.title);
        }

        TaskCommand::Toggle { id } => {
            let task = store.toggle_done(TaskId(id))?;
            let state = if task.done { "done" } else { "not done" };
            println!("#{} {} is now {state}", task.id, task.title);
        }

        TaskCommand::Edit {
            id,
            title,
            description,
            due,
            hours,
        } => {
            let patch = TaskPatch {
                title,
                description,
                due_date: due,
                estimated_time: hours,
            };
            if patch.is_empty() {
                bail!("nothing to edit (pass --title, --description, --due or --hours)");
            }
            let task = store.update_task(TaskId(id), patch)?;
            println!("{}", format_task_line(&task));
        }

        TaskCommand::Import { csv } => {
            let created = import_tasks_csv(store, &csv)
                .with_context(|| format!("importing {}", csv.display()))?;
            println!("Imported {} tasks from {}", created.len(), csv.display());
        }
    }

    Ok(())
}

pub fn print_progress(store: &impl TaskStore) -> Result<()> {
    let p = progress(&store.list_tasks()?);
    println!("{} of {} tasks completed ({}%)", p.completed, p.total, p.percent);
    Ok(())
}

fn format_task_line(t: &Task) -> String {
    let mark = if t.done { "x" } else { " " };
    let mut line = format!(
        "[{mark}] #{} {} | due {} | {}h",
        t.id, t.title, t.due_date, t.estimated_time
    );
    if !t.description.is_empty() {
        line.push_str(" | ");
        line.push_str(&t.description);
    }
    line
}
