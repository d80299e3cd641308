use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studyplan_core::time::{parse_date, today_in};
use studyplan_core::{JsonFileStore, PlanningKernel};

mod config;
mod logging;
mod session_cmd;
mod state;
mod task_cmd;

use config::{load_config, load_config_from, Config};
use session_cmd::SessionCommand;
use task_cmd::TaskCommand;

#[derive(Parser, Debug)]
#[command(
    name = "studyplan",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("STUDYPLAN_BUILD_SHA"), ")"),
    about = "Study planner: tasks, work sessions, and a greedy session schedule"
)]
struct Cli {
    /// Config file (default: ~/.studyplan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store document (overrides config.store.path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Task management
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Work session management
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Generate the schedule; prints {"schedule":[...]}
    Schedule {
        /// Plan as of this date instead of today in the configured timezone
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Show how many tasks are completed
    Progress,

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.studyplan/config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    logging::init(&cfg.log.level);

    let store = open_store(&cfg, cli.store.clone())?;

    match cli.command {
        Command::Task { command } => task_cmd::run(&store, command)?,

        Command::Session { command } => session_cmd::run(&store, command)?,

        Command::Schedule { today } => {
            let today = match today {
                Some(d) => d,
                None => today_in(cfg.timezone()?, Utc::now()),
            };
            let kernel = PlanningKernel::new(&store, &store);
            let schedule = kernel
                .plan(today)
                .with_context(|| format!("generating schedule from {}", store.path().display()))?;
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }

        Command::Progress => task_cmd::print_progress(&store)?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                println!("# store: {}", store.path().display());
            }
        },
    }

    Ok(())
}

fn open_store(cfg: &Config, override_path: Option<PathBuf>) -> Result<JsonFileStore> {
    let path = match override_path {
        Some(p) => p,
        None => cfg.store_path()?,
    };
    tracing::debug!(path = %path.display(), "opening store");
    Ok(JsonFileStore::with_policy(path, cfg.validation_policy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn schedule_accepts_explicit_today() {
        let cli = Cli::try_parse_from(["studyplan", "schedule", "--today", "2026-02-21"]).unwrap();
        match cli.command {
            Command::Schedule { today } => {
                assert_eq!(today, NaiveDate::from_ymd_opt(2026, 2, 21));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn task_add_requires_due_date() {
        let res = Cli::try_parse_from(["studyplan", "task", "add", "--title", "essay", "--hours", "2"]);
        assert!(res.is_err());
    }

    #[test]
    fn bad_date_is_rejected_at_parse_time() {
        let res = Cli::try_parse_from([
            "studyplan", "session", "log", "--date", "tomorrow", "--energy", "3", "--hours", "2",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn store_override_wins_over_config() {
        let mut cfg = Config::default();
        cfg.store.path = Some(PathBuf::from("/tmp/from-config.json"));
        let store = open_store(&cfg, Some(PathBuf::from("/tmp/from-flag.json"))).unwrap();
        assert_eq!(store.path(), std::path::Path::new("/tmp/from-flag.json"));
    }
}
