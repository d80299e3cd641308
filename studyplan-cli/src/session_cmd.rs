use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;
use studyplan_core::time::parse_date;
use studyplan_core::{EnergyLevel, NewSession, SessionStore};

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Log an available work session; prints {"success":true,"session_id":N}
    Log {
        #[arg(long, default_value = "local")]
        user: String,

        /// Session date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,

        /// Energy level: a number (e.g. 4) or a label (e.g. high)
        #[arg(long, value_parser = parse_energy)]
        energy: EnergyLevel,

        /// Hours available in this session
        #[arg(long, allow_hyphen_values = true)]
        hours: f64,
    },

    /// List logged sessions
    List,
}

fn parse_energy(raw: &str) -> Result<EnergyLevel, String> {
    if raw.trim().is_empty() {
        return Err("energy level must not be empty".to_string());
    }
    Ok(EnergyLevel::parse(raw))
}

pub fn run(store: &impl SessionStore, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Log {
            user,
            date,
            energy,
            hours,
        } => {
            let session = store
                .create_session(NewSession::new(user, date, energy, hours))
                .context("log session")?;
            println!("{}", json!({ "success": true, "session_id": session.id }));
        }

        SessionCommand::List => {
            let sessions = store.list_sessions()?;
            if sessions.is_empty() {
                println!("(no sessions)");
            }
            for s in &sessions {
                println!(
                    "#{} {} | user={} | energy={} | {}h",
                    s.id, s.date, s.user_id, s.energy_level, s.available_hours
                );
            }
        }
    }

    Ok(())
}
