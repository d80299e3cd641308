use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use studyplan_core::ValidationPolicy;
use studyplan_core::time::parse_tz;

use crate::state::{default_store_path, ensure_studyplan_home, studyplan_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub schedule: ScheduleSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSection {
    /// Store document path (default: ~/.studyplan/store.json)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    /// IANA timezone used to decide what "today" is.
    pub timezone: String,
    /// Reject tasks whose estimate is zero or negative.
    pub strict_estimates: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// tracing filter directive, e.g. "info" or "studyplan_core=debug"
    pub level: String,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            strict_estimates: false,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(p) => Ok(p.clone()),
            None => default_store_path(),
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        parse_tz(&self.schedule.timezone)
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        if self.schedule.strict_estimates {
            ValidationPolicy::strict()
        } else {
            ValidationPolicy::lenient()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(studyplan_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_studyplan_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let p = save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
