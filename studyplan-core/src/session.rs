//! Work sessions: a block of time on a date with a declared capacity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Self-reported energy. Clients send either a number ("4") or a label ("high").
///
/// The scheduler does not read this yet; it is carried on the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnergyLevel {
    Score(f64),
    Label(String),
}

impl EnergyLevel {
    /// Parse CLI input: numeric when it parses as a number, a label otherwise.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => EnergyLevel::Score(v),
            _ => EnergyLevel::Label(raw.to_string()),
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyLevel::Score(v) => write!(f, "{v}"),
            EnergyLevel::Label(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: String,
    pub date: NaiveDate,
    pub energy_level: EnergyLevel,
    pub available_hours: f64,
}

impl Session {
    pub fn new(id: u64, date: NaiveDate, available_hours: f64) -> Self {
        Self {
            id: SessionId(id),
            user_id: "local".to_string(),
            date,
            energy_level: EnergyLevel::Score(3.0),
            available_hours,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_energy(mut self, energy_level: EnergyLevel) -> Self {
        self.energy_level = energy_level;
        self
    }

    pub fn is_on_or_after(&self, day: NaiveDate) -> bool {
        self.date >= day
    }
}

/// Session submission ("log a session").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub user_id: String,
    pub date: NaiveDate,
    pub energy_level: EnergyLevel,
    pub available_hours: f64,
}

impl NewSession {
    pub fn new(
        user_id: impl Into<String>,
        date: NaiveDate,
        energy_level: EnergyLevel,
        available_hours: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            energy_level,
            available_hours,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        if !self.available_hours.is_finite() {
            return Err(ValidationError::NonFiniteHours("available_hours"));
        }
        if self.available_hours < 0.0 {
            return Err(ValidationError::NegativeCapacity(self.available_hours));
        }
        Ok(())
    }

    pub fn into_session(self, id: SessionId) -> Session {
        Session {
            id,
            user_id: self.user_id,
            date: self.date,
            energy_level: self.energy_level,
            available_hours: self.available_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn energy_accepts_numbers_and_labels() {
        let s: NewSession = serde_json::from_str(
            r#"{"user_id":"u1","date":"2026-03-10","energy_level":4,"available_hours":2}"#,
        )
        .unwrap();
        assert_eq!(s.energy_level, EnergyLevel::Score(4.0));

        let s: NewSession = serde_json::from_str(
            r#"{"user_id":"u1","date":"2026-03-10","energy_level":"high","available_hours":2}"#,
        )
        .unwrap();
        assert_eq!(s.energy_level, EnergyLevel::Label("high".into()));
    }

    #[test]
    fn energy_parse_from_cli() {
        assert_eq!(EnergyLevel::parse("2.5"), EnergyLevel::Score(2.5));
        assert_eq!(EnergyLevel::parse(" low "), EnergyLevel::Label("low".into()));
    }

    #[test]
    fn negative_capacity_rejected_zero_allowed() {
        let s = NewSession::new("u1", today(), EnergyLevel::Score(3.0), -1.0);
        assert_eq!(s.validate(), Err(ValidationError::NegativeCapacity(-1.0)));

        let s = NewSession::new("u1", today(), EnergyLevel::Score(3.0), 0.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn blank_user_rejected() {
        let s = NewSession::new(" ", today(), EnergyLevel::Label("ok".into()), 1.0);
        assert_eq!(s.validate(), Err(ValidationError::EmptyUserId));
    }

    #[test]
    fn fixture_builders_set_user_and_energy() {
        let s = Session::new(2, today(), 1.5)
            .with_user("ana")
            .with_energy(EnergyLevel::Label("tired".into()));
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["user_id"], "ana");
        assert_eq!(v["energy_level"], "tired");
        assert_eq!(v["date"], "2026-03-10");
    }

    #[test]
    fn on_or_after_is_inclusive() {
        let s = Session::new(1, today(), 2.0);
        assert!(s.is_on_or_after(today()));
        assert!(!s.is_on_or_after(today().succ_opt().unwrap()));
    }
}
