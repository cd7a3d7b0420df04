use crate::time::{DEFAULT_GRANULARITY_MINUTES, MINUTES_PER_DAY};
use crate::weekday::Weekday;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config io error: {err}"),
            ConfigError::Json(err) => write!(f, "config json error: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Settings for an availability editing session and its booking calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Step between start/end picker options.
    pub slot_granularity_minutes: u16,
    /// Length of one bookable appointment inside a slot.
    pub appointment_minutes: u16,
    /// Days switched on in a fresh schedule.
    pub available_days: Vec<Weekday>,
    /// Dates on which nothing is bookable.
    pub blocked_dates: Vec<NaiveDate>,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            slot_granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            appointment_minutes: DEFAULT_GRANULARITY_MINUTES,
            available_days: Weekday::ALL
                .into_iter()
                .filter(|day| *day != Weekday::Sunday)
                .collect(),
            blocked_dates: Vec::new(),
        }
    }
}

impl AvailabilityConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let mut config: AvailabilityConfig = serde_json::from_reader(file)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: AvailabilityConfig = serde_json::from_str(json)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_day = 1..=MINUTES_PER_DAY;
        if !in_day.contains(&self.slot_granularity_minutes) {
            return Err(ConfigError::Invalid(format!(
                "slot_granularity_minutes must be between 1 and {MINUTES_PER_DAY} (got {})",
                self.slot_granularity_minutes
            )));
        }
        if !in_day.contains(&self.appointment_minutes) {
            return Err(ConfigError::Invalid(format!(
                "appointment_minutes must be between 1 and {MINUTES_PER_DAY} (got {})",
                self.appointment_minutes
            )));
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.available_days.sort();
        self.available_days.dedup();
        self.blocked_dates.sort();
        self.blocked_dates.dedup();
    }
}
