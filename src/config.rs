//! Scenario configuration loaded from TOML.
//!
//! ```
//! use flowslot::config::Config;
//!
//! let config = Config::from_toml_str(r#"
//!     [flight_plan]
//!     file_path = "data/default.json"
//!     exclude_runway = true
//!
//!     [environment]
//!     time_slot_duration = 300
//!     default_capacity = 4
//! "#).unwrap();
//!
//! assert_eq!(config.environment.time_slot_duration, 300);
//! assert_eq!(config.environment.max_delay_num, 12);
//! ```

use crate::error::ConfigError;
use crate::extract::FieldMapping;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub flight_plan: FlightPlanConfig,

    #[serde(default)]
    pub environment: EnvironmentConfig,
}

/// Where flight plans come from and which of them to keep.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FlightPlanConfig {
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,

    /// Zero-based day of the scenario to keep, by flight start time.
    #[serde(default)]
    pub traffic_day: Option<i64>,

    /// Hour of day to keep, by flight start time.
    #[serde(default)]
    pub traffic_hour: Option<i64>,

    /// Keep only flights that both depart and arrive inside the region.
    #[serde(default)]
    pub exclude_non_local: bool,

    /// Strip boundary runway plans before encoding.
    #[serde(default)]
    pub exclude_runway: bool,

    /// Source column -> plan field. Defaults to the standard column names.
    #[serde(default)]
    pub columns: Option<FieldMapping>,
}

impl Default for FlightPlanConfig {
    fn default() -> Self {
        FlightPlanConfig {
            file_path: default_file_path(),
            traffic_day: None,
            traffic_hour: None,
            exclude_non_local: false,
            exclude_runway: false,
            columns: None,
        }
    }
}

fn default_file_path() -> PathBuf {
    PathBuf::from("data/default.json")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EnvironmentConfig {
    /// Length of one time slot, in time units.
    #[serde(default = "default_time_slot_duration")]
    pub time_slot_duration: i64,

    #[serde(default = "default_max_shift")]
    pub max_advance_num: i64,

    #[serde(default = "default_max_shift")]
    pub max_delay_num: i64,

    /// Flights a facility accepts per slot.
    #[serde(default = "default_capacity")]
    pub default_capacity: u32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        EnvironmentConfig {
            time_slot_duration: default_time_slot_duration(),
            max_advance_num: default_max_shift(),
            max_delay_num: default_max_shift(),
            default_capacity: default_capacity(),
        }
    }
}

impl EnvironmentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_time_slot_duration(self.time_slot_duration)?;
        if self.max_advance_num < 0 || self.max_delay_num < 0 {
            return Err(ConfigError::Invalid(
                "shift limits must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_time_slot_duration(duration: i64) -> Result<(), ConfigError> {
    if duration <= 0 {
        return Err(ConfigError::Invalid(format!(
            "time_slot_duration must be positive, got {}",
            duration
        )));
    }
    Ok(())
}

fn default_time_slot_duration() -> i64 {
    60
}

fn default_max_shift() -> i64 {
    12
}

fn default_capacity() -> u32 {
    10
}

impl Config {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.environment.validate()?;
        if let Some(hour) = self.flight_plan.traffic_hour {
            if !(0..24).contains(&hour) {
                return Err(ConfigError::Invalid(format!(
                    "traffic_hour must be within 0..24, got {}",
                    hour
                )));
            }
        }
        Ok(())
    }

    pub fn field_mapping(&self) -> FieldMapping {
        self.flight_plan.columns.clone().unwrap_or_default()
    }
}
