use crate::flight_plan::CallSign;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FlightPlanError {
    #[error("plan of {found} does not belong to flight plan {expected}")]
    CallSignMismatch { expected: CallSign, found: CallSign },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}: missing column `{column}`")]
    MissingField { row: usize, column: String },

    #[error("row {row}: column `{column}` has an invalid value: {value}")]
    InvalidField {
        row: usize,
        column: String,
        value: serde_json::Value,
    },

    #[error(transparent)]
    FlightPlan(#[from] FlightPlanError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("unknown flight {0}")]
    UnknownFlight(CallSign),

    #[error("flight {0} has already departed")]
    Departed(CallSign),

    #[error("shift of {requested} slots exceeds the limit of {limit}")]
    ShiftLimit { requested: i64, limit: i64 },
}
