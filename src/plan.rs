use crate::flight_plan::CallSign;
use crate::time::Time;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;

pub type FacilityId = Arc<str>;

/// Marks a plan as a takeoff or a landing rather than an en-route crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunwayUse {
    Departure,
    Arrival,
}

impl fmt::Display for RunwayUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunwayUse::Departure => write!(f, "departure"),
            RunwayUse::Arrival => write!(f, "arrival"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
}

/// One facility crossing of a flight: where it enters and leaves the
/// facility, and when.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub call_sign: CallSign,
    pub facility: FacilityId,
    pub time_entry: Time,
    pub time_exit: Time,
    pub altitude_entry: i64,
    pub altitude_exit: i64,
    pub longitude_entry: f64,
    pub longitude_exit: f64,
    pub latitude_entry: f64,
    pub latitude_exit: f64,
    pub runway_use: Option<RunwayUse>,
    pub fir: Option<Arc<str>>,
}

impl Plan {
    pub fn builder(
        call_sign: impl Into<CallSign>,
        facility: impl Into<FacilityId>,
        time_entry: Time,
        time_exit: Time,
    ) -> PlanBuilder {
        PlanBuilder {
            plan: Plan {
                call_sign: call_sign.into(),
                facility: facility.into(),
                time_entry,
                time_exit,
                altitude_entry: 0,
                altitude_exit: 0,
                longitude_entry: 0.0,
                longitude_exit: 0.0,
                latitude_entry: 0.0,
                latitude_exit: 0.0,
                runway_use: None,
                fir: None,
            },
        }
    }

    /// Shifts the plan by `shift` time units, later when positive and
    /// earlier when negative. Entry/exit ordering is not re-checked.
    pub fn reschedule(&mut self, shift: i64) {
        self.time_entry += shift;
        self.time_exit += shift;
    }

    pub fn duration(&self) -> i64 {
        self.time_exit - self.time_entry
    }

    pub fn entry_position(&self) -> Position {
        Position {
            longitude: self.longitude_entry,
            latitude: self.latitude_entry,
        }
    }

    pub fn exit_position(&self) -> Position {
        Position {
            longitude: self.longitude_exit,
            latitude: self.latitude_exit,
        }
    }

    pub fn is_runway(&self) -> bool {
        self.runway_use.is_some()
    }

    /// Flat column -> value record of the plan.
    pub fn to_record(&self) -> Map<String, Value> {
        [
            ("call_sign", json!(self.call_sign)),
            ("facility", json!(self.facility)),
            ("time_entry", json!(self.time_entry)),
            ("time_exit", json!(self.time_exit)),
            ("altitude_entry", json!(self.altitude_entry)),
            ("altitude_exit", json!(self.altitude_exit)),
            ("longitude_entry", json!(self.longitude_entry)),
            ("longitude_exit", json!(self.longitude_exit)),
            ("latitude_entry", json!(self.latitude_entry)),
            ("latitude_exit", json!(self.latitude_exit)),
            ("runway_use", json!(self.runway_use)),
            ("fir", json!(self.fir)),
        ]
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
    }
}

pub struct PlanBuilder {
    plan: Plan,
}

impl PlanBuilder {
    pub fn altitude(mut self, entry: i64, exit: i64) -> Self {
        self.plan.altitude_entry = entry;
        self.plan.altitude_exit = exit;
        self
    }

    pub fn entry_position(mut self, position: Position) -> Self {
        self.plan.longitude_entry = position.longitude;
        self.plan.latitude_entry = position.latitude;
        self
    }

    pub fn exit_position(mut self, position: Position) -> Self {
        self.plan.longitude_exit = position.longitude;
        self.plan.latitude_exit = position.latitude;
        self
    }

    pub fn runway_use(mut self, runway_use: Option<RunwayUse>) -> Self {
        self.plan.runway_use = runway_use;
        self
    }

    pub fn fir(mut self, fir: Option<Arc<str>>) -> Self {
        self.plan.fir = fir;
        self
    }

    pub fn build(self) -> Plan {
        self.plan
    }
}
