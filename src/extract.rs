use crate::error::ExtractError;
use crate::flight_plan::{CallSign, FlightPlan, FlightType};
use crate::plan::{Plan, Position, RunwayUse};
use crate::time::Time;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub type Record = Map<String, Value>;

/// Field of a plan (or its flight plan) that a source column can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanField {
    CallSign,
    Airline,
    FlightType,
    Facility,
    TimeEntry,
    TimeExit,
    AltitudeEntry,
    AltitudeExit,
    LongitudeEntry,
    LongitudeExit,
    LatitudeEntry,
    LatitudeExit,
    RunwayUse,
    Fir,
}

/// Source column name -> plan field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(BTreeMap<String, PlanField>);

impl Default for FieldMapping {
    fn default() -> Self {
        FieldMapping(
            [
                ("id", PlanField::CallSign),
                ("airline", PlanField::Airline),
                ("flight_type", PlanField::FlightType),
                ("facility", PlanField::Facility),
                ("time_entry", PlanField::TimeEntry),
                ("time_exit", PlanField::TimeExit),
                ("altitude_entry", PlanField::AltitudeEntry),
                ("altitude_exit", PlanField::AltitudeExit),
                ("longitude_entry", PlanField::LongitudeEntry),
                ("longitude_exit", PlanField::LongitudeExit),
                ("latitude_entry", PlanField::LatitudeEntry),
                ("latitude_exit", PlanField::LatitudeExit),
                ("rwyuse", PlanField::RunwayUse),
                ("fir", PlanField::Fir),
            ]
            .into_iter()
            .map(|(column, field)| (column.to_string(), field))
            .collect(),
        )
    }
}

impl FieldMapping {
    pub fn new(columns: impl IntoIterator<Item = (String, PlanField)>) -> Self {
        FieldMapping(columns.into_iter().collect())
    }

    pub fn column(&self, field: PlanField) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, f)| **f == field)
            .map(|(column, _)| column.as_str())
    }
}

/// One extracted row: the plan plus the flight-level columns it carried.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRow {
    pub plan: Plan,
    pub airline: Option<Arc<str>>,
    pub flight_type: Option<FlightType>,
}

struct RowReader<'a> {
    index: usize,
    record: &'a Record,
    mapping: &'a FieldMapping,
}

impl RowReader<'_> {
    fn value(&self, field: PlanField) -> Option<&Value> {
        self.mapping
            .column(field)
            .and_then(|c| self.record.get(c))
            .filter(|v| !v.is_null())
    }

    fn invalid(&self, field: PlanField, value: &Value) -> ExtractError {
        ExtractError::InvalidField {
            row: self.index,
            column: self.mapping.column(field).unwrap_or_default().to_string(),
            value: value.clone(),
        }
    }

    fn required<T>(
        &self,
        field: PlanField,
        parse: impl Fn(&Value) -> Option<T>,
    ) -> Result<T, ExtractError> {
        let value = self.value(field).ok_or_else(|| ExtractError::MissingField {
            row: self.index,
            column: self
                .mapping
                .column(field)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{:?}", field)),
        })?;
        parse(value).ok_or_else(|| self.invalid(field, value))
    }

    fn optional<T>(
        &self,
        field: PlanField,
        parse: impl Fn(&Value) -> Option<T>,
    ) -> Result<Option<T>, ExtractError> {
        self.value(field)
            .map(|v| parse(v).ok_or_else(|| self.invalid(field, v)))
            .transpose()
    }
}

fn as_text(value: &Value) -> Option<Arc<str>> {
    match value {
        Value::String(s) => Some(Arc::from(s.as_str())),
        Value::Number(n) => Some(Arc::from(n.to_string())),
        _ => None,
    }
}

fn as_int(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f.round() as i64))
}

fn as_runway_use(value: &Value) -> Option<Option<RunwayUse>> {
    match value.as_str()?.trim() {
        "" => Some(None),
        "departure" => Some(Some(RunwayUse::Departure)),
        "arrival" => Some(Some(RunwayUse::Arrival)),
        _ => None,
    }
}

fn as_flight_type(value: &Value) -> Option<FlightType> {
    serde_json::from_value(value.clone()).ok()
}

/// Builds a plan from one tabular record.
pub fn plan_from_record(
    index: usize,
    record: &Record,
    mapping: &FieldMapping,
) -> Result<PlanRow, ExtractError> {
    let row = RowReader {
        index,
        record,
        mapping,
    };

    let plan = Plan::builder(
        row.required(PlanField::CallSign, as_text)?,
        row.required(PlanField::Facility, as_text)?,
        Time(row.required(PlanField::TimeEntry, as_int)?),
        Time(row.required(PlanField::TimeExit, as_int)?),
    )
    .altitude(
        row.optional(PlanField::AltitudeEntry, as_int)?.unwrap_or(0),
        row.optional(PlanField::AltitudeExit, as_int)?.unwrap_or(0),
    )
    .entry_position(Position {
        longitude: row.optional(PlanField::LongitudeEntry, Value::as_f64)?.unwrap_or(0.0),
        latitude: row.optional(PlanField::LatitudeEntry, Value::as_f64)?.unwrap_or(0.0),
    })
    .exit_position(Position {
        longitude: row.optional(PlanField::LongitudeExit, Value::as_f64)?.unwrap_or(0.0),
        latitude: row.optional(PlanField::LatitudeExit, Value::as_f64)?.unwrap_or(0.0),
    })
    .runway_use(row.optional(PlanField::RunwayUse, as_runway_use)?.flatten())
    .fir(row.optional(PlanField::Fir, as_text)?)
    .build();

    Ok(PlanRow {
        plan,
        airline: row.optional(PlanField::Airline, as_text)?,
        flight_type: row.optional(PlanField::FlightType, as_flight_type)?,
    })
}

/// Groups records into flight plans by call sign, in first-seen order.
/// Flight-level columns are taken from the first row of each flight.
pub fn extract_flight_plans(
    records: &[Record],
    mapping: &FieldMapping,
) -> Result<Vec<FlightPlan>, ExtractError> {
    let mut flight_plans: Vec<FlightPlan> = vec![];
    let mut index: HashMap<CallSign, usize> = HashMap::new();

    for (i, record) in records.iter().enumerate() {
        let row = plan_from_record(i, record, mapping)?;
        match index.get(&row.plan.call_sign).copied() {
            Some(idx) => flight_plans[idx].add(row.plan)?,
            None => {
                index.insert(row.plan.call_sign.clone(), flight_plans.len());
                let mut fp = FlightPlan::new(row.plan);
                if let Some(airline) = row.airline {
                    fp.set_airline(airline);
                }
                if let Some(flight_type) = row.flight_type {
                    fp.set_flight_type(flight_type);
                }
                flight_plans.push(fp);
            }
        }
    }

    info!(
        records = records.len(),
        flights = flight_plans.len(),
        "extracted flight plans"
    );
    Ok(flight_plans)
}

/// Reads a JSON array of row objects.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>, ExtractError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Stores a classification on every flight with at least two plans, based
/// on whether any of its plans departs from or arrives at a runway.
pub fn classify_flight_types(flight_plans: &mut [FlightPlan]) {
    flight_plans
        .iter_mut()
        .filter(|fp| fp.len() >= 2)
        .for_each(|fp| {
            let departs = fp
                .plans()
                .iter()
                .any(|p| p.runway_use == Some(RunwayUse::Departure));
            let arrives = fp
                .plans()
                .iter()
                .any(|p| p.runway_use == Some(RunwayUse::Arrival));
            match (departs, arrives) {
                (true, true) => fp.set_flight_type(FlightType::Local),
                (true, false) => fp.set_flight_type(FlightType::Outbound),
                (false, true) => fp.set_flight_type(FlightType::Inbound),
                (false, false) => {}
            }
        });
}

/// Drops every flight with a plan that exits before it enters.
pub fn exclude_negative_flights(flight_plans: Vec<FlightPlan>) -> Vec<FlightPlan> {
    flight_plans
        .into_iter()
        .filter(|fp| {
            let negative = fp.plans().iter().any(|p| p.time_exit < p.time_entry);
            if negative {
                warn!(call_sign = %fp.call_sign(), "dropping flight with negative plan duration");
            }
            !negative
        })
        .collect()
}
