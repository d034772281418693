use crate::error::FlightPlanError;
use crate::plan::{FacilityId, Plan, RunwayUse};
use crate::time::Time;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type CallSign = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightType {
    Local,
    Inbound,
    Outbound,
    Unknown,
}

impl fmt::Display for FlightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlightType::Local => "local",
            FlightType::Inbound => "inbound",
            FlightType::Outbound => "outbound",
            FlightType::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// The ordered sequence of facility crossings of one flight.
///
/// Plans are kept sorted by entry time after every insertion. All plans
/// share the call sign of the flight plan.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    call_sign: CallSign,
    flight_type: Option<FlightType>,
    airline: Option<Arc<str>>,
    plans: Vec<Plan>,
}

impl FlightPlan {
    pub fn new(plan: Plan) -> FlightPlan {
        FlightPlan {
            call_sign: plan.call_sign.clone(),
            flight_type: None,
            airline: None,
            plans: vec![plan],
        }
    }

    pub fn empty(call_sign: impl Into<CallSign>) -> FlightPlan {
        FlightPlan {
            call_sign: call_sign.into(),
            flight_type: None,
            airline: None,
            plans: vec![],
        }
    }

    /// Inserts `plan` and re-sorts the whole sequence by entry time.
    ///
    /// Fails without touching the sequence when the plan belongs to another
    /// flight.
    pub fn add(&mut self, plan: Plan) -> Result<(), FlightPlanError> {
        if plan.call_sign != self.call_sign {
            return Err(FlightPlanError::CallSignMismatch {
                expected: self.call_sign.clone(),
                found: plan.call_sign,
            });
        }
        self.plans.push(plan);
        self.sort();
        Ok(())
    }

    pub fn sort(&mut self) {
        self.plans.sort_by_key(|p| p.time_entry);
    }

    /// Plans ordered by entry time, leaving the receiver untouched.
    pub fn sorted(&self) -> Vec<Plan> {
        let mut plans = self.plans.clone();
        plans.sort_by_key(|p| p.time_entry);
        plans
    }

    pub fn reschedule(&mut self, shift: i64) {
        self.plans.iter_mut().for_each(|p| p.reschedule(shift));
    }

    /// Copy of the flight plan without its boundary runway plans. The first
    /// and last plans are checked independently.
    pub fn trim_runway(&self) -> FlightPlan {
        let mut trimmed = self.clone();
        if trimmed.plans.first().is_some_and(Plan::is_runway) {
            trimmed.plans.remove(0);
        }
        if trimmed.plans.last().is_some_and(Plan::is_runway) {
            trimmed.plans.pop();
        }
        trimmed
    }

    pub fn call_sign(&self) -> &CallSign {
        &self.call_sign
    }

    /// Explicitly stored classification, if any.
    pub fn stored_flight_type(&self) -> Option<FlightType> {
        self.flight_type
    }

    pub fn set_flight_type(&mut self, flight_type: FlightType) {
        self.flight_type = Some(flight_type);
    }

    pub fn flight_type(&self) -> FlightType {
        self.flight_type.unwrap_or_else(|| self.derive_flight_type())
    }

    /// Classification from the runway roles of the boundary plans.
    pub fn derive_flight_type(&self) -> FlightType {
        let departs = self.plans.first().and_then(|p| p.runway_use) == Some(RunwayUse::Departure);
        let arrives = self.plans.last().and_then(|p| p.runway_use) == Some(RunwayUse::Arrival);
        match (departs, arrives) {
            (true, true) => FlightType::Local,
            (true, false) => FlightType::Outbound,
            (false, true) => FlightType::Inbound,
            (false, false) => FlightType::Unknown,
        }
    }

    /// Airline code; the first two characters of the call sign unless set.
    pub fn airline(&self) -> Arc<str> {
        self.airline
            .clone()
            .unwrap_or_else(|| Arc::from(self.call_sign.chars().take(2).collect::<String>()))
    }

    pub fn set_airline(&mut self, airline: impl Into<Arc<str>>) {
        self.airline = Some(airline.into());
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn start_time(&self) -> Option<Time> {
        self.plans.first().map(|p| p.time_entry)
    }

    pub fn end_time(&self) -> Option<Time> {
        self.plans.last().map(|p| p.time_exit)
    }

    pub fn time_period(&self) -> Option<(Time, Time)> {
        self.start_time().zip(self.end_time())
    }

    pub fn duration(&self) -> Option<i64> {
        self.time_period().map(|(start, end)| end - start)
    }

    pub fn facilities_passed(&self) -> Vec<FacilityId> {
        self.plans.iter().map(|p| p.facility.clone()).collect()
    }

    pub fn facility_entry_exit_times(&self) -> Vec<(FacilityId, Time, Time)> {
        self.plans
            .iter()
            .map(|p| (p.facility.clone(), p.time_entry, p.time_exit))
            .collect()
    }

    pub fn num_facilities(&self) -> usize {
        self.plans.len()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn to_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.plans.iter().map(Plan::to_record).collect()
    }
}
