use crate::config::validate_time_slot_duration;
use crate::encoded::{EncodedFlightPlan, FlightId};
use crate::error::ConfigError;
use crate::flight_plan::FlightPlan;
use crate::plan::Plan;
use crate::time::SlotId;

/// Turns flight plans into slot-indexed encodings, numbering flights in the
/// order they are encoded.
#[derive(Debug, Clone)]
pub struct Encoder {
    time_slot_duration: i64,
    next_flight_id: FlightId,
}

impl Encoder {
    pub fn new(time_slot_duration: i64) -> Result<Self, ConfigError> {
        validate_time_slot_duration(time_slot_duration)?;
        Ok(Encoder {
            time_slot_duration,
            next_flight_id: 0,
        })
    }

    pub fn time_slot_duration(&self) -> i64 {
        self.time_slot_duration
    }

    /// Every slot touched between entry and exit, both ends included.
    /// A plan that exits before it enters occupies nothing.
    pub fn slots(&self, plan: &Plan) -> Vec<SlotId> {
        let first = plan.time_entry.slot(self.time_slot_duration);
        let last = plan.time_exit.slot(self.time_slot_duration);
        (first.0..=last.0).map(SlotId).collect()
    }

    pub fn encode(&mut self, flight_plan: &FlightPlan) -> EncodedFlightPlan {
        let mut encoded = EncodedFlightPlan::new(
            flight_plan.call_sign().clone(),
            self.next_flight_id,
            flight_plan.flight_type(),
        );
        self.next_flight_id += 1;

        flight_plan
            .plans()
            .iter()
            .for_each(|p| encoded.add_plan(p.facility.clone(), self.slots(p)));
        encoded
    }
}
