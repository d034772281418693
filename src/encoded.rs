use crate::flight_plan::{CallSign, FlightType};
use crate::plan::FacilityId;
use crate::time::SlotId;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

pub type FlightId = u32;

/// A (facility, slot) occupancy cell.
pub type Cell = (FacilityId, SlotId);

/// Consecutive slots a flight spends in one facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub facility: FacilityId,
    pub slots: Vec<SlotId>,
}

/// Cells released and newly taken by one shift of a flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotDelta {
    pub vacated: BTreeSet<Cell>,
    pub occupied: BTreeSet<Cell>,
}

impl SlotDelta {
    pub fn is_empty(&self) -> bool {
        self.vacated.is_empty() && self.occupied.is_empty()
    }
}

/// Slot-indexed trajectory of a flight, used for bulk shifting.
///
/// The timeline is a single list of facility segments. The flat
/// `facility_ids`/`time_slot_ids` sequences and the per-facility grouping
/// are views over it, so they cannot drift apart after a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedFlightPlan {
    pub call_sign: CallSign,
    pub flight_id: FlightId,
    pub flight_type: FlightType,
    timeline: Vec<Segment>,
    original_time_slot: Option<SlotId>,
    departed: bool,
    /// Holds applied to the flight. Maintained by the caller.
    pub num_hold: u32,
    /// Overcapacity cells the flight passes through. Maintained by the caller.
    pub num_overcapacity: u32,
}

impl EncodedFlightPlan {
    pub fn new(call_sign: impl Into<CallSign>, flight_id: FlightId, flight_type: FlightType) -> Self {
        EncodedFlightPlan {
            call_sign: call_sign.into(),
            flight_id,
            flight_type,
            timeline: vec![],
            original_time_slot: None,
            departed: false,
            num_hold: 0,
            num_overcapacity: 0,
        }
    }

    /// Appends the slots the flight spends in `facility`. A later call for
    /// the same facility replaces it in the grouped view, while the flat
    /// sequences keep both segments.
    pub fn add_plan(&mut self, facility: impl Into<FacilityId>, time_slot_ids: Vec<SlotId>) {
        if self.original_time_slot.is_none() {
            self.original_time_slot = time_slot_ids.first().copied();
        }
        self.timeline.push(Segment {
            facility: facility.into(),
            slots: time_slot_ids,
        });
    }

    pub fn timeline(&self) -> &[Segment] {
        &self.timeline
    }

    /// One entry per occupied slot, parallel to `time_slot_ids`.
    pub fn facility_ids(&self) -> Vec<FacilityId> {
        self.timeline
            .iter()
            .flat_map(|s| std::iter::repeat_n(s.facility.clone(), s.slots.len()))
            .collect()
    }

    pub fn time_slot_ids(&self) -> Vec<SlotId> {
        self.timeline.iter().flat_map(|s| s.slots.iter().copied()).collect()
    }

    /// Slots grouped by facility.
    pub fn flight_plan(&self) -> HashMap<FacilityId, Vec<SlotId>> {
        self.timeline
            .iter()
            .map(|s| (s.facility.clone(), s.slots.clone()))
            .collect()
    }

    pub fn id_pairs(&self) -> Vec<Cell> {
        self.timeline
            .iter()
            .flat_map(|s| s.slots.iter().map(move |slot| (s.facility.clone(), *slot)))
            .collect()
    }

    /// Distinct cells the flight occupies.
    pub fn occupied_cells(&self) -> BTreeSet<Cell> {
        self.id_pairs().into_iter().collect()
    }

    pub fn departure_time_slot(&self) -> Option<SlotId> {
        self.timeline.iter().flat_map(|s| s.slots.first()).next().copied()
    }

    pub fn original_time_slot(&self) -> Option<SlotId> {
        self.original_time_slot
    }

    /// Slots between the current departure and the departure the flight
    /// was encoded with. Positive when held.
    pub fn schedule_offset(&self) -> i64 {
        match (self.departure_time_slot(), self.original_time_slot) {
            (Some(current), Some(original)) => current - original,
            _ => 0,
        }
    }

    pub fn is_departed(&self) -> bool {
        self.departed
    }

    /// Moves every slot `n` slots earlier.
    pub fn advance(&mut self, n: i64) -> SlotDelta {
        self.shift(-n)
    }

    /// Moves every slot `n` slots later.
    pub fn hold(&mut self, n: i64) -> SlotDelta {
        self.shift(n)
    }

    /// Shifts the flight by `n` slots, later if `delay` is set and earlier
    /// otherwise. A zero shift is a no-op.
    pub fn reschedule(&mut self, n: i64, delay: bool) -> SlotDelta {
        if n == 0 {
            return SlotDelta::default();
        }
        if delay { self.hold(n) } else { self.advance(n) }
    }

    /// Marks the flight departed and returns its final occupancy.
    pub fn depart(&mut self) -> Vec<Cell> {
        self.departed = true;
        self.id_pairs()
    }

    fn shift(&mut self, offset: i64) -> SlotDelta {
        let former = self.occupied_cells();
        self.timeline
            .iter_mut()
            .flat_map(|s| s.slots.iter_mut())
            .for_each(|slot| *slot += offset);
        let later = self.occupied_cells();

        if let Some(departure) = self.departure_time_slot() {
            if departure.0 < 0 {
                warn!(call_sign = %self.call_sign, slot = departure.0, "departure moved before the first slot");
            }
        }

        let delta = SlotDelta {
            vacated: former.difference(&later).cloned().collect(),
            occupied: later.difference(&former).cloned().collect(),
        };
        debug!(
            call_sign = %self.call_sign,
            offset,
            vacated = delta.vacated.len(),
            occupied = delta.occupied.len(),
            "shifted flight"
        );
        delta
    }

    pub fn to_record(&self) -> serde_json::Value {
        serde_json::json!({
            "call_sign": self.call_sign,
            "flight_id": self.flight_id,
            "flight_type": self.flight_type,
            "facility_ids": self.facility_ids(),
            "time_slot_ids": self.time_slot_ids(),
            "flight_plan": self.flight_plan(),
            "original_time_slot": self.original_time_slot,
            "departed": self.departed,
            "num_hold": self.num_hold,
            "num_overcapacity": self.num_overcapacity,
        })
    }
}
