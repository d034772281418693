use crate::encoded::{Cell, EncodedFlightPlan};
use crate::flight_plan::{FlightPlan, FlightType};
use crate::plan::{FacilityId, Plan, RunwayUse};
use crate::time::{SlotId, Time};
use proptest::collection::vec;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn plan(call_sign: &str, facility: &str, entry: i64, exit: i64) -> Plan {
    Plan::builder(call_sign, facility, Time(entry), Time(exit)).build()
}

pub fn runway_plan(
    call_sign: &str,
    facility: &str,
    entry: i64,
    exit: i64,
    runway_use: RunwayUse,
) -> Plan {
    Plan::builder(call_sign, facility, Time(entry), Time(exit))
        .runway_use(Some(runway_use))
        .build()
}

pub fn add_flight(flight_plans: &mut Vec<FlightPlan>, call_sign: &str, legs: &[(&str, i64, i64)]) {
    let mut fp = FlightPlan::empty(call_sign);
    for (facility, entry, exit) in legs {
        fp.add(plan(call_sign, facility, *entry, *exit)).unwrap();
    }
    flight_plans.push(fp);
}

pub fn slots(ids: &[i64]) -> Vec<SlotId> {
    ids.iter().copied().map(SlotId).collect()
}

pub fn cell(facility: &str, slot: i64) -> Cell {
    (id(facility), SlotId(slot))
}

pub fn encoded(segments: Vec<(&str, Vec<i64>)>) -> EncodedFlightPlan {
    let mut efp = EncodedFlightPlan::new("VN1", 0, FlightType::Local);
    for (facility, ids) in segments {
        efp.add_plan(facility, slots(&ids));
    }
    efp
}

pub fn arb_facility() -> impl Strategy<Value = FacilityId> {
    prop_oneof![
        Just(Arc::from("S_1")),
        Just(Arc::from("S_2")),
        Just(Arc::from("S_3")),
    ]
}

/// A trajectory of consecutive facility segments, each a contiguous run of
/// ascending slots.
pub fn arb_encoded() -> impl Strategy<Value = EncodedFlightPlan> {
    (0..500i64, vec((arb_facility(), 1..6i64), 1..6)).prop_map(|(start, segments)| {
        let mut efp = EncodedFlightPlan::new("FL_1", 0, FlightType::Unknown);
        let mut next = start;
        for (facility, len) in segments {
            efp.add_plan(facility, (next..next + len).map(SlotId).collect());
            next += len;
        }
        efp
    })
}

pub fn arb_plan() -> impl Strategy<Value = Plan> {
    (arb_facility(), 0..100_000i64, 0..3600i64).prop_map(|(facility, entry, dur)| {
        Plan::builder("FL_1", facility, Time(entry), Time(entry + dur)).build()
    })
}
