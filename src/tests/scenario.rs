use crate::config::{EnvironmentConfig, FlightPlanConfig};
use crate::error::{ConfigError, ScenarioError};
use crate::flight_plan::{FlightPlan, FlightType};
use crate::plan::RunwayUse;
use crate::scenario::{Scenario, prepare};
use crate::tests::utils::{add_flight, cell, id, plan, runway_plan};
use crate::time::{SlotId, Time};

fn environment(capacity: u32) -> EnvironmentConfig {
    EnvironmentConfig {
        time_slot_duration: 60,
        max_advance_num: 2,
        max_delay_num: 5,
        default_capacity: capacity,
    }
}

fn two_flights() -> Vec<FlightPlan> {
    let mut flights = Vec::new();
    add_flight(&mut flights, "VN1", &[("A", 0, 119), ("B", 120, 179)]);
    add_flight(&mut flights, "VJ2", &[("A", 60, 179)]);
    flights
}

#[test]
fn test_initial_demand_and_overcapacity() {
    let scenario = Scenario::new(environment(1), two_flights()).unwrap();

    assert_eq!(1, scenario.demand(&cell("A", 0)));
    assert_eq!(2, scenario.demand(&cell("A", 1)));
    assert_eq!(1, scenario.demand(&cell("B", 2)));
    assert_eq!(vec![(cell("A", 1), 2)], scenario.overloaded());

    assert_eq!(1, scenario.flight("VN1").unwrap().encoded.num_overcapacity);
    assert_eq!(1, scenario.flight("VJ2").unwrap().encoded.num_overcapacity);
}

#[test]
fn test_hold_moves_demand_and_trajectory() {
    let mut scenario = Scenario::new(environment(1), two_flights()).unwrap();
    let delta = scenario.reschedule("VJ2", 2, true).unwrap();

    assert_eq!(2, delta.vacated.len());
    assert!(delta.vacated.contains(&cell("A", 1)));
    assert_eq!(0, scenario.demand(&cell("A", 2)));
    assert_eq!(1, scenario.demand(&cell("A", 1)));
    assert_eq!(1, scenario.demand(&cell("A", 3)));
    assert!(scenario.overloaded().is_empty());

    let vj2 = scenario.flight("VJ2").unwrap();
    assert_eq!(Some(Time(180)), vj2.flight_plan.start_time());
    assert_eq!(Some(SlotId(3)), vj2.encoded.departure_time_slot());
    assert_eq!(1, vj2.encoded.num_hold);
    assert_eq!(0, vj2.encoded.num_overcapacity);
}

#[test]
fn test_advance_does_not_count_as_hold() {
    let mut scenario = Scenario::new(environment(10), two_flights()).unwrap();
    scenario.reschedule("VJ2", 1, false).unwrap();

    let vj2 = scenario.flight("VJ2").unwrap();
    assert_eq!(0, vj2.encoded.num_hold);
    assert_eq!(Some(Time(0)), vj2.flight_plan.start_time());
    assert_eq!(-1, vj2.encoded.schedule_offset());
}

#[test]
fn test_shift_limits_are_cumulative() {
    let mut scenario = Scenario::new(environment(10), two_flights()).unwrap();
    scenario.reschedule("VN1", 4, true).unwrap();

    assert_eq!(
        Err(ScenarioError::ShiftLimit {
            requested: 6,
            limit: 5
        }),
        scenario.reschedule("VN1", 2, true)
    );
    scenario.reschedule("VN1", 6, false).unwrap();
    assert_eq!(
        Err(ScenarioError::ShiftLimit {
            requested: -3,
            limit: -2
        }),
        scenario.reschedule("VN1", 1, false)
    );
}

#[test]
fn test_negative_hold_moves_earlier_without_counting() {
    let mut scenario = Scenario::new(environment(10), two_flights()).unwrap();
    let delta = scenario.reschedule("VJ2", -1, true).unwrap();

    assert!(delta.occupied.contains(&cell("A", 0)));
    let vj2 = scenario.flight("VJ2").unwrap();
    assert_eq!(-1, vj2.encoded.schedule_offset());
    assert_eq!(0, vj2.encoded.num_hold);
    assert_eq!(Some(Time(0)), vj2.flight_plan.start_time());

    scenario.reschedule("VJ2", -2, false).unwrap();
    let vj2 = scenario.flight("VJ2").unwrap();
    assert_eq!(1, vj2.encoded.schedule_offset());
    assert_eq!(1, vj2.encoded.num_hold);
}

#[test]
fn test_extreme_shifts_hit_the_limit() {
    let mut scenario = Scenario::new(environment(10), two_flights()).unwrap();

    assert_eq!(
        Err(ScenarioError::ShiftLimit {
            requested: i64::MAX,
            limit: 5
        }),
        scenario.reschedule("VN1", i64::MIN, false)
    );
    assert_eq!(
        Err(ScenarioError::ShiftLimit {
            requested: i64::MIN,
            limit: -2
        }),
        scenario.reschedule("VN1", i64::MIN, true)
    );

    scenario.reschedule("VN1", 1, true).unwrap();
    assert_eq!(
        Err(ScenarioError::ShiftLimit {
            requested: i64::MAX,
            limit: 5
        }),
        scenario.reschedule("VN1", i64::MAX, true)
    );
    assert!(matches!(
        scenario.reschedule("VN1", i64::MAX, false),
        Err(ScenarioError::ShiftLimit { limit: -2, .. })
    ));

    let vn1 = scenario.flight("VN1").unwrap();
    assert_eq!(1, vn1.encoded.schedule_offset());
    assert_eq!(2, scenario.demand(&cell("A", 2)));
}

#[test]
fn test_rejects_invalid_environment() {
    let environment = EnvironmentConfig {
        time_slot_duration: 0,
        ..environment(10)
    };
    assert!(matches!(
        Scenario::new(environment, two_flights()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_zero_shift_is_noop() {
    let mut scenario = Scenario::new(environment(10), two_flights()).unwrap();
    let delta = scenario.reschedule("VN1", 0, true).unwrap();

    assert!(delta.is_empty());
    assert_eq!(0, scenario.flight("VN1").unwrap().encoded.num_hold);
}

#[test]
fn test_departed_flight_is_frozen() {
    let mut scenario = Scenario::new(environment(10), two_flights()).unwrap();
    let cells = scenario.depart("VN1").unwrap();

    assert_eq!(vec![cell("A", 0), cell("A", 1), cell("B", 2)], cells);
    assert_eq!(
        Err(ScenarioError::Departed(id("VN1"))),
        scenario.reschedule("VN1", 1, true)
    );
    assert_eq!(Err(ScenarioError::Departed(id("VN1"))), scenario.depart("VN1"));
}

#[test]
fn test_unknown_flight() {
    let mut scenario = Scenario::new(environment(10), two_flights()).unwrap();
    assert_eq!(
        Err(ScenarioError::UnknownFlight(id("XX9"))),
        scenario.reschedule("XX9", 1, true)
    );
}

fn mixed_traffic() -> Vec<FlightPlan> {
    let mut local = FlightPlan::new(runway_plan("L1", "RWY1", 3600, 3660, RunwayUse::Departure));
    local.add(plan("L1", "S1", 3660, 4000)).unwrap();
    local.add(runway_plan("L1", "RWY2", 4000, 4060, RunwayUse::Arrival)).unwrap();

    let mut outbound = FlightPlan::new(runway_plan("O1", "RWY1", 3700, 3760, RunwayUse::Departure));
    outbound.add(plan("O1", "S2", 3760, 4200)).unwrap();

    let late = FlightPlan::new(plan("T1", "S1", 86_400 + 7200, 86_400 + 7300));
    let negative = FlightPlan::new(plan("N1", "S1", 500, 100));

    vec![local, outbound, late, negative]
}

#[test]
fn test_prepare_drops_negative_and_classifies() {
    let flights = prepare(&FlightPlanConfig::default(), mixed_traffic());

    let call_signs: Vec<_> = flights.iter().map(|f| f.call_sign().clone()).collect();
    assert_eq!(vec![id("L1"), id("O1"), id("T1")], call_signs);
    assert_eq!(Some(FlightType::Local), flights[0].stored_flight_type());
    assert_eq!(Some(FlightType::Outbound), flights[1].stored_flight_type());
    assert_eq!(None, flights[2].stored_flight_type());
}

#[test]
fn test_prepare_traffic_window_and_runway_trim() {
    let config = FlightPlanConfig {
        traffic_day: Some(0),
        traffic_hour: Some(1),
        exclude_non_local: true,
        exclude_runway: true,
        ..FlightPlanConfig::default()
    };
    let flights = prepare(&config, mixed_traffic());

    assert_eq!(1, flights.len());
    assert_eq!(vec![id("S1")], flights[0].facilities_passed());
    assert_eq!(FlightType::Local, flights[0].flight_type());
}
