use crate::encoded::Cell;
use crate::flight_plan::FlightPlan;
use crate::tests::utils::{arb_encoded, arb_plan};
use proptest::prelude::*;
use proptest::proptest;
use std::collections::BTreeSet;

proptest! {
    #[test]
    fn test_add_keeps_plans_sorted(plans in prop::collection::vec(arb_plan(), 1..20)) {
        let mut iter = plans.into_iter();
        let mut fp = FlightPlan::new(iter.next().unwrap());
        for p in iter {
            fp.add(p).unwrap();
            prop_assert!(
                fp.plans().windows(2).all(|w| w[0].time_entry <= w[1].time_entry),
                "plans out of entry order: {:?}",
                fp.facility_entry_exit_times()
            );
        }
    }

    #[test]
    fn test_flight_plan_reschedule_round_trip(
        plans in prop::collection::vec(arb_plan(), 1..10),
        shift in -100_000..100_000i64,
    ) {
        let mut iter = plans.into_iter();
        let mut fp = FlightPlan::new(iter.next().unwrap());
        for p in iter {
            fp.add(p).unwrap();
        }
        let before = fp.clone();

        fp.reschedule(shift);
        fp.reschedule(-shift);

        prop_assert_eq!(before, fp);
    }

    #[test]
    fn test_hold_then_advance_restores_slots(efp in arb_encoded(), n in 0..50i64) {
        let mut shifted = efp.clone();
        shifted.hold(n);
        shifted.advance(n);

        prop_assert_eq!(efp.time_slot_ids(), shifted.time_slot_ids());
        prop_assert_eq!(efp.flight_plan(), shifted.flight_plan());
        prop_assert_eq!(efp.facility_ids(), shifted.facility_ids());
    }

    #[test]
    fn test_advance_and_hold_are_mirror_images(efp in arb_encoded(), n in 1..50i64) {
        let advanced = efp.clone().advance(n);
        let held = efp.clone().hold(n);

        let translated: BTreeSet<Cell> = advanced
            .vacated
            .iter()
            .map(|(facility, slot)| (facility.clone(), *slot + n))
            .collect();
        prop_assert_eq!(translated, held.occupied);
        prop_assert_eq!(advanced.vacated.len(), held.vacated.len());
    }

    #[test]
    fn test_inverse_shift_swaps_delta(efp in arb_encoded(), n in 1..50i64) {
        let mut shifted = efp.clone();
        let forward = shifted.hold(n);
        let backward = shifted.advance(n);

        prop_assert_eq!(&forward.vacated, &backward.occupied);
        prop_assert_eq!(&forward.occupied, &backward.vacated);
    }

    #[test]
    fn test_delta_matches_occupancy(efp in arb_encoded(), n in -50..50i64) {
        let mut shifted = efp.clone();
        let delta = shifted.reschedule(n.abs(), n > 0);

        let before = efp.occupied_cells();
        let after = shifted.occupied_cells();
        let rebuilt: BTreeSet<Cell> = before
            .difference(&delta.vacated)
            .cloned()
            .chain(delta.occupied.iter().cloned())
            .collect();
        prop_assert_eq!(after, rebuilt);
        prop_assert_eq!(shifted.facility_ids().len(), shifted.time_slot_ids().len());
    }
}
