use crate::config::{Config, EnvironmentConfig, FlightPlanConfig};
use crate::error::ConfigError;
use crate::encode::Encoder;
use crate::encoded::{Cell, EncodedFlightPlan, SlotDelta};
use crate::error::{ExtractError, ScenarioError};
use crate::extract::{classify_flight_types, exclude_negative_flights, extract_flight_plans, load_records};
use crate::flight_plan::{CallSign, FlightPlan, FlightType};
use std::collections::HashMap;
use tracing::{debug, info};

/// A flight as tracked by the scenario: its trajectory in time units and
/// its slot encoding.
#[derive(Debug, Clone)]
pub struct ScenarioFlight {
    pub flight_plan: FlightPlan,
    pub encoded: EncodedFlightPlan,
}

/// Flights of one scenario together with the per-cell demand they create.
pub struct Scenario {
    environment: EnvironmentConfig,
    flights: Vec<ScenarioFlight>,
    flights_index: HashMap<CallSign, usize>,
    demand: HashMap<Cell, u32>,
}

impl Scenario {
    pub fn new(
        environment: EnvironmentConfig,
        flight_plans: Vec<FlightPlan>,
    ) -> Result<Scenario, ConfigError> {
        environment.validate()?;
        let mut encoder = Encoder::new(environment.time_slot_duration)?;
        let flights: Vec<ScenarioFlight> = flight_plans
            .into_iter()
            .map(|fp| ScenarioFlight {
                encoded: encoder.encode(&fp),
                flight_plan: fp,
            })
            .collect();
        let flights_index = flights
            .iter()
            .enumerate()
            .map(|(i, f)| (f.flight_plan.call_sign().clone(), i))
            .collect::<HashMap<CallSign, usize>>();

        let mut demand: HashMap<Cell, u32> = HashMap::new();
        flights
            .iter()
            .flat_map(|f| f.encoded.occupied_cells())
            .for_each(|cell| *demand.entry(cell).or_default() += 1);

        let mut scenario = Scenario {
            environment,
            flights,
            flights_index,
            demand,
        };
        scenario.refresh_overcapacity();
        Ok(scenario)
    }

    /// Reads, filters and encodes the flight plans the configuration points at.
    pub fn load(config: &Config) -> Result<Scenario, ExtractError> {
        let records = load_records(&config.flight_plan.file_path)?;
        let flight_plans = extract_flight_plans(&records, &config.field_mapping())?;
        let flight_plans = prepare(&config.flight_plan, flight_plans);
        info!(
            path = %config.flight_plan.file_path.display(),
            flights = flight_plans.len(),
            "loaded scenario"
        );
        Ok(Scenario::new(config.environment.clone(), flight_plans)?)
    }

    pub fn environment(&self) -> &EnvironmentConfig {
        &self.environment
    }

    pub fn flights(&self) -> &[ScenarioFlight] {
        &self.flights
    }

    pub fn flight(&self, call_sign: &str) -> Option<&ScenarioFlight> {
        self.flights_index.get(call_sign).map(|i| &self.flights[*i])
    }

    pub fn demand(&self, cell: &Cell) -> u32 {
        self.demand.get(cell).copied().unwrap_or(0)
    }

    /// Cells whose demand exceeds the facility capacity, most loaded first.
    pub fn overloaded(&self) -> Vec<(Cell, u32)> {
        let mut cells: Vec<(Cell, u32)> = self
            .demand
            .iter()
            .filter(|(_, count)| **count > self.environment.default_capacity)
            .map(|(cell, count)| (cell.clone(), *count))
            .collect();
        cells.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        cells
    }

    fn index_of(&self, call_sign: &str) -> Result<usize, ScenarioError> {
        let idx = *self
            .flights_index
            .get(call_sign)
            .ok_or_else(|| ScenarioError::UnknownFlight(CallSign::from(call_sign)))?;
        if self.flights[idx].encoded.is_departed() {
            return Err(ScenarioError::Departed(CallSign::from(call_sign)));
        }
        Ok(idx)
    }

    /// Shifts a flight by `n` slots, later when `delay` is set, and moves its
    /// demand accordingly. The flight's total offset from its original
    /// departure must stay within the configured advance/delay limits. A
    /// negative `n` reverses the direction; only net delays count as holds.
    pub fn reschedule(
        &mut self,
        call_sign: &str,
        n: i64,
        delay: bool,
    ) -> Result<SlotDelta, ScenarioError> {
        let idx = self.index_of(call_sign)?;
        let signed = if delay { n } else { n.saturating_neg() };
        let current = self.flights[idx].encoded.schedule_offset();
        let offset = current.saturating_add(signed);
        let max_delay = self.environment.max_delay_num;
        let max_advance = self.environment.max_advance_num.saturating_neg();
        let limit = if offset > 0 { max_delay } else { max_advance };
        if current.checked_add(signed).is_none() || !(max_advance..=max_delay).contains(&offset) {
            return Err(ScenarioError::ShiftLimit {
                requested: offset,
                limit,
            });
        }
        let shift = signed
            .checked_mul(self.environment.time_slot_duration)
            .ok_or(ScenarioError::ShiftLimit {
                requested: offset,
                limit,
            })?;

        let flight = &mut self.flights[idx];
        let delta = flight.encoded.reschedule(signed, true);
        if signed == 0 {
            return Ok(delta);
        }
        flight.flight_plan.reschedule(shift);
        if signed > 0 {
            flight.encoded.num_hold += 1;
        }

        delta.vacated.iter().for_each(|cell| {
            if let Some(count) = self.demand.get_mut(cell) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.demand.remove(cell);
                }
            }
        });
        delta
            .occupied
            .iter()
            .for_each(|cell| *self.demand.entry(cell.clone()).or_default() += 1);
        self.refresh_overcapacity();

        #[cfg(debug_assertions)]
        self.assert_invariants();

        debug!(call_sign, offset, "rescheduled flight");
        Ok(delta)
    }

    /// Marks a flight departed, returning the cells it finally occupies.
    pub fn depart(&mut self, call_sign: &str) -> Result<Vec<Cell>, ScenarioError> {
        let idx = self.index_of(call_sign)?;
        Ok(self.flights[idx].encoded.depart())
    }

    fn refresh_overcapacity(&mut self) {
        let capacity = self.environment.default_capacity;
        let demand = &self.demand;
        self.flights.iter_mut().for_each(|f| {
            f.encoded.num_overcapacity = f
                .encoded
                .occupied_cells()
                .iter()
                .filter(|cell| demand.get(*cell).is_some_and(|c| *c > capacity))
                .count() as u32;
        });
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        let mut expected: HashMap<Cell, u32> = HashMap::new();
        self.flights
            .iter()
            .flat_map(|f| f.encoded.occupied_cells())
            .for_each(|cell| *expected.entry(cell).or_default() += 1);
        debug_assert_eq!(expected, self.demand, "demand <-> flight occupancy violated");

        debug_assert!(
            self.flights
                .iter()
                .all(|f| f.encoded.facility_ids().len() == f.encoded.time_slot_ids().len()),
            "flat facility <-> slot length violated"
        );
    }
}

/// Applies the configured exclusions and traffic window to extracted
/// flight plans.
pub fn prepare(config: &FlightPlanConfig, flight_plans: Vec<FlightPlan>) -> Vec<FlightPlan> {
    let mut flight_plans = exclude_negative_flights(flight_plans);
    classify_flight_types(&mut flight_plans);

    flight_plans
        .into_iter()
        .filter(|fp| {
            fp.start_time().is_some_and(|start| {
                config.traffic_day.is_none_or(|day| start.day() == day)
                    && config.traffic_hour.is_none_or(|hour| start.hour_of_day() == hour)
            })
        })
        .filter(|fp| !config.exclude_non_local || fp.flight_type() == FlightType::Local)
        .map(|fp| {
            if config.exclude_runway {
                fp.trim_runway()
            } else {
                fp
            }
        })
        .filter(|fp| !fp.is_empty())
        .collect()
}
