//! Synthetic delay generation.
//!
//! Stands apart from the real pipeline: it exists to test modelling
//! assumptions (per-day delay rates, incident mix, delay durations)
//! against data with known parameters. The seed is fixed so every run
//! produces the same tables.

use crate::output::write_records;
use crate::paths;
use crate::records::{Incident, Weekday};
use anyhow::{Result, ensure};
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand_distr::{Normal, Poisson};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

const SEED: u64 = 302;

/// Expected number of subway delay events in the simulated period.
const MEAN_SUBWAY_DELAYS: f64 = 20_000.0;

/// The bus dataset runs about one and a half times the subway's size,
/// and the two delay volumes are assumed correlated.
const BUS_TO_SUBWAY_RATIO: f64 = 1.5;

/// Operating days and their delay weights, Sunday-first: weekends run
/// high, midweek runs low.
const OPERATING_DAYS: [Weekday; 7] = [
    Weekday::Sunday,
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
];
const DAY_WEIGHTS: [f64; 7] = [0.18, 0.14, 0.10, 0.10, 0.11, 0.17, 0.20];

/// Incident mix, aligned with [`Incident::ALL`].
const INCIDENT_WEIGHTS: [f64; 4] = [0.3, 0.2, 0.4, 0.2];

const MEAN_DELAY_MINUTES: f64 = 30.0;
const MAX_PLAUSIBLE_DELAY: i64 = 60 * 5;

#[derive(Debug, Clone, Serialize)]
pub struct SimulatedDelay {
    pub day: Weekday,
    /// Time of day in fractional hours, wrapped into [0, 24).
    pub time: f64,
    pub incident: Incident,
    pub delay_time: i64,
}

pub struct Simulation {
    pub subway: Vec<SimulatedDelay>,
    pub bus: Vec<SimulatedDelay>,
}

/// Generates the simulated subway and bus delay tables and writes them
/// to their fixed paths.
pub fn run() -> Result<()> {
    let sim = generate()?;
    info!(
        subway = sim.subway.len(),
        bus = sim.bus.len(),
        "Simulated delay events"
    );

    write_records(paths::SIM_SUBWAY_DELAYS, &sim.subway)?;
    write_records(paths::SIM_BUS_DELAYS, &sim.bus)?;
    Ok(())
}

pub fn generate() -> Result<Simulation> {
    let mut rng = StdRng::seed_from_u64(SEED);

    let num_subway = Poisson::new(MEAN_SUBWAY_DELAYS)?.sample(&mut rng) as usize;
    let num_bus = (BUS_TO_SUBWAY_RATIO * num_subway as f64) as usize;

    let subway = draw_events(&mut rng, num_subway)?;
    let bus = draw_events(&mut rng, num_bus)?;

    check_contract(&subway)?;
    check_contract(&bus)?;

    Ok(Simulation { subway, bus })
}

fn draw_events(rng: &mut StdRng, count: usize) -> Result<Vec<SimulatedDelay>> {
    let day_dist = WeightedIndex::new(DAY_WEIGHTS)?;
    let incident_dist = WeightedIndex::new(INCIDENT_WEIGHTS)?;
    // Delays peak in the late afternoon
    let time_dist: Normal<f64> = Normal::new(17.0, 6.0)?;
    let delay_dist = Poisson::new(MEAN_DELAY_MINUTES)?;

    let events = (0..count)
        .map(|_| SimulatedDelay {
            day: OPERATING_DAYS[day_dist.sample(rng)],
            time: time_dist.sample(rng).rem_euclid(24.0),
            incident: Incident::ALL[incident_dist.sample(rng)],
            // +1 keeps every simulated delay strictly positive
            delay_time: delay_dist.sample(rng) as i64 + 1,
        })
        .collect();

    Ok(events)
}

/// Post-generation contract. A violation means the generator itself is
/// wrong, so it halts the run.
fn check_contract(events: &[SimulatedDelay]) -> Result<()> {
    let incidents: HashSet<Incident> = events.iter().map(|e| e.incident).collect();
    ensure!(
        incidents.len() == Incident::ALL.len(),
        "incident set must cover all {} categories, found {}",
        Incident::ALL.len(),
        incidents.len()
    );

    let days: HashSet<Weekday> = events.iter().map(|e| e.day).collect();
    ensure!(days.len() == 7, "expected 7 distinct weekdays, found {}", days.len());

    for event in events {
        ensure!(
            (1..=MAX_PLAUSIBLE_DELAY).contains(&event.delay_time),
            "delay {} outside [1, {MAX_PLAUSIBLE_DELAY}] minutes",
            event.delay_time
        );
        ensure!(
            (0.0..24.0).contains(&event.time),
            "time of day {} outside [0, 24)",
            event.time
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_satisfies_contract() {
        // generate() runs its own contract checks; reaching Ok is the test
        let sim = generate().unwrap();
        assert!(!sim.subway.is_empty());
        assert_eq!(sim.bus.len(), (1.5 * sim.subway.len() as f64) as usize);
    }

    #[test]
    fn test_generate_is_reproducible() {
        let first = generate().unwrap();
        let second = generate().unwrap();

        assert_eq!(first.subway.len(), second.subway.len());
        assert_eq!(first.subway[0].day, second.subway[0].day);
        assert_eq!(first.subway[0].time, second.subway[0].time);
        assert_eq!(first.subway[0].delay_time, second.subway[0].delay_time);
        assert_eq!(first.bus.len(), second.bus.len());
    }

    #[test]
    fn test_contract_rejects_out_of_range_delay() {
        let mut events = generate().unwrap().subway;
        events[0].delay_time = 0;
        assert!(check_contract(&events).is_err());
    }
}
