//! Flight trajectories over facility time slots, and the demand changes
//! caused by holding or advancing a flight.

pub mod config;
pub mod encode;
pub mod encoded;
pub mod error;
pub mod extract;
pub mod flight_plan;
pub mod plan;
pub mod scenario;
pub mod time;

#[cfg(test)]
mod tests;
