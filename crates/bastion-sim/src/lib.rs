//! Simulation engine for BASTION.
//!
//! Resolves a validated scenario into a plan, builds the initial state from
//! asset placements, and advances it one second per tick through a fixed
//! sequence of systems. `engine::step` is the functional core; the
//! `SimulationEngine` wraps it with a seeded RNG and a frame-rate knob.

pub mod catalog;
pub mod cost;
pub mod deployment;
pub mod detection;
pub mod engine;
pub mod environment;
pub mod error;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use bastion_core as core;
pub use engine::{step, SimConfig, SimulationEngine};
pub use environment::{EnvironmentModifiers, WeatherSnapshot};
pub use error::SimError;
pub use scenario::ScenarioPlan;

#[cfg(test)]
mod tests;
