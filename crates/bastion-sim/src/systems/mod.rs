//! Per-tick systems.
//!
//! Systems are plain functions over `&mut SimulationState`. They own no state
//! and run in a fixed order (see `engine::advance`); entities of one kind are
//! always visited in list order, which keeps a seeded run reproducible.

pub mod detection;
pub mod engagement;
pub mod movement;
pub mod outcome;
pub mod phase_trigger;
pub mod reload;
