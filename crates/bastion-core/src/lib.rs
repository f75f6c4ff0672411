//! Core types and definitions for the BASTION engagement simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! reference definitions, the registry that validates them, runtime
//! entities, the simulation state aggregate, events, and constants.
//! It contains no simulation logic.

pub mod constants;
pub mod definitions;
pub mod enums;
pub mod error;
pub mod events;
pub mod registry;
pub mod state;
pub mod types;

pub use error::{RegistryError, ValidationError};
pub use registry::Registry;
