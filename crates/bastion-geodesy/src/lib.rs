//! Geodesy for BASTION.
//!
//! Great-circle kinematics on a spherical Earth and the range/ceiling
//! line-of-sight gate. Pure functions, no state.

pub mod great_circle;
pub mod los;

pub use great_circle::{bearing, destination, distance_km, interpolate, move_toward, Movement};
pub use los::has_line_of_sight;
