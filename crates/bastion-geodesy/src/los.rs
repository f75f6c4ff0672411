//! Range and altitude-ceiling line-of-sight gate.
//!
//! No terrain occlusion: an engagement is possible whenever the target is
//! within range and inside the weapon's altitude band.

use bastion_core::types::{Band, GeoPoint};

use crate::great_circle::distance_km;

/// True iff the threat is within `max_range_km` and its altitude lies inside
/// `ceiling` (inclusive).
pub fn has_line_of_sight(
    asset: GeoPoint,
    threat: GeoPoint,
    threat_altitude_m: f64,
    max_range_km: f64,
    ceiling: Band,
) -> bool {
    distance_km(asset, threat) <= max_range_km && ceiling.contains(threat_altitude_m)
}
