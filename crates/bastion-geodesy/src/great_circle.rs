//! Great-circle distance, bearing, and interpolated movement.
//!
//! Interpolation works on unit vectors: both endpoints are lifted onto the
//! unit sphere, blended with spherical-linear weights, and projected back.

use glam::DVec3;

use bastion_core::constants::{COINCIDENT_ARC, EARTH_RADIUS_KM};
use bastion_core::types::GeoPoint;

/// Result of one `move_toward` step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub position: GeoPoint,
    /// True when the step reached (and snapped to) the target.
    pub arrived: bool,
}

/// Haversine distance between two points (km).
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    EARTH_RADIUS_KM * central_angle(from, to)
}

/// Spherical interpolation from `from` toward `to`. `fraction` 0 is `from`, 1 is `to`.
/// Returns `from` unchanged when the two points coincide.
pub fn interpolate(from: GeoPoint, to: GeoPoint, fraction: f64) -> GeoPoint {
    let d = central_angle(from, to);
    if d < COINCIDENT_ARC {
        return from;
    }
    let sin_d = d.sin();
    let a = ((1.0 - fraction) * d).sin() / sin_d;
    let b = (fraction * d).sin() / sin_d;
    from_unit(a * to_unit(from) + b * to_unit(to))
}

/// Advance `speed_ms` for `dt_secs` along the great circle toward `target`.
/// Snaps exactly onto the target when the step would reach or pass it.
pub fn move_toward(position: GeoPoint, target: GeoPoint, speed_ms: f64, dt_secs: f64) -> Movement {
    let remaining = distance_km(position, target);
    let travel = speed_ms * dt_secs / 1000.0;
    if travel >= remaining {
        return Movement {
            position: target,
            arrived: true,
        };
    }
    Movement {
        position: interpolate(position, target, travel / remaining),
        arrived: false,
    }
}

/// Initial bearing from `from` to `to` in degrees, `[0, 360)`.
pub fn bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_lambda = (to.lon - from.lon).to_radians();
    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    let deg = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round a tiny negative angle up to exactly 360.
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

/// The point `distance_km` away from `from` along initial `bearing_deg`.
pub fn destination(from: GeoPoint, bearing_deg: f64, distance_km: f64) -> GeoPoint {
    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let phi1 = from.lat.to_radians();
    let lambda1 = from.lon.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    let lon = (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    GeoPoint::new(phi2.to_degrees(), lon)
}

/// Central angle between two points (radians), haversine form.
fn central_angle(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_phi = (to.lat - from.lat).to_radians();
    let d_lambda = (to.lon - from.lon).to_radians();
    let a = (d_phi / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt())
}

fn to_unit(point: GeoPoint) -> DVec3 {
    let phi = point.lat.to_radians();
    let lambda = point.lon.to_radians();
    DVec3::new(phi.cos() * lambda.cos(), phi.cos() * lambda.sin(), phi.sin())
}

fn from_unit(v: DVec3) -> GeoPoint {
    let lat = v.z.atan2(v.x.hypot(v.y));
    let lon = v.y.atan2(v.x);
    GeoPoint::new(lat.to_degrees(), lon.to_degrees())
}
