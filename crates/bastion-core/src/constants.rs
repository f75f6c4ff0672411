//! Simulation constants and tuning parameters.

/// Simulated seconds per tick. One tick is one second of engagement time.
pub const TICK_SECONDS: f64 = 1.0;

/// Mean Earth radius used by the spherical model (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distances below this (in radians of arc) are treated as coincident points.
pub const COINCIDENT_ARC: f64 = 1e-10;

// --- Threat spawning ---

/// Maximum spawn position jitter in degrees, applied independently to lat and lon
/// (0.001° of latitude is roughly 111 m).
pub const SPAWN_JITTER_DEG: f64 = 0.001;

/// Fractional speed jitter applied to a threat's nominal speed at spawn (±20%).
pub const SPAWN_SPEED_JITTER: f64 = 0.2;

/// Seconds between consecutive threats of one spawn descriptor.
pub const SPAWN_STAGGER_SECS: u64 = 2;

/// Longest delay a spawn may declare (s).
pub const MAX_SPAWN_DELAY_SECS: u64 = 86_400;

/// Trail buffer capacity (positions kept per threat).
pub const TRAIL_CAPACITY: usize = 60;

// --- High-value assets ---

/// A threat arriving within this distance of an HVA strikes it (km).
pub const HVA_STRIKE_RADIUS_KM: f64 = 0.5;

/// Fraction of an HVA's value lost per successful strike.
pub const HVA_STRIKE_DAMAGE_FRACTION: f64 = 0.2;

// --- Detection ---

/// Detection probability at maximum sensor range, relative to point blank.
pub const RANGE_FALLOFF: f64 = 0.5;

/// Radar probability per square meter of RCS before the cap.
pub const RADAR_RCS_GAIN: f64 = 2.0;

/// Upper bound on radar detection probability.
pub const RADAR_MAX_PD: f64 = 0.95;

/// Targets below this altitude are terrain-masked for radar (meters).
pub const TERRAIN_MASK_ALTITUDE_M: f64 = 100.0;

/// Radar probability multiplier under terrain masking.
pub const TERRAIN_MASK_FACTOR: f64 = 0.4;

/// Thermal probability multiplier against decoy-like signatures.
pub const THERMAL_CONFUSION_FACTOR: f64 = 0.3;

/// Cellular IMEI detection probability at point blank.
pub const CELLULAR_PD: f64 = 0.9;

/// Targets above this altitude are hard to see visually (meters).
pub const VISUAL_CEILING_M: f64 = 2000.0;

/// Visual probability multiplier above `VISUAL_CEILING_M`.
pub const VISUAL_ALTITUDE_FACTOR: f64 = 0.3;

// --- Engagement ---

/// Threat speed at which the hit penalty saturates (m/s).
pub const HIT_PENALTY_REFERENCE_SPEED: f64 = 200.0;

/// Maximum fractional reduction of kill probability against fast threats.
pub const HIT_PENALTY_MAX: f64 = 0.3;

// --- Cost model ---

/// Baseline cost of one conventional interceptor per kill (USD).
pub const NAIVE_INTERCEPT_COST_USD: f64 = 1_000_000.0;

/// Display weighting applied to infrastructure damage.
pub const ECONOMIC_DAMAGE_WEIGHT: f64 = 1000.0;
