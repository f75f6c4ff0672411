//! Sensor detection model.
//!
//! Each asset votes with its best modality: every detection capability yields a
//! probability, the maximum wins, and a single Bernoulli draw against it decides
//! the tick. Nothing accumulates between ticks.

use rand::Rng;
use serde::{Deserialize, Serialize};

use bastion_core::constants::*;
use bastion_core::definitions::AssetDefinition;
use bastion_core::enums::{DetectionCapability, ThermalSignature, VisualSignature};
use bastion_core::state::ThreatInstance;
use bastion_core::types::GeoPoint;
use bastion_geodesy::distance_km;

use crate::environment::EnvironmentModifiers;

/// Result of one detection roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    pub detected: bool,
    /// The modality that produced `probability`. `None` when no modality applies.
    pub method: Option<DetectionCapability>,
    pub probability: f64,
}

impl DetectionOutcome {
    fn none() -> Self {
        Self {
            detected: false,
            method: None,
            probability: 0.0,
        }
    }
}

/// Best detection probability any of the asset's sensors achieves against the
/// threat, with the modality that achieved it. Out of range is `(None, 0.0)`.
pub fn detection_probability(
    asset: &AssetDefinition,
    asset_position: GeoPoint,
    threat: &ThreatInstance,
    env: &EnvironmentModifiers,
) -> (Option<DetectionCapability>, f64) {
    let distance = distance_km(asset_position, threat.position);
    if distance > asset.range_km {
        return (None, 0.0);
    }
    let range_factor = 1.0 - RANGE_FALLOFF * (distance / asset.range_km);

    let mut best = (None, 0.0);
    for &capability in &asset.detection_capabilities {
        let probability = capability_probability(capability, threat, range_factor, env);
        if probability > best.1 {
            best = (Some(capability), probability);
        }
    }
    best
}

fn capability_probability(
    capability: DetectionCapability,
    threat: &ThreatInstance,
    range_factor: f64,
    env: &EnvironmentModifiers,
) -> f64 {
    let definition = &threat.definition;
    match capability {
        DetectionCapability::Radar => {
            let mut p = (definition.signature.rcs * RADAR_RCS_GAIN * range_factor).min(RADAR_MAX_PD);
            if threat.altitude < TERRAIN_MASK_ALTITUDE_M {
                p *= TERRAIN_MASK_FACTOR;
            }
            p * env.radar_degradation
        }
        DetectionCapability::Thermal => {
            let thermal = definition.signature.thermal;
            let mut p = thermal_base(thermal) * range_factor;
            if thermal == ThermalSignature::HighConfusion {
                p *= THERMAL_CONFUSION_FACTOR;
            }
            p * env.visibility_factor
        }
        // Binary gate on the navigation link; weather does not apply.
        DetectionCapability::CellularImei => {
            if definition.uses_cellular() {
                CELLULAR_PD * range_factor
            } else {
                0.0
            }
        }
        DetectionCapability::Visual => {
            let mut p = visual_base(definition.signature.visual) * range_factor;
            if threat.altitude > VISUAL_CEILING_M {
                p *= VISUAL_ALTITUDE_FACTOR;
            }
            p * env.visibility_factor
        }
    }
}

fn thermal_base(signature: ThermalSignature) -> f64 {
    match signature {
        ThermalSignature::High | ThermalSignature::HighConfusion => 0.9,
        ThermalSignature::Medium => 0.6,
        ThermalSignature::Low => 0.3,
        ThermalSignature::None => 0.0,
    }
}

fn visual_base(signature: VisualSignature) -> f64 {
    match signature {
        VisualSignature::High => 0.8,
        VisualSignature::Medium => 0.5,
        VisualSignature::Low => 0.2,
        VisualSignature::None => 0.0,
    }
}

/// Roll one detection attempt. A zero probability never draws from `rng`.
pub fn detect<R: Rng + ?Sized>(
    asset: &AssetDefinition,
    asset_position: GeoPoint,
    threat: &ThreatInstance,
    env: &EnvironmentModifiers,
    rng: &mut R,
) -> DetectionOutcome {
    let (method, probability) = detection_probability(asset, asset_position, threat, env);
    if method.is_none() {
        return DetectionOutcome::none();
    }
    DetectionOutcome {
        detected: rng.gen_bool(probability.clamp(0.0, 1.0)),
        method,
        probability,
    }
}
