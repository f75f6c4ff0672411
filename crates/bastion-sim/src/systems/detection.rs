//! Detection pass: sensors roll against every active, spawned threat.

use std::sync::Arc;

use rand::Rng;

use bastion_core::enums::{EventKind, ThreatStatus};
use bastion_core::events::EventDetails;
use bastion_core::state::SimulationState;

use crate::detection::detect;
use crate::environment::EnvironmentModifiers;

/// Promote threats to detected on a successful roll. Detected threats are not
/// re-rolled, and nothing here ever demotes a threat.
pub fn run<R: Rng + ?Sized>(state: &mut SimulationState, env: &EnvironmentModifiers, rng: &mut R) {
    let now = state.time;

    for a in 0..state.assets.len() {
        let asset = &state.assets[a];
        if !asset.status.sensors_online() {
            continue;
        }
        let (asset_id, position) = (asset.id, asset.position);
        let definition = Arc::clone(&asset.definition);

        for t in 0..state.threats.len() {
            let threat = &state.threats[t];
            if threat.status != ThreatStatus::Active || !threat.is_spawned(now) {
                continue;
            }
            let outcome = detect(&definition, position, threat, env, rng);
            let (true, Some(method)) = (outcome.detected, outcome.method) else {
                continue;
            };

            let threat = &mut state.threats[t];
            threat.status = ThreatStatus::Detected;
            let (threat_id, threat_name) = (threat.id, threat.definition.display_name());
            state.push_event(
                EventKind::Detect,
                format!(
                    "{} detected {} via {} ({:.0}% conf)",
                    definition.display_name(),
                    threat_name,
                    method.as_str(),
                    outcome.probability * 100.0
                ),
                Some(threat_id),
                Some(EventDetails::Detection {
                    asset_id,
                    method,
                    probability: outcome.probability,
                }),
            );
        }
    }
}
