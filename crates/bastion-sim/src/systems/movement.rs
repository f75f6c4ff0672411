//! Threat movement and arrival.
//!
//! Each spawned, live threat flies one tick along the great circle to its
//! target. Arrival ends the threat's run: it strikes an HVA within the strike
//! radius or otherwise escapes.

use bastion_core::constants::{HVA_STRIKE_DAMAGE_FRACTION, HVA_STRIKE_RADIUS_KM, TICK_SECONDS};
use bastion_core::enums::{EventKind, ThreatStatus};
use bastion_core::events::EventDetails;
use bastion_core::state::SimulationState;
use bastion_core::types::TrailPoint;
use bastion_geodesy::{bearing, distance_km, move_toward};

use crate::cost::format_usd;
use crate::scenario::ScenarioPlan;

pub fn run(state: &mut SimulationState, plan: &ScenarioPlan) {
    let now = state.time;
    let hvas = &plan.scenario.hv_assets;

    for i in 0..state.threats.len() {
        let threat = &mut state.threats[i];
        if !threat.is_in_play(now) {
            continue;
        }

        threat.push_trail(TrailPoint {
            lat: threat.position.lat,
            lon: threat.position.lon,
            time: now,
        });
        let step = move_toward(threat.position, threat.target, threat.speed, TICK_SECONDS);
        threat.position = step.position;
        if !step.arrived {
            threat.heading = bearing(threat.position, threat.target);
            continue;
        }

        threat.status = ThreatStatus::Escaped;
        let (id, name, position) = (threat.id, threat.definition.display_name(), threat.position);

        let struck = hvas
            .iter()
            .position(|hva| distance_km(position, hva.location()) < HVA_STRIKE_RADIUS_KM);
        match struck {
            Some(h) => {
                let hva = &hvas[h];
                let damage = hva.value_usd * HVA_STRIKE_DAMAGE_FRACTION;
                if let Some(status) = state.hva_status.get_mut(h) {
                    status.damaged = true;
                    status.damage_value += damage;
                }
                state.push_event(
                    EventKind::Damage,
                    format!("{name} struck {}! {} damage", hva.hva_type, format_usd(damage)),
                    Some(id),
                    Some(EventDetails::Strike {
                        hva_type: hva.hva_type.clone(),
                        damage_usd: damage,
                    }),
                );
            }
            None => {
                state.push_event(
                    EventKind::Escape,
                    format!("{name} reached its objective"),
                    Some(id),
                    None,
                );
            }
        }
    }
}
