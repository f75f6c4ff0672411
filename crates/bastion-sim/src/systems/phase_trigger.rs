//! Phase triggering and threat spawning.

use rand::Rng;
use tracing::debug;

use bastion_core::constants::{SPAWN_JITTER_DEG, SPAWN_SPEED_JITTER, SPAWN_STAGGER_SECS};
use bastion_core::definitions::{Phase, PhaseTrigger};
use bastion_core::enums::*;
use bastion_core::events::EventDetails;
use bastion_core::state::{SimulationState, ThreatInstance};
use bastion_core::types::GeoPoint;
use bastion_geodesy::bearing;

use crate::scenario::ScenarioPlan;

/// Fire every pending phase whose trigger holds, strictly in list order.
/// A phase whose trigger does not hold blocks the phases after it.
pub fn run<R: Rng + ?Sized>(state: &mut SimulationState, plan: &ScenarioPlan, rng: &mut R) {
    while let Some(phase) = plan.scenario.phases.get(state.phase) {
        if !trigger_holds(&phase.trigger, state) {
            break;
        }
        let index = state.phase;
        spawn_phase(state, plan, index, rng);
        state.phase += 1;

        debug!(phase = index + 1, time = state.time, "phase triggered");
        state.push_event(
            EventKind::Phase,
            format!("Phase {} triggered", index + 1),
            None,
            None,
        );
        apply_command_override(state, phase);
    }
}

fn trigger_holds(trigger: &PhaseTrigger, state: &SimulationState) -> bool {
    let time_ok = trigger.time.map_or(true, |t| state.time >= t);
    let condition_ok = trigger.condition.map_or(true, |c| condition_holds(c, state));
    time_ok && condition_ok
}

fn condition_holds(condition: TriggerCondition, state: &SimulationState) -> bool {
    match condition {
        // Live threats include those still waiting on their spawn time.
        TriggerCondition::WaveCleared => state.live_threat_count() == 0,
        TriggerCondition::HvaDamaged => state.hva_status.iter().any(|h| h.damaged),
    }
}

fn spawn_phase<R: Rng + ?Sized>(
    state: &mut SimulationState,
    plan: &ScenarioPlan,
    index: usize,
    rng: &mut R,
) {
    let phase = &plan.scenario.phases[index];
    for (s, spawn) in phase.spawns.iter().enumerate() {
        // Every spawn was resolved when the plan was built.
        let Some(definition) = plan.spawn_threat(index, s) else {
            continue;
        };
        let target = plan.target_for(spawn);
        let delay = spawn.delay.unwrap_or(0);

        for i in 0..spawn.count {
            let position = GeoPoint::new(
                spawn.lat + rng.gen_range(-SPAWN_JITTER_DEG..=SPAWN_JITTER_DEG),
                spawn.lon + rng.gen_range(-SPAWN_JITTER_DEG..=SPAWN_JITTER_DEG),
            );
            let altitude = match spawn.altitude {
                Some(altitude) => altitude,
                None => {
                    let band = definition.altitude_m;
                    rng.gen_range(band.min()..=band.max())
                }
            };
            let speed = definition.speed_ms
                * rng.gen_range(1.0 - SPAWN_SPEED_JITTER..=1.0 + SPAWN_SPEED_JITTER);

            let id = state.allocate_id();
            state.threats.push(ThreatInstance {
                id,
                definition: definition.clone(),
                position,
                altitude,
                heading: bearing(position, target),
                speed,
                status: ThreatStatus::Active,
                health: 1.0,
                spawn_time: state
                    .time
                    .saturating_add(delay)
                    .saturating_add(u64::from(i) * SPAWN_STAGGER_SECS),
                target,
                trail: Default::default(),
            });
            state.push_event(
                EventKind::Spawn,
                format!("{} spawned at phase {}", definition.display_name(), index + 1),
                Some(id),
                None,
            );
        }
    }
}

fn apply_command_override(state: &mut SimulationState, phase: &Phase) {
    let Some(overrides) = &phase.command_override else {
        return;
    };
    for (&side, &authority) in overrides {
        if side == Side::Blue {
            state.blue_roe = Some(authority);
        }
        let side_name = match side {
            Side::Blue => "Blue",
            Side::Red => "Red",
        };
        state.push_event(
            EventKind::Command,
            format!("{side_name} command: ROE now {}", authority.as_str()),
            None,
            Some(EventDetails::RoeChange { side, authority }),
        );
    }
}
