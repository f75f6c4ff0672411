//! Cost refresh and terminal-status evaluation.

use tracing::info;

use bastion_core::enums::RunStatus;
use bastion_core::state::SimulationState;

use crate::cost::{cer_for_state, format_usd};
use crate::scenario::ScenarioPlan;

/// Refresh the CER snapshot, then settle the run status. Defeat outranks
/// victory on the same tick; timeout applies only to a run still in progress.
pub fn run(state: &mut SimulationState, plan: &ScenarioPlan) {
    state.cer = cer_for_state(state);

    let now = state.time;
    let scenario = &plan.scenario;
    let mut status = state.status;

    let all_phases_fired = state.phase >= scenario.phases.len();
    let all_spawned = state.threats.iter().all(|t| t.is_spawned(now));
    if all_phases_fired && all_spawned && state.live_threat_count() == 0 {
        status = RunStatus::Victory;
    }

    let hva_lost = scenario
        .hv_assets
        .iter()
        .zip(&state.hva_status)
        .any(|(hva, damage)| damage.damage_value > hva.damage_threshold());
    if hva_lost {
        status = RunStatus::Defeat;
    }

    if status == RunStatus::Running && now >= plan.mission.time_limit_seconds {
        status = RunStatus::Timeout;
    }

    if status != state.status {
        state.status = status;
        info!(
            scenario = %scenario.scenario_id,
            ?status,
            time = now,
            kills = state.destroyed_threats().count(),
            defense_cost = %format_usd(state.cer.defense_cost),
            cer = %state.cer.display_ratio(),
            "run finished"
        );
    }
}
