//! Initial state construction from a plan and asset placements.

use std::sync::Arc;

use tracing::info;

use bastion_core::state::{AssetInstance, AssetPlacement, HvaStatus, SimulationState};
use bastion_core::Registry;

use crate::cost::cer_for_state;
use crate::error::SimError;
use crate::scenario::ScenarioPlan;

/// Build the tick-zero state: every placement becomes an active, fully loaded
/// asset, every scenario HVA starts undamaged, and no threats exist yet.
pub fn initial_state(
    plan: &ScenarioPlan,
    registry: &Registry,
    placements: &[AssetPlacement],
) -> Result<SimulationState, SimError> {
    let hva_status = plan
        .scenario
        .hv_assets
        .iter()
        .map(|hva| HvaStatus {
            hva_type: hva.hva_type.clone(),
            damaged: false,
            damage_value: 0.0,
        })
        .collect();

    let mut state = SimulationState::new(Vec::with_capacity(placements.len()), hva_status, 0);
    for (index, placement) in placements.iter().enumerate() {
        let definition = registry
            .asset(&placement.asset_type)
            .map_err(|_| SimError::UnknownAsset(placement.asset_type.clone()))?;
        let position = placement.location();
        if !position.is_valid() {
            return Err(SimError::InvalidPlacement {
                index,
                asset_type: placement.asset_type.clone(),
            });
        }
        let id = state.allocate_id();
        state
            .assets
            .push(AssetInstance::new(id, Arc::clone(definition), position));
    }
    state.cer = cer_for_state(&state);

    info!(
        scenario = %plan.scenario.scenario_id,
        assets = state.assets.len(),
        threats = plan.scenario.total_threats(),
        phases = plan.phase_count(),
        "scenario ready"
    );
    Ok(state)
}
