//! Reload countdown.

use tracing::debug;

use bastion_core::enums::EventKind;
use bastion_core::state::SimulationState;

/// Count down every reloading asset and restock those that reach zero. An
/// asset that began reloading this tick waits until the next one, unless its
/// reload takes no time at all.
pub fn run(state: &mut SimulationState) {
    let now = state.time;

    for a in 0..state.assets.len() {
        let asset = &mut state.assets[a];
        if !asset.reloading {
            continue;
        }
        if asset.reload_started_at == Some(now) && asset.reload_timer > 0 {
            continue;
        }
        asset.reload_timer = asset.reload_timer.saturating_sub(1);
        if asset.reload_timer > 0 {
            continue;
        }
        asset.restock();

        let (id, name) = (asset.id, asset.definition.display_name());
        debug!(asset = %id, time = now, "reload complete");
        state.push_event(EventKind::Reload, format!("{name} reloaded"), Some(id), None);
    }
}
