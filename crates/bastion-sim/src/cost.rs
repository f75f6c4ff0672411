//! Cost-exchange model.
//!
//! Defense cost counts ammunition spent plus the acquisition cost of any lost
//! asset. Threat value counts only threats actually destroyed. The ratio of the
//! two is the headline score; lower is better.

use bastion_core::constants::{ECONOMIC_DAMAGE_WEIGHT, NAIVE_INTERCEPT_COST_USD};
use bastion_core::state::{AssetInstance, CerResult, SimulationState, ThreatInstance};

/// Compute the cost-exchange summary. With nothing destroyed, `cer` is `+∞`.
pub fn calculate_cer<'a>(
    assets: &[AssetInstance],
    destroyed_threats: impl IntoIterator<Item = &'a ThreatInstance>,
    destroyed_assets: impl IntoIterator<Item = &'a AssetInstance>,
    infrastructure_damage: f64,
) -> CerResult {
    let ammo_cost: f64 = assets
        .iter()
        .map(|a| f64::from(a.ammo_expended) * a.definition.cost_per_shot)
        .sum();
    let lost_asset_cost: f64 = destroyed_assets
        .into_iter()
        .map(|a| a.definition.cost_system)
        .sum();
    let defense_cost = ammo_cost + lost_asset_cost;

    let (kills, threat_value) = destroyed_threats
        .into_iter()
        .fold((0usize, 0.0), |(n, value), t| (n + 1, value + t.definition.cost_usd));

    let cer = if threat_value > 0.0 {
        defense_cost / threat_value
    } else {
        f64::INFINITY
    };
    let efficiency = if cer.is_finite() {
        ((1.0 - cer) * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let naive_cost = kills as f64 * NAIVE_INTERCEPT_COST_USD;

    CerResult {
        cer,
        defense_cost,
        threat_value,
        economic_damage: infrastructure_damage * ECONOMIC_DAMAGE_WEIGHT,
        efficiency,
        naive_cost,
        optimized_cost: defense_cost,
        savings: (naive_cost - defense_cost).max(0.0),
    }
}

/// Recompute the summary from any snapshot without re-simulating.
pub fn cer_for_state(state: &SimulationState) -> CerResult {
    calculate_cer(
        &state.assets,
        state.destroyed_threats(),
        state.destroyed_assets(),
        state.infrastructure_damage(),
    )
}

/// Compact dollar amount: `$1.2B`, `$3.4M`, `$12K`, `$950`.
pub fn format_usd(amount: f64) -> String {
    if amount >= 1e9 {
        format!("${:.1}B", amount / 1e9)
    } else if amount >= 1e6 {
        format!("${:.1}M", amount / 1e6)
    } else if amount >= 1e3 {
        format!("${:.0}K", amount / 1e3)
    } else {
        format!("${amount:.0}")
    }
}
