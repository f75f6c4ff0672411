//! Deployment planning: expanding asset groups into placements and checking a
//! placement set against the scenario's budget and separation constraints.

use serde::{Deserialize, Serialize};

use bastion_core::state::AssetPlacement;
use bastion_core::types::GeoPoint;
use bastion_core::Registry;
use bastion_geodesy::{destination, distance_km};

use crate::error::SimError;
use crate::scenario::ScenarioPlan;

/// Expand a registered asset group into placements on a ring of `spacing_km`
/// around `anchor`, members in group order. A single asset sits on the anchor.
pub fn deploy_group(
    registry: &Registry,
    group_id: &str,
    anchor: GeoPoint,
    spacing_km: f64,
) -> Result<Vec<AssetPlacement>, SimError> {
    let group = registry.asset_group(group_id)?;
    let types: Vec<&str> = group
        .assets
        .iter()
        .flat_map(|member| {
            std::iter::repeat(member.asset_type.as_str()).take(member.deployable() as usize)
        })
        .collect();

    let n = types.len();
    let placements = types
        .into_iter()
        .enumerate()
        .map(|(i, asset_type)| {
            let at = if n == 1 {
                anchor
            } else {
                destination(anchor, 360.0 * i as f64 / n as f64, spacing_km)
            };
            AssetPlacement::new(asset_type, at.lat, at.lon)
        })
        .collect();
    Ok(placements)
}

/// Two placements closer than the mission allows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparationViolation {
    pub first: usize,
    pub second: usize,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentReport {
    /// Summed acquisition cost of every placed system (USD).
    pub total_cost: f64,
    /// Scenario blue budget minus `total_cost`. Negative when over.
    pub scenario_budget_remaining: f64,
    /// Mission `max_budget_usd` minus `total_cost`. Negative when over.
    pub mission_budget_remaining: f64,
    pub separation_violations: Vec<SeparationViolation>,
}

impl DeploymentReport {
    pub fn within_budget(&self) -> bool {
        self.scenario_budget_remaining >= 0.0 && self.mission_budget_remaining >= 0.0
    }

    pub fn is_acceptable(&self) -> bool {
        self.within_budget() && self.separation_violations.is_empty()
    }
}

/// Price a placement set and check pairwise separation against the mission.
pub fn assess_deployment(
    registry: &Registry,
    plan: &ScenarioPlan,
    placements: &[AssetPlacement],
) -> Result<DeploymentReport, SimError> {
    let mut total_cost = 0.0;
    for placement in placements {
        let definition = registry
            .asset(&placement.asset_type)
            .map_err(|_| SimError::UnknownAsset(placement.asset_type.clone()))?;
        total_cost += definition.cost_system;
    }

    let min_separation = plan.mission.constraints.min_asset_separation_km;
    let mut separation_violations = Vec::new();
    for (i, a) in placements.iter().enumerate() {
        for (j, b) in placements.iter().enumerate().skip(i + 1) {
            let d = distance_km(a.location(), b.location());
            if d < min_separation {
                separation_violations.push(SeparationViolation {
                    first: i,
                    second: j,
                    distance_km: d,
                });
            }
        }
    }

    Ok(DeploymentReport {
        total_cost,
        scenario_budget_remaining: plan.scenario.sides.blue.budget_usd - total_cost,
        mission_budget_remaining: plan.mission.constraints.max_budget_usd - total_cost,
        separation_violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    const ANCHOR: GeoPoint = GeoPoint { lat: 50.29, lon: 36.94 };

    #[test]
    fn test_deploy_group_respects_max_deployable() {
        let registry = catalog::builtin_registry().unwrap();
        // nasams: count 3, max 2; thermal_sensor: count 1.
        let placements = deploy_group(&registry, "medium_sam_battery", ANCHOR, 2.5).unwrap();
        let types: Vec<_> = placements.iter().map(|p| p.asset_type.as_str()).collect();
        assert_eq!(types, ["nasams", "nasams", "thermal_sensor"]);
        for p in &placements {
            assert!((distance_km(ANCHOR, p.location()) - 2.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_deploy_single_asset_on_anchor() {
        let registry = catalog::builtin_registry().unwrap();
        let group = registry.asset_group("heavy_sam_battery").unwrap();
        assert_eq!(group.assets[0].deployable(), 1);

        let placements = deploy_group(&registry, "spaag_section", ANCHOR, 1.0).unwrap();
        assert_eq!(placements.len(), 3);
    }

    #[test]
    fn test_deploy_unknown_group() {
        let registry = catalog::builtin_registry().unwrap();
        let err = deploy_group(&registry, "armored_division", ANCHOR, 1.0).unwrap_err();
        assert!(matches!(err, SimError::Registry(_)));
        assert_eq!(err.to_string(), "unknown asset group 'armored_division'");
    }

    #[test]
    fn test_assessment_flags_budget_and_spacing() {
        let registry = catalog::builtin_registry().unwrap();
        let plan = ScenarioPlan::resolve(&registry, "vovchansk_pocket_2026").unwrap();
        // point_defense wants 2 km between systems.
        let placements = vec![
            AssetPlacement::new("gepard", 50.290, 36.940),
            AssetPlacement::new("gepard", 50.295, 36.940), // ~0.56 km from the first
            AssetPlacement::new("laser_cuas", 50.330, 36.940),
        ];
        let report = assess_deployment(&registry, &plan, &placements).unwrap();
        assert_eq!(report.separation_violations.len(), 1);
        assert_eq!(report.separation_violations[0].first, 0);
        assert_eq!(report.separation_violations[0].second, 1);
        assert!(report.within_budget());
        assert!(!report.is_acceptable());

        let lavish = vec![AssetPlacement::new("patriot_battery", 50.29, 36.94); 1];
        let report = assess_deployment(&registry, &plan, &lavish).unwrap();
        assert!(!report.within_budget(), "a Patriot battery exceeds a $25M budget");
    }

    #[test]
    fn test_assessment_unknown_asset() {
        let registry = catalog::builtin_registry().unwrap();
        let plan = ScenarioPlan::resolve(&registry, "custom_mission").unwrap();
        let err = assess_deployment(&registry, &plan, &[AssetPlacement::new("s400", 0.0, 0.0)])
            .unwrap_err();
        assert_eq!(err, SimError::UnknownAsset("s400".into()));
    }
}
