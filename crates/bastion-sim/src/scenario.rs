//! Scenario resolution.
//!
//! A `ScenarioPlan` pins down everything a run needs from the registry up
//! front: the scenario, its mission, and the threat definition behind every
//! spawn. Unknown references fail here, so the tick loop never looks anything up.

use std::sync::Arc;

use bastion_core::definitions::{Mission, Scenario, Spawn, ThreatDefinition};
use bastion_core::types::GeoPoint;
use bastion_core::{Registry, RegistryError};

use crate::error::SimError;

#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    pub scenario: Arc<Scenario>,
    pub mission: Arc<Mission>,
    /// Threat definition per spawn, indexed `[phase][spawn]`.
    spawn_threats: Vec<Vec<Arc<ThreatDefinition>>>,
}

impl ScenarioPlan {
    /// Resolve a registered scenario by id.
    pub fn resolve(registry: &Registry, scenario_id: &str) -> Result<Self, SimError> {
        let scenario = registry
            .scenario(scenario_id)
            .map_err(|_| SimError::UnknownScenario(scenario_id.to_string()))?;
        Self::from_scenario(registry, Arc::clone(scenario))
    }

    /// Resolve an ad-hoc scenario against the registry's threats and missions.
    /// The scenario is validated first.
    pub fn from_scenario(registry: &Registry, scenario: Arc<Scenario>) -> Result<Self, SimError> {
        scenario.validate().map_err(RegistryError::from)?;

        let mission_id = &scenario.sides.blue.mission;
        let mission = registry
            .mission(mission_id)
            .map_err(|_| SimError::UnknownMission {
                scenario: scenario.scenario_id.clone(),
                mission: mission_id.clone(),
            })?
            .clone();

        let spawn_threats = scenario
            .phases
            .iter()
            .map(|phase| {
                phase
                    .spawns
                    .iter()
                    .map(|spawn| {
                        registry
                            .threat(&spawn.threat_type)
                            .cloned()
                            .map_err(|_| SimError::UnknownThreat(spawn.threat_type.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            scenario,
            mission,
            spawn_threats,
        })
    }

    pub fn phase_count(&self) -> usize {
        self.scenario.phases.len()
    }

    /// Definition behind `phases[phase].spawns[spawn]`.
    pub fn spawn_threat(&self, phase: usize, spawn: usize) -> Option<&Arc<ThreatDefinition>> {
        self.spawn_threats.get(phase)?.get(spawn)
    }

    /// Where a spawn's threats head: the HVA its target tag names, or the
    /// scenario default.
    pub fn target_for(&self, spawn: &Spawn) -> GeoPoint {
        spawn
            .target
            .as_deref()
            .and_then(|tag| {
                self.scenario
                    .hv_assets
                    .iter()
                    .find(|hva| hva.hva_type == tag)
            })
            .map_or_else(|| self.scenario.default_target(), |hva| hva.location())
    }
}
