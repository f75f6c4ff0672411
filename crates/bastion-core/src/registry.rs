//! Registry of validated reference definitions.
//!
//! Built once at startup and passed by reference into the simulation. Loading
//! validates every record and every cross-record reference before anything is
//! committed, so a registry never holds a partially valid set.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::definitions::*;
use crate::enums::DefinitionKind;
use crate::error::{RegistryError, ValidationError};

/// A borrowed definition of any kind, returned by [`Registry::get`].
#[derive(Debug, Clone, Copy)]
pub enum Definition<'a> {
    Threat(&'a ThreatDefinition),
    Asset(&'a AssetDefinition),
    CommandChain(&'a CommandChain),
    Mission(&'a Mission),
    Scenario(&'a Scenario),
    AssetGroup(&'a AssetGroup),
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    threats: BTreeMap<String, Arc<ThreatDefinition>>,
    assets: BTreeMap<String, Arc<AssetDefinition>>,
    command_chains: BTreeMap<String, Arc<CommandChain>>,
    missions: BTreeMap<String, Arc<Mission>>,
    scenarios: BTreeMap<String, Arc<Scenario>>,
    asset_groups: BTreeMap<String, Arc<AssetGroup>>,
    initialized: bool,
}

impl Registry {
    /// An empty, uninitialized registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and load a registry in one call.
    pub fn from_definitions(definitions: Definitions) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.load(definitions)?;
        Ok(registry)
    }

    /// Validate and commit `definitions`. A no-op once the registry is initialized.
    pub fn load(&mut self, definitions: Definitions) -> Result<(), RegistryError> {
        if self.initialized {
            return Ok(());
        }

        let threats = index(
            DefinitionKind::Threat,
            definitions.threats,
            |t| &t.threat_type,
            ThreatDefinition::validate,
        )?;
        let assets = index(
            DefinitionKind::Asset,
            definitions.assets,
            |a| &a.asset_type,
            AssetDefinition::validate,
        )?;
        let command_chains = index(
            DefinitionKind::CommandChain,
            definitions.command_chains,
            |c| &c.chain_id,
            CommandChain::validate,
        )?;
        let missions = index(
            DefinitionKind::Mission,
            definitions.missions,
            |m| &m.mission_id,
            Mission::validate,
        )?;
        let scenarios = index(
            DefinitionKind::Scenario,
            definitions.scenarios,
            |s| &s.scenario_id,
            Scenario::validate,
        )?;
        let asset_groups = index(
            DefinitionKind::AssetGroup,
            definitions.asset_groups,
            |g| &g.group_id,
            AssetGroup::validate,
        )?;

        for scenario in scenarios.values() {
            check_scenario_refs(scenario, &threats, &command_chains, &missions)?;
        }
        for group in asset_groups.values() {
            for (i, member) in group.assets.iter().enumerate() {
                if !assets.contains_key(&member.asset_type) {
                    return Err(ValidationError::new(
                        format!("asset group '{}'", group.group_id),
                        format!("assets[{i}].type"),
                        format!("references unknown asset type '{}'", member.asset_type),
                    )
                    .into());
                }
            }
        }

        info!(
            threats = threats.len(),
            assets = assets.len(),
            command_chains = command_chains.len(),
            missions = missions.len(),
            scenarios = scenarios.len(),
            asset_groups = asset_groups.len(),
            "registry loaded"
        );

        self.threats = threats;
        self.assets = assets;
        self.command_chains = command_chains;
        self.missions = missions;
        self.scenarios = scenarios;
        self.asset_groups = asset_groups;
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Look up any definition by kind and id.
    pub fn get(&self, kind: DefinitionKind, id: &str) -> Result<Definition<'_>, RegistryError> {
        Ok(match kind {
            DefinitionKind::Threat => Definition::Threat(self.threat(id)?),
            DefinitionKind::Asset => Definition::Asset(self.asset(id)?),
            DefinitionKind::CommandChain => Definition::CommandChain(self.command_chain(id)?),
            DefinitionKind::Mission => Definition::Mission(self.mission(id)?),
            DefinitionKind::Scenario => Definition::Scenario(self.scenario(id)?),
            DefinitionKind::AssetGroup => Definition::AssetGroup(self.asset_group(id)?),
        })
    }

    pub fn threat(&self, id: &str) -> Result<&Arc<ThreatDefinition>, RegistryError> {
        lookup(&self.threats, DefinitionKind::Threat, id)
    }

    pub fn asset(&self, id: &str) -> Result<&Arc<AssetDefinition>, RegistryError> {
        lookup(&self.assets, DefinitionKind::Asset, id)
    }

    pub fn command_chain(&self, id: &str) -> Result<&Arc<CommandChain>, RegistryError> {
        lookup(&self.command_chains, DefinitionKind::CommandChain, id)
    }

    pub fn mission(&self, id: &str) -> Result<&Arc<Mission>, RegistryError> {
        lookup(&self.missions, DefinitionKind::Mission, id)
    }

    pub fn scenario(&self, id: &str) -> Result<&Arc<Scenario>, RegistryError> {
        lookup(&self.scenarios, DefinitionKind::Scenario, id)
    }

    pub fn asset_group(&self, id: &str) -> Result<&Arc<AssetGroup>, RegistryError> {
        lookup(&self.asset_groups, DefinitionKind::AssetGroup, id)
    }

    // Listings iterate in id order.

    pub fn threats(&self) -> impl Iterator<Item = &Arc<ThreatDefinition>> {
        self.threats.values()
    }

    pub fn assets(&self) -> impl Iterator<Item = &Arc<AssetDefinition>> {
        self.assets.values()
    }

    pub fn command_chains(&self) -> impl Iterator<Item = &Arc<CommandChain>> {
        self.command_chains.values()
    }

    pub fn missions(&self) -> impl Iterator<Item = &Arc<Mission>> {
        self.missions.values()
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &Arc<Scenario>> {
        self.scenarios.values()
    }

    pub fn asset_groups(&self) -> impl Iterator<Item = &Arc<AssetGroup>> {
        self.asset_groups.values()
    }
}

fn lookup<'a, T>(
    map: &'a BTreeMap<String, Arc<T>>,
    kind: DefinitionKind,
    id: &str,
) -> Result<&'a Arc<T>, RegistryError> {
    map.get(id).ok_or_else(|| RegistryError::NotFound {
        kind,
        id: id.to_string(),
    })
}

/// Validate each record and key it by id, rejecting duplicates.
fn index<T>(
    kind: DefinitionKind,
    records: Vec<T>,
    id_of: impl Fn(&T) -> &String,
    validate: impl Fn(&T) -> Result<(), ValidationError>,
) -> Result<BTreeMap<String, Arc<T>>, RegistryError> {
    let mut map = BTreeMap::new();
    for record in records {
        validate(&record)?;
        let id = id_of(&record).clone();
        if map.contains_key(&id) {
            return Err(RegistryError::DuplicateId { kind, id });
        }
        map.insert(id, Arc::new(record));
    }
    Ok(map)
}

fn check_scenario_refs(
    scenario: &Scenario,
    threats: &BTreeMap<String, Arc<ThreatDefinition>>,
    command_chains: &BTreeMap<String, Arc<CommandChain>>,
    missions: &BTreeMap<String, Arc<Mission>>,
) -> Result<(), ValidationError> {
    let record = format!("scenario '{}'", scenario.scenario_id);
    let blue = &scenario.sides.blue;
    let red = &scenario.sides.red;

    if !missions.contains_key(&blue.mission) {
        return Err(ValidationError::new(
            record,
            "sides.blue.mission",
            format!("references unknown mission '{}'", blue.mission),
        ));
    }
    for (field, chain) in [
        ("sides.blue.command_chain", &blue.command_chain),
        ("sides.red.command_chain", &red.command_chain),
    ] {
        if !command_chains.contains_key(chain) {
            return Err(ValidationError::new(
                record,
                field,
                format!("references unknown command chain '{chain}'"),
            ));
        }
    }
    for (p, phase) in scenario.phases.iter().enumerate() {
        for (s, spawn) in phase.spawns.iter().enumerate() {
            if !threats.contains_key(&spawn.threat_type) {
                return Err(ValidationError::new(
                    record,
                    format!("phases[{p}].spawns[{s}].type"),
                    format!("references unknown threat type '{}'", spawn.threat_type),
                ));
            }
        }
    }
    Ok(())
}
