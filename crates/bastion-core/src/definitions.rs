//! Static reference definitions: threats, assets, command chains, missions,
//! scenarios, and asset groups.
//!
//! Records arrive already typed. `validate()` checks every numeric range and
//! tuple shape and reports the first offending field. Cross-record references
//! (a spawn naming a threat type, a scenario naming a mission) are checked by
//! the registry, which sees all records at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_SPAWN_DELAY_SECS;
use crate::enums::*;
use crate::error::ValidationError;
use crate::types::{Band, GeoPoint};

/// Radar, thermal, acoustic, and visual signature of a threat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Radar cross section (m²), `[0, 100]`.
    pub rcs: f64,
    pub thermal: ThermalSignature,
    /// Acoustic level (dB), `[0, 200]`.
    pub acoustic_db: f64,
    pub visual: VisualSignature,
}

/// Resistance to electronic warfare, each in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JammingResistance {
    pub traditional_ew: f64,
    pub russian_tobol: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatDefinition {
    #[serde(rename = "type")]
    pub threat_type: String,
    pub classification: String,
    pub domain: Domain,
    pub speed_ms: f64,
    /// Altitude band (m) a spawned instance is placed in.
    pub altitude_m: Band,
    pub range_km: f64,
    pub cost_usd: f64,
    pub warhead_kg: f64,
    pub signature: Signature,
    /// Navigation mode tags, e.g. `gnss`, `LTE_4G`, `starlink`.
    pub navigation: Vec<String>,
    pub jamming_resistance: JammingResistance,
    pub special_traits: Vec<String>,
    pub behavior_tree: String,
}

impl ThreatDefinition {
    /// `geran_2_manpads` becomes `Geran 2 Manpads`.
    pub fn display_name(&self) -> String {
        title_case(&self.threat_type)
    }

    /// Whether the threat navigates over a cellular (LTE/4G) link.
    pub fn uses_cellular(&self) -> bool {
        self.navigation.iter().any(|mode| {
            let mode = mode.to_ascii_uppercase();
            mode.contains("LTE") || mode.contains("4G")
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let check = Checker::new(format!("threat '{}'", self.threat_type));
        check.not_empty("type", &self.threat_type)?;
        check.positive("speed_ms", self.speed_ms)?;
        check.band("altitude_m", self.altitude_m)?;
        check.positive("range_km", self.range_km)?;
        check.non_negative("cost_usd", self.cost_usd)?;
        check.non_negative("warhead_kg", self.warhead_kg)?;
        check.within("signature.rcs", self.signature.rcs, 0.0, 100.0)?;
        check.within("signature.acoustic_db", self.signature.acoustic_db, 0.0, 200.0)?;
        check.within(
            "jamming_resistance.traditional_ew",
            self.jamming_resistance.traditional_ew,
            0.0,
            1.0,
        )?;
        check.within(
            "jamming_resistance.russian_tobol",
            self.jamming_resistance.russian_tobol,
            0.0,
            1.0,
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDefinition {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub classification: String,
    /// Acquisition cost of the system (USD).
    pub cost_system: f64,
    pub cost_per_shot: f64,
    pub range_km: f64,
    /// Engageable altitude band (m), inclusive.
    pub engagement_ceiling: Band,
    /// Single-shot kill probability. Zero means sensor-only.
    pub kill_probability: f64,
    pub reload_seconds: f64,
    pub ammo_capacity: u32,
    pub rate_of_fire_rpm: f64,
    pub targeting_speed: TargetingSpeed,
    pub vulnerabilities: Vec<String>,
    pub detection_capabilities: Vec<DetectionCapability>,
}

impl AssetDefinition {
    pub fn is_armed(&self) -> bool {
        self.kill_probability > 0.0
    }

    /// Reload duration rounded up to whole ticks.
    pub fn reload_ticks(&self) -> u32 {
        (self.reload_seconds / crate::constants::TICK_SECONDS).ceil() as u32
    }

    pub fn display_name(&self) -> String {
        title_case(&self.asset_type)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let check = Checker::new(format!("asset '{}'", self.asset_type));
        check.not_empty("type", &self.asset_type)?;
        check.non_negative("cost_system", self.cost_system)?;
        check.non_negative("cost_per_shot", self.cost_per_shot)?;
        check.positive("range_km", self.range_km)?;
        check.band("engagement_ceiling", self.engagement_ceiling)?;
        check.within("kill_probability", self.kill_probability, 0.0, 1.0)?;
        check.non_negative("reload_seconds", self.reload_seconds)?;
        check.non_negative("rate_of_fire_rpm", self.rate_of_fire_rpm)?;
        Ok(())
    }
}

/// One node of a command chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandNode {
    pub role: String,
    pub roe_authority: RoeAuthority,
    pub tactics: String,
    pub engagement_delay_seconds: f64,
    /// `condition:action` rules, e.g. `threat_count>10:decentralize`.
    pub delegation_rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_priority: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandChain {
    pub chain_id: String,
    pub name: String,
    pub nodes: BTreeMap<String, CommandNode>,
}

impl CommandChain {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let check = Checker::new(format!("command chain '{}'", self.chain_id));
        check.not_empty("chain_id", &self.chain_id)?;
        for (key, node) in &self.nodes {
            check.non_negative(
                &format!("nodes.{key}.engagement_delay_seconds"),
                node.engagement_delay_seconds,
            )?;
            if let Some(parent) = &node.parent {
                if parent == key || !self.nodes.contains_key(parent) {
                    return Err(check.fail(
                        &format!("nodes.{key}.parent"),
                        format!("references unknown node '{parent}'"),
                    ));
                }
            }
            for (i, rule) in node.delegation_rules.iter().enumerate() {
                let well_formed = rule
                    .split_once(':')
                    .is_some_and(|(cond, action)| !cond.is_empty() && !action.is_empty());
                if !well_formed {
                    return Err(check.fail(
                        &format!("nodes.{key}.delegation_rules[{i}]"),
                        format!("'{rule}' is not of the form condition:action"),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionConstraints {
    pub min_asset_separation_km: f64,
    pub max_budget_usd: f64,
    pub coverage_overlap_penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub mission_id: String,
    pub name: String,
    pub description: String,
    pub victory_conditions: Vec<String>,
    pub defeat_conditions: Vec<String>,
    pub time_limit_seconds: u64,
    pub constraints: MissionConstraints,
}

impl Mission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let check = Checker::new(format!("mission '{}'", self.mission_id));
        check.not_empty("mission_id", &self.mission_id)?;
        if self.time_limit_seconds == 0 {
            return Err(check.fail("time_limit_seconds", "must be positive"));
        }
        check.non_negative(
            "constraints.min_asset_separation_km",
            self.constraints.min_asset_separation_km,
        )?;
        check.non_negative("constraints.max_budget_usd", self.constraints.max_budget_usd)?;
        check.within(
            "constraints.coverage_overlap_penalty",
            self.constraints.coverage_overlap_penalty,
            0.0,
            1.0,
        )?;
        Ok(())
    }
}

/// One threat spawn descriptor inside a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    #[serde(rename = "type")]
    pub threat_type: String,
    pub count: u32,
    pub lat: f64,
    pub lon: f64,
    /// Seconds after the phase trigger before the first threat moves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    /// Fixed spawn altitude (m). Drawn from the threat's band when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
    /// HVA type to steer toward. Unmatched tags fall back to the default target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patrol: Option<String>,
}

impl Spawn {
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// When a phase fires. With both fields set, both must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<TriggerCondition>,
}

impl PhaseTrigger {
    pub fn at(time: u64) -> Self {
        Self {
            time: Some(time),
            condition: None,
        }
    }

    pub fn on(condition: TriggerCondition) -> Self {
        Self {
            time: None,
            condition: Some(condition),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub trigger: PhaseTrigger,
    pub spawns: Vec<Spawn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_override: Option<BTreeMap<Side, RoeAuthority>>,
}

/// A protected high-value asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hva {
    #[serde(rename = "type")]
    pub hva_type: String,
    pub value_usd: f64,
    pub lat: f64,
    pub lon: f64,
    /// Fraction of value that may be lost before the HVA counts as lost.
    pub loss_tolerance: f64,
}

impl Hva {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Damage above this amount (USD) is a defeat.
    pub fn damage_threshold(&self) -> f64 {
        self.value_usd * self.loss_tolerance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueSide {
    pub command_chain: String,
    pub mission: String,
    pub budget_usd: f64,
    pub base_location: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedSide {
    pub command_chain: String,
    pub doctrine: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sides {
    pub blue: BlueSide,
    pub red: RedSide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario_id: String,
    pub name: String,
    pub description: String,
    pub sides: Sides,
    pub phases: Vec<Phase>,
    pub hv_assets: Vec<Hva>,
}

impl Scenario {
    /// Where threats head when their spawn names no HVA: the first HVA,
    /// or the defender base when there is none.
    pub fn default_target(&self) -> GeoPoint {
        self.hv_assets
            .first()
            .map(Hva::location)
            .unwrap_or(self.sides.blue.base_location)
    }

    pub fn total_threats(&self) -> u32 {
        self.phases
            .iter()
            .flat_map(|p| p.spawns.iter())
            .map(|s| s.count)
            .sum()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let check = Checker::new(format!("scenario '{}'", self.scenario_id));
        check.not_empty("scenario_id", &self.scenario_id)?;
        check.positive("sides.blue.budget_usd", self.sides.blue.budget_usd)?;
        check.location("sides.blue.base_location", self.sides.blue.base_location)?;

        for (p, phase) in self.phases.iter().enumerate() {
            if phase.trigger.time.is_none() && phase.trigger.condition.is_none() {
                return Err(check.fail(
                    &format!("phases[{p}].trigger"),
                    "needs a time or a condition",
                ));
            }
            for (s, spawn) in phase.spawns.iter().enumerate() {
                let field = |name: &str| format!("phases[{p}].spawns[{s}].{name}");
                check.not_empty(&field("type"), &spawn.threat_type)?;
                if spawn.count == 0 {
                    return Err(check.fail(&field("count"), "must be positive"));
                }
                check.location(&field("lat/lon"), spawn.origin())?;
                if spawn.delay.is_some_and(|d| d > MAX_SPAWN_DELAY_SECS) {
                    return Err(check.fail(
                        &field("delay"),
                        format!("exceeds {MAX_SPAWN_DELAY_SECS} s"),
                    ));
                }
                if let Some(altitude) = spawn.altitude {
                    check.finite(&field("altitude"), altitude)?;
                }
            }
        }

        for (h, hva) in self.hv_assets.iter().enumerate() {
            check.positive(&format!("hv_assets[{h}].value_usd"), hva.value_usd)?;
            check.within(
                &format!("hv_assets[{h}].loss_tolerance"),
                hva.loss_tolerance,
                0.0,
                1.0,
            )?;
            check.location(&format!("hv_assets[{h}].lat/lon"), hva.location())?;
        }
        Ok(())
    }
}

/// One line of an asset group's bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_deployable: Option<u32>,
}

impl GroupMember {
    /// How many of this member a single deployment places.
    pub fn deployable(&self) -> u32 {
        self.max_deployable
            .map_or(self.count, |max| max.min(self.count))
    }
}

/// A named, pre-packaged force package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetGroup {
    pub group_id: String,
    pub name: String,
    pub description: String,
    pub cost_usd: f64,
    pub assets: Vec<GroupMember>,
}

impl AssetGroup {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let check = Checker::new(format!("asset group '{}'", self.group_id));
        check.not_empty("group_id", &self.group_id)?;
        check.non_negative("cost_usd", self.cost_usd)?;
        for (i, member) in self.assets.iter().enumerate() {
            if member.count == 0 {
                return Err(check.fail(&format!("assets[{i}].count"), "must be positive"));
            }
        }
        Ok(())
    }
}

/// The full set of reference records handed to the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definitions {
    pub threats: Vec<ThreatDefinition>,
    pub assets: Vec<AssetDefinition>,
    pub command_chains: Vec<CommandChain>,
    pub missions: Vec<Mission>,
    pub scenarios: Vec<Scenario>,
    #[serde(default)]
    pub asset_groups: Vec<AssetGroup>,
}

fn title_case(id: &str) -> String {
    id.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Field checks bound to one record name.
pub(crate) struct Checker {
    record: String,
}

impl Checker {
    pub(crate) fn new(record: String) -> Self {
        Self { record }
    }

    pub(crate) fn fail(&self, field: &str, reason: impl Into<String>) -> ValidationError {
        ValidationError::new(self.record.clone(), field, reason)
    }

    fn finite(&self, field: &str, value: f64) -> Result<(), ValidationError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(self.fail(field, format!("must be a finite number, got {value}")))
        }
    }

    fn positive(&self, field: &str, value: f64) -> Result<(), ValidationError> {
        self.finite(field, value)?;
        if value > 0.0 {
            Ok(())
        } else {
            Err(self.fail(field, format!("must be positive, got {value}")))
        }
    }

    fn non_negative(&self, field: &str, value: f64) -> Result<(), ValidationError> {
        self.finite(field, value)?;
        if value >= 0.0 {
            Ok(())
        } else {
            Err(self.fail(field, format!("must be non-negative, got {value}")))
        }
    }

    fn within(&self, field: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
        self.finite(field, value)?;
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(self.fail(field, format!("must be in [{min}, {max}], got {value}")))
        }
    }

    fn band(&self, field: &str, band: Band) -> Result<(), ValidationError> {
        if band.is_ordered() {
            Ok(())
        } else {
            Err(self.fail(
                field,
                format!("must be an ordered [min, max] pair, got [{}, {}]", band.0, band.1),
            ))
        }
    }

    fn location(&self, field: &str, point: GeoPoint) -> Result<(), ValidationError> {
        if point.is_valid() {
            Ok(())
        } else {
            Err(self.fail(
                field,
                format!("is not a valid coordinate ({}, {})", point.lat, point.lon),
            ))
        }
    }

    fn not_empty(&self, field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(self.fail(field, "must not be empty"))
        } else {
            Ok(())
        }
    }
}
