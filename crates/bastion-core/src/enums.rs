//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating domain of a threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Air,
    Ground,
    Maritime,
}

/// Thermal signature class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermalSignature {
    #[default]
    None,
    Low,
    Medium,
    High,
    /// Hot but decoy-like (flares, confusers). Detected as `High`, then penalized.
    HighConfusion,
}

/// Visual signature class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualSignature {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// How quickly an asset can slew onto a new target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

/// A sensor modality an asset can detect with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionCapability {
    Radar,
    Thermal,
    CellularImei,
    Visual,
}

impl DetectionCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Radar => "radar",
            Self::Thermal => "thermal",
            Self::CellularImei => "cellular_imei",
            Self::Visual => "visual",
        }
    }
}

/// Rules-of-engagement authority held by a command node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoeAuthority {
    WeaponFree,
    WeaponTight,
    WeaponHold,
}

impl RoeAuthority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeaponFree => "weapon_free",
            Self::WeaponTight => "weapon_tight",
            Self::WeaponHold => "weapon_hold",
        }
    }
}

/// Scenario side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Blue,
    Red,
}

/// Named condition a phase can wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    /// Every threat spawned so far has spawned and none is active or detected.
    WaveCleared,
    /// At least one HVA has taken damage.
    HvaDamaged,
}

/// Threat lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatStatus {
    #[default]
    Active,
    Detected,
    /// Transient annotation during shot resolution. Never stored by the engine.
    Engaged,
    Destroyed,
    Escaped,
}

impl ThreatStatus {
    /// Active or detected: still moving, still a valid target.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Active | Self::Detected)
    }

    /// Destroyed and escaped are absorbing.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Destroyed | Self::Escaped)
    }
}

/// Asset lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    #[default]
    Active,
    /// Never entered by the engine; assets are currently invulnerable.
    Destroyed,
    Reloading,
    /// Never entered by the engine.
    Jammed,
}

impl AssetStatus {
    /// Sensors keep working while the launcher reloads.
    pub fn sensors_online(&self) -> bool {
        matches!(self, Self::Active | Self::Reloading)
    }
}

/// Outcome of a single shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementResult {
    Hit,
    Miss,
    Aborted,
}

/// Run status of the simulation. Anything other than `Running` is sticky.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Running,
    Victory,
    Defeat,
    Timeout,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Category of a simulation log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Spawn,
    Detect,
    Kill,
    Miss,
    Escape,
    Damage,
    Phase,
    Command,
    Reload,
}

/// Kind of reference definition held by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Threat,
    Asset,
    CommandChain,
    Mission,
    Scenario,
    AssetGroup,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Threat => "threat",
            Self::Asset => "asset",
            Self::CommandChain => "command chain",
            Self::Mission => "mission",
            Self::Scenario => "scenario",
            Self::AssetGroup => "asset group",
        };
        f.write_str(name)
    }
}
