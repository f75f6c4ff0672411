//! Runtime entities and the simulation state aggregate.
//!
//! `SimulationState` is a plain value. The append-only logs sit behind `Arc`
//! and are copied on write, so cloning a state per tick copies only the
//! entity lists, and a caller holding an older state keeps an unmodified view.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::TRAIL_CAPACITY;
use crate::definitions::{AssetDefinition, ThreatDefinition};
use crate::enums::*;
use crate::events::{EventDetails, SimulationEvent};
use crate::types::{EntityId, GeoPoint, TrailPoint};

/// Where to place one asset at scenario start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPlacement {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub lat: f64,
    pub lon: f64,
}

impl AssetPlacement {
    pub fn new(asset_type: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            asset_type: asset_type.into(),
            lat,
            lon,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatInstance {
    pub id: EntityId,
    pub definition: Arc<ThreatDefinition>,
    pub position: GeoPoint,
    /// Altitude above ground (m).
    pub altitude: f64,
    /// Degrees clockwise from north.
    pub heading: f64,
    /// Actual speed after spawn jitter (m/s).
    pub speed: f64,
    pub status: ThreatStatus,
    /// Remaining structural health in `[0, 1]`.
    pub health: f64,
    /// Tick at which the threat starts moving. Inert before this.
    pub spawn_time: u64,
    pub target: GeoPoint,
    /// Most recent positions, oldest first, at most `TRAIL_CAPACITY`.
    pub trail: VecDeque<TrailPoint>,
}

impl ThreatInstance {
    pub fn is_spawned(&self, now: u64) -> bool {
        self.spawn_time <= now
    }

    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// Spawned and still active or detected.
    pub fn is_in_play(&self, now: u64) -> bool {
        self.is_live() && self.is_spawned(now)
    }

    /// Record a position, dropping the oldest once the trail is full.
    pub fn push_trail(&mut self, point: TrailPoint) {
        if self.trail.len() == TRAIL_CAPACITY {
            self.trail.pop_front();
        }
        self.trail.push_back(point);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInstance {
    pub id: EntityId,
    pub definition: Arc<AssetDefinition>,
    pub position: GeoPoint,
    /// Rounds remaining, always within `[0, ammo_capacity]`.
    pub ammo: u32,
    pub reloading: bool,
    /// Ticks of reload remaining.
    pub reload_timer: u32,
    /// Tick the current reload began.
    pub reload_started_at: Option<u64>,
    pub engagements: u32,
    pub ammo_expended: u32,
    pub kills: u32,
    pub status: AssetStatus,
}

impl AssetInstance {
    pub fn new(id: EntityId, definition: Arc<AssetDefinition>, position: GeoPoint) -> Self {
        Self {
            id,
            ammo: definition.ammo_capacity,
            definition,
            position,
            reloading: false,
            reload_timer: 0,
            reload_started_at: None,
            engagements: 0,
            ammo_expended: 0,
            kills: 0,
            status: AssetStatus::Active,
        }
    }

    /// Active, armed, loaded, and not mid-reload.
    pub fn can_fire(&self) -> bool {
        self.status == AssetStatus::Active
            && self.definition.is_armed()
            && !self.reloading
            && self.ammo > 0
    }

    /// Active and armed but out of rounds, with no reload under way.
    pub fn needs_reload(&self) -> bool {
        self.status == AssetStatus::Active
            && self.definition.is_armed()
            && !self.reloading
            && self.ammo == 0
            && self.definition.ammo_capacity > 0
    }

    /// Refill to capacity and return to active duty.
    pub fn restock(&mut self) {
        self.ammo = self.definition.ammo_capacity;
        self.reloading = false;
        self.reload_timer = 0;
        self.reload_started_at = None;
        if self.status == AssetStatus::Reloading {
            self.status = AssetStatus::Active;
        }
    }
}

/// One shot fired by an asset at a threat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    pub id: EntityId,
    pub asset_id: EntityId,
    pub threat_id: EntityId,
    pub start_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<EngagementResult>,
    /// Cost of the shot (USD).
    pub cost: f64,
}

/// Damage bookkeeping for one scenario HVA, index-aligned with `Scenario::hv_assets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvaStatus {
    pub hva_type: String,
    pub damaged: bool,
    /// Cumulative damage (USD).
    pub damage_value: f64,
}

/// Cost-exchange summary. `cer` is `+∞` until something has been destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CerResult {
    #[serde(with = "unbounded_ratio")]
    pub cer: f64,
    pub defense_cost: f64,
    pub threat_value: f64,
    pub economic_damage: f64,
    /// Percentage in `[0, 100]`.
    pub efficiency: f64,
    pub naive_cost: f64,
    pub optimized_cost: f64,
    pub savings: f64,
}

impl CerResult {
    /// The ratio, or `None` while it is unbounded.
    pub fn ratio(&self) -> Option<f64> {
        self.cer.is_finite().then_some(self.cer)
    }

    /// Two-decimal ratio for display, `—` while unbounded.
    pub fn display_ratio(&self) -> String {
        match self.ratio() {
            Some(cer) => format!("{cer:.2}"),
            None => "—".to_string(),
        }
    }
}

impl Default for CerResult {
    fn default() -> Self {
        Self {
            cer: f64::INFINITY,
            defense_cost: 0.0,
            threat_value: 0.0,
            economic_damage: 0.0,
            efficiency: 0.0,
            naive_cost: 0.0,
            optimized_cost: 0.0,
            savings: 0.0,
        }
    }
}

/// Non-finite ratios travel as `null`.
mod unbounded_ratio {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// The complete world state threaded through `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Current tick (seconds since start).
    pub time: u64,
    pub threats: Vec<ThreatInstance>,
    pub assets: Vec<AssetInstance>,
    pub engagements: Arc<Vec<Engagement>>,
    pub events: Arc<Vec<SimulationEvent>>,
    /// Index of the next phase to fire.
    pub phase: usize,
    pub status: RunStatus,
    pub cer: CerResult,
    pub hva_status: Vec<HvaStatus>,
    /// Blue rules of engagement, once a phase has overridden them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue_roe: Option<RoeAuthority>,
    /// Next value handed out by `allocate_id`.
    pub next_id: u64,
}

impl SimulationState {
    /// A fresh state at tick zero with no threats.
    pub fn new(assets: Vec<AssetInstance>, hva_status: Vec<HvaStatus>, next_id: u64) -> Self {
        Self {
            time: 0,
            threats: Vec::new(),
            assets,
            engagements: Arc::new(Vec::new()),
            events: Arc::new(Vec::new()),
            phase: 0,
            status: RunStatus::Running,
            cer: CerResult::default(),
            hva_status,
            blue_roe: None,
            next_id,
        }
    }

    pub fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    /// Append a log entry stamped with the current tick.
    pub fn push_event(
        &mut self,
        kind: EventKind,
        description: impl Into<String>,
        entity_id: Option<EntityId>,
        details: Option<EventDetails>,
    ) {
        let event = SimulationEvent {
            time: self.time,
            kind,
            description: description.into(),
            entity_id,
            details,
        };
        Arc::make_mut(&mut self.events).push(event);
    }

    pub fn push_engagement(&mut self, engagement: Engagement) {
        Arc::make_mut(&mut self.engagements).push(engagement);
    }

    /// Threats still active or detected, spawned or not.
    pub fn live_threat_count(&self) -> usize {
        self.threats.iter().filter(|t| t.is_live()).count()
    }

    pub fn destroyed_threats(&self) -> impl Iterator<Item = &ThreatInstance> {
        self.threats
            .iter()
            .filter(|t| t.status == ThreatStatus::Destroyed)
    }

    pub fn destroyed_assets(&self) -> impl Iterator<Item = &AssetInstance> {
        self.assets
            .iter()
            .filter(|a| a.status == AssetStatus::Destroyed)
    }

    /// Summed HVA damage (USD).
    pub fn infrastructure_damage(&self) -> f64 {
        self.hva_status.iter().map(|h| h.damage_value).sum()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
