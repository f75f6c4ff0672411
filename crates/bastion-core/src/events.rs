//! Append-only simulation log entries.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// One immutable log entry. Never mutated after it is pushed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    pub time: u64,
    pub kind: EventKind,
    /// Human-readable description for the event log panel.
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<EventDetails>,
}

/// Structured payload for events that carry more than a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventDetails {
    /// A sensor promoted a threat to detected.
    Detection {
        asset_id: EntityId,
        method: DetectionCapability,
        probability: f64,
    },
    /// A shot was resolved (hit or miss).
    Shot {
        asset_id: EntityId,
        cost: f64,
        distance_km: f64,
        hit_probability: f64,
    },
    /// A threat struck an HVA.
    Strike { hva_type: String, damage_usd: f64 },
    /// A phase changed a side's rules of engagement.
    RoeChange { side: Side, authority: RoeAuthority },
}
