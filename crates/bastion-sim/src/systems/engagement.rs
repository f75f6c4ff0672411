//! Engagement pass: each ready shooter fires one round at its nearest target.

use rand::Rng;
use tracing::trace;

use bastion_core::constants::{HIT_PENALTY_MAX, HIT_PENALTY_REFERENCE_SPEED};
use bastion_core::enums::*;
use bastion_core::events::EventDetails;
use bastion_core::state::{AssetInstance, Engagement, SimulationState, ThreatInstance};
use bastion_geodesy::{distance_km, has_line_of_sight};

use crate::cost::format_usd;

/// Single-shot hit probability against a threat moving at `speed_ms`.
/// Speed costs up to `HIT_PENALTY_MAX` of the base kill probability.
pub fn hit_probability(kill_probability: f64, speed_ms: f64) -> f64 {
    let penalty = HIT_PENALTY_MAX * (speed_ms / HIT_PENALTY_REFERENCE_SPEED).min(1.0);
    kill_probability * (1.0 - penalty)
}

/// Nearest detected, spawned threat the asset can reach, with its distance.
/// On equal distance the earlier threat in the list wins.
pub fn select_target(
    asset: &AssetInstance,
    threats: &[ThreatInstance],
    now: u64,
) -> Option<(usize, f64)> {
    let definition = &asset.definition;
    let mut best: Option<(usize, f64)> = None;
    for (i, threat) in threats.iter().enumerate() {
        if threat.status != ThreatStatus::Detected || !threat.is_spawned(now) {
            continue;
        }
        if !has_line_of_sight(
            asset.position,
            threat.position,
            threat.altitude,
            definition.range_km,
            definition.engagement_ceiling,
        ) {
            continue;
        }
        let distance = distance_km(asset.position, threat.position);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best
}

pub fn run<R: Rng + ?Sized>(state: &mut SimulationState, rng: &mut R) {
    let now = state.time;

    for a in 0..state.assets.len() {
        let asset = &mut state.assets[a];
        if asset.needs_reload() {
            begin_reload(asset, now);
            continue;
        }
        if !asset.can_fire() {
            continue;
        }

        let asset = &state.assets[a];
        let Some((t, distance)) = select_target(asset, &state.threats, now) else {
            continue;
        };
        let (asset_id, asset_name) = (asset.id, asset.definition.display_name());
        let kill_probability = asset.definition.kill_probability;
        let cost = asset.definition.cost_per_shot;

        let threat = &state.threats[t];
        let (threat_id, threat_name) = (threat.id, threat.definition.display_name());
        let p_hit = hit_probability(kill_probability, threat.speed);
        let hit = rng.gen_bool(p_hit.clamp(0.0, 1.0));

        let asset = &mut state.assets[a];
        asset.ammo -= 1;
        asset.ammo_expended += 1;
        asset.engagements += 1;
        if hit {
            asset.kills += 1;
            let threat = &mut state.threats[t];
            threat.status = ThreatStatus::Destroyed;
            threat.health = 0.0;
        }

        trace!(asset = %asset_id, threat = %threat_id, hit, p_hit, distance, "shot resolved");

        let details = Some(EventDetails::Shot {
            asset_id,
            cost,
            distance_km: distance,
            hit_probability: p_hit,
        });
        if hit {
            state.push_event(
                EventKind::Kill,
                format!(
                    "{asset_name} destroyed {threat_name} at {distance:.1}km, {}/shot",
                    format_usd(cost)
                ),
                Some(threat_id),
                details,
            );
        } else {
            state.push_event(
                EventKind::Miss,
                format!("{asset_name} missed {threat_name} at {distance:.1}km"),
                Some(threat_id),
                details,
            );
        }

        let id = state.allocate_id();
        state.push_engagement(Engagement {
            id,
            asset_id,
            threat_id,
            start_time: now,
            end_time: Some(now),
            result: Some(if hit {
                EngagementResult::Hit
            } else {
                EngagementResult::Miss
            }),
            cost,
        });
    }
}

/// Empty magazine: start the reload countdown. The countdown first runs on
/// the following tick; a zero-length reload completes this tick.
fn begin_reload(asset: &mut AssetInstance, now: u64) {
    asset.reloading = true;
    asset.status = AssetStatus::Reloading;
    asset.reload_timer = asset.definition.reload_ticks();
    asset.reload_started_at = Some(now);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_probability_speed_penalty() {
        assert_eq!(hit_probability(0.8, 0.0), 0.8);
        assert!((hit_probability(0.8, 100.0) - 0.8 * 0.85).abs() < 1e-12);
        assert!((hit_probability(0.8, 200.0) - 0.8 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_hit_probability_penalty_is_capped() {
        assert_eq!(hit_probability(0.9, 900.0), hit_probability(0.9, 200.0));
        assert!(hit_probability(0.9, 900.0) > 0.0);
    }
}
