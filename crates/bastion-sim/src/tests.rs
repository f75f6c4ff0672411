//! Scenario-level tests for the tick loop, the engine driver, and plan resolution.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bastion_core::definitions::*;
use bastion_core::enums::*;
use bastion_core::events::EventDetails;
use bastion_core::state::{AssetPlacement, SimulationState};
use bastion_core::types::{Band, EntityId, GeoPoint};
use bastion_core::Registry;
use bastion_geodesy::{bearing, distance_km};

use crate::catalog;
use crate::cost::cer_for_state;
use crate::engine::{step, SimConfig, SimulationEngine};
use crate::environment::{EnvironmentModifiers, WeatherSnapshot};
use crate::error::SimError;
use crate::scenario::ScenarioPlan;
use crate::systems::engagement::select_target;
use crate::world_setup::initial_state;

const BASE: GeoPoint = GeoPoint { lat: 50.0, lon: 36.0 };

// ---- Fixtures ----

/// Slow, radar-bright, fixed at 500 m.
fn test_drone() -> ThreatDefinition {
    ThreatDefinition {
        threat_type: "test_drone".into(),
        classification: "target_drone".into(),
        domain: Domain::Air,
        speed_ms: 10.0,
        altitude_m: Band::new(500.0, 500.0),
        range_km: 100.0,
        cost_usd: 10_000.0,
        warhead_kg: 1.0,
        signature: Signature {
            rcs: 1.0,
            thermal: ThermalSignature::None,
            acoustic_db: 60.0,
            visual: VisualSignature::None,
        },
        navigation: vec!["INS".into()],
        jamming_resistance: JammingResistance {
            traditional_ew: 0.5,
            russian_tobol: 0.5,
        },
        special_traits: vec![],
        behavior_tree: "direct_attack".into(),
    }
}

/// One round, five-second reload, long reach.
fn test_gun() -> AssetDefinition {
    AssetDefinition {
        asset_type: "test_gun".into(),
        classification: "test".into(),
        cost_system: 1_000.0,
        cost_per_shot: 100.0,
        range_km: 50.0,
        engagement_ceiling: Band::new(0.0, 5000.0),
        kill_probability: 1.0,
        reload_seconds: 5.0,
        ammo_capacity: 1,
        rate_of_fire_rpm: 60.0,
        targeting_speed: TargetingSpeed::Fast,
        vulnerabilities: vec![],
        detection_capabilities: vec![DetectionCapability::Radar],
    }
}

/// Like `test_gun`, but reloads instantly.
fn quick_gun() -> AssetDefinition {
    AssetDefinition {
        asset_type: "quick_gun".into(),
        reload_seconds: 0.0,
        ..test_gun()
    }
}

fn registry() -> Registry {
    let mut definitions = catalog::builtin_definitions();
    definitions.threats.push(test_drone());
    definitions.assets.push(test_gun());
    definitions.assets.push(quick_gun());
    Registry::from_definitions(definitions).unwrap()
}

fn drone_spawn(count: u32, lat: f64, lon: f64) -> Spawn {
    Spawn {
        threat_type: "test_drone".into(),
        count,
        lat,
        lon,
        delay: None,
        altitude: None,
        behavior: None,
        target: None,
        navigation: None,
        patrol: None,
    }
}

fn phase(trigger: PhaseTrigger, spawns: Vec<Spawn>) -> Phase {
    Phase {
        trigger,
        spawns,
        command_override: None,
    }
}

fn hva(hva_type: &str, location: GeoPoint, loss_tolerance: f64) -> Hva {
    Hva {
        hva_type: hva_type.into(),
        value_usd: 100_000_000.0,
        lat: location.lat,
        lon: location.lon,
        loss_tolerance,
    }
}

fn scenario(phases: Vec<Phase>, hv_assets: Vec<Hva>) -> Scenario {
    Scenario {
        scenario_id: "test_scenario".into(),
        name: "Test".into(),
        description: String::new(),
        sides: Sides {
            blue: BlueSide {
                command_chain: "nato_iads".into(),
                mission: "point_defense".into(),
                budget_usd: 25_000_000.0,
                base_location: BASE,
            },
            red: RedSide {
                command_chain: "russian_btg".into(),
                doctrine: "test".into(),
            },
        },
        phases,
        hv_assets,
    }
}

fn plan(registry: &Registry, scenario: Scenario) -> ScenarioPlan {
    ScenarioPlan::from_scenario(registry, Arc::new(scenario)).unwrap()
}

/// States after 0..=ticks ticks.
fn run_states(
    registry: &Registry,
    plan: &ScenarioPlan,
    placements: &[AssetPlacement],
    seed: u64,
    ticks: usize,
) -> Vec<SimulationState> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let env = EnvironmentModifiers::default();
    let mut states = vec![initial_state(plan, registry, placements).unwrap()];
    for _ in 0..ticks {
        let next = step(states.last().unwrap(), plan, &env, &mut rng);
        states.push(next);
    }
    states
}

fn gun_at_base() -> Vec<AssetPlacement> {
    vec![AssetPlacement::new("test_gun", BASE.lat, BASE.lon)]
}

// ---- Determinism ----

fn demo_engine(seed: u64) -> SimulationEngine {
    let registry = catalog::builtin_registry().unwrap();
    let placements = catalog::demo_placements("vovchansk_pocket_2026");
    SimulationEngine::new(
        &registry,
        "vovchansk_pocket_2026",
        &placements,
        SimConfig {
            seed,
            ..Default::default()
        },
    )
    .unwrap()
}

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = demo_engine(12345);
    let mut engine_b = demo_engine(12345);

    for _ in 0..400 {
        let json_a = serde_json::to_string(engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "States diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = demo_engine(111);
    let mut engine_b = demo_engine(222);

    // Spawn jitter alone separates the runs on the first tick.
    let mut diverged = false;
    for _ in 0..50 {
        let json_a = serde_json::to_string(engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Terminal conditions ----

#[test]
fn test_empty_scenario_is_victory_not_timeout() {
    let registry = registry();
    let plan = plan(&registry, scenario(vec![], vec![hva("depot", BASE, 0.0)]));
    let limit = plan.mission.time_limit_seconds as usize;

    let states = run_states(&registry, &plan, &gun_at_base(), 1, limit + 5);
    let last = states.last().unwrap();
    assert_eq!(last.status, RunStatus::Victory);
    assert!(last.threats.is_empty());
    // Victory is settled on the first tick and sticks.
    assert_eq!(states[1].status, RunStatus::Victory);
    assert_eq!(last.time, 1);
}

#[test]
fn test_defeat_on_arrival_tick() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![phase(PhaseTrigger::at(0), vec![drone_spawn(1, BASE.lat + 0.01, BASE.lon)])],
            vec![hva("depot", BASE, 0.0)],
        ),
    );

    let states = run_states(&registry, &plan, &[], 3, 400);
    let arrival = states
        .iter()
        .position(|s| s.threats.first().is_some_and(|t| t.status == ThreatStatus::Escaped))
        .expect("drone should reach the depot");

    assert_eq!(states[arrival - 1].status, RunStatus::Running);
    assert_eq!(states[arrival].status, RunStatus::Defeat);

    let arrived = &states[arrival];
    assert_eq!(arrived.threats[0].position, BASE);
    assert!(arrived.hva_status[0].damaged);
    assert_eq!(arrived.hva_status[0].damage_value, 20_000_000.0);
    let damage = arrived
        .events
        .iter()
        .find(|e| e.kind == EventKind::Damage)
        .unwrap();
    assert_eq!(damage.time, arrived.time);
    assert!(matches!(
        damage.details,
        Some(EventDetails::Strike { damage_usd, .. }) if damage_usd == 20_000_000.0
    ));
}

#[test]
fn test_timeout_when_threats_remain() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            // Far enough that nothing arrives before the limit.
            vec![phase(PhaseTrigger::at(0), vec![drone_spawn(1, BASE.lat + 1.0, BASE.lon)])],
            vec![hva("depot", BASE, 0.0)],
        ),
    );
    let limit = plan.mission.time_limit_seconds as usize;

    let states = run_states(&registry, &plan, &[], 5, limit);
    assert_eq!(states[limit - 1].status, RunStatus::Running);
    assert_eq!(states[limit].status, RunStatus::Timeout);
}

#[test]
fn test_escape_away_from_hva_emits_escape_event() {
    let registry = registry();
    // No HVAs: threats head for the base and find nothing to strike.
    let plan = plan(
        &registry,
        scenario(
            vec![phase(PhaseTrigger::at(0), vec![drone_spawn(1, BASE.lat + 0.005, BASE.lon)])],
            vec![],
        ),
    );
    let states = run_states(&registry, &plan, &[], 9, 200);
    let last = states.last().unwrap();
    assert_eq!(last.status, RunStatus::Victory);
    assert_eq!(last.threats[0].status, ThreatStatus::Escaped);
    assert!(last.events.iter().any(|e| e.kind == EventKind::Escape));
    assert!(!last.events.iter().any(|e| e.kind == EventKind::Damage));
}

// ---- Reload and ammunition ----

#[test]
fn test_reload_window_after_single_shot() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![
                phase(PhaseTrigger::at(0), vec![drone_spawn(1, BASE.lat + 0.05, BASE.lon)]),
                // Keeps the run going after the first kill.
                phase(PhaseTrigger::at(1000), vec![drone_spawn(1, BASE.lat + 0.5, BASE.lon)]),
            ],
            vec![hva("depot", BASE, 1.0)],
        ),
    );

    let states = run_states(&registry, &plan, &gun_at_base(), 11, 120);
    let shot = states
        .iter()
        .position(|s| s.assets[0].ammo_expended == 1)
        .expect("gun should fire within the window");

    assert_eq!(states[shot].assets[0].ammo, 0);
    assert!(!states[shot].assets[0].reloading);
    for offset in 1..=5 {
        let asset = &states[shot + offset].assets[0];
        assert!(asset.reloading, "tick T+{offset} should be reloading");
        assert_eq!(asset.ammo, 0, "tick T+{offset} should be empty");
        assert_eq!(asset.status, AssetStatus::Reloading);
    }
    let restocked = &states[shot + 6];
    assert!(!restocked.assets[0].reloading);
    assert_eq!(restocked.assets[0].ammo, 1);
    assert_eq!(restocked.assets[0].status, AssetStatus::Active);
    assert!(restocked
        .events
        .iter()
        .any(|e| e.kind == EventKind::Reload && e.time == restocked.time));
}

#[test]
fn test_instant_reload_restocks_next_tick() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![
                phase(PhaseTrigger::at(0), vec![drone_spawn(3, BASE.lat + 0.05, BASE.lon)]),
                phase(PhaseTrigger::at(1000), vec![drone_spawn(1, BASE.lat + 0.5, BASE.lon)]),
            ],
            vec![hva("depot", BASE, 1.0)],
        ),
    );
    let placements = [AssetPlacement::new("quick_gun", BASE.lat, BASE.lon)];

    let states = run_states(&registry, &plan, &placements, 11, 120);
    let shot = states
        .iter()
        .position(|s| s.assets[0].ammo_expended == 1)
        .expect("gun should fire within the window");

    assert_eq!(states[shot].assets[0].ammo, 0);
    let restocked = &states[shot + 1];
    assert_eq!(restocked.assets[0].ammo, 1);
    assert!(!restocked.assets[0].reloading);
    assert_eq!(restocked.assets[0].status, AssetStatus::Active);
    assert!(restocked
        .events
        .iter()
        .any(|e| e.kind == EventKind::Reload && e.time == restocked.time));
}

#[test]
fn test_shot_records_engagement_and_cost() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![phase(PhaseTrigger::at(0), vec![drone_spawn(1, BASE.lat + 0.05, BASE.lon)])],
            vec![hva("depot", BASE, 1.0)],
        ),
    );
    let states = run_states(&registry, &plan, &gun_at_base(), 11, 120);
    let shot = states
        .iter()
        .position(|s| !s.engagements.is_empty())
        .expect("gun should fire");
    let state = &states[shot];
    let engagement = &state.engagements[0];
    assert_eq!(engagement.asset_id, state.assets[0].id);
    assert_eq!(engagement.threat_id, state.threats[0].id);
    assert_eq!(engagement.start_time, state.time);
    assert_eq!(engagement.end_time, Some(state.time));
    assert_eq!(engagement.cost, 100.0);
    assert_eq!(state.cer.defense_cost, 100.0);

    let detected_first = state
        .events
        .iter()
        .position(|e| e.kind == EventKind::Detect)
        .unwrap();
    let fired = state
        .events
        .iter()
        .position(|e| matches!(e.kind, EventKind::Kill | EventKind::Miss))
        .unwrap();
    assert!(detected_first < fired);
}

#[test]
fn test_demo_run_invariants() {
    let registry = catalog::builtin_registry().unwrap();
    let placements = catalog::demo_placements("vovchansk_pocket_2026");
    let mut engine = SimulationEngine::new(
        &registry,
        "vovchansk_pocket_2026",
        &placements,
        SimConfig::default(),
    )
    .unwrap();

    fn rank(status: ThreatStatus) -> u8 {
        match status {
            ThreatStatus::Active => 0,
            ThreatStatus::Detected | ThreatStatus::Engaged => 1,
            ThreatStatus::Destroyed | ThreatStatus::Escaped => 2,
        }
    }

    let mut previous: Vec<ThreatStatus> = Vec::new();
    while !engine.state().is_terminal() {
        let state = engine.tick();
        for asset in &state.assets {
            assert!(asset.ammo <= asset.definition.ammo_capacity);
            assert_eq!(asset.reloading, asset.status == AssetStatus::Reloading);
        }
        for (threat, before) in state.threats.iter().zip(&previous) {
            assert_ne!(threat.status, ThreatStatus::Engaged);
            assert!(rank(threat.status) >= rank(*before), "status went backward");
            if before.is_terminal() {
                assert_eq!(threat.status, *before, "terminal status changed");
            }
        }
        assert_eq!(state.cer, cer_for_state(state));
        previous = state.threats.iter().map(|t| t.status).collect();
    }
    let total = engine.plan().scenario.total_threats() as usize;
    assert!(engine.state().time <= 1800);
    assert!(engine.state().threats.len() <= total);
}

// ---- Functional step ----

#[test]
fn test_terminal_step_is_noop() {
    let registry = registry();
    let plan = plan(&registry, scenario(vec![], vec![]));
    let states = run_states(&registry, &plan, &gun_at_base(), 1, 1);
    let terminal = &states[1];
    assert!(terminal.is_terminal());

    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let again = step(terminal, &plan, &EnvironmentModifiers::default(), &mut rng);
    assert_eq!(&again, terminal);
}

#[test]
fn test_step_leaves_previous_state_unchanged() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![phase(PhaseTrigger::at(0), vec![drone_spawn(3, BASE.lat + 0.05, BASE.lon)])],
            vec![hva("depot", BASE, 1.0)],
        ),
    );
    let initial = initial_state(&plan, &registry, &gun_at_base()).unwrap();
    let snapshot = serde_json::to_string(&initial).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let env = EnvironmentModifiers::default();
    let next = step(&initial, &plan, &env, &mut rng);
    let after = step(&next, &plan, &env, &mut rng);

    assert_eq!(serde_json::to_string(&initial).unwrap(), snapshot);
    assert!(initial.events.is_empty());
    assert_eq!(next.time, 1);
    assert_eq!(next.threats.len(), 3);
    assert!(after.events.len() >= next.events.len());
    assert_eq!(after.time, 2);
}

// ---- Phases and spawning ----

#[test]
fn test_spawn_stagger_and_delay() {
    let registry = registry();
    let mut spawn = drone_spawn(3, BASE.lat + 0.2, BASE.lon);
    spawn.delay = Some(5);
    let plan = plan(
        &registry,
        scenario(
            vec![phase(PhaseTrigger::at(0), vec![spawn])],
            vec![hva("depot", BASE, 1.0)],
        ),
    );
    let states = run_states(&registry, &plan, &[], 2, 7);

    let spawned = &states[1];
    let times: Vec<u64> = spawned.threats.iter().map(|t| t.spawn_time).collect();
    assert_eq!(times, [6, 8, 10]);
    assert_eq!(spawned.phase, 1);
    let spawn_events = spawned
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Spawn)
        .count();
    assert_eq!(spawn_events, 3);
    assert!(spawned.events.iter().any(|e| e.kind == EventKind::Phase));

    // Inert until spawn time.
    let waiting = &states[5];
    assert_eq!(waiting.threats[0].position, spawned.threats[0].position);
    assert!(waiting.threats[0].trail.is_empty());
    let moving = &states[6];
    assert_ne!(moving.threats[0].position, spawned.threats[0].position);
    assert_eq!(moving.threats[1].position, spawned.threats[1].position);
}

#[test]
fn test_spawn_jitter_and_altitude() {
    let registry = registry();
    // Delayed so nothing has moved off its spawn point on the first tick.
    let mut banded = drone_spawn(4, BASE.lat + 0.2, BASE.lon);
    banded.delay = Some(20);
    let mut fixed = banded.clone();
    fixed.altitude = Some(42.0);
    let plan = plan(
        &registry,
        scenario(
            vec![phase(PhaseTrigger::at(0), vec![banded, fixed])],
            vec![hva("depot", BASE, 1.0)],
        ),
    );
    let states = run_states(&registry, &plan, &[], 8, 1);
    let origin = GeoPoint::new(BASE.lat + 0.2, BASE.lon);
    for (i, threat) in states[1].threats.iter().enumerate() {
        assert!(threat.trail.is_empty());
        assert!((threat.position.lat - origin.lat).abs() <= 0.001 + 1e-12);
        assert!((threat.position.lon - origin.lon).abs() <= 0.001 + 1e-12);
        assert!((8.0..=12.0).contains(&threat.speed), "speed {}", threat.speed);
        let expected_altitude = if i < 4 { 500.0 } else { 42.0 };
        assert_eq!(threat.altitude, expected_altitude);
    }
}

#[test]
fn test_phases_fire_in_order_and_block() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![
                phase(PhaseTrigger::at(10), vec![drone_spawn(1, BASE.lat + 0.5, BASE.lon)]),
                // Already due, but must wait for the phase before it.
                phase(PhaseTrigger::at(2), vec![drone_spawn(1, BASE.lat + 0.5, BASE.lon)]),
            ],
            vec![hva("depot", BASE, 1.0)],
        ),
    );
    let states = run_states(&registry, &plan, &[], 2, 10);
    assert_eq!(states[9].phase, 0);
    assert!(states[9].threats.is_empty());
    assert_eq!(states[10].phase, 2);
    assert_eq!(states[10].threats.len(), 2);
}

#[test]
fn test_command_override_records_roe() {
    let registry = registry();
    let mut wave = phase(PhaseTrigger::at(1), vec![drone_spawn(1, BASE.lat + 0.5, BASE.lon)]);
    wave.command_override = Some(
        [
            (Side::Blue, RoeAuthority::WeaponHold),
            (Side::Red, RoeAuthority::WeaponFree),
        ]
        .into_iter()
        .collect(),
    );
    let plan = plan(&registry, scenario(vec![wave], vec![hva("depot", BASE, 1.0)]));
    let states = run_states(&registry, &plan, &[], 2, 1);

    let state = &states[1];
    assert_eq!(state.blue_roe, Some(RoeAuthority::WeaponHold));
    let commands: Vec<_> = state
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Command)
        .collect();
    assert_eq!(commands.len(), 2);
    assert_eq!(
        commands[0].details,
        Some(EventDetails::RoeChange {
            side: Side::Blue,
            authority: RoeAuthority::WeaponHold
        })
    );
}

#[test]
fn test_hva_damaged_condition_trigger() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![
                phase(PhaseTrigger::at(0), vec![drone_spawn(1, BASE.lat + 0.002, BASE.lon)]),
                phase(
                    PhaseTrigger::on(TriggerCondition::HvaDamaged),
                    vec![drone_spawn(2, BASE.lat + 0.5, BASE.lon)],
                ),
            ],
            vec![hva("depot", BASE, 1.0)],
        ),
    );
    let states = run_states(&registry, &plan, &[], 6, 80);
    let struck = states
        .iter()
        .position(|s| s.hva_status[0].damaged)
        .expect("first drone should strike");

    assert_eq!(states[struck].phase, 1);
    assert_eq!(states[struck + 1].phase, 2);
    assert_eq!(states[struck + 1].threats.len(), 3);
}

#[test]
fn test_wave_cleared_condition_trigger() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![
                phase(PhaseTrigger::at(0), vec![drone_spawn(1, BASE.lat + 0.002, BASE.lon)]),
                phase(
                    PhaseTrigger {
                        time: Some(5),
                        condition: Some(TriggerCondition::WaveCleared),
                    },
                    vec![drone_spawn(1, BASE.lat + 0.5, BASE.lon)],
                ),
            ],
            vec![],
        ),
    );
    let states = run_states(&registry, &plan, &[], 6, 80);
    let cleared = states
        .iter()
        .position(|s| s.threats.first().is_some_and(|t| t.status.is_terminal()))
        .unwrap();
    assert!(cleared >= 5);
    assert_eq!(states[cleared].phase, 1);
    let fired = states.iter().position(|s| s.phase == 2).unwrap();
    assert_eq!(fired, cleared + 1);
}

#[test]
fn test_target_tags() {
    let registry = registry();
    let post = GeoPoint::new(BASE.lat - 0.01, BASE.lon);
    let mut tagged = drone_spawn(1, BASE.lat + 0.5, BASE.lon);
    tagged.target = Some("command_post".into());
    let mut unmatched = drone_spawn(1, BASE.lat + 0.5, BASE.lon);
    unmatched.target = Some("ad_positions".into());
    let plan = plan(
        &registry,
        scenario(
            vec![phase(PhaseTrigger::at(0), vec![tagged, unmatched])],
            vec![hva("depot", BASE, 1.0), hva("command_post", post, 1.0)],
        ),
    );
    let states = run_states(&registry, &plan, &[], 1, 3);
    let threats = &states[3].threats;
    assert_eq!(threats[0].target, post);
    assert_eq!(threats[1].target, BASE);

    for threat in threats {
        let expected = bearing(threat.position, threat.target);
        assert!((threat.heading - expected).abs() < 1e-9);
    }
}

#[test]
fn test_trail_is_bounded() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![phase(PhaseTrigger::at(0), vec![drone_spawn(1, BASE.lat + 0.5, BASE.lon)])],
            vec![hva("depot", BASE, 1.0)],
        ),
    );
    let states = run_states(&registry, &plan, &[], 1, 100);
    let threat = &states[100].threats[0];
    assert_eq!(threat.trail.len(), 60);
    assert_eq!(threat.trail.back().unwrap().time, 100);
    assert_eq!(threat.trail.front().unwrap().time, 41);
}

// ---- Targeting ----

#[test]
fn test_select_nearest_then_first() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![phase(
                PhaseTrigger::at(0),
                vec![drone_spawn(3, BASE.lat + 0.05, BASE.lon)],
            )],
            vec![hva("depot", BASE, 1.0)],
        ),
    );
    let mut state = run_states(&registry, &plan, &gun_at_base(), 1, 0).remove(0);
    let template = {
        let states = run_states(&registry, &plan, &[], 1, 1);
        states[1].threats[0].clone()
    };
    let at = |id: u64, lat: f64, status: ThreatStatus| {
        let mut t = template.clone();
        t.id = EntityId(id);
        t.position = GeoPoint::new(lat, BASE.lon);
        t.status = status;
        t.spawn_time = 0;
        t
    };
    state.threats = vec![
        at(10, BASE.lat + 0.0625, ThreatStatus::Detected),
        at(11, BASE.lat + 0.015625, ThreatStatus::Active), // nearer, not detected
        at(12, BASE.lat + 0.03125, ThreatStatus::Detected),
        at(13, BASE.lat - 0.03125, ThreatStatus::Detected), // same distance as 12
    ];
    let asset = &state.assets[0];
    let (index, distance) = select_target(asset, &state.threats, 1).unwrap();
    assert_eq!(index, 2);
    assert!((distance - distance_km(BASE, state.threats[2].position)).abs() < 1e-12);

    // Out of the engagement ceiling: skipped.
    state.threats[2].altitude = 9000.0;
    let (index, _) = select_target(&state.assets[0], &state.threats, 1).unwrap();
    assert_eq!(index, 3);
}

#[test]
fn test_sensor_only_assets_never_fire() {
    let registry = registry();
    let plan = plan(
        &registry,
        scenario(
            vec![phase(PhaseTrigger::at(0), vec![drone_spawn(2, BASE.lat + 0.03, BASE.lon)])],
            vec![hva("depot", BASE, 1.0)],
        ),
    );
    let sensors = vec![
        AssetPlacement::new("thermal_sensor", BASE.lat, BASE.lon),
        AssetPlacement::new("cellular_detector", BASE.lat, BASE.lon + 0.05),
    ];
    let states = run_states(&registry, &plan, &sensors, 3, 50);
    let last = states.last().unwrap();
    assert!(last.engagements.is_empty());
    assert!(last.assets.iter().all(|a| !a.reloading && a.ammo_expended == 0));
}

// ---- Plan resolution and setup ----

#[test]
fn test_unknown_references_fail_at_setup() {
    let registry = registry();
    assert_eq!(
        ScenarioPlan::resolve(&registry, "kursk_2024").unwrap_err(),
        SimError::UnknownScenario("kursk_2024".into())
    );

    let mut bad_mission = scenario(vec![], vec![]);
    bad_mission.sides.blue.mission = "area_denial".into();
    let err = ScenarioPlan::from_scenario(&registry, Arc::new(bad_mission)).unwrap_err();
    assert!(matches!(err, SimError::UnknownMission { .. }));

    let mut bad_threat = drone_spawn(1, BASE.lat, BASE.lon);
    bad_threat.threat_type = "tu_95".into();
    let err = ScenarioPlan::from_scenario(
        &registry,
        Arc::new(scenario(vec![phase(PhaseTrigger::at(0), vec![bad_threat])], vec![])),
    )
    .unwrap_err();
    assert_eq!(err, SimError::UnknownThreat("tu_95".into()));

    let plan = plan(&registry, scenario(vec![], vec![]));
    let err = initial_state(&plan, &registry, &[AssetPlacement::new("s400", 0.0, 0.0)]).unwrap_err();
    assert_eq!(err, SimError::UnknownAsset("s400".into()));
    let err = initial_state(&plan, &registry, &[AssetPlacement::new("gepard", 91.0, 0.0)])
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidPlacement { index: 0, .. }));
}

#[test]
fn test_malformed_scenario_rejected() {
    let registry = registry();
    let mut empty_spawn = drone_spawn(1, BASE.lat, BASE.lon);
    empty_spawn.count = 0;
    let err = ScenarioPlan::from_scenario(
        &registry,
        Arc::new(scenario(vec![phase(PhaseTrigger::at(0), vec![empty_spawn])], vec![])),
    )
    .unwrap_err();
    assert!(matches!(err, SimError::Registry(_)));

    let mut endless = drone_spawn(1, BASE.lat, BASE.lon);
    endless.delay = Some(u64::MAX);
    let err = ScenarioPlan::from_scenario(
        &registry,
        Arc::new(scenario(vec![phase(PhaseTrigger::at(0), vec![endless])], vec![])),
    )
    .unwrap_err();
    assert!(matches!(err, SimError::Registry(_)));
}

#[test]
fn test_longest_spawn_delay_keeps_threat_inert() {
    let registry = registry();
    let mut late = drone_spawn(2, BASE.lat + 0.01, BASE.lon);
    late.delay = Some(bastion_core::constants::MAX_SPAWN_DELAY_SECS);
    let plan = plan(
        &registry,
        scenario(vec![phase(PhaseTrigger::at(0), vec![late])], vec![hva("depot", BASE, 0.0)]),
    );
    let states = run_states(&registry, &plan, &[], 2, 30);

    let spawned = &states[1];
    let last = states.last().unwrap();
    assert_eq!(spawned.threats[1].spawn_time, 1 + 86_400 + 2);
    assert_eq!(last.status, RunStatus::Running);
    for (now, then) in last.threats.iter().zip(&spawned.threats) {
        assert_eq!(now.position, then.position);
        assert!(now.trail.is_empty());
    }
}

#[test]
fn test_initial_state_shape() {
    let registry = catalog::builtin_registry().unwrap();
    let plan = ScenarioPlan::resolve(&registry, "vovchansk_pocket_2026").unwrap();
    let placements = catalog::demo_placements("vovchansk_pocket_2026");
    let state = initial_state(&plan, &registry, &placements).unwrap();

    assert_eq!(state.time, 0);
    assert_eq!(state.status, RunStatus::Running);
    assert_eq!(state.assets.len(), placements.len());
    for (asset, placement) in state.assets.iter().zip(&placements) {
        assert_eq!(asset.definition.asset_type, placement.asset_type);
        assert_eq!(asset.ammo, asset.definition.ammo_capacity);
        assert_eq!(asset.status, AssetStatus::Active);
    }
    let ids: Vec<u64> = state.assets.iter().map(|a| a.id.0).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5, 6]);
    assert_eq!(state.hva_status.len(), 2);
    assert!(state.hva_status.iter().all(|h| !h.damaged));
    assert!(state.cer.cer.is_infinite());
}

// ---- Engine driver ----

#[test]
fn test_time_scale_clamps_and_drives_frames() {
    let registry = catalog::builtin_registry().unwrap();
    let placements = catalog::demo_placements("custom_mission");
    let mut engine = SimulationEngine::new(
        &registry,
        "custom_mission",
        &placements,
        SimConfig {
            seed: 5,
            time_scale: 9.0,
        },
    )
    .unwrap();
    assert_eq!(engine.time_scale(), 4.0);

    engine.advance_frame();
    assert_eq!(engine.state().time, 4);

    engine.set_time_scale(-1.0);
    assert_eq!(engine.time_scale(), 0.0);
    engine.advance_frame();
    assert_eq!(engine.state().time, 4);

    engine.set_time_scale(2.4);
    engine.advance_frame();
    assert_eq!(engine.state().time, 6);
}

#[test]
fn test_engine_weather_sets_modifiers() {
    let registry = catalog::builtin_registry().unwrap();
    let mut engine =
        SimulationEngine::new(&registry, "custom_mission", &[], SimConfig::default()).unwrap();
    assert_eq!(*engine.environment(), EnvironmentModifiers::default());

    let fog = WeatherSnapshot {
        temperature_c: 5.0,
        wind_speed_ms: 2.0,
        visibility_m: 800.0,
        rain_1h_mm: 0.0,
        cloud_cover_pct: 100.0,
    };
    engine.set_weather(Some(&fog));
    assert_eq!(engine.environment().visibility_factor, 0.3);
    engine.set_weather(None);
    assert_eq!(*engine.environment(), EnvironmentModifiers::default());
}

#[test]
fn test_engine_runs_to_completion() {
    let registry = catalog::builtin_registry().unwrap();
    let placements = catalog::demo_placements("custom_mission");
    let mut engine =
        SimulationEngine::new(&registry, "custom_mission", &placements, SimConfig::default())
            .unwrap();
    let status = engine.run_to_completion();
    assert!(status.is_terminal());
    assert_eq!(engine.status(), status);
    assert_eq!(engine.cer(), engine.state().cer);

    let frozen = engine.state().clone();
    engine.tick();
    assert_eq!(engine.state(), &frozen);
}

#[test]
fn test_engine_rejects_unknown_scenario() {
    let registry = catalog::builtin_registry().unwrap();
    let err = SimulationEngine::new(&registry, "nowhere", &[], SimConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "unknown scenario 'nowhere'");
}

#[test]
fn test_builtin_catalog_loads() {
    let registry = catalog::builtin_registry().unwrap();
    let scenarios: Vec<_> = registry.scenarios().map(|s| s.scenario_id.as_str()).collect();
    assert_eq!(scenarios, ["custom_mission", "vovchansk_pocket_2026"]);
    assert_eq!(registry.threats().count(), 9);
    assert_eq!(registry.assets().count(), 6);
    assert_eq!(registry.asset_groups().count(), 8);
    assert_eq!(
        registry.scenario("vovchansk_pocket_2026").unwrap().total_threats(),
        40
    );
}
