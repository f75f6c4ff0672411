//! Built-in reference catalog.
//!
//! The threats, defensive systems, command chains, missions, asset groups, and
//! scenarios shipped with the simulator, plus a demo placement set per scenario.
//! Everything here goes through the registry's validation like any other data.

use std::collections::BTreeMap;

use bastion_core::definitions::*;
use bastion_core::enums::*;
use bastion_core::state::AssetPlacement;
use bastion_core::types::{Band, GeoPoint};
use bastion_core::{Registry, RegistryError};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn signature(rcs: f64, thermal: ThermalSignature, acoustic_db: f64, visual: VisualSignature) -> Signature {
    Signature {
        rcs,
        thermal,
        acoustic_db,
        visual,
    }
}

fn jamming(traditional_ew: f64, russian_tobol: f64) -> JammingResistance {
    JammingResistance {
        traditional_ew,
        russian_tobol,
    }
}

pub fn threat_definitions() -> Vec<ThreatDefinition> {
    use ThermalSignature as T;
    use VisualSignature as V;

    vec![
        ThreatDefinition {
            threat_type: "fpv_kamikaze".into(),
            classification: "loitering_munition".into(),
            domain: Domain::Air,
            speed_ms: 40.0,
            altitude_m: Band::new(5.0, 150.0),
            range_km: 10.0,
            cost_usd: 500.0,
            warhead_kg: 1.5,
            signature: signature(0.01, T::Low, 75.0, V::Low),
            navigation: strings(&["analog_rc", "fpv_video"]),
            jamming_resistance: jamming(0.2, 0.1),
            special_traits: strings(&["swarm_capable", "top_attack"]),
            behavior_tree: "direct_attack".into(),
        },
        ThreatDefinition {
            threat_type: "strike_ugv".into(),
            classification: "unmanned_ground_vehicle".into(),
            domain: Domain::Ground,
            speed_ms: 8.0,
            altitude_m: Band::new(0.0, 0.0),
            range_km: 20.0,
            cost_usd: 25_000.0,
            warhead_kg: 30.0,
            signature: signature(2.0, T::Medium, 85.0, V::Medium),
            navigation: strings(&["radio_link", "LTE_4G"]),
            jamming_resistance: jamming(0.4, 0.3),
            special_traits: strings(&["terrain_hugging"]),
            behavior_tree: "ground_assault".into(),
        },
        ThreatDefinition {
            threat_type: "geran_2".into(),
            classification: "one_way_attack_drone".into(),
            domain: Domain::Air,
            speed_ms: 50.0,
            altitude_m: Band::new(50.0, 2500.0),
            range_km: 2000.0,
            cost_usd: 50_000.0,
            warhead_kg: 50.0,
            signature: signature(0.3, T::Medium, 95.0, V::Medium),
            navigation: strings(&["INS", "GNSS_CRPA", "LTE_4G"]),
            jamming_resistance: jamming(0.6, 0.5),
            special_traits: strings(&["mesh_modem"]),
            behavior_tree: "cruise_strike".into(),
        },
        ThreatDefinition {
            threat_type: "geran_5".into(),
            classification: "jet_powered_cruise_drone".into(),
            domain: Domain::Air,
            speed_ms: 170.0,
            altitude_m: Band::new(1000.0, 8000.0),
            range_km: 2500.0,
            cost_usd: 500_000.0,
            warhead_kg: 90.0,
            signature: signature(0.6, T::High, 110.0, V::Low),
            navigation: strings(&["INS", "GNSS_CRPA", "starlink"]),
            jamming_resistance: jamming(0.8, 0.7),
            special_traits: strings(&["high_altitude_ingress"]),
            behavior_tree: "cruise_strike".into(),
        },
        ThreatDefinition {
            threat_type: "equine_relay_node".into(),
            classification: "improvised_relay".into(),
            domain: Domain::Ground,
            speed_ms: 4.0,
            altitude_m: Band::new(0.0, 2.0),
            range_km: 30.0,
            cost_usd: 2_000.0,
            warhead_kg: 0.0,
            signature: signature(1.5, T::High, 40.0, V::Medium),
            navigation: strings(&["LTE_4G"]),
            jamming_resistance: jamming(0.1, 0.1),
            special_traits: strings(&["comms_relay", "organic"]),
            behavior_tree: "patrol".into(),
        },
        ThreatDefinition {
            threat_type: "molniya_minelayer".into(),
            classification: "multirotor_bomber".into(),
            domain: Domain::Air,
            speed_ms: 25.0,
            altitude_m: Band::new(20.0, 300.0),
            range_km: 25.0,
            cost_usd: 3_000.0,
            warhead_kg: 5.0,
            signature: signature(0.05, T::Low, 65.0, V::Low),
            navigation: strings(&["analog_rc"]),
            jamming_resistance: jamming(0.3, 0.2),
            special_traits: strings(&["mine_dispenser"]),
            behavior_tree: "area_denial".into(),
        },
        ThreatDefinition {
            threat_type: "shahed_238".into(),
            classification: "jet_powered_cruise_drone".into(),
            domain: Domain::Air,
            speed_ms: 150.0,
            altitude_m: Band::new(50.0, 3000.0),
            range_km: 1500.0,
            cost_usd: 400_000.0,
            warhead_kg: 50.0,
            signature: signature(0.4, T::High, 105.0, V::Medium),
            navigation: strings(&["INS", "GNSS_CRPA"]),
            jamming_resistance: jamming(0.7, 0.6),
            special_traits: strings(&["terrain_following"]),
            behavior_tree: "terrain_following".into(),
        },
        ThreatDefinition {
            threat_type: "geran_2_manpads".into(),
            classification: "armed_escort_drone".into(),
            domain: Domain::Air,
            speed_ms: 50.0,
            altitude_m: Band::new(100.0, 2500.0),
            range_km: 1800.0,
            cost_usd: 80_000.0,
            warhead_kg: 20.0,
            signature: signature(0.3, T::HighConfusion, 95.0, V::Medium),
            navigation: strings(&["INS", "GNSS"]),
            jamming_resistance: jamming(0.6, 0.5),
            special_traits: strings(&["air_to_air_manpads", "flare_dispenser"]),
            behavior_tree: "escort_intercept".into(),
        },
        ThreatDefinition {
            threat_type: "usv_magura".into(),
            classification: "unmanned_surface_vessel".into(),
            domain: Domain::Maritime,
            speed_ms: 20.0,
            altitude_m: Band::new(0.0, 0.0),
            range_km: 800.0,
            cost_usd: 250_000.0,
            warhead_kg: 300.0,
            signature: signature(1.0, T::Medium, 90.0, V::Medium),
            navigation: strings(&["starlink", "GNSS"]),
            jamming_resistance: jamming(0.5, 0.4),
            special_traits: strings(&["low_freeboard"]),
            behavior_tree: "maritime_strike".into(),
        },
    ]
}

pub fn asset_definitions() -> Vec<AssetDefinition> {
    use DetectionCapability::*;

    vec![
        AssetDefinition {
            asset_type: "gepard".into(),
            classification: "spaag".into(),
            cost_system: 5_000_000.0,
            cost_per_shot: 12_000.0,
            range_km: 5.5,
            engagement_ceiling: Band::new(0.0, 3500.0),
            kill_probability: 0.75,
            reload_seconds: 30.0,
            ammo_capacity: 20,
            rate_of_fire_rpm: 1100.0,
            targeting_speed: TargetingSpeed::Fast,
            vulnerabilities: strings(&["artillery", "fpv_top_attack"]),
            detection_capabilities: vec![Radar, Visual],
        },
        AssetDefinition {
            asset_type: "nasams".into(),
            classification: "medium_range_sam".into(),
            cost_system: 10_000_000.0,
            cost_per_shot: 1_000_000.0,
            range_km: 30.0,
            engagement_ceiling: Band::new(30.0, 16_000.0),
            kill_probability: 0.85,
            reload_seconds: 60.0,
            ammo_capacity: 6,
            rate_of_fire_rpm: 6.0,
            targeting_speed: TargetingSpeed::Medium,
            vulnerabilities: strings(&["sead", "saturation"]),
            detection_capabilities: vec![Radar],
        },
        AssetDefinition {
            asset_type: "patriot_battery".into(),
            classification: "long_range_sam".into(),
            cost_system: 1_100_000_000.0,
            cost_per_shot: 4_000_000.0,
            range_km: 100.0,
            engagement_ceiling: Band::new(60.0, 24_000.0),
            kill_probability: 0.9,
            reload_seconds: 120.0,
            ammo_capacity: 16,
            rate_of_fire_rpm: 2.0,
            targeting_speed: TargetingSpeed::Slow,
            vulnerabilities: strings(&["sead", "cost_exchange"]),
            detection_capabilities: vec![Radar],
        },
        AssetDefinition {
            asset_type: "laser_cuas".into(),
            classification: "directed_energy".into(),
            cost_system: 3_000_000.0,
            cost_per_shot: 10.0,
            range_km: 2.0,
            engagement_ceiling: Band::new(0.0, 1500.0),
            kill_probability: 0.7,
            reload_seconds: 10.0,
            ammo_capacity: 50,
            rate_of_fire_rpm: 20.0,
            targeting_speed: TargetingSpeed::Fast,
            vulnerabilities: strings(&["rain", "fog", "dust"]),
            detection_capabilities: vec![Thermal, Visual],
        },
        AssetDefinition {
            asset_type: "cellular_detector".into(),
            classification: "passive_sensor".into(),
            cost_system: 150_000.0,
            cost_per_shot: 0.0,
            range_km: 10.0,
            engagement_ceiling: Band::new(0.0, 5000.0),
            kill_probability: 0.0,
            reload_seconds: 0.0,
            ammo_capacity: 0,
            rate_of_fire_rpm: 0.0,
            targeting_speed: TargetingSpeed::Medium,
            vulnerabilities: strings(&["ew_spoofing"]),
            detection_capabilities: vec![CellularImei],
        },
        AssetDefinition {
            asset_type: "thermal_sensor".into(),
            classification: "passive_sensor".into(),
            cost_system: 80_000.0,
            cost_per_shot: 0.0,
            range_km: 15.0,
            engagement_ceiling: Band::new(0.0, 5000.0),
            kill_probability: 0.0,
            reload_seconds: 0.0,
            ammo_capacity: 0,
            rate_of_fire_rpm: 0.0,
            targeting_speed: TargetingSpeed::Medium,
            vulnerabilities: strings(&["rain", "fog"]),
            detection_capabilities: vec![Thermal],
        },
    ]
}

fn node(
    role: &str,
    roe_authority: RoeAuthority,
    tactics: &str,
    engagement_delay_seconds: f64,
    delegation_rules: &[&str],
    parent: Option<&str>,
    coverage_priority: Option<&str>,
) -> CommandNode {
    CommandNode {
        role: role.into(),
        roe_authority,
        tactics: tactics.into(),
        engagement_delay_seconds,
        delegation_rules: strings(delegation_rules),
        parent: parent.map(Into::into),
        coverage_priority: coverage_priority.map(Into::into),
    }
}

pub fn command_chains() -> Vec<CommandChain> {
    use RoeAuthority::*;

    vec![
        CommandChain {
            chain_id: "nato_iads".into(),
            name: "NATO Integrated Air Defense".into(),
            nodes: BTreeMap::from([
                (
                    "CRC".to_string(),
                    node(
                        "Control Reporting Center",
                        WeaponFree,
                        "centralized_control",
                        5.0,
                        &["threat_count>10:decentralize", "comms_lost:autonomous"],
                        None,
                        None,
                    ),
                ),
                (
                    "SHORAD".to_string(),
                    node(
                        "Short Range Air Defense",
                        WeaponTight,
                        "autonomous_defense",
                        2.0,
                        &["hva_threatened:weapon_free"],
                        Some("CRC"),
                        Some("low_altitude"),
                    ),
                ),
                (
                    "SENSOR_NET".to_string(),
                    node(
                        "Distributed Sensor Network",
                        WeaponHold,
                        "detect_and_report",
                        0.0,
                        &[],
                        Some("CRC"),
                        Some("all_altitude"),
                    ),
                ),
            ]),
        },
        CommandChain {
            chain_id: "russian_btg".into(),
            name: "Russian Battalion Tactical Group".into(),
            nodes: BTreeMap::from([
                (
                    "BTG_HQ".to_string(),
                    node(
                        "Battalion HQ",
                        WeaponFree,
                        "deep_strike_economic",
                        10.0,
                        &["losses>30%:retreat", "objective_reached:hold"],
                        None,
                        None,
                    ),
                ),
                (
                    "SWARM_LEAD".to_string(),
                    node(
                        "Swarm Flight Leader",
                        WeaponFree,
                        "saturation_attack",
                        1.0,
                        &["target_destroyed:redirect"],
                        Some("BTG_HQ"),
                        Some("hva_priority"),
                    ),
                ),
                (
                    "RECON".to_string(),
                    node(
                        "Reconnaissance Element",
                        WeaponHold,
                        "observe_and_report",
                        0.0,
                        &[],
                        Some("BTG_HQ"),
                        Some("forward_edge"),
                    ),
                ),
            ]),
        },
    ]
}

pub fn missions() -> Vec<Mission> {
    vec![
        Mission {
            mission_id: "point_defense".into(),
            name: "Point Defense".into(),
            description: "Defend a fixed high-value asset against incoming threats. \
                          Minimize cost while ensuring zero damage to the protected target."
                .into(),
            victory_conditions: strings(&["hva_survival_100%", "all_threats_neutralized"]),
            defeat_conditions: strings(&["hva_destroyed", "budget_exceeded"]),
            time_limit_seconds: 1800,
            constraints: MissionConstraints {
                min_asset_separation_km: 2.0,
                max_budget_usd: 25_000_000.0,
                coverage_overlap_penalty: 0.1,
            },
        },
        Mission {
            mission_id: "counter_swarm".into(),
            name: "Counter-Swarm Operations".into(),
            description: "Defend against waves of low-cost FPV drones and loitering munitions. \
                          Optimize for cost-exchange ratio."
                .into(),
            victory_conditions: strings(&["threats_neutralized>80%", "cer_below_5"]),
            defeat_conditions: strings(&["assets_destroyed>50%", "hva_damaged"]),
            time_limit_seconds: 3600,
            constraints: MissionConstraints {
                min_asset_separation_km: 1.5,
                max_budget_usd: 10_000_000.0,
                coverage_overlap_penalty: 0.05,
            },
        },
    ]
}

fn member(asset_type: &str, count: u32, max_deployable: Option<u32>) -> GroupMember {
    GroupMember {
        asset_type: asset_type.into(),
        count,
        max_deployable,
    }
}

fn group(group_id: &str, name: &str, description: &str, cost_usd: f64, assets: Vec<GroupMember>) -> AssetGroup {
    AssetGroup {
        group_id: group_id.into(),
        name: name.into(),
        description: description.into(),
        cost_usd,
        assets,
    }
}

pub fn asset_groups() -> Vec<AssetGroup> {
    vec![
        group(
            "infantry_platoon_aa",
            "Infantry Platoon AA",
            "Light man-portable air defense team. Highly mobile, limited ammo capacity.",
            500_000.0,
            vec![member("cellular_detector", 2, None), member("thermal_sensor", 1, None)],
        ),
        group(
            "spaag_section",
            "SPAAG Section",
            "Self-propelled anti-aircraft gun section for low-altitude threats and drone swarms.",
            1_500_000.0,
            vec![member("gepard", 3, Some(3))],
        ),
        group(
            "medium_sam_battery",
            "Medium SAM Battery",
            "Medium-range surface-to-air missile battery against cruise missiles and aircraft.",
            6_000_000.0,
            vec![member("nasams", 3, Some(2)), member("thermal_sensor", 1, None)],
        ),
        group(
            "heavy_sam_battery",
            "Heavy SAM Battery",
            "Long-range high-value air defense. Expensive but capable against high-altitude threats.",
            15_000_000.0,
            vec![member("patriot_battery", 2, Some(1)), member("nasams", 2, Some(2))],
        ),
        group(
            "cuas_detachment",
            "CUAS Detachment",
            "Counter-unmanned aircraft team with laser and sensor capabilities.",
            2_500_000.0,
            vec![
                member("laser_cuas", 4, Some(4)),
                member("cellular_detector", 2, None),
                member("thermal_sensor", 2, None),
            ],
        ),
        group(
            "combined_iads_platoon",
            "Combined IADS Platoon",
            "Layered integrated air defense with a balanced mix of sensors and weapons.",
            8_000_000.0,
            vec![
                member("gepard", 2, None),
                member("nasams", 2, None),
                member("laser_cuas", 2, None),
                member("cellular_detector", 2, None),
                member("thermal_sensor", 2, None),
            ],
        ),
        group(
            "sensor_network",
            "Sensor Network Only",
            "Passive detection and early warning network. No offensive capability.",
            500_000.0,
            vec![member("cellular_detector", 4, None), member("thermal_sensor", 4, None)],
        ),
        group(
            "rapid_reaction_team",
            "Rapid Reaction Team",
            "Light, mobile defense team for quick deployment. Limited sustainment capability.",
            1_000_000.0,
            vec![
                member("gepard", 1, None),
                member("laser_cuas", 2, None),
                member("cellular_detector", 1, None),
            ],
        ),
    ]
}

fn spawn(threat_type: &str, count: u32, lat: f64, lon: f64) -> Spawn {
    Spawn {
        threat_type: threat_type.into(),
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

fn behaving(mut spawn: Spawn, behavior: &str) -> Spawn {
    spawn.behavior = Some(behavior.into());
    spawn
}

fn hva(hva_type: &str, value_usd: f64, lat: f64, lon: f64, loss_tolerance: f64) -> Hva {
    Hva {
        hva_type: hva_type.into(),
        value_usd,
        lat,
        lon,
        loss_tolerance,
    }
}

pub fn scenarios() -> Vec<Scenario> {
    let fpv_opening = Spawn {
        behavior: Some("nap_of_earth".into()),
        target: Some("ad_positions".into()),
        ..spawn("fpv_kamikaze", 8, 50.35, 36.80)
    };
    let fpv_follow_up = Spawn {
        delay: Some(30),
        target: Some("ad_positions".into()),
        ..spawn("fpv_kamikaze", 12, 50.33, 36.85)
    };
    let geran_5 = Spawn {
        altitude: Some(6000.0),
        navigation: Some("starlink".into()),
        ..spawn("geran_5", 3, 50.50, 36.50)
    };
    let relay = Spawn {
        patrol: Some("forest_edge".into()),
        ..spawn("equine_relay_node", 1, 50.31, 36.90)
    };

    vec![
        Scenario {
            scenario_id: "vovchansk_pocket_2026".into(),
            name: "Vovchansk Pocket 2026".into(),
            description: "Multi-domain assault on a critical oil refinery. Combined drone swarms, \
                          UGVs, and high-altitude cruise drones arrive in coordinated waves."
                .into(),
            sides: Sides {
                blue: BlueSide {
                    command_chain: "nato_iads".into(),
                    mission: "point_defense".into(),
                    budget_usd: 25_000_000.0,
                    base_location: GeoPoint::new(50.29, 36.94),
                },
                red: RedSide {
                    command_chain: "russian_btg".into(),
                    doctrine: "deep_strike_economic".into(),
                },
            },
            phases: vec![
                Phase {
                    trigger: PhaseTrigger::at(0),
                    spawns: vec![
                        fpv_opening,
                        behaving(spawn("strike_ugv", 2, 50.32, 36.78), "ground_assault"),
                    ],
                    command_override: None,
                },
                Phase {
                    trigger: PhaseTrigger::at(300),
                    spawns: vec![
                        behaving(spawn("geran_2", 5, 50.40, 36.60), "cruise_strike"),
                        fpv_follow_up,
                    ],
                    command_override: None,
                },
                Phase {
                    trigger: PhaseTrigger::at(600),
                    spawns: vec![
                        geran_5,
                        relay,
                        behaving(spawn("molniya_minelayer", 2, 50.38, 36.75), "area_denial"),
                    ],
                    command_override: Some(BTreeMap::from([(Side::Blue, RoeAuthority::WeaponFree)])),
                },
                Phase {
                    trigger: PhaseTrigger::at(900),
                    spawns: vec![
                        behaving(spawn("shahed_238", 4, 50.45, 36.55), "terrain_following"),
                        behaving(spawn("geran_2_manpads", 2, 50.42, 36.65), "escort_intercept"),
                        behaving(spawn("usv_magura", 1, 50.20, 36.70), "maritime_strike"),
                    ],
                    command_override: None,
                },
            ],
            hv_assets: vec![
                hva("oil_refinery", 500_000_000.0, 50.29, 36.94, 0.0),
                hva("command_post", 50_000_000.0, 50.285, 36.935, 0.2),
            ],
        },
        Scenario {
            scenario_id: "custom_mission".into(),
            name: "Custom Mission".into(),
            description: "User-defined scenario. Configure your own threat waves, defense budget, \
                          and objectives."
                .into(),
            sides: Sides {
                blue: BlueSide {
                    command_chain: "nato_iads".into(),
                    mission: "counter_swarm".into(),
                    budget_usd: 10_000_000.0,
                    base_location: GeoPoint::new(48.85, 2.35),
                },
                red: RedSide {
                    command_chain: "russian_btg".into(),
                    doctrine: "saturation_attack".into(),
                },
            },
            phases: vec![Phase {
                trigger: PhaseTrigger::at(0),
                spawns: vec![Spawn {
                    target: Some("ad_positions".into()),
                    ..spawn("fpv_kamikaze", 5, 48.90, 2.25)
                }],
                command_override: None,
            }],
            hv_assets: vec![hva("airfield", 200_000_000.0, 48.85, 2.35, 0.1)],
        },
    ]
}

pub fn builtin_definitions() -> Definitions {
    Definitions {
        threats: threat_definitions(),
        assets: asset_definitions(),
        command_chains: command_chains(),
        missions: missions(),
        scenarios: scenarios(),
        asset_groups: asset_groups(),
    }
}

/// A loaded registry holding the full built-in catalog.
pub fn builtin_registry() -> Result<Registry, RegistryError> {
    Registry::from_definitions(builtin_definitions())
}

/// A reasonable starting defense for a built-in scenario, within its budget
/// and separation limits. Empty for unknown ids.
pub fn demo_placements(scenario_id: &str) -> Vec<AssetPlacement> {
    match scenario_id {
        "vovchansk_pocket_2026" => vec![
            AssetPlacement::new("gepard", 50.310, 36.915),
            AssetPlacement::new("gepard", 50.300, 36.880),
            AssetPlacement::new("laser_cuas", 50.290, 36.940),
            AssetPlacement::new("nasams", 50.270, 36.960),
            AssetPlacement::new("cellular_detector", 50.330, 36.890),
            AssetPlacement::new("thermal_sensor", 50.320, 36.960),
        ],
        "custom_mission" => vec![
            AssetPlacement::new("gepard", 48.870, 2.320),
            AssetPlacement::new("laser_cuas", 48.855, 2.340),
            AssetPlacement::new("cellular_detector", 48.880, 2.290),
            AssetPlacement::new("thermal_sensor", 48.840, 2.370),
        ],
        _ => Vec::new(),
    }
}
