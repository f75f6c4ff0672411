//! bastion-headless: run a built-in scenario to completion and log the outcome.
//!
//! Usage:
//!   bastion-headless [scenario_id] [seed]
//!   RUST_LOG=debug bastion-headless custom_mission 7

use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bastion_core::enums::EventKind;
use bastion_sim::catalog::{builtin_registry, demo_placements};
use bastion_sim::cost::format_usd;
use bastion_sim::{SimConfig, SimulationEngine};

const DEFAULT_SCENARIO: &str = "vovchansk_pocket_2026";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn print_usage() {
    eprintln!(
        "bastion-headless: run a BASTION scenario without a UI\n\
         \n\
         Usage: bastion-headless [scenario_id] [seed]\n\
         \n\
           scenario_id  built-in scenario (default: {DEFAULT_SCENARIO})\n\
           seed         RNG seed (default: 42)\n\
         \n\
         Set RUST_LOG=debug to trace phases and reloads.\n"
    );
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if matches!(args.first().map(String::as_str), Some("help" | "--help" | "-h")) {
        print_usage();
        return;
    }
    init_tracing();

    let scenario_id = args.first().map_or(DEFAULT_SCENARIO, String::as_str);
    let mut config = SimConfig::default();
    if let Some(seed) = args.get(1) {
        match seed.parse() {
            Ok(seed) => config.seed = seed,
            Err(_) => {
                eprintln!("Invalid seed: {seed}");
                print_usage();
                process::exit(1);
            }
        }
    }

    let registry = match builtin_registry() {
        Ok(registry) => registry,
        Err(e) => {
            error!(%e, "built-in catalog failed validation");
            process::exit(1);
        }
    };
    let placements = demo_placements(scenario_id);
    let mut engine = match SimulationEngine::new(&registry, scenario_id, &placements, config) {
        Ok(engine) => engine,
        Err(e) => {
            error!(%e, "could not start scenario");
            process::exit(1);
        }
    };

    let status = engine.run_to_completion();
    let state = engine.state();
    let cer = engine.cer();
    let count = |kind: EventKind| state.events.iter().filter(|e| e.kind == kind).count();

    info!(
        scenario = scenario_id,
        seed = config.seed,
        ?status,
        time = state.time,
        threats = state.threats.len(),
        kills = count(EventKind::Kill),
        misses = count(EventKind::Miss),
        strikes = count(EventKind::Damage),
        escapes = count(EventKind::Escape),
        "summary"
    );
    info!(
        defense_cost = %format_usd(cer.defense_cost),
        threat_value = %format_usd(cer.threat_value),
        damage = %format_usd(state.infrastructure_damage()),
        cer = %cer.display_ratio(),
        efficiency = %format!("{:.1}%", cer.efficiency),
        "cost exchange"
    );
    for asset in &state.assets {
        info!(
            asset = %asset.definition.display_name(),
            shots = asset.ammo_expended,
            kills = asset.kills,
            ammo = asset.ammo,
            "asset"
        );
    }
}
