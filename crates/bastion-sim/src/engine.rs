//! Simulation engine: the functional `step` and its stateful driver.
//!
//! `step` maps a state to the next one and leaves its input untouched.
//! `SimulationEngine` owns a plan, the current state, a seeded ChaCha8 RNG,
//! and the environment, and advances in place. Completely headless, so a run
//! is reproducible from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use bastion_core::enums::RunStatus;
use bastion_core::state::{AssetPlacement, CerResult, SimulationState};
use bastion_core::Registry;

use crate::environment::{EnvironmentModifiers, WeatherSnapshot};
use crate::error::SimError;
use crate::scenario::ScenarioPlan;
use crate::systems;
use crate::world_setup;

/// Maximum ticks per frame.
const MAX_TIME_SCALE: f64 = 4.0;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Ticks per frame for `advance_frame` (1.0 = one tick).
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
        }
    }
}

/// Advance `state` by one tick, returning the new state. The input state is
/// not modified. A terminal state comes back unchanged.
pub fn step<R: Rng + ?Sized>(
    state: &SimulationState,
    plan: &ScenarioPlan,
    env: &EnvironmentModifiers,
    rng: &mut R,
) -> SimulationState {
    let mut next = state.clone();
    advance(&mut next, plan, env, rng);
    next
}

/// In-place form of [`step`].
pub fn advance<R: Rng + ?Sized>(
    state: &mut SimulationState,
    plan: &ScenarioPlan,
    env: &EnvironmentModifiers,
    rng: &mut R,
) {
    if state.is_terminal() {
        return;
    }
    state.time += 1;

    // 1. Phase triggers and spawning
    systems::phase_trigger::run(state, plan, rng);
    // 2. Movement, arrival, HVA strikes
    systems::movement::run(state, plan);
    // 3. Detection rolls
    systems::detection::run(state, env, rng);
    // 4. Target selection and shots
    systems::engagement::run(state, rng);
    // 5. Reload countdown
    systems::reload::run(state);
    // 6-7. Cost refresh, terminal check
    systems::outcome::run(state, plan);
}

/// The simulation engine. Owns the plan, the current state, and the RNG.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    plan: ScenarioPlan,
    state: SimulationState,
    environment: EnvironmentModifiers,
    time_scale: f64,
    rng: ChaCha8Rng,
}

impl SimulationEngine {
    /// Resolve a registered scenario and place the given assets.
    pub fn new(
        registry: &Registry,
        scenario_id: &str,
        placements: &[AssetPlacement],
        config: SimConfig,
    ) -> Result<Self, SimError> {
        let plan = ScenarioPlan::resolve(registry, scenario_id)?;
        Self::with_plan(plan, registry, placements, config)
    }

    /// Start from an already resolved plan.
    pub fn with_plan(
        plan: ScenarioPlan,
        registry: &Registry,
        placements: &[AssetPlacement],
        config: SimConfig,
    ) -> Result<Self, SimError> {
        let state = world_setup::initial_state(&plan, registry, placements)?;
        Ok(Self {
            plan,
            state,
            environment: EnvironmentModifiers::default(),
            time_scale: config.time_scale.clamp(0.0, MAX_TIME_SCALE),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    /// Advance one tick.
    pub fn tick(&mut self) -> &SimulationState {
        advance(&mut self.state, &self.plan, &self.environment, &mut self.rng);
        &self.state
    }

    /// Advance `round(time_scale)` ticks, stopping early once the run ends.
    pub fn advance_frame(&mut self) -> &SimulationState {
        let ticks = self.time_scale.round() as u32;
        for _ in 0..ticks {
            if self.state.is_terminal() {
                break;
            }
            self.tick();
        }
        &self.state
    }

    /// Tick until the run reaches a terminal status. Always terminates: the
    /// mission time limit forces a timeout.
    pub fn run_to_completion(&mut self) -> RunStatus {
        while !self.state.is_terminal() {
            self.tick();
        }
        self.state.status
    }

    /// Derive environment modifiers from a weather report. `None` clears them.
    pub fn set_weather(&mut self, weather: Option<&WeatherSnapshot>) {
        self.environment = EnvironmentModifiers::from_weather(weather);
    }

    pub fn set_environment(&mut self, environment: EnvironmentModifiers) {
        self.environment = environment;
    }

    pub fn environment(&self) -> &EnvironmentModifiers {
        &self.environment
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn plan(&self) -> &ScenarioPlan {
        &self.plan
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn status(&self) -> RunStatus {
        self.state.status
    }

    pub fn cer(&self) -> CerResult {
        self.state.cer
    }
}
