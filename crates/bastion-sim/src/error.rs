//! Errors raised while setting up a simulation run.
//!
//! Everything here is a configuration error surfaced before the first tick.
//! Once a `SimulationState` exists, stepping cannot fail.

use thiserror::Error;

use bastion_core::RegistryError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
    #[error("scenario '{scenario}' references unknown mission '{mission}'")]
    UnknownMission { scenario: String, mission: String },
    #[error("unknown threat type '{0}'")]
    UnknownThreat(String),
    #[error("unknown asset type '{0}'")]
    UnknownAsset(String),
    #[error("placement {index} ('{asset_type}') is not a valid lat/lon")]
    InvalidPlacement { index: usize, asset_type: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
