//! Error taxonomy for reference data.

use thiserror::Error;

use crate::enums::DefinitionKind;

/// One field of one definition record failed its constraint.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{record}: field `{field}` {reason}")]
pub struct ValidationError {
    /// Record identifier, e.g. `threat 'geran_2'`.
    pub record: String,
    /// Field path inside the record, e.g. `phases[1].spawns[0].count`.
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(
        record: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            record: record.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("invalid definition: {0}")]
    Validation(#[from] ValidationError),
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: DefinitionKind, id: String },
    #[error("unknown {kind} '{id}'")]
    NotFound { kind: DefinitionKind, id: String },
}
