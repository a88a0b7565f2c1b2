use thiserror::Error;

use crate::core::types::{ActorId, LawId, ProcessId};
use crate::world::actor::ActorStatus;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Law not found: {0}")]
    LawNotFound(LawId),

    #[error("Process not found: {0}")]
    ProcessNotFound(ProcessId),

    #[error("Action not found: {0}")]
    ActionNotFound(String),

    #[error("Invalid status transition for {actor}: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        actor: ActorId,
        from: ActorStatus,
        to: ActorStatus,
    },

    #[error("Phase regression in {process}: {from} -> {to}")]
    PhaseRegression {
        process: ProcessId,
        from: String,
        to: String,
    },

    #[error("Outcome already set for {0}")]
    OutcomeAlreadySet(ProcessId),

    #[error("Weighted selection over an empty candidate list")]
    EmptyCandidates,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
