use thiserror::Error;

use crate::battle::coaching::OrderRejection;
use crate::battle::state::BattlePhase;

#[derive(Error, Debug)]
pub enum ArenaError {
    /// Recoverable: the order broke a rule. The coaching window re-opens and
    /// no state was mutated, no random draw consumed.
    #[error("illegal order: {0}")]
    IllegalOrder(#[from] OrderRejection),

    /// Fatal for this battle: an upstream caller produced a state the engine
    /// refuses to apply (duplicate occupancy, missing initiative entry, ...).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Event has no meaning in the current phase.
    #[error("event {event} not accepted in phase {phase:?}")]
    UnexpectedEvent { phase: BattlePhase, event: String },

    #[error("character not found: {0}")]
    CharacterNotFound(crate::core::types::CharacterId),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
