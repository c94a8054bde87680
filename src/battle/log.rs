//! The combat log: an append-only, human-readable record of everything
//! that happened, in order. Replays of the same seed and inputs produce
//! an identical log.

use serde::{Deserialize, Serialize};

use crate::core::types::{CharacterId, Round};

/// What category of thing a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogAction {
    BattleStart,
    Initiative,
    TurnStart,
    Adherence,
    Rebellion,
    Judge,
    Move,
    Strike,
    Cast,
    Guard,
    Hold,
    Hazard,
    Knockout,
    BattleEnd,
}

/// How the recorded thing turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogOutcome {
    Neutral,
    Success,
    Failure,
    Damage(i32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub round: Round,
    pub character: Option<CharacterId>,
    pub action: LogAction,
    pub outcome: LogOutcome,
    pub message: String,
}

impl CombatLogEntry {
    pub fn new(
        round: Round,
        character: Option<CharacterId>,
        action: LogAction,
        outcome: LogOutcome,
        message: impl Into<String>,
    ) -> Self {
        CombatLogEntry { round, character, action, outcome, message: message.into() }
    }
}

impl std::fmt::Display for CombatLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[r{}] {}", self.round, self.message)
    }
}
