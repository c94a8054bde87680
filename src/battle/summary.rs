//! The post-battle report: winner, per-character numbers, and a record
//! of every rebellion that occurred.

use serde::{Deserialize, Serialize};

use crate::battle::character::PerformanceTally;
use crate::battle::judge::JudgeVerdict;
use crate::battle::rebellion::RogueTag;
use crate::core::types::{CharacterId, Round, TeamSide};

/// One adherence failure and what came of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebellionRecord {
    pub round: Round,
    pub character: CharacterId,
    pub rogue: Option<RogueTag>,
    /// Present only when the chosen candidate was rogue and went to the
    /// judge.
    pub verdict: Option<JudgeVerdict>,
    pub description: String,
}

/// Final standing of one combatant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterReport {
    pub id: CharacterId,
    pub name: String,
    pub team: TeamSide,
    pub remaining_hp: i32,
    pub tally: PerformanceTally,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSummary {
    /// None on a draw at the round cap.
    pub winner: Option<TeamSide>,
    pub reason: crate::battle::state::BattleOutcomeReason,
    pub rounds: Round,
    /// Total random draws consumed, for replay verification.
    pub draws: u64,
    pub characters: Vec<CharacterReport>,
    pub rebellions: Vec<RebellionRecord>,
}
