//! Battle engine - coached tactical combat over a hex grid
//!
//! One character acts per turn, in initiative order, both sides intermixed.
//! A human coach issues the order; whether the character actually follows it
//! is a probability check against their adherence score. Failed checks hand
//! control to an autonomous rebellion survey, with a judge arbitrating any
//! rogue choice.
//!
//! Everything is driven by a single pure reducer over `BattleState`; the same
//! event stream replays identically for local play, spectators and tests.

pub mod abilities;
pub mod character;
pub mod coaching;
pub mod constants;
pub mod events;
pub mod grid;
pub mod hex;
pub mod judge;
pub mod log;
pub mod rebellion;
pub mod resolution;
pub mod rng;
pub mod scheduler;
pub mod state;
pub mod summary;
pub mod terrain;

// Re-exports for convenient access
pub use abilities::{basic_strike, guard_ability, javelin, lookup, AbilityDef, AbilityKind, TargetRule};
pub use character::{
    BattleCharacterState, CharacterStats, EquipmentBonuses, PerformanceTally, PsychologyProfile,
    RosterSnapshot, StackingRule, StatusEffect, StatusKind,
};
pub use coaching::{
    check_adherence, validate_order, AdherenceOutcome, CoachOrders, OrderAction, OrderRejection,
};
pub use constants::*;
pub use events::BattleEvent;
pub use grid::BattleGrid;
pub use hex::HexCoord;
pub use judge::{arbitrate, JudgeRuling, JudgeVerdict};
pub use log::{CombatLogEntry, LogAction, LogOutcome};
pub use rebellion::{survey_rebellion, RebellionCandidate, RebellionSurvey, RogueTag};
pub use resolution::{
    apply_action, apply_end_of_turn_hazard, projected_strike_damage, ActionOutcome,
};
pub use rng::BattleRng;
pub use scheduler::{roll_initiative, TurnState};
pub use state::{BattleOutcomeReason, BattlePhase, BattleState};
pub use summary::{BattleSummary, RebellionRecord};
pub use terrain::{PerimeterHazard, Terrain};
