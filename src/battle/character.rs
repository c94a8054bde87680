//! Combatant state: stats, psychology, status effects, and per-battle
//! performance tallies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::battle::hex::HexCoord;
use crate::battle::terrain::PerimeterHazard;
use crate::core::types::{AbilityId, CharacterId, TeamSide};

/// Fixed combat attributes, set before the battle and never mutated by it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CharacterStats {
    pub max_hp: i32,
    pub max_mana: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

/// The psychological profile that drives adherence and rebellion. All
/// fields are 0..=100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PsychologyProfile {
    /// Baseline willingness to follow coach orders.
    pub adherence: u8,
    /// Current stress. High stress erodes adherence and biases rebellion
    /// toward fleeing.
    pub stress: u8,
    /// Self-belief. Feeds rebellion weighting, not the adherence check.
    pub confidence: u8,
    /// Appetite for flashy, aggressive play.
    pub ego: u8,
    /// Willingness to subordinate personal glory to team orders.
    pub team_player: u8,
}

/// What kind of status effect is in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    /// Defensive stance, grants a defense bonus until it expires.
    Guard,
    /// Perimeter water exposure at a given severity.
    Hazard(PerimeterHazard),
}

/// How a reapplied status interacts with an existing one of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackingRule {
    /// Reset the duration, keep one instance.
    Refresh,
    /// The new application escalates severity (hazards).
    Escalate,
}

/// An active status effect with remaining duration in turns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining_turns: u32,
}

impl StatusKind {
    pub fn stacking(&self) -> StackingRule {
        match self {
            StatusKind::Guard => StackingRule::Refresh,
            StatusKind::Hazard(_) => StackingRule::Escalate,
        }
    }
}

/// Running per-battle counters, reported in the final summary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PerformanceTally {
    pub damage_dealt: i32,
    pub damage_taken: i32,
    pub orders_followed: u32,
    pub orders_rebelled: u32,
    pub knockouts: u32,
}

/// Flat stat bonuses from equipped gear. Folded into base stats once at
/// setup; the engine never looks at gear again.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EquipmentBonuses {
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

/// A character as it enters the battle. Everything the engine needs to
/// build live state; owned by the caller, copied in at setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub id: CharacterId,
    pub name: String,
    pub stats: CharacterStats,
    /// Catalog abilities this character has learned. Strike and Guard are
    /// innate and never listed here.
    pub abilities: Vec<AbilityId>,
    pub psyche: PsychologyProfile,
    pub equipment: EquipmentBonuses,
}

/// Live state of one combatant during a battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleCharacterState {
    pub id: CharacterId,
    pub name: String,
    pub team: TeamSide,
    pub stats: CharacterStats,
    pub abilities: Vec<AbilityId>,
    pub psyche: PsychologyProfile,
    pub current_hp: i32,
    pub current_mana: i32,
    pub position: Option<HexCoord>,
    pub statuses: Vec<StatusEffect>,
    /// Remaining cooldown turns per ability. Sorted map so snapshots
    /// serialize in a stable order.
    pub cooldowns: BTreeMap<AbilityId, u32>,
    pub tally: PerformanceTally,
}

impl BattleCharacterState {
    pub fn from_snapshot(snap: &RosterSnapshot, team: TeamSide) -> Self {
        let mut stats = snap.stats;
        stats.max_hp += snap.equipment.max_hp;
        stats.attack += snap.equipment.attack;
        stats.defense += snap.equipment.defense;
        stats.speed += snap.equipment.speed;
        BattleCharacterState {
            id: snap.id,
            name: snap.name.clone(),
            team,
            stats,
            abilities: snap.abilities.clone(),
            psyche: snap.psyche,
            current_hp: stats.max_hp,
            current_mana: stats.max_mana,
            position: None,
            statuses: Vec::new(),
            cooldowns: BTreeMap::new(),
            tally: PerformanceTally::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Whether this character has the given catalog ability in their
    /// repertoire.
    pub fn knows(&self, ability: &AbilityId) -> bool {
        self.abilities.contains(ability)
    }

    /// Defense including active status bonuses.
    pub fn effective_defense(&self) -> i32 {
        let guard_bonus = if self.has_status(StatusKind::Guard) {
            crate::battle::constants::GUARD_DEFENSE_BONUS
        } else {
            0
        };
        self.stats.defense + guard_bonus
    }

    /// Movement budget after hazard penalties, never below zero.
    pub fn effective_movement(&self, base: u32) -> u32 {
        let penalty: u32 = self
            .statuses
            .iter()
            .map(|s| match s.kind {
                StatusKind::Hazard(h) => h.movement_penalty(),
                _ => 0,
            })
            .sum();
        base.saturating_sub(penalty)
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.iter().any(|s| s.kind == kind)
    }

    pub fn current_hazard(&self) -> Option<PerimeterHazard> {
        self.statuses.iter().find_map(|s| match s.kind {
            StatusKind::Hazard(h) => Some(h),
            _ => None,
        })
    }

    /// Apply a status, honoring its stacking rule.
    pub fn apply_status(&mut self, kind: StatusKind, duration: u32) {
        match kind.stacking() {
            StackingRule::Refresh => {
                if let Some(existing) = self.statuses.iter_mut().find(|s| s.kind == kind) {
                    existing.remaining_turns = duration;
                } else {
                    self.statuses.push(StatusEffect { kind, remaining_turns: duration });
                }
            }
            StackingRule::Escalate => {
                // Hazards escalate through the existing instance.
                if let Some(existing) = self
                    .statuses
                    .iter_mut()
                    .find(|s| matches!(s.kind, StatusKind::Hazard(_)))
                {
                    if let StatusKind::Hazard(h) = existing.kind {
                        existing.kind = StatusKind::Hazard(h.escalate());
                        existing.remaining_turns = duration;
                    }
                } else {
                    self.statuses.push(StatusEffect { kind, remaining_turns: duration });
                }
            }
        }
    }

    /// Take true damage, clamped so HP never goes negative. Returns the
    /// amount actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let lost = amount.min(self.current_hp).max(0);
        self.current_hp -= lost;
        self.tally.damage_taken += lost;
        lost
    }

    /// Count down status durations, dropping anything that expires.
    pub fn tick_statuses(&mut self) {
        for status in &mut self.statuses {
            status.remaining_turns = status.remaining_turns.saturating_sub(1);
        }
        self.statuses.retain(|s| s.remaining_turns > 0);
    }

    pub fn cooldown_remaining(&self, ability: &AbilityId) -> u32 {
        self.cooldowns.get(ability).copied().unwrap_or(0)
    }

    pub fn start_cooldown(&mut self, ability: AbilityId, turns: u32) {
        if turns > 0 {
            self.cooldowns.insert(ability, turns);
        }
    }

    /// Count down cooldowns, dropping anything that comes off.
    pub fn tick_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
    }

    pub fn can_afford(&self, mana_cost: i32) -> bool {
        self.current_mana >= mana_cost
    }

    /// Spend mana, clamped so it never goes negative.
    pub fn spend_mana(&mut self, amount: i32) {
        self.current_mana = (self.current_mana - amount).clamp(0, self.stats.max_mana);
    }
}
