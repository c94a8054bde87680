//! Ability definitions. The engine ships a small built-in set; the data
//! shape is open so callers can register their own.

use serde::{Deserialize, Serialize};

use crate::core::types::AbilityId;

/// What an ability does when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Deal attack-scaled damage to a target.
    Strike,
    /// Enter a defensive stance until the user's next turn.
    Guard,
}

/// Who an ability may legally target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRule {
    /// A living enemy within range and line of sight.
    Enemy,
    /// The user only.
    SelfOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: AbilityId,
    pub name: String,
    pub kind: AbilityKind,
    pub target_rule: TargetRule,
    /// Maximum hex distance to the target. Zero for self-targeted.
    pub range: i32,
    /// Flat power added to the user's attack for damage abilities.
    pub power: i32,
    /// Mana spent when the ability resolves. Zero for basics.
    pub mana_cost: i32,
    /// Turns before the ability can be used again. Zero means no cooldown.
    pub cooldown_turns: u32,
}

/// The default melee attack every character carries.
pub fn basic_strike() -> AbilityDef {
    AbilityDef {
        id: AbilityId::new("strike"),
        name: "Strike".to_string(),
        kind: AbilityKind::Strike,
        target_rule: TargetRule::Enemy,
        range: 1,
        power: 0,
        mana_cost: 0,
        cooldown_turns: 0,
    }
}

/// The default defensive stance.
pub fn guard_ability() -> AbilityDef {
    AbilityDef {
        id: AbilityId::new("guard"),
        name: "Guard".to_string(),
        kind: AbilityKind::Guard,
        target_rule: TargetRule::SelfOnly,
        range: 0,
        power: 0,
        mana_cost: 0,
        cooldown_turns: 0,
    }
}

/// A thrown ranged attack: extra punch at a distance, paid for in mana
/// and a cooldown.
pub fn javelin() -> AbilityDef {
    AbilityDef {
        id: AbilityId::new("javelin"),
        name: "Javelin".to_string(),
        kind: AbilityKind::Strike,
        target_rule: TargetRule::Enemy,
        range: 3,
        power: 5,
        mana_cost: 10,
        cooldown_turns: 2,
    }
}

/// Resolve an ability id from the built-in catalog.
pub fn lookup(id: &AbilityId) -> Option<AbilityDef> {
    match id.as_str() {
        "strike" => Some(basic_strike()),
        "guard" => Some(guard_ability()),
        "javelin" => Some(javelin()),
        _ => None,
    }
}
