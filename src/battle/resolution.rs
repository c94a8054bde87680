//! Action resolution: the only code that mutates HP, positions, and
//! statuses. Everything upstream (validation, adherence, the survey, the
//! judge) decides WHICH action runs; this module runs it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::abilities;
use crate::battle::character::{BattleCharacterState, StatusKind};
use crate::battle::coaching::OrderAction;
use crate::battle::constants::{GUARD_DURATION_TURNS, HAZARD_DURATION_TURNS, MIN_DAMAGE};
use crate::battle::grid::BattleGrid;
use crate::battle::hex::HexCoord;
use crate::battle::terrain::PerimeterHazard;
use crate::core::types::CharacterId;

/// What actually happened when an action resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Moved { from: HexCoord, to: HexCoord },
    Struck { target: CharacterId, damage: i32, knockout: bool },
    Guarded,
    Held,
}

/// Damage a strike from `attacker` would deal to `target` right now.
/// Attack minus effective defense, floored at the minimum.
pub fn projected_strike_damage(attacker: &BattleCharacterState, target: &BattleCharacterState) -> i32 {
    (attacker.stats.attack - target.effective_defense()).max(MIN_DAMAGE)
}

/// Resolve one action for `actor_id`. The action is assumed to have been
/// validated or judge-approved; anything that no longer makes sense on
/// the current board (target already down, destination taken) degrades
/// to a hold rather than corrupting state.
pub fn apply_action(
    actor_id: CharacterId,
    action: &OrderAction,
    characters: &mut [BattleCharacterState],
    grid: &mut BattleGrid,
) -> ActionOutcome {
    match action {
        OrderAction::Hold => ActionOutcome::Held,
        OrderAction::Guard => {
            if let Some(actor) = characters.iter_mut().find(|c| c.id == actor_id) {
                actor.apply_status(StatusKind::Guard, GUARD_DURATION_TURNS);
            }
            ActionOutcome::Guarded
        }
        OrderAction::MoveTo { destination } => {
            let destination = *destination;
            let Some(actor) = characters.iter().find(|c| c.id == actor_id) else {
                return ActionOutcome::Held;
            };
            let Some(from) = actor.position else {
                return ActionOutcome::Held;
            };
            if !grid.relocate(actor_id, destination) {
                return ActionOutcome::Held;
            }
            if let Some(actor) = characters.iter_mut().find(|c| c.id == actor_id) {
                actor.position = Some(destination);
            }
            debug!(actor = %actor_id, %from, to = %destination, "moved");
            ActionOutcome::Moved { from, to: destination }
        }
        OrderAction::Strike { target } => land_hit(actor_id, *target, 0, characters, grid),
        OrderAction::Cast { ability, target } => {
            let Some(def) = abilities::lookup(ability) else {
                return ActionOutcome::Held;
            };
            {
                let Some(actor) = characters.iter_mut().find(|c| c.id == actor_id) else {
                    return ActionOutcome::Held;
                };
                actor.spend_mana(def.mana_cost);
                actor.start_cooldown(def.id.clone(), def.cooldown_turns);
                if def.kind == abilities::AbilityKind::Guard {
                    actor.apply_status(StatusKind::Guard, GUARD_DURATION_TURNS);
                    return ActionOutcome::Guarded;
                }
            }
            land_hit(actor_id, *target, def.power, characters, grid)
        }
    }
}

/// Shared Strike/Cast damage path. `bonus_power` is the ability power on
/// top of the attacker's base attack, zero for a plain strike.
fn land_hit(
    actor_id: CharacterId,
    target: CharacterId,
    bonus_power: i32,
    characters: &mut [BattleCharacterState],
    grid: &mut BattleGrid,
) -> ActionOutcome {
    let Some(attacker_idx) = characters.iter().position(|c| c.id == actor_id) else {
        return ActionOutcome::Held;
    };
    let Some(target_idx) = characters.iter().position(|c| c.id == target) else {
        return ActionOutcome::Held;
    };
    if !characters[target_idx].is_alive() {
        return ActionOutcome::Held;
    }

    let damage = (characters[attacker_idx].stats.attack + bonus_power
        - characters[target_idx].effective_defense())
    .max(MIN_DAMAGE);
    let lost = characters[target_idx].take_damage(damage);
    characters[attacker_idx].tally.damage_dealt += lost;

    let knockout = !characters[target_idx].is_alive();
    if knockout {
        characters[attacker_idx].tally.knockouts += 1;
        grid.remove(target);
        characters[target_idx].position = None;
    }

    debug!(attacker = %actor_id, target = %target, damage = lost, knockout, "hit");
    ActionOutcome::Struck { target, damage: lost, knockout }
}

/// End-of-turn perimeter exposure. A character ending their turn in the
/// water ring gets bitten, or has an existing bite escalate, and takes
/// the hazard's damage. Returns the hazard level and damage dealt, or
/// None on dry land.
pub fn apply_end_of_turn_hazard(
    actor_id: CharacterId,
    characters: &mut [BattleCharacterState],
    grid: &mut BattleGrid,
) -> Option<(PerimeterHazard, i32)> {
    let actor = characters.iter_mut().find(|c| c.id == actor_id)?;
    let position = actor.position?;
    if !grid.terrain_at(&position).is_hazardous() {
        return None;
    }

    let level = match actor.current_hazard() {
        Some(current) => current.escalate(),
        None => PerimeterHazard::Bitten,
    };
    actor.apply_status(StatusKind::Hazard(level), HAZARD_DURATION_TURNS);
    let damage = actor.take_damage(level.damage_per_turn());

    if !actor.is_alive() {
        actor.position = None;
        grid.remove(actor_id);
    }
    Some((level, damage))
}
