//! Judge arbitration for rogue actions.
//!
//! The judge is a fixed rules table, not a dice roller: given the same
//! rogue action in the same battle state it always returns the same
//! ruling, and it consumes no draws. It is consulted only for candidates
//! carrying a rogue tag; off-script but harmless actions resolve without
//! it.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::battle::character::BattleCharacterState;
use crate::battle::coaching::OrderAction;
use crate::battle::grid::BattleGrid;
use crate::battle::rebellion::RogueTag;
use crate::battle::terrain::PerimeterHazard;

/// What the judge decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JudgeVerdict {
    /// The rogue action stands as chosen.
    Permit,
    /// The action is replaced with a tamer one.
    Downgrade,
    /// The action is rejected outright; the character forfeits the turn.
    Forfeit,
}

/// A verdict plus the substitute action for downgrades and a line of
/// reasoning for the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeRuling {
    pub verdict: JudgeVerdict,
    pub replacement: Option<OrderAction>,
    pub reasoning: String,
}

/// Apply the rules table to a rogue action.
///
/// Friendly fire that would knock the teammate out is rejected outright
/// and the turn is lost; a lesser hit is permitted and left to the team
/// to live with.
/// Fleeing is permitted on dry land but pulled back from the water ring.
/// An overreach is permitted unless the character is already mauled, in
/// which case the charge is downgraded to a guard.
pub fn arbitrate(
    tag: RogueTag,
    action: &OrderAction,
    rebel: &BattleCharacterState,
    roster: &[BattleCharacterState],
    grid: &BattleGrid,
) -> JudgeRuling {
    let ruling = match tag {
        RogueTag::FriendlyFire => rule_friendly_fire(action, rebel, roster),
        RogueTag::Flee => rule_flee(action, rebel, grid),
        RogueTag::Overreach => rule_overreach(rebel),
    };

    info!(
        rebel = %rebel.id,
        tag = ?tag,
        verdict = ?ruling.verdict,
        reasoning = %ruling.reasoning,
        "judge ruling"
    );
    ruling
}

fn rule_friendly_fire(
    action: &OrderAction,
    rebel: &BattleCharacterState,
    roster: &[BattleCharacterState],
) -> JudgeRuling {
    let OrderAction::Strike { target } = action else {
        return JudgeRuling {
            verdict: JudgeVerdict::Downgrade,
            replacement: Some(OrderAction::Guard),
            reasoning: "friendly fire tag on a non-strike action".to_string(),
        };
    };
    let Some(victim) = roster.iter().find(|c| c.id == *target) else {
        return JudgeRuling {
            verdict: JudgeVerdict::Downgrade,
            replacement: Some(OrderAction::Guard),
            reasoning: "friendly fire target not on the field".to_string(),
        };
    };

    let projected = crate::battle::resolution::projected_strike_damage(rebel, victim);
    if projected >= victim.current_hp {
        JudgeRuling {
            verdict: JudgeVerdict::Forfeit,
            replacement: None,
            reasoning: format!("striking down teammate {} is out of bounds, turn forfeited", victim.name),
        }
    } else {
        JudgeRuling {
            verdict: JudgeVerdict::Permit,
            replacement: None,
            reasoning: "infighting permitted while the teammate can take it".to_string(),
        }
    }
}

fn rule_flee(action: &OrderAction, rebel: &BattleCharacterState, grid: &BattleGrid) -> JudgeRuling {
    let OrderAction::MoveTo { destination } = action else {
        return JudgeRuling {
            verdict: JudgeVerdict::Permit,
            replacement: None,
            reasoning: "flee tag on a stationary action".to_string(),
        };
    };
    if grid.terrain_at(destination).is_hazardous() {
        // Pull the route back to the last dry hex on the way out.
        let fallback = rebel
            .position
            .map(|from| from.line_to(destination))
            .and_then(|line| {
                line.into_iter()
                    .rev()
                    .find(|h| grid.is_free(h) && !grid.terrain_at(h).is_hazardous())
            });
        JudgeRuling {
            verdict: JudgeVerdict::Downgrade,
            replacement: Some(match fallback {
                Some(dry) => OrderAction::MoveTo { destination: dry },
                None => OrderAction::Hold,
            }),
            reasoning: "retreat stopped short of the water ring".to_string(),
        }
    } else {
        JudgeRuling {
            verdict: JudgeVerdict::Permit,
            replacement: None,
            reasoning: "retreat to open ground permitted".to_string(),
        }
    }
}

fn rule_overreach(rebel: &BattleCharacterState) -> JudgeRuling {
    if rebel.current_hazard() == Some(PerimeterHazard::Mauled) {
        JudgeRuling {
            verdict: JudgeVerdict::Downgrade,
            replacement: Some(OrderAction::Guard),
            reasoning: "a mauled fighter is in no shape to charge".to_string(),
        }
    } else {
        JudgeRuling {
            verdict: JudgeVerdict::Permit,
            replacement: None,
            reasoning: "reckless charge permitted".to_string(),
        }
    }
}
