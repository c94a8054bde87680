//! Coach orders: what they look like, when they are legal, and whether
//! the character actually follows them.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::battle::abilities;
use crate::battle::character::BattleCharacterState;
use crate::battle::grid::BattleGrid;
use crate::battle::hex::HexCoord;
use crate::battle::rng::BattleRng;
use crate::core::config::AdherenceTuning;
use crate::core::types::{AbilityId, CharacterId};

/// One action the coach can order during the coaching window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderAction {
    /// Move toward a destination hex within this turn's movement budget.
    MoveTo { destination: HexCoord },
    /// Strike an enemy with the basic attack.
    Strike { target: CharacterId },
    /// Use a catalog ability on a target, paying its mana and cooldown.
    Cast { ability: AbilityId, target: CharacterId },
    /// Take a defensive stance until next turn.
    Guard,
    /// Stand pat.
    Hold,
}

/// The coach's submitted order for the active character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachOrders {
    pub character: CharacterId,
    pub action: OrderAction,
}

/// Why an order was refused before any dice were rolled.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderRejection {
    #[error("order addressed to {ordered}, but it is {active}'s turn")]
    WrongCharacter { ordered: CharacterId, active: CharacterId },
    #[error("target {0} not found in this battle")]
    TargetNotFound(CharacterId),
    #[error("target {0} is already down")]
    TargetDown(CharacterId),
    #[error("cannot strike teammate {0}")]
    FriendlyTarget(CharacterId),
    #[error("target is {actual} hexes away, ability range is {range}")]
    OutOfRange { range: i32, actual: i32 },
    #[error("no line of sight to target")]
    NoLineOfSight,
    #[error("destination {0} is blocked or off the grid")]
    DestinationBlocked(HexCoord),
    #[error("destination {destination} is beyond this turn's movement of {budget}")]
    DestinationUnreachable { destination: HexCoord, budget: u32 },
    #[error("unknown ability {0}")]
    UnknownAbility(AbilityId),
    #[error("{character} has not learned {ability}")]
    AbilityNotLearned { ability: AbilityId, character: CharacterId },
    #[error("{ability} is on cooldown for {remaining} more turns")]
    AbilityOnCooldown { ability: AbilityId, remaining: u32 },
    #[error("{ability} costs {cost} mana, only {available} available")]
    InsufficientMana { ability: AbilityId, cost: i32, available: i32 },
    #[error("{0} can only target its user")]
    SelfTargetOnly(AbilityId),
}

/// The result of an adherence check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdherenceOutcome {
    pub followed: bool,
    /// The d100 roll, or zero when no die was cast.
    pub roll: u8,
    pub threshold: f32,
}

impl AdherenceOutcome {
    /// A failure imposed without rolling, used when the coaching window
    /// times out. Consumes no draw.
    pub fn forced_failure() -> Self {
        AdherenceOutcome { followed: false, roll: 0, threshold: 0.0 }
    }
}

impl OrderAction {
    /// Aggressive orders appeal to ego; restrained ones to team play.
    pub fn is_aggressive(&self) -> bool {
        matches!(self, OrderAction::Strike { .. } | OrderAction::Cast { .. })
    }
}

/// Check that an order is legal for the active character in the current
/// grid state. Legality is judged before adherence; an illegal order is
/// rejected outright and never reaches the dice.
pub fn validate_order(
    order: &CoachOrders,
    active: &BattleCharacterState,
    roster: &[BattleCharacterState],
    grid: &BattleGrid,
    movement_points: u32,
) -> Result<(), OrderRejection> {
    if order.character != active.id {
        return Err(OrderRejection::WrongCharacter {
            ordered: order.character,
            active: active.id,
        });
    }

    match &order.action {
        OrderAction::Guard | OrderAction::Hold => Ok(()),
        OrderAction::MoveTo { destination } => {
            let destination = *destination;
            let Some(from) = active.position else {
                return Err(OrderRejection::DestinationBlocked(destination));
            };
            if !grid.is_free(&destination) {
                return Err(OrderRejection::DestinationBlocked(destination));
            }
            let budget = active.effective_movement(movement_points);
            if !grid.reachable_hexes(from, budget).contains(&destination) {
                return Err(OrderRejection::DestinationUnreachable { destination, budget });
            }
            Ok(())
        }
        OrderAction::Strike { target } => {
            validate_targeted(&abilities::basic_strike(), *target, active, roster, grid)
        }
        OrderAction::Cast { ability, target } => {
            let Some(def) = abilities::lookup(ability) else {
                return Err(OrderRejection::UnknownAbility(ability.clone()));
            };
            if !active.knows(ability) {
                return Err(OrderRejection::AbilityNotLearned {
                    ability: ability.clone(),
                    character: active.id,
                });
            }
            let remaining = active.cooldown_remaining(ability);
            if remaining > 0 {
                return Err(OrderRejection::AbilityOnCooldown { ability: ability.clone(), remaining });
            }
            if !active.can_afford(def.mana_cost) {
                return Err(OrderRejection::InsufficientMana {
                    ability: ability.clone(),
                    cost: def.mana_cost,
                    available: active.current_mana,
                });
            }
            validate_targeted(&def, *target, active, roster, grid)
        }
    }
}

/// Shared target legality: existence, vitality, the ability's target rule,
/// range, and line of sight.
fn validate_targeted(
    def: &abilities::AbilityDef,
    target: CharacterId,
    active: &BattleCharacterState,
    roster: &[BattleCharacterState],
    grid: &BattleGrid,
) -> Result<(), OrderRejection> {
    let Some(target_state) = roster.iter().find(|c| c.id == target) else {
        return Err(OrderRejection::TargetNotFound(target));
    };
    if !target_state.is_alive() {
        return Err(OrderRejection::TargetDown(target));
    }
    match def.target_rule {
        abilities::TargetRule::Enemy => {
            if target_state.team == active.team {
                return Err(OrderRejection::FriendlyTarget(target));
            }
        }
        abilities::TargetRule::SelfOnly => {
            if target != active.id {
                return Err(OrderRejection::SelfTargetOnly(def.id.clone()));
            }
            return Ok(());
        }
    }
    let (Some(from), Some(to)) = (active.position, target_state.position) else {
        return Err(OrderRejection::TargetNotFound(target));
    };
    let dist = from.distance(&to);
    if dist > def.range {
        return Err(OrderRejection::OutOfRange { range: def.range, actual: dist });
    }
    if !grid.has_line_of_sight(&from, &to) {
        return Err(OrderRejection::NoLineOfSight);
    }
    Ok(())
}

/// Roll the adherence check for a legal order. One d100 draw.
///
/// The threshold starts at the character's baseline adherence, drops as
/// stress climbs past the pivot, and shifts with how the order sits with
/// their personality: aggressive orders sell better to high-ego
/// characters, restrained ones to team players. The final threshold is
/// clamped so no character is ever a guaranteed follow or a guaranteed
/// rebel.
pub fn check_adherence(
    character: &BattleCharacterState,
    action: &OrderAction,
    tuning: &AdherenceTuning,
    rng: &mut BattleRng,
) -> AdherenceOutcome {
    let psyche = &character.psyche;
    let stress_over = (psyche.stress as f32 - tuning.stress_pivot as f32).max(0.0);
    let mut threshold = psyche.adherence as f32 - tuning.stress_penalty_per_point * stress_over;

    if action.is_aggressive() {
        threshold += tuning.ego_weight * (psyche.ego as f32 - 50.0);
    } else {
        threshold += tuning.team_player_weight * (psyche.team_player as f32 - 50.0);
    }

    threshold = threshold.clamp(tuning.threshold_floor, tuning.threshold_ceiling);
    let roll = rng.roll_d100();
    let followed = (roll as f32) <= threshold;

    debug!(
        character = %character.id,
        roll,
        threshold,
        followed,
        "adherence check"
    );

    AdherenceOutcome { followed, roll, threshold }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::character::{CharacterStats, EquipmentBonuses, PsychologyProfile, RosterSnapshot};
    use crate::core::types::TeamSide;

    fn fighter(team: TeamSide, adherence: u8, stress: u8) -> BattleCharacterState {
        let snap = RosterSnapshot {
            id: CharacterId::new(),
            name: "Fighter".to_string(),
            stats: CharacterStats { max_hp: 100, max_mana: 50, attack: 20, defense: 5, speed: 10 },
            abilities: vec![AbilityId::new("javelin")],
            psyche: PsychologyProfile { adherence, stress, confidence: 50, ego: 50, team_player: 50 },
            equipment: EquipmentBonuses::default(),
        };
        BattleCharacterState::from_snapshot(&snap, team)
    }

    fn place(grid: &mut BattleGrid, c: &mut BattleCharacterState, hex: HexCoord) {
        assert!(grid.place(c.id, hex));
        c.position = Some(hex);
    }

    #[test]
    fn test_hold_always_legal() {
        let grid = BattleGrid::open(6);
        let c = fighter(TeamSide::Home, 80, 0);
        let order = CoachOrders { character: c.id, action: OrderAction::Hold };
        assert!(validate_order(&order, &c, &[c.clone()], &grid, 3).is_ok());
    }

    #[test]
    fn test_wrong_character_rejected() {
        let grid = BattleGrid::open(6);
        let c = fighter(TeamSide::Home, 80, 0);
        let order = CoachOrders { character: CharacterId::new(), action: OrderAction::Hold };
        assert!(matches!(
            validate_order(&order, &c, &[c.clone()], &grid, 3),
            Err(OrderRejection::WrongCharacter { .. })
        ));
    }

    #[test]
    fn test_strike_out_of_range_rejected() {
        let mut grid = BattleGrid::open(6);
        let mut a = fighter(TeamSide::Home, 80, 0);
        let mut b = fighter(TeamSide::Away, 80, 0);
        place(&mut grid, &mut a, HexCoord::new(-3, 0));
        place(&mut grid, &mut b, HexCoord::new(3, 0));
        let order = CoachOrders { character: a.id, action: OrderAction::Strike { target: b.id } };
        let roster = vec![a.clone(), b];
        assert!(matches!(
            validate_order(&order, &a, &roster, &grid, 3),
            Err(OrderRejection::OutOfRange { range: 1, actual: 6 })
        ));
    }

    #[test]
    fn test_strike_adjacent_legal() {
        let mut grid = BattleGrid::open(6);
        let mut a = fighter(TeamSide::Home, 80, 0);
        let mut b = fighter(TeamSide::Away, 80, 0);
        place(&mut grid, &mut a, HexCoord::new(2, 0));
        place(&mut grid, &mut b, HexCoord::new(3, 0));
        let order = CoachOrders { character: a.id, action: OrderAction::Strike { target: b.id } };
        let roster = vec![a.clone(), b];
        assert!(validate_order(&order, &a, &roster, &grid, 3).is_ok());
    }

    #[test]
    fn test_friendly_strike_rejected() {
        let mut grid = BattleGrid::open(6);
        let mut a = fighter(TeamSide::Home, 80, 0);
        let mut ally = fighter(TeamSide::Home, 80, 0);
        place(&mut grid, &mut a, HexCoord::new(2, 0));
        place(&mut grid, &mut ally, HexCoord::new(3, 0));
        let order = CoachOrders { character: a.id, action: OrderAction::Strike { target: ally.id } };
        let roster = vec![a.clone(), ally.clone()];
        assert_eq!(
            validate_order(&order, &a, &roster, &grid, 3),
            Err(OrderRejection::FriendlyTarget(ally.id))
        );
    }

    #[test]
    fn test_unlearned_cast_rejected() {
        let mut grid = BattleGrid::open(6);
        let mut a = fighter(TeamSide::Home, 80, 0);
        let mut b = fighter(TeamSide::Away, 80, 0);
        a.abilities.clear();
        place(&mut grid, &mut a, HexCoord::new(0, 0));
        place(&mut grid, &mut b, HexCoord::new(2, 0));
        let order = CoachOrders {
            character: a.id,
            action: OrderAction::Cast { ability: AbilityId::new("javelin"), target: b.id },
        };
        let roster = vec![a.clone(), b];
        assert!(matches!(
            validate_order(&order, &a, &roster, &grid, 3),
            Err(OrderRejection::AbilityNotLearned { .. })
        ));
    }

    #[test]
    fn test_learned_cast_in_range_legal() {
        let mut grid = BattleGrid::open(6);
        let mut a = fighter(TeamSide::Home, 80, 0);
        let mut b = fighter(TeamSide::Away, 80, 0);
        place(&mut grid, &mut a, HexCoord::new(0, 0));
        place(&mut grid, &mut b, HexCoord::new(3, 0));
        let order = CoachOrders {
            character: a.id,
            action: OrderAction::Cast { ability: AbilityId::new("javelin"), target: b.id },
        };
        let roster = vec![a.clone(), b];
        assert!(validate_order(&order, &a, &roster, &grid, 3).is_ok());
    }

    #[test]
    fn test_move_beyond_budget_rejected() {
        let mut grid = BattleGrid::open(6);
        let mut a = fighter(TeamSide::Home, 80, 0);
        place(&mut grid, &mut a, HexCoord::new(0, -3));
        let order = CoachOrders {
            character: a.id,
            action: OrderAction::MoveTo { destination: HexCoord::new(0, 3) },
        };
        assert!(matches!(
            validate_order(&order, &a, &[a.clone()], &grid, 3),
            Err(OrderRejection::DestinationUnreachable { .. })
        ));
    }

    #[test]
    fn test_high_adherence_low_stress_always_follows() {
        let c = fighter(TeamSide::Home, 100, 0);
        let tuning = AdherenceTuning::default();
        // Threshold clamps at the ceiling; only rolls above 95 ever fail.
        let mut rng = BattleRng::new(0);
        let outcome = check_adherence(&c, &OrderAction::Hold, &tuning, &mut rng);
        assert_eq!(outcome.threshold, tuning.threshold_ceiling);
        assert!((1..=100).contains(&outcome.roll));
    }

    #[test]
    fn test_zero_adherence_clamps_to_floor() {
        let c = fighter(TeamSide::Home, 0, 100);
        let tuning = AdherenceTuning::default();
        let mut rng = BattleRng::new(0);
        let outcome = check_adherence(&c, &OrderAction::Hold, &tuning, &mut rng);
        assert_eq!(outcome.threshold, tuning.threshold_floor);
    }

    #[test]
    fn test_stress_lowers_threshold() {
        let calm = fighter(TeamSide::Home, 70, 20);
        let stressed = fighter(TeamSide::Home, 70, 90);
        let tuning = AdherenceTuning::default();
        let mut rng1 = BattleRng::new(0);
        let mut rng2 = BattleRng::new(0);
        let t_calm = check_adherence(&calm, &OrderAction::Hold, &tuning, &mut rng1).threshold;
        let t_stressed = check_adherence(&stressed, &OrderAction::Hold, &tuning, &mut rng2).threshold;
        assert!(t_stressed < t_calm);
    }

    #[test]
    fn test_check_consumes_one_draw() {
        let c = fighter(TeamSide::Home, 70, 20);
        let mut rng = BattleRng::new(0);
        check_adherence(&c, &OrderAction::Hold, &AdherenceTuning::default(), &mut rng);
        assert_eq!(rng.draws, 1);
    }

    #[test]
    fn test_forced_failure_rolls_nothing() {
        let outcome = AdherenceOutcome::forced_failure();
        assert!(!outcome.followed);
        assert_eq!(outcome.roll, 0);
    }
}
