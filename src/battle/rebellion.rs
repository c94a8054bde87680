//! Rebellion surveys.
//!
//! When a character fails an adherence check they do not simply stand
//! still. The engine builds a small slate of alternative actions shaped
//! by the character's psychology, then picks one with a single seeded
//! draw. Some alternatives are merely off-script; the ones tagged rogue
//! go to the judge before they resolve.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::character::BattleCharacterState;
use crate::battle::coaching::OrderAction;
use crate::battle::grid::BattleGrid;
use crate::battle::rng::BattleRng;
use crate::core::config::AdherenceTuning;

/// Why a rogue action needs arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RogueTag {
    /// Turning the strike on a teammate.
    FriendlyFire,
    /// Abandoning position for the perimeter.
    Flee,
    /// Chasing a target well beyond the ordered scope.
    Overreach,
}

/// One alternative action in a rebellion survey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebellionCandidate {
    pub action: OrderAction,
    pub rogue: Option<RogueTag>,
    pub weight: f32,
    pub description: String,
}

/// The full survey: the slate that was considered and the index chosen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebellionSurvey {
    pub candidates: Vec<RebellionCandidate>,
    pub chosen: usize,
}

impl RebellionSurvey {
    pub fn chosen_candidate(&self) -> &RebellionCandidate {
        &self.candidates[self.chosen]
    }
}

/// Build the candidate slate and pick one. Candidate construction is a
/// pure function of battle state; the only randomness is the single
/// weighted pick at the end. The slate always holds between two and four
/// entries and always includes the defensive fallback.
pub fn survey_rebellion(
    rebel: &BattleCharacterState,
    roster: &[BattleCharacterState],
    grid: &BattleGrid,
    movement_points: u32,
    tuning: &AdherenceTuning,
    rng: &mut BattleRng,
) -> RebellionSurvey {
    let psyche = &rebel.psyche;
    let mut candidates = Vec::new();

    // The defensive fallback is always on the slate.
    candidates.push(RebellionCandidate {
        action: OrderAction::Guard,
        rogue: None,
        weight: 1.0 + psyche.team_player as f32 / 100.0,
        description: format!("{} hunkers down and ignores the call", rebel.name),
    });

    let position = rebel.position;
    let budget = rebel.effective_movement(movement_points);

    let mut enemies: Vec<&BattleCharacterState> = roster
        .iter()
        .filter(|c| c.team != rebel.team && c.is_alive() && c.position.is_some())
        .collect();
    enemies.sort_by_key(|c| c.id);

    let mut allies: Vec<&BattleCharacterState> = roster
        .iter()
        .filter(|c| c.team == rebel.team && c.id != rebel.id && c.is_alive() && c.position.is_some())
        .collect();
    allies.sort_by_key(|c| c.id);

    if let Some(from) = position {
        // Off-script aggression: hit whatever enemy is in reach.
        let nearest_enemy = enemies
            .iter()
            .min_by_key(|c| (from.distance(&c.position.unwrap()), c.id));
        if let Some(enemy) = nearest_enemy {
            let to = enemy.position.unwrap();
            if from.distance(&to) <= 1 {
                // Ego wants the swing, confidence trusts it will land.
                candidates.push(RebellionCandidate {
                    action: OrderAction::Strike { target: enemy.id },
                    rogue: None,
                    weight: 0.5 + (psyche.ego as f32 + psyche.confidence as f32) / 200.0,
                    description: format!("{} swings at {} instead", rebel.name, enemy.name),
                });
            } else if psyche.ego >= tuning.ego_flashy_cutoff {
                // Overreach: charge the distant target.
                let approach = grid
                    .reachable_hexes(from, budget)
                    .into_iter()
                    .min_by_key(|h| (h.distance(&to), *h));
                if let Some(dest) = approach.filter(|d| *d != from) {
                    candidates.push(RebellionCandidate {
                        action: OrderAction::MoveTo { destination: dest },
                        rogue: Some(RogueTag::Overreach),
                        weight: psyche.ego as f32 / 100.0,
                        description: format!("{} charges recklessly at {}", rebel.name, enemy.name),
                    });
                }
            }
        }

        // Cracking under pressure: run for the perimeter.
        if psyche.stress >= tuning.stress_flee_cutoff {
            let flee_hex = grid
                .reachable_hexes(from, budget)
                .into_iter()
                .filter(|h| *h != from)
                .max_by_key(|h| {
                    let danger = enemies
                        .iter()
                        .map(|e| h.distance(&e.position.unwrap()))
                        .min()
                        .unwrap_or(0);
                    (danger, std::cmp::Reverse(*h))
                });
            if let Some(dest) = flee_hex {
                // Confident characters hold their nerve a little longer.
                let nerve = 1.0 - psyche.confidence as f32 / 200.0;
                candidates.push(RebellionCandidate {
                    action: OrderAction::MoveTo { destination: dest },
                    rogue: Some(RogueTag::Flee),
                    weight: 1.5 * psyche.stress as f32 / 100.0 * nerve,
                    description: format!("{} breaks and runs", rebel.name),
                });
            }
        }

        // Lashing out at a teammate.
        if psyche.team_player <= tuning.team_player_friendly_fire_cutoff {
            let adjacent_ally = allies
                .iter()
                .filter(|c| from.distance(&c.position.unwrap()) <= 1)
                .min_by_key(|c| c.id);
            if let Some(ally) = adjacent_ally {
                candidates.push(RebellionCandidate {
                    action: OrderAction::Strike { target: ally.id },
                    rogue: Some(RogueTag::FriendlyFire),
                    weight: (100 - psyche.team_player) as f32 / 100.0,
                    description: format!("{} turns on {}", rebel.name, ally.name),
                });
            }
        }
    }

    // Pad with a second harmless option if psychology produced nothing.
    if candidates.len() < 2 {
        candidates.push(RebellionCandidate {
            action: OrderAction::Hold,
            rogue: None,
            weight: 0.5,
            description: format!("{} freezes up", rebel.name),
        });
    }
    candidates.truncate(crate::battle::constants::MAX_SURVEY_CANDIDATES);

    let weights: Vec<f32> = candidates.iter().map(|c| c.weight).collect();
    let chosen = rng.pick_weighted(&weights);

    debug!(
        rebel = %rebel.id,
        slate = candidates.len(),
        chosen,
        rogue = ?candidates[chosen].rogue,
        "rebellion survey"
    );

    RebellionSurvey { candidates, chosen }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::character::{CharacterStats, EquipmentBonuses, PsychologyProfile, RosterSnapshot};
    use crate::battle::hex::HexCoord;
    use crate::core::types::{CharacterId, TeamSide};

    fn fighter(team: TeamSide, psyche: PsychologyProfile) -> BattleCharacterState {
        let snap = RosterSnapshot {
            id: CharacterId::new(),
            name: "Rebel".to_string(),
            stats: CharacterStats { max_hp: 100, max_mana: 50, attack: 20, defense: 5, speed: 10 },
            abilities: Vec::new(),
            psyche,
            equipment: EquipmentBonuses::default(),
        };
        BattleCharacterState::from_snapshot(&snap, team)
    }

    fn calm() -> PsychologyProfile {
        PsychologyProfile { adherence: 50, stress: 20, confidence: 50, ego: 40, team_player: 60 }
    }

    fn place(grid: &mut BattleGrid, c: &mut BattleCharacterState, hex: HexCoord) {
        assert!(grid.place(c.id, hex));
        c.position = Some(hex);
    }

    #[test]
    fn test_survey_never_empty_and_has_fallback() {
        let grid = BattleGrid::open(6);
        let rebel = fighter(TeamSide::Home, calm());
        let mut rng = BattleRng::new(1);
        let survey = survey_rebellion(&rebel, &[rebel.clone()], &grid, 3, &AdherenceTuning::default(), &mut rng);
        assert!(survey.candidates.len() >= 2);
        assert!(survey.candidates.len() <= 4);
        assert!(survey
            .candidates
            .iter()
            .any(|c| c.action == OrderAction::Guard && c.rogue.is_none()));
        assert!(survey.chosen < survey.candidates.len());
    }

    #[test]
    fn test_survey_consumes_one_draw() {
        let grid = BattleGrid::open(6);
        let rebel = fighter(TeamSide::Home, calm());
        let mut rng = BattleRng::new(1);
        survey_rebellion(&rebel, &[rebel.clone()], &grid, 3, &AdherenceTuning::default(), &mut rng);
        assert_eq!(rng.draws, 1);
    }

    #[test]
    fn test_high_stress_offers_flee() {
        let mut grid = BattleGrid::open(6);
        let mut rebel = fighter(
            TeamSide::Home,
            PsychologyProfile { adherence: 30, stress: 90, confidence: 40, ego: 40, team_player: 60 },
        );
        let mut enemy = fighter(TeamSide::Away, calm());
        place(&mut grid, &mut rebel, HexCoord::new(0, 0));
        place(&mut grid, &mut enemy, HexCoord::new(1, 0));
        let roster = vec![rebel.clone(), enemy];
        let mut rng = BattleRng::new(1);
        let survey = survey_rebellion(&rebel, &roster, &grid, 3, &AdherenceTuning::default(), &mut rng);
        assert!(survey.candidates.iter().any(|c| c.rogue == Some(RogueTag::Flee)));
    }

    #[test]
    fn test_low_team_player_offers_friendly_fire() {
        let mut grid = BattleGrid::open(6);
        let mut rebel = fighter(
            TeamSide::Home,
            PsychologyProfile { adherence: 30, stress: 20, confidence: 50, ego: 40, team_player: 10 },
        );
        let mut ally = fighter(TeamSide::Home, calm());
        place(&mut grid, &mut rebel, HexCoord::new(0, 0));
        place(&mut grid, &mut ally, HexCoord::new(0, 1));
        let roster = vec![rebel.clone(), ally.clone()];
        let mut rng = BattleRng::new(1);
        let survey = survey_rebellion(&rebel, &roster, &grid, 3, &AdherenceTuning::default(), &mut rng);
        let ff = survey
            .candidates
            .iter()
            .find(|c| c.rogue == Some(RogueTag::FriendlyFire))
            .expect("friendly fire candidate");
        assert_eq!(ff.action, OrderAction::Strike { target: ally.id });
    }

    #[test]
    fn test_high_ego_distant_enemy_offers_overreach() {
        let mut grid = BattleGrid::open(6);
        let mut rebel = fighter(
            TeamSide::Home,
            PsychologyProfile { adherence: 30, stress: 20, confidence: 80, ego: 90, team_player: 60 },
        );
        let mut enemy = fighter(TeamSide::Away, calm());
        place(&mut grid, &mut rebel, HexCoord::new(-4, 0));
        place(&mut grid, &mut enemy, HexCoord::new(4, 0));
        let roster = vec![rebel.clone(), enemy];
        let mut rng = BattleRng::new(1);
        let survey = survey_rebellion(&rebel, &roster, &grid, 3, &AdherenceTuning::default(), &mut rng);
        assert!(survey.candidates.iter().any(|c| c.rogue == Some(RogueTag::Overreach)));
    }

    #[test]
    fn test_survey_deterministic_for_seed() {
        let mut grid = BattleGrid::open(6);
        let mut rebel = fighter(
            TeamSide::Home,
            PsychologyProfile { adherence: 30, stress: 90, confidence: 60, ego: 90, team_player: 10 },
        );
        let mut enemy = fighter(TeamSide::Away, calm());
        place(&mut grid, &mut rebel, HexCoord::new(0, 0));
        place(&mut grid, &mut enemy, HexCoord::new(2, 0));
        let roster = vec![rebel.clone(), enemy];

        let mut rng1 = BattleRng::new(12345);
        let mut rng2 = BattleRng::new(12345);
        let s1 = survey_rebellion(&rebel, &roster, &grid, 3, &AdherenceTuning::default(), &mut rng1);
        let s2 = survey_rebellion(&rebel, &roster, &grid, 3, &AdherenceTuning::default(), &mut rng2);
        assert_eq!(s1.chosen, s2.chosen);
        assert_eq!(s1.candidates.len(), s2.candidates.len());
    }
}
