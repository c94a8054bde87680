//! The battle state machine.
//!
//! `BattleState` is a value: applying an event returns a new state and
//! never touches the old one. All randomness flows through the embedded
//! `BattleRng`, so a state snapshot plus the same event sequence replays
//! to an identical battle, log and all.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::battle::character::{BattleCharacterState, RosterSnapshot};
use crate::battle::coaching::{self, AdherenceOutcome, CoachOrders, OrderAction};
use crate::battle::events::BattleEvent;
use crate::battle::grid::BattleGrid;
use crate::battle::hex::HexCoord;
use crate::battle::judge::{self, JudgeVerdict};
use crate::battle::log::{CombatLogEntry, LogAction, LogOutcome};
use crate::battle::rebellion::{self, RebellionSurvey};
use crate::battle::resolution::{self, ActionOutcome};
use crate::battle::rng::BattleRng;
use crate::battle::scheduler::{self, TurnState};
use crate::battle::summary::{BattleSummary, CharacterReport, RebellionRecord};
use crate::core::config::BattleConfig;
use crate::core::error::{ArenaError, Result};
use crate::core::types::{CharacterId, TeamSide};

/// Where the battle is waiting. Only resting phases appear between
/// reductions; a single `apply` can pass through several internal steps
/// (adherence, survey, judge, resolution) before settling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Waiting for both coaches to finish the huddle.
    PreBattleHuddle,
    /// Waiting for the coach's order for the active character.
    CoachingWindow,
    /// Terminal.
    BattleComplete,
}

/// How the battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcomeReason {
    /// One team has no combatants standing.
    Elimination,
    /// A coach conceded.
    Forfeit,
    /// The round cap hit; decided on remaining HP.
    RoundLimit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub config: BattleConfig,
    pub phase: BattlePhase,
    pub grid: BattleGrid,
    pub characters: Vec<BattleCharacterState>,
    pub turns: Option<TurnState>,
    pub rng: BattleRng,
    pub log: Vec<CombatLogEntry>,
    pub rebellions: Vec<RebellionRecord>,
    pub winner: Option<TeamSide>,
    pub outcome_reason: Option<BattleOutcomeReason>,
}

impl BattleState {
    /// Set up a battle. Teams deploy on opposite start rows, three hexes
    /// out from the center line, spread symmetrically.
    pub fn new(
        config: BattleConfig,
        home: &[RosterSnapshot],
        away: &[RosterSnapshot],
        seed: u64,
    ) -> Result<BattleState> {
        let spread = |snaps: &[RosterSnapshot], row: i32| -> Vec<(RosterSnapshot, HexCoord)> {
            snaps
                .iter()
                .enumerate()
                .map(|(i, snap)| {
                    let q = 2 * i as i32 - (snaps.len() as i32 - 1);
                    (snap.clone(), HexCoord::new(q, row))
                })
                .collect()
        };
        Self::new_deployed(config, &spread(home, 3), &spread(away, -3), seed)
    }

    /// Set up a battle with explicit placements. Scripted scenarios and
    /// tests use this to control exactly where everyone starts.
    pub fn new_deployed(
        config: BattleConfig,
        home: &[(RosterSnapshot, HexCoord)],
        away: &[(RosterSnapshot, HexCoord)],
        seed: u64,
    ) -> Result<BattleState> {
        config.validate().map_err(ArenaError::Config)?;
        if home.is_empty() || away.is_empty() {
            return Err(ArenaError::Config("both teams need at least one combatant".to_string()));
        }

        let mut grid = BattleGrid::standard(config.grid_radius);
        let mut characters = Vec::with_capacity(home.len() + away.len());
        let mut log = Vec::new();

        for (placements, team) in [(home, TeamSide::Home), (away, TeamSide::Away)] {
            for (snap, hex) in placements {
                let mut c = BattleCharacterState::from_snapshot(snap, team);
                if !grid.place(c.id, *hex) {
                    return Err(ArenaError::Config(format!(
                        "no free deployment hex for {} at {}",
                        c.name, hex
                    )));
                }
                c.position = Some(*hex);
                characters.push(c);
            }
        }

        log.push(CombatLogEntry::new(
            0,
            None,
            LogAction::BattleStart,
            LogOutcome::Neutral,
            format!("battle begins, {} vs {}", home.len(), away.len()),
        ));
        info!(seed, home = home.len(), away = away.len(), "battle created");

        Ok(BattleState {
            config,
            phase: BattlePhase::PreBattleHuddle,
            grid,
            characters,
            turns: None,
            rng: BattleRng::new(seed),
            log,
            rebellions: Vec::new(),
            winner: None,
            outcome_reason: None,
        })
    }

    /// Reduce one event. Returns the successor state; `self` is untouched.
    /// An illegal order or an event the current phase does not accept is
    /// an error and produces no successor.
    pub fn apply(&self, event: &BattleEvent) -> Result<BattleState> {
        let mut next = self.clone();
        match (self.phase, event) {
            (BattlePhase::BattleComplete, _) => {
                return Err(self.unexpected(event));
            }
            (_, BattleEvent::Forfeit { team }) => {
                next.complete(Some(team.opponent()), BattleOutcomeReason::Forfeit);
            }
            (BattlePhase::PreBattleHuddle, BattleEvent::HuddleComplete) => {
                next.start_first_round();
            }
            (BattlePhase::CoachingWindow, BattleEvent::OrdersSubmitted(orders)) => {
                next.handle_orders(orders)?;
            }
            (BattlePhase::CoachingWindow, BattleEvent::CoachingTimeout) => {
                next.handle_timeout();
            }
            _ => return Err(self.unexpected(event)),
        }
        Ok(next)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == BattlePhase::BattleComplete
    }

    pub fn character(&self, id: CharacterId) -> Option<&BattleCharacterState> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// The character the current coaching window is for.
    pub fn active_character(&self) -> Option<&BattleCharacterState> {
        let id = self.turns.as_ref()?.current()?;
        self.character(id)
    }

    pub fn current_round(&self) -> u32 {
        self.turns.as_ref().map(|t| t.round).unwrap_or(0)
    }

    /// The final report. None while the battle is still running.
    pub fn summary(&self) -> Option<BattleSummary> {
        let reason = self.outcome_reason?;
        Some(BattleSummary {
            winner: self.winner,
            reason,
            rounds: self.current_round(),
            draws: self.rng.draws,
            characters: self
                .characters
                .iter()
                .map(|c| CharacterReport {
                    id: c.id,
                    name: c.name.clone(),
                    team: c.team,
                    remaining_hp: c.current_hp,
                    tally: c.tally,
                })
                .collect(),
            rebellions: self.rebellions.clone(),
        })
    }

    fn unexpected(&self, event: &BattleEvent) -> ArenaError {
        ArenaError::UnexpectedEvent { phase: self.phase, event: event.kind().to_string() }
    }

    fn start_first_round(&mut self) {
        let order = self.roll_living_initiative();
        let names: Vec<&str> = order
            .iter()
            .filter_map(|id| self.character(*id).map(|c| c.name.as_str()))
            .collect();
        let message = format!("initiative: {}", names.join(", "));
        self.log_entry(None, LogAction::Initiative, LogOutcome::Neutral, message);
        self.turns = Some(TurnState::new(order));
        self.begin_turn();
    }

    fn roll_living_initiative(&mut self) -> Vec<CharacterId> {
        let living: Vec<(CharacterId, i32)> = self
            .characters
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| (c.id, c.stats.speed))
            .collect();
        scheduler::roll_initiative(&living, &mut self.rng)
    }

    /// Open the coaching window for the current character. Statuses and
    /// ability cooldowns from the previous round tick down here, so a
    /// guard raised last turn drops as its owner steps up again.
    fn begin_turn(&mut self) {
        let Some(id) = self.turns.as_ref().and_then(|t| t.current()) else {
            return;
        };
        if let Some(c) = self.characters.iter_mut().find(|ch| ch.id == id) {
            c.tick_statuses();
            c.tick_cooldowns();
        }
        let round = self.current_round();
        let name = self.character(id).map(|c| c.name.clone()).unwrap_or_default();
        self.log.push(CombatLogEntry::new(
            round,
            Some(id),
            LogAction::TurnStart,
            LogOutcome::Neutral,
            format!("{} steps up", name),
        ));
        self.phase = BattlePhase::CoachingWindow;
    }

    fn handle_orders(&mut self, orders: &CoachOrders) -> Result<()> {
        let active = self
            .active_character()
            .ok_or_else(|| ArenaError::InvariantViolation("coaching window with no active character".to_string()))?
            .clone();

        coaching::validate_order(
            orders,
            &active,
            &self.characters,
            &self.grid,
            self.config.movement_points,
        )?;

        let outcome = coaching::check_adherence(
            &active,
            &orders.action,
            &self.config.adherence,
            &mut self.rng,
        );
        self.log_adherence(&active, &outcome);

        if outcome.followed {
            if let Some(c) = self.characters.iter_mut().find(|c| c.id == active.id) {
                c.tally.orders_followed += 1;
            }
            self.resolve_action(active.id, &orders.action);
        } else {
            self.rebel(active.id);
        }

        if !self.is_complete() {
            self.end_turn(active.id);
        }
        Ok(())
    }

    /// A timed-out window is a forced adherence failure with no die cast.
    fn handle_timeout(&mut self) {
        let Some(active) = self.active_character().cloned() else {
            return;
        };
        let outcome = AdherenceOutcome::forced_failure();
        self.log_adherence(&active, &outcome);
        self.rebel(active.id);
        if !self.is_complete() {
            self.end_turn(active.id);
        }
    }

    fn log_adherence(&mut self, active: &BattleCharacterState, outcome: &AdherenceOutcome) {
        let round = self.current_round();
        let (log_outcome, message) = if outcome.followed {
            (
                LogOutcome::Success,
                format!("{} follows the call ({} vs {:.0})", active.name, outcome.roll, outcome.threshold),
            )
        } else if outcome.roll == 0 {
            (LogOutcome::Failure, format!("{} hears nothing from the bench", active.name))
        } else {
            (
                LogOutcome::Failure,
                format!("{} shrugs off the call ({} vs {:.0})", active.name, outcome.roll, outcome.threshold),
            )
        };
        self.log.push(CombatLogEntry::new(round, Some(active.id), LogAction::Adherence, log_outcome, message));
    }

    /// Run the rebellion survey and whatever the chosen candidate leads
    /// to. Rogue candidates pass through the judge first.
    fn rebel(&mut self, rebel_id: CharacterId) {
        let Some(rebel) = self.character(rebel_id).cloned() else {
            return;
        };
        if let Some(c) = self.characters.iter_mut().find(|c| c.id == rebel_id) {
            c.tally.orders_rebelled += 1;
        }

        let survey = rebellion::survey_rebellion(
            &rebel,
            &self.characters,
            &self.grid,
            self.config.movement_points,
            &self.config.adherence,
            &mut self.rng,
        );
        let chosen = survey.chosen_candidate().clone();
        let round = self.current_round();
        self.log.push(CombatLogEntry::new(
            round,
            Some(rebel_id),
            LogAction::Rebellion,
            LogOutcome::Neutral,
            chosen.description.clone(),
        ));

        let mut verdict = None;
        let mut action = chosen.action.clone();
        if let Some(tag) = chosen.rogue {
            let ruling = judge::arbitrate(tag, &chosen.action, &rebel, &self.characters, &self.grid);
            self.log.push(CombatLogEntry::new(
                round,
                Some(rebel_id),
                LogAction::Judge,
                match ruling.verdict {
                    JudgeVerdict::Permit => LogOutcome::Success,
                    _ => LogOutcome::Failure,
                },
                format!("judge: {}", ruling.reasoning),
            ));
            verdict = Some(ruling.verdict);
            match ruling.verdict {
                JudgeVerdict::Permit => {}
                JudgeVerdict::Downgrade => {
                    action = ruling.replacement.unwrap_or(OrderAction::Guard);
                }
                JudgeVerdict::Forfeit => {
                    // The turn is lost, not the match.
                    action = OrderAction::Hold;
                }
            }
        }

        self.record_rebellion(&survey, round, rebel_id, verdict);
        self.resolve_action(rebel_id, &action);
    }

    fn record_rebellion(
        &mut self,
        survey: &RebellionSurvey,
        round: u32,
        character: CharacterId,
        verdict: Option<JudgeVerdict>,
    ) {
        let chosen = survey.chosen_candidate();
        self.rebellions.push(RebellionRecord {
            round,
            character,
            rogue: chosen.rogue,
            verdict,
            description: chosen.description.clone(),
        });
    }

    fn resolve_action(&mut self, actor_id: CharacterId, action: &OrderAction) {
        let round = self.current_round();
        let outcome = resolution::apply_action(actor_id, action, &mut self.characters, &mut self.grid);
        let actor_name = self.character(actor_id).map(|c| c.name.clone()).unwrap_or_default();

        match outcome {
            ActionOutcome::Moved { from, to } => {
                self.log.push(CombatLogEntry::new(
                    round,
                    Some(actor_id),
                    LogAction::Move,
                    LogOutcome::Neutral,
                    format!("{} moves {} -> {}", actor_name, from, to),
                ));
            }
            ActionOutcome::Struck { target, damage, knockout } => {
                let target_name = self.character(target).map(|c| c.name.clone()).unwrap_or_default();
                let (log_action, message) = match action {
                    OrderAction::Cast { ability, .. } => (
                        LogAction::Cast,
                        format!("{} casts {} at {} for {}", actor_name, ability.as_str(), target_name, damage),
                    ),
                    _ => (
                        LogAction::Strike,
                        format!("{} strikes {} for {}", actor_name, target_name, damage),
                    ),
                };
                self.log.push(CombatLogEntry::new(round, Some(actor_id), log_action, LogOutcome::Damage(damage), message));
                if knockout {
                    self.log.push(CombatLogEntry::new(
                        round,
                        Some(target),
                        LogAction::Knockout,
                        LogOutcome::Failure,
                        format!("{} is down", target_name),
                    ));
                    if let Some(turns) = self.turns.as_mut() {
                        turns.remove(target);
                    }
                }
            }
            ActionOutcome::Guarded => {
                self.log.push(CombatLogEntry::new(
                    round,
                    Some(actor_id),
                    LogAction::Guard,
                    LogOutcome::Neutral,
                    format!("{} guards", actor_name),
                ));
            }
            ActionOutcome::Held => {
                self.log.push(CombatLogEntry::new(
                    round,
                    Some(actor_id),
                    LogAction::Hold,
                    LogOutcome::Neutral,
                    format!("{} holds position", actor_name),
                ));
            }
        }
    }

    /// Close out `actor_id`'s turn: perimeter exposure, victory checks,
    /// then hand the next window to the following character. The id is
    /// passed in rather than read from the cursor, since resolution may
    /// already have dropped the actor from the rotation.
    fn end_turn(&mut self, actor_id: CharacterId) {
        if let Some((level, damage)) =
            resolution::apply_end_of_turn_hazard(actor_id, &mut self.characters, &mut self.grid)
        {
            let round = self.current_round();
            let name = self.character(actor_id).map(|c| c.name.clone()).unwrap_or_default();
            self.log.push(CombatLogEntry::new(
                round,
                Some(actor_id),
                LogAction::Hazard,
                LogOutcome::Damage(damage),
                format!("{} is {} by the water for {}", name, hazard_verb(level), damage),
            ));
            let actor_dead = self.character(actor_id).map(|c| !c.is_alive()).unwrap_or(false);
            if actor_dead {
                self.log.push(CombatLogEntry::new(
                    round,
                    Some(actor_id),
                    LogAction::Knockout,
                    LogOutcome::Failure,
                    format!("{} is dragged under", name),
                ));
            }
        }

        if self.check_elimination() {
            return;
        }

        // Advance past the actor. A knocked-out actor is removed instead,
        // unless resolution already dropped them, in which case the cursor
        // is pointing at the next turn and `remove` is a no-op. Either path
        // may roll the round.
        let round_before = self.current_round();
        if let Some(turns) = self.turns.as_mut() {
            let actor_dead = self
                .characters
                .iter()
                .find(|c| c.id == actor_id)
                .map(|c| !c.is_alive())
                .unwrap_or(true);
            let actor_is_current = turns.current() == Some(actor_id);
            if actor_dead {
                turns.remove(actor_id);
            } else if actor_is_current {
                turns.advance();
            }
        }

        if self.current_round() > round_before {
            if let Some(cap) = self.config.max_rounds {
                if self.current_round() > cap {
                    self.complete_on_round_cap();
                    return;
                }
            }
            if self.config.reroll_initiative_each_round {
                let order = self.roll_living_initiative();
                if let Some(turns) = self.turns.as_mut() {
                    turns.reroll(order);
                }
            }
        }

        self.begin_turn();
    }

    /// True when a side has been wiped out and the battle was closed.
    fn check_elimination(&mut self) -> bool {
        let home_alive = self.living_count(TeamSide::Home);
        let away_alive = self.living_count(TeamSide::Away);
        match (home_alive, away_alive) {
            (0, 0) => {
                self.complete(None, BattleOutcomeReason::Elimination);
                true
            }
            (0, _) => {
                self.complete(Some(TeamSide::Away), BattleOutcomeReason::Elimination);
                true
            }
            (_, 0) => {
                self.complete(Some(TeamSide::Home), BattleOutcomeReason::Elimination);
                true
            }
            _ => false,
        }
    }

    fn living_count(&self, team: TeamSide) -> usize {
        self.characters.iter().filter(|c| c.team == team && c.is_alive()).count()
    }

    fn team_hp(&self, team: TeamSide) -> i32 {
        self.characters
            .iter()
            .filter(|c| c.team == team)
            .map(|c| c.current_hp.max(0))
            .sum()
    }

    fn complete_on_round_cap(&mut self) {
        let home = self.team_hp(TeamSide::Home);
        let away = self.team_hp(TeamSide::Away);
        let winner = match home.cmp(&away) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        };
        self.complete(winner, BattleOutcomeReason::RoundLimit);
    }

    fn complete(&mut self, winner: Option<TeamSide>, reason: BattleOutcomeReason) {
        self.winner = winner;
        self.outcome_reason = Some(reason);
        self.phase = BattlePhase::BattleComplete;
        let round = self.current_round();
        let message = match winner {
            Some(team) => format!("battle over, {:?} wins ({:?})", team, reason),
            None => format!("battle over, draw ({:?})", reason),
        };
        self.log.push(CombatLogEntry::new(round, None, LogAction::BattleEnd, LogOutcome::Neutral, message));
        info!(winner = ?winner, reason = ?reason, round, "battle complete");
    }

    fn log_entry(
        &mut self,
        character: Option<CharacterId>,
        action: LogAction,
        outcome: LogOutcome,
        message: String,
    ) {
        let round = self.current_round();
        self.log.push(CombatLogEntry::new(round, character, action, outcome, message));
    }
}

fn hazard_verb(level: crate::battle::terrain::PerimeterHazard) -> &'static str {
    use crate::battle::terrain::PerimeterHazard::*;
    match level {
        Bitten => "bitten",
        Bleeding => "bled",
        Mauled => "mauled",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::character::{CharacterStats, EquipmentBonuses, PsychologyProfile};

    fn snapshot(name: &str, speed: i32, adherence: u8) -> RosterSnapshot {
        RosterSnapshot {
            id: CharacterId::new(),
            name: name.to_string(),
            stats: CharacterStats { max_hp: 100, max_mana: 50, attack: 25, defense: 5, speed },
            abilities: Vec::new(),
            psyche: PsychologyProfile { adherence, stress: 10, confidence: 50, ego: 50, team_player: 50 },
            equipment: EquipmentBonuses::default(),
        }
    }

    fn new_battle(seed: u64) -> BattleState {
        BattleState::new(
            BattleConfig::default(),
            &[snapshot("Ava", 10, 95)],
            &[snapshot("Bren", 5, 95)],
            seed,
        )
        .unwrap()
    }

    #[test]
    fn test_new_battle_waits_on_huddle() {
        let battle = new_battle(1);
        assert_eq!(battle.phase, BattlePhase::PreBattleHuddle);
        assert_eq!(battle.rng.draws, 0);
        assert!(battle.summary().is_none());
    }

    #[test]
    fn test_deployment_on_start_rows() {
        let battle = new_battle(1);
        for c in &battle.characters {
            let pos = c.position.unwrap();
            match c.team {
                TeamSide::Home => assert_eq!(pos.r, 3),
                TeamSide::Away => assert_eq!(pos.r, -3),
            }
            assert_eq!(battle.grid.occupant(&pos), Some(c.id));
        }
    }

    #[test]
    fn test_huddle_rolls_initiative_and_opens_window() {
        let battle = new_battle(1).apply(&BattleEvent::HuddleComplete).unwrap();
        assert_eq!(battle.phase, BattlePhase::CoachingWindow);
        // One draw per living character.
        assert_eq!(battle.rng.draws, 2);
        // Faster character acts first.
        assert_eq!(battle.active_character().unwrap().name, "Ava");
    }

    #[test]
    fn test_apply_is_pure() {
        let before = new_battle(1);
        let _after = before.apply(&BattleEvent::HuddleComplete).unwrap();
        assert_eq!(before.phase, BattlePhase::PreBattleHuddle);
        assert_eq!(before.rng.draws, 0);
    }

    #[test]
    fn test_unexpected_event_rejected() {
        let battle = new_battle(1);
        let err = battle
            .apply(&BattleEvent::CoachingTimeout)
            .unwrap_err();
        assert!(matches!(err, ArenaError::UnexpectedEvent { .. }));
    }

    #[test]
    fn test_illegal_order_is_an_error_not_a_turn() {
        let battle = new_battle(1).apply(&BattleEvent::HuddleComplete).unwrap();
        let active = battle.active_character().unwrap();
        let enemy = battle.characters.iter().find(|c| c.team != active.team).unwrap();
        // Far out of strike range from the deployment rows.
        let orders = CoachOrders {
            character: active.id,
            action: OrderAction::Strike { target: enemy.id },
        };
        let draws_before = battle.rng.draws;
        let err = battle.apply(&BattleEvent::OrdersSubmitted(orders)).unwrap_err();
        assert!(matches!(err, ArenaError::IllegalOrder(_)));
        // Rejection happens before any dice.
        assert_eq!(battle.rng.draws, draws_before);
    }

    #[test]
    fn test_forfeit_ends_battle_immediately() {
        let battle = new_battle(1)
            .apply(&BattleEvent::Forfeit { team: TeamSide::Away })
            .unwrap();
        assert!(battle.is_complete());
        assert_eq!(battle.winner, Some(TeamSide::Home));
        let summary = battle.summary().unwrap();
        assert_eq!(summary.reason, BattleOutcomeReason::Forfeit);
    }

    #[test]
    fn test_no_events_after_completion() {
        let battle = new_battle(1)
            .apply(&BattleEvent::Forfeit { team: TeamSide::Home })
            .unwrap();
        assert!(battle.apply(&BattleEvent::HuddleComplete).is_err());
    }

    #[test]
    fn test_timeout_consumes_no_adherence_draw() {
        let battle = new_battle(1).apply(&BattleEvent::HuddleComplete).unwrap();
        let draws_before = battle.rng.draws;
        let after = battle.apply(&BattleEvent::CoachingTimeout).unwrap();
        // Only the survey's single pick was drawn.
        assert_eq!(after.rng.draws, draws_before + 1);
        assert_eq!(after.rebellions.len(), 1);
    }

    #[test]
    fn test_guard_order_progresses_turn() {
        let battle = new_battle(1).apply(&BattleEvent::HuddleComplete).unwrap();
        let active = battle.active_character().unwrap().id;
        let orders = CoachOrders { character: active, action: OrderAction::Guard };
        let after = battle.apply(&BattleEvent::OrdersSubmitted(orders)).unwrap();
        assert_ne!(after.active_character().unwrap().id, active);
        assert_eq!(after.phase, BattlePhase::CoachingWindow);
    }

    #[test]
    fn test_reroll_initiative_draws_each_round() {
        let mut config = BattleConfig::default();
        config.reroll_initiative_each_round = true;
        // Open the ceiling so fully obedient characters never rebel and
        // the draw count is exact.
        config.adherence.threshold_ceiling = 100.0;
        let battle = BattleState::new(
            config,
            &[snapshot("Ava", 10, 100)],
            &[snapshot("Bren", 5, 100)],
            9,
        )
        .unwrap();
        let mut battle = battle.apply(&BattleEvent::HuddleComplete).unwrap();
        assert_eq!(battle.rng.draws, 2);

        for _ in 0..2 {
            let active = battle.active_character().unwrap().id;
            let orders = CoachOrders { character: active, action: OrderAction::Guard };
            battle = battle.apply(&BattleEvent::OrdersSubmitted(orders)).unwrap();
        }
        // Two adherence rolls plus a fresh two-character initiative roll
        // at the round boundary.
        assert_eq!(battle.current_round(), 2);
        assert_eq!(battle.rng.draws, 6);
    }

    #[test]
    fn test_same_seed_same_battle() {
        let script = |seed: u64| -> BattleState {
            let mut battle = new_battle(seed).apply(&BattleEvent::HuddleComplete).unwrap();
            for _ in 0..6 {
                if battle.is_complete() {
                    break;
                }
                let active = battle.active_character().unwrap().id;
                let orders = CoachOrders { character: active, action: OrderAction::Guard };
                battle = battle.apply(&BattleEvent::OrdersSubmitted(orders)).unwrap();
            }
            battle
        };
        // Seeds are fixed in new_battle but character ids are fresh per
        // construction, so compare structure rather than serialized bytes.
        let a = script(42);
        let b = script(42);
        assert_eq!(a.rng.draws, b.rng.draws);
        assert_eq!(a.log.len(), b.log.len());
        assert_eq!(a.current_round(), b.current_round());
    }
}
