//! Battle configuration with documented constants
//!
//! All product-tuned values are collected here with explanations of their
//! purpose. The qualitative directions (higher stress lowers effective
//! adherence, higher team-player raises it for team-serving orders) are the
//! contract; the magnitudes are tuning.

use serde::{Deserialize, Serialize};

/// Tuning constants for the adherence check and rebellion weighting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdherenceTuning {
    /// Threshold points subtracted per stress point above `stress_pivot`
    ///
    /// At the default (0.8), a fully stressed character (100) loses 40
    /// effective adherence, enough to make even disciplined fighters shaky.
    pub stress_penalty_per_point: f32,

    /// Stress level below which stress has no effect on adherence
    pub stress_pivot: u8,

    /// Threshold points gained per team-player point above 50 when the
    /// order is restrained (moves, guards, holds)
    pub team_player_weight: f32,

    /// Threshold points gained per ego point above 50 when the order is
    /// aggressive; below 50 the same weight pulls the threshold down
    pub ego_weight: f32,

    /// Effective threshold is clamped to this range so neither branch of
    /// the check is ever unreachable
    pub threshold_floor: f32,
    pub threshold_ceiling: f32,

    /// Ego at or above this biases rebellion surveys toward flashy actions
    pub ego_flashy_cutoff: u8,

    /// Team-player below this admits the friendly-fire rebellion candidate
    pub team_player_friendly_fire_cutoff: u8,

    /// Stress above this admits the flee rebellion candidate
    pub stress_flee_cutoff: u8,
}

impl Default for AdherenceTuning {
    fn default() -> Self {
        Self {
            stress_penalty_per_point: 0.8,
            stress_pivot: 50,
            team_player_weight: 0.3,
            ego_weight: 0.3,
            threshold_floor: 5.0,
            threshold_ceiling: 95.0,
            ego_flashy_cutoff: 60,
            team_player_friendly_fire_cutoff: 40,
            stress_flee_cutoff: 70,
        }
    }
}

/// Configuration for one battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Hex radius of the battlefield (radius 6 spans 13 hexes across)
    pub grid_radius: i32,

    /// How long a coach has to submit orders, in seconds. The engine does
    /// not run timers itself; the host feeds a timeout event when this
    /// elapses. Carried in config so every participant agrees on the window.
    pub coaching_window_secs: u32,

    /// Re-derive initiative order at the start of every round. When false
    /// (the default), the order rolled at setup holds for the whole battle.
    pub reroll_initiative_each_round: bool,

    /// Round cap. `Some(n)`: after round n the battle ends and the team with
    /// more surviving total HP wins (tie = draw). `None`: fight to knockout.
    pub max_rounds: Option<u32>,

    /// Movement budget (hexes) per turn before status penalties
    pub movement_points: u32,

    pub adherence: AdherenceTuning,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            grid_radius: 6,
            coaching_window_secs: 30,
            reroll_initiative_each_round: false,
            max_rounds: Some(20),
            movement_points: 3,
            adherence: AdherenceTuning::default(),
        }
    }
}

impl BattleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_radius < 2 {
            return Err(format!(
                "grid_radius ({}) too small for two teams plus terrain",
                self.grid_radius
            ));
        }

        if self.movement_points == 0 {
            return Err("movement_points must be positive".into());
        }

        let a = &self.adherence;
        if a.threshold_floor >= a.threshold_ceiling {
            return Err(format!(
                "threshold_floor ({}) must be < threshold_ceiling ({})",
                a.threshold_floor, a.threshold_ceiling
            ));
        }

        if a.threshold_floor < 0.0 || a.threshold_ceiling > 100.0 {
            return Err("threshold clamps must stay within [0, 100]".into());
        }

        if a.stress_penalty_per_point < 0.0 {
            return Err("stress_penalty_per_point must not be negative".into());
        }

        if let Some(cap) = self.max_rounds {
            if cap == 0 {
                return Err("max_rounds of 0 would end the battle before it starts".into());
            }
        }

        Ok(())
    }
}
