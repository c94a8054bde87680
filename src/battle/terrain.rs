//! Terrain classification for arena hexes.

use serde::{Deserialize, Serialize};

/// What occupies a hex, before any character stands on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    /// Plain ground, walkable, no effects.
    Open,
    /// Broadcast tower cluster at the arena center. Blocks movement and
    /// line of sight.
    Tower,
    /// The water ring at the arena perimeter. Walkable, but ending a turn
    /// there draws escalating hazard effects.
    Water,
}

/// Escalating exposure levels for characters lingering in perimeter water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerimeterHazard {
    Bitten,
    Bleeding,
    Mauled,
}

impl Terrain {
    pub fn blocks_movement(&self) -> bool {
        matches!(self, Terrain::Tower)
    }

    pub fn blocks_sight(&self) -> bool {
        matches!(self, Terrain::Tower)
    }

    pub fn is_hazardous(&self) -> bool {
        matches!(self, Terrain::Water)
    }
}

impl PerimeterHazard {
    /// The next level of exposure, saturating at the worst.
    pub fn escalate(&self) -> PerimeterHazard {
        match self {
            PerimeterHazard::Bitten => PerimeterHazard::Bleeding,
            PerimeterHazard::Bleeding => PerimeterHazard::Mauled,
            PerimeterHazard::Mauled => PerimeterHazard::Mauled,
        }
    }

    pub fn damage_per_turn(&self) -> i32 {
        use crate::battle::constants::*;
        match self {
            PerimeterHazard::Bitten => HAZARD_BITTEN_DAMAGE,
            PerimeterHazard::Bleeding => HAZARD_BLEEDING_DAMAGE,
            PerimeterHazard::Mauled => HAZARD_MAULED_DAMAGE,
        }
    }

    pub fn movement_penalty(&self) -> u32 {
        match self {
            PerimeterHazard::Mauled => crate::battle::constants::HAZARD_MAULED_MOVE_PENALTY,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tower_blocks_everything() {
        assert!(Terrain::Tower.blocks_movement());
        assert!(Terrain::Tower.blocks_sight());
        assert!(!Terrain::Tower.is_hazardous());
    }

    #[test]
    fn test_water_walkable_but_hazardous() {
        assert!(!Terrain::Water.blocks_movement());
        assert!(Terrain::Water.is_hazardous());
    }

    #[test]
    fn test_hazard_escalation_saturates() {
        assert_eq!(PerimeterHazard::Bitten.escalate(), PerimeterHazard::Bleeding);
        assert_eq!(PerimeterHazard::Bleeding.escalate(), PerimeterHazard::Mauled);
        assert_eq!(PerimeterHazard::Mauled.escalate(), PerimeterHazard::Mauled);
    }

    #[test]
    fn test_hazard_damage_escalates() {
        assert!(PerimeterHazard::Bitten.damage_per_turn() < PerimeterHazard::Mauled.damage_per_turn());
    }
}
