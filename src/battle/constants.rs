//! Battle constants - fixed rules of the arena, as opposed to the tunables
//! in `core::config` which vary per deployment.

/// Damage never drops below this after defense is applied
pub const MIN_DAMAGE: i32 = 1;

/// Defense bonus while a guard status is active
pub const GUARD_DEFENSE_BONUS: i32 = 5;

/// Guard lasts until the character's next resolution step
pub const GUARD_DURATION_TURNS: u32 = 1;

/// Perimeter hazard escalation: damage per turn at each exposure level
pub const HAZARD_BITTEN_DAMAGE: i32 = 5;
pub const HAZARD_BLEEDING_DAMAGE: i32 = 8;
pub const HAZARD_MAULED_DAMAGE: i32 = 12;

/// Movement penalty while mauled (hexes of budget lost)
pub const HAZARD_MAULED_MOVE_PENALTY: u32 = 2;

/// Hazard statuses stick around this long once inflicted
pub const HAZARD_DURATION_TURNS: u32 = 3;

/// Rebellion surveys present between 2 and this many candidates
pub const MAX_SURVEY_CANDIDATES: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hazard_escalation_orders() {
        assert!(HAZARD_BITTEN_DAMAGE < HAZARD_BLEEDING_DAMAGE);
        assert!(HAZARD_BLEEDING_DAMAGE < HAZARD_MAULED_DAMAGE);
    }

    #[test]
    fn test_min_damage_positive() {
        assert!(MIN_DAMAGE > 0);
    }
}
