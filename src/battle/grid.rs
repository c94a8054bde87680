//! The arena grid: hexes, terrain, and who stands where.
//!
//! The grid owns terrain and occupancy. It knows nothing about turn order
//! or orders; pathing and sight queries are pure functions of its state.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::battle::hex::HexCoord;
use crate::battle::terrain::Terrain;
use crate::core::types::CharacterId;

/// A hex arena of a given radius with terrain and one-character-per-hex
/// occupancy.
///
/// Maps are serialized as key-sorted pair lists so snapshots of equal
/// grids are byte-identical regardless of hash order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleGrid {
    pub radius: i32,
    #[serde(with = "hex_map")]
    terrain: AHashMap<HexCoord, Terrain>,
    #[serde(with = "hex_map")]
    occupancy: AHashMap<HexCoord, CharacterId>,
}

mod hex_map {
    use super::*;
    use serde::ser::Serializer;
    use serde::Deserializer;

    pub fn serialize<S, V>(map: &AHashMap<HexCoord, V>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: serde::Serialize,
    {
        let mut entries: Vec<(&HexCoord, &V)> = map.iter().collect();
        entries.sort_by_key(|(hex, _)| **hex);
        entries.serialize(ser)
    }

    pub fn deserialize<'de, D, V>(de: D) -> Result<AHashMap<HexCoord, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: serde::Deserialize<'de>,
    {
        let entries: Vec<(HexCoord, V)> = Vec::deserialize(de)?;
        Ok(entries.into_iter().collect())
    }
}

impl BattleGrid {
    /// The standard arena: a broadcast tower cluster at the center and a
    /// ring of water at the perimeter.
    pub fn standard(radius: i32) -> Self {
        let mut terrain = AHashMap::new();

        // Tower cluster: origin plus two adjacent hexes.
        for tower in [HexCoord::ORIGIN, HexCoord::new(1, 0), HexCoord::new(0, 1)] {
            terrain.insert(tower, Terrain::Tower);
        }

        // Water ring along the outermost hexes.
        for hex in HexCoord::ORIGIN.hexes_in_range(radius) {
            if HexCoord::ORIGIN.distance(&hex) == radius {
                terrain.insert(hex, Terrain::Water);
            }
        }

        BattleGrid {
            radius,
            terrain,
            occupancy: AHashMap::new(),
        }
    }

    /// A bare grid with no terrain features, handy for tests.
    pub fn open(radius: i32) -> Self {
        BattleGrid {
            radius,
            terrain: AHashMap::new(),
            occupancy: AHashMap::new(),
        }
    }

    pub fn contains(&self, hex: &HexCoord) -> bool {
        HexCoord::ORIGIN.distance(hex) <= self.radius
    }

    pub fn terrain_at(&self, hex: &HexCoord) -> Terrain {
        self.terrain.get(hex).copied().unwrap_or(Terrain::Open)
    }

    pub fn occupant(&self, hex: &HexCoord) -> Option<CharacterId> {
        self.occupancy.get(hex).copied()
    }

    pub fn position_of(&self, id: CharacterId) -> Option<HexCoord> {
        self.occupancy
            .iter()
            .find(|(_, occ)| **occ == id)
            .map(|(hex, _)| *hex)
    }

    /// A hex a character could stand on: in bounds, not terrain-blocked,
    /// and unoccupied.
    pub fn is_free(&self, hex: &HexCoord) -> bool {
        self.contains(hex)
            && !self.terrain_at(hex).blocks_movement()
            && !self.occupancy.contains_key(hex)
    }

    pub fn place(&mut self, id: CharacterId, hex: HexCoord) -> bool {
        if !self.is_free(&hex) {
            return false;
        }
        self.occupancy.insert(hex, id);
        true
    }

    pub fn remove(&mut self, id: CharacterId) -> Option<HexCoord> {
        let pos = self.position_of(id)?;
        self.occupancy.remove(&pos);
        Some(pos)
    }

    /// Move a character to a new hex. Fails if the character is not on the
    /// grid or the destination is not free.
    pub fn relocate(&mut self, id: CharacterId, to: HexCoord) -> bool {
        let Some(from) = self.position_of(id) else {
            return false;
        };
        if from == to {
            return true;
        }
        if !self.is_free(&to) {
            return false;
        }
        self.occupancy.remove(&from);
        self.occupancy.insert(to, id);
        true
    }

    /// Every hex reachable from `start` within `budget` steps. Occupied
    /// hexes and blocking terrain cannot be entered or passed through.
    /// The start hex itself is included at cost zero.
    pub fn reachable_hexes(&self, start: HexCoord, budget: u32) -> Vec<HexCoord> {
        let mut visited: AHashMap<HexCoord, u32> = AHashMap::new();
        visited.insert(start, 0);
        let mut frontier = VecDeque::new();
        frontier.push_back(start);

        while let Some(current) = frontier.pop_front() {
            let cost = visited[&current];
            if cost >= budget {
                continue;
            }
            for next in current.neighbors() {
                if visited.contains_key(&next) || !self.is_free(&next) {
                    continue;
                }
                visited.insert(next, cost + 1);
                frontier.push_back(next);
            }
        }

        let mut out: Vec<HexCoord> = visited.into_keys().collect();
        out.sort();
        out
    }

    /// Whether a straight line from `from` to `to` is clear of
    /// sight-blocking terrain. Endpoints never block their own line.
    pub fn has_line_of_sight(&self, from: &HexCoord, to: &HexCoord) -> bool {
        let line = from.line_to(to);
        line.iter()
            .skip(1)
            .take(line.len().saturating_sub(2))
            .all(|hex| !self.terrain_at(hex).blocks_sight())
    }

    /// Occupied positions sorted by hex, for deterministic iteration.
    pub fn occupied_positions(&self) -> Vec<(HexCoord, CharacterId)> {
        let mut out: Vec<_> = self.occupancy.iter().map(|(h, c)| (*h, *c)).collect();
        out.sort_by_key(|(h, _)| *h);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grid_tower_and_water() {
        let grid = BattleGrid::standard(6);
        assert_eq!(grid.terrain_at(&HexCoord::ORIGIN), Terrain::Tower);
        assert_eq!(grid.terrain_at(&HexCoord::new(6, 0)), Terrain::Water);
        assert_eq!(grid.terrain_at(&HexCoord::new(2, 0)), Terrain::Open);
    }

    #[test]
    fn test_contains_respects_radius() {
        let grid = BattleGrid::open(4);
        assert!(grid.contains(&HexCoord::new(4, 0)));
        assert!(!grid.contains(&HexCoord::new(5, 0)));
    }

    #[test]
    fn test_place_and_relocate() {
        let mut grid = BattleGrid::open(5);
        let id = CharacterId::new();
        assert!(grid.place(id, HexCoord::new(1, 1)));
        assert_eq!(grid.occupant(&HexCoord::new(1, 1)), Some(id));
        assert!(grid.relocate(id, HexCoord::new(2, 1)));
        assert_eq!(grid.occupant(&HexCoord::new(1, 1)), None);
        assert_eq!(grid.position_of(id), Some(HexCoord::new(2, 1)));
    }

    #[test]
    fn test_cannot_stack_characters() {
        let mut grid = BattleGrid::open(5);
        let a = CharacterId::new();
        let b = CharacterId::new();
        assert!(grid.place(a, HexCoord::new(0, 0)));
        assert!(!grid.place(b, HexCoord::new(0, 0)));
    }

    #[test]
    fn test_cannot_place_on_tower() {
        let mut grid = BattleGrid::standard(6);
        assert!(!grid.place(CharacterId::new(), HexCoord::ORIGIN));
    }

    #[test]
    fn test_reachable_respects_budget() {
        let grid = BattleGrid::open(6);
        let reachable = grid.reachable_hexes(HexCoord::ORIGIN, 2);
        // All of radius 2 reachable on an open grid: 19 hexes.
        assert_eq!(reachable.len(), 19);
        for hex in &reachable {
            assert!(HexCoord::ORIGIN.distance(hex) <= 2);
        }
    }

    #[test]
    fn test_reachable_blocked_by_occupant() {
        let mut grid = BattleGrid::open(6);
        let blocker = CharacterId::new();
        // Wall off an immediate neighbor; it must not appear as reachable.
        grid.place(blocker, HexCoord::new(1, 0));
        let reachable = grid.reachable_hexes(HexCoord::ORIGIN, 1);
        assert!(!reachable.contains(&HexCoord::new(1, 0)));
        assert!(reachable.contains(&HexCoord::new(0, 1)));
    }

    #[test]
    fn test_line_of_sight_blocked_by_tower() {
        let grid = BattleGrid::standard(6);
        // Line through the center tower cluster.
        assert!(!grid.has_line_of_sight(&HexCoord::new(-2, 0), &HexCoord::new(2, 0)));
        // Line well clear of it.
        assert!(grid.has_line_of_sight(&HexCoord::new(-2, -2), &HexCoord::new(2, -4)));
    }

    #[test]
    fn test_serde_is_order_stable() {
        let mut a = BattleGrid::standard(6);
        let mut b = BattleGrid::standard(6);
        let id = CharacterId::new();
        a.place(id, HexCoord::new(2, 2));
        b.place(id, HexCoord::new(2, 2));
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        let back: BattleGrid = serde_json::from_str(&serde_json::to_string(&a).unwrap()).unwrap();
        assert_eq!(back.occupant(&HexCoord::new(2, 2)), Some(id));
        assert_eq!(back.terrain_at(&HexCoord::ORIGIN), Terrain::Tower);
    }

    #[test]
    fn test_adjacent_sight_never_blocked() {
        let grid = BattleGrid::standard(6);
        assert!(grid.has_line_of_sight(&HexCoord::new(2, 0), &HexCoord::new(2, 1)));
    }
}
