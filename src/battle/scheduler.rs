//! Initiative and turn ordering.

use serde::{Deserialize, Serialize};

use crate::battle::rng::BattleRng;
use crate::core::types::{CharacterId, Round};

/// Roll initiative for a set of combatants. Order is descending speed;
/// ties are broken by a seeded draw per character, never by roster order.
/// Draws are consumed in ascending-id order so the sequence is stable no
/// matter how the caller assembled the slice.
pub fn roll_initiative(combatants: &[(CharacterId, i32)], rng: &mut BattleRng) -> Vec<CharacterId> {
    let mut entries: Vec<(CharacterId, i32)> = combatants.to_vec();
    entries.sort_by_key(|(id, _)| *id);

    let mut keyed: Vec<(CharacterId, i32, u64)> = entries
        .into_iter()
        .map(|(id, speed)| (id, speed, rng.next_u64()))
        .collect();

    keyed.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.2.cmp(&b.2))
            .then_with(|| a.0.cmp(&b.0))
    });

    keyed.into_iter().map(|(id, _, _)| id).collect()
}

/// Where we are in the round: the initiative order and a cursor into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    pub order: Vec<CharacterId>,
    pub cursor: usize,
    pub round: Round,
}

impl TurnState {
    pub fn new(order: Vec<CharacterId>) -> Self {
        TurnState { order, cursor: 0, round: 1 }
    }

    /// The character whose turn it is.
    pub fn current(&self) -> Option<CharacterId> {
        self.order.get(self.cursor).copied()
    }

    /// Step the cursor. Returns true when the round rolled over.
    pub fn advance(&mut self) -> bool {
        self.cursor += 1;
        if self.cursor >= self.order.len() {
            self.cursor = 0;
            self.round += 1;
            true
        } else {
            false
        }
    }

    /// Drop a knocked-out character from the rotation, keeping the cursor
    /// pointed at the same upcoming turn.
    pub fn remove(&mut self, id: CharacterId) {
        if let Some(idx) = self.order.iter().position(|c| *c == id) {
            self.order.remove(idx);
            if idx < self.cursor {
                self.cursor -= 1;
            }
            if self.cursor >= self.order.len() {
                self.cursor = 0;
                self.round += 1;
            }
        }
    }

    /// Replace the order at a round boundary, used when initiative is
    /// rerolled each round.
    pub fn reroll(&mut self, order: Vec<CharacterId>) {
        self.order = order;
        self.cursor = 0;
    }
}
