//! Inbound events: everything the outside world can feed the reducer.
//!
//! The engine itself never produces these. Internal progress (initiative,
//! adherence, resolution) happens inside a single reduction; these events
//! are the points where a battle waits on external input.

use serde::{Deserialize, Serialize};

use crate::battle::coaching::CoachOrders;
use crate::core::types::TeamSide;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// Both coaches have finished the pre-battle huddle; roll initiative
    /// and open the first coaching window.
    HuddleComplete,
    /// The coach submitted an order for the active character.
    OrdersSubmitted(CoachOrders),
    /// The coaching window expired with no order. The active character is
    /// treated as a forced adherence failure, with no die rolled.
    CoachingTimeout,
    /// A coach concedes, or the judge has ruled a forfeit.
    Forfeit { team: TeamSide },
}

impl BattleEvent {
    /// Short name for error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BattleEvent::HuddleComplete => "HuddleComplete",
            BattleEvent::OrdersSubmitted(_) => "OrdersSubmitted",
            BattleEvent::CoachingTimeout => "CoachingTimeout",
            BattleEvent::Forfeit { .. } => "Forfeit",
        }
    }
}
