//! Arena Engine - deterministic coached tactical combat on a hex grid
//!
//! The engine is a pure state machine: a `BattleState` aggregate plus a
//! reducer that maps (state, event) to a new state. All randomness flows
//! through one seeded, counter-advancing source, so a fixed seed and event
//! sequence always reproduce the same battle.

pub mod battle;
pub mod core;
