//! Game rules for Stratego.
//!
//! Pure functions over the [`Board`](crate::Board): they never mutate
//! anything, so the game model can ask them before committing a command.

pub mod combat;
pub mod movement;
pub mod victory;

pub use combat::CombatOutcome;
pub use movement::{can_act, can_attack, can_move, candidate_targets, player_can_act, reaches};
pub use victory::{EndReason, Outcome, Standing, decide};
