//! End-of-game detection.

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::piece::Color;

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum EndReason {
    /// The loser's flag was captured.
    #[display("flag captured")]
    FlagCaptured,
    /// The loser only has bombs and its flag left.
    #[display("army immobilized")]
    ArmyImmobilized,
    /// The loser has pieces but none of them can act.
    #[display("opponent cannot move")]
    OpponentStuck,
    /// Both players lost at the same check.
    #[display("both players lost")]
    MutualLoss,
    /// Neither player can act.
    #[display("no player can move")]
    BothStuck,
}

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// One player won.
    Winner {
        /// Winning color.
        color: Color,
        /// What decided the game.
        reason: EndReason,
    },
    /// Both players are declared winners.
    Draw {
        /// What decided the game.
        reason: EndReason,
    },
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Color> {
        match self {
            Outcome::Winner { color, .. } => Some(*color),
            Outcome::Draw { .. } => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw { .. })
    }

    /// What decided the game.
    pub fn reason(&self) -> EndReason {
        match self {
            Outcome::Winner { reason, .. } | Outcome::Draw { reason } => *reason,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner { color, reason } => write!(f, "{color} wins ({reason})"),
            Outcome::Draw { reason } => write!(f, "Both players win ({reason})"),
        }
    }
}

/// What the win check needs to know about one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Standing {
    /// Color of the player.
    pub color: Color,
    /// Set when the player has lost on material.
    pub loss: Option<EndReason>,
    /// Whether any of its pieces has a legal action.
    pub can_act: bool,
}

/// Decides the game from both standings, or `None` if play goes on.
///
/// Checked in order: both lost, one lost, nobody can act, one cannot act.
#[instrument]
pub fn decide(first: Standing, second: Standing) -> Option<Outcome> {
    match (first.loss, second.loss) {
        (Some(_), Some(_)) => {
            return Some(Outcome::Draw {
                reason: EndReason::MutualLoss,
            });
        }
        (Some(reason), None) => {
            return Some(Outcome::Winner {
                color: second.color,
                reason,
            });
        }
        (None, Some(reason)) => {
            return Some(Outcome::Winner {
                color: first.color,
                reason,
            });
        }
        (None, None) => {}
    }

    match (first.can_act, second.can_act) {
        (false, false) => Some(Outcome::Draw {
            reason: EndReason::BothStuck,
        }),
        (false, true) => Some(Outcome::Winner {
            color: second.color,
            reason: EndReason::OpponentStuck,
        }),
        (true, false) => Some(Outcome::Winner {
            color: first.color,
            reason: EndReason::OpponentStuck,
        }),
        (true, true) => None,
    }
}
