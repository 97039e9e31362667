//! Domain events and change notifications.
//!
//! Every command of the [`GameModel`](crate::GameModel) returns a [`Change`]:
//! the state reached plus the events the command produced. Players consume
//! the events to keep their statistics, observers receive the same value
//! read-only.

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::piece::{Color, PieceId};
use crate::rank::Rank;
use crate::rules::{CombatOutcome, Outcome};
use crate::state_graph::State;

/// Something that happened during a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// The model was reset.
    Initialized,
    /// An army was placed and accepted.
    ArmyLoaded {
        /// Owner of the army.
        color: Color,
    },
    /// An army was refused; none of its pieces stayed on the board.
    ArmyRejected {
        /// Owner of the army.
        color: Color,
    },
    /// Players were named and play may begin.
    GameSetUp,
    /// The turn was handed to `color`.
    TurnStarted {
        /// Player now allowed to act.
        color: Color,
    },
    /// A piece moved to an empty square.
    PieceMoved {
        /// Moving piece.
        piece: PieceId,
        /// Its owner.
        color: Color,
        /// Its rank.
        rank: Rank,
        /// Square left.
        from: Position,
        /// Square reached.
        to: Position,
    },
    /// An attack was fought.
    CombatResolved {
        /// Attacking piece.
        attacker: PieceId,
        /// Owner of the attacker.
        attacker_color: Color,
        /// Rank of the attacker.
        attacker_rank: Rank,
        /// Attacked piece.
        defender: PieceId,
        /// Rank of the defender.
        defender_rank: Rank,
        /// Square the attacker came from.
        from: Position,
        /// Square of the defender.
        at: Position,
        /// Who survived.
        outcome: CombatOutcome,
    },
    /// A piece left the board for the graveyard.
    PieceDied {
        /// Dead piece.
        piece: PieceId,
        /// Its owner.
        color: Color,
        /// Its rank.
        rank: Rank,
    },
    /// A move or attack was refused.
    ActionRefused {
        /// Player who tried.
        color: Color,
        /// Start square given.
        from: Position,
        /// Target square given.
        to: Position,
    },
    /// The win check ended the game.
    GameEnded {
        /// Result.
        outcome: Outcome,
    },
    /// An error state was acknowledged.
    ErrorAcknowledged,
    /// The match was stopped or left.
    Finished,
    /// A rematch was requested.
    Rewound,
}

impl GameEvent {
    /// Piece that completed an action in this event, if any.
    pub fn actor(&self) -> Option<(PieceId, Color)> {
        match self {
            GameEvent::PieceMoved { piece, color, .. } => Some((*piece, *color)),
            GameEvent::CombatResolved {
                attacker,
                attacker_color,
                ..
            } => Some((*attacker, *attacker_color)),
            _ => None,
        }
    }
}

/// Notification emitted after every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// State of the model once the command completed.
    pub state: State,
    /// Events produced, in order.
    pub events: Vec<GameEvent>,
}

impl Change {
    /// Pieces that died during the command.
    pub fn casualties(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.events.iter().filter_map(|event| match event {
            GameEvent::PieceDied { piece, .. } => Some(*piece),
            _ => None,
        })
    }
}

/// Receiver of the model's change notifications.
///
/// Observers get a shared reference to an immutable [`Change`] and no handle
/// on the model, so they cannot issue commands from inside a notification.
pub trait ModelObserver {
    /// Called after each command, in registration order.
    fn on_change(&mut self, change: &Change);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_is_mover_or_attacker() {
        let moved = GameEvent::PieceMoved {
            piece: PieceId(3),
            color: Color::Red,
            rank: Rank::Scout,
            from: Position::new(1, 7),
            to: Position::new(1, 6),
        };
        assert_eq!(moved.actor(), Some((PieceId(3), Color::Red)));

        let died = GameEvent::PieceDied {
            piece: PieceId(3),
            color: Color::Red,
            rank: Rank::Scout,
        };
        assert_eq!(died.actor(), None);
    }

    #[test]
    fn test_casualties() {
        let change = Change {
            state: State::GameTurn,
            events: vec![
                GameEvent::PieceDied {
                    piece: PieceId(1),
                    color: Color::Blue,
                    rank: Rank::Major,
                },
                GameEvent::PieceDied {
                    piece: PieceId(7),
                    color: Color::Red,
                    rank: Rank::Major,
                },
            ],
        };
        let dead: Vec<_> = change.casualties().collect();
        assert_eq!(dead, vec![PieceId(1), PieceId(7)]);
    }
}
