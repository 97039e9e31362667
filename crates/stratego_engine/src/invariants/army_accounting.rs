//! Army accounting invariant: player statistics agree with the board and
//! the graveyard.

use strum::IntoEnumIterator;

use super::Invariant;
use crate::GameModel;
use crate::rank::Rank;

/// Invariant: once players exist, each one's remaining counts equal its
/// pieces on the board, rank by rank; every graveyard piece is dead and off
/// the board.
pub struct ArmyAccountingInvariant;

impl Invariant<GameModel> for ArmyAccountingInvariant {
    fn holds(model: &GameModel) -> bool {
        let board = model.board();
        let standing = board.piece_ids();

        let graveyard_ok = model.removed_pieces().iter().all(|id| {
            board
                .piece(*id)
                .is_some_and(|piece| !piece.alive() && !standing.contains(id))
        });
        if !graveyard_ok {
            return false;
        }

        let Ok(players) = model.players() else {
            return true;
        };
        players.iter().all(|player| {
            let on_board: Vec<Rank> = board.pieces_of(player.color()).map(|p| p.rank()).collect();
            on_board.len() == player.remaining()
                && Rank::iter().all(|rank| {
                    on_board.iter().filter(|r| **r == rank).count() == player.remaining_of(rank)
                })
        })
    }

    fn description() -> &'static str {
        "Player counts match the board and removed pieces are dead"
    }
}
