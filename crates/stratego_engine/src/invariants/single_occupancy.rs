//! Single occupancy invariant.

use std::collections::HashSet;

use super::Invariant;
use crate::board::{Board, CellKind};
use crate::GameModel;

/// Invariant: each occupied cell is a normal cell holding a live piece that
/// knows it stands there, and no piece stands on two cells.
pub struct SingleOccupancyInvariant;

impl Invariant<Board> for SingleOccupancyInvariant {
    fn holds(board: &Board) -> bool {
        let mut seen = HashSet::new();
        board.cells().all(|cell| {
            let Some(id) = cell.occupant() else {
                return true;
            };
            let Some(piece) = board.piece(id) else {
                return false;
            };
            cell.kind() == CellKind::Normal
                && piece.alive()
                && piece.position() == cell.position()
                && seen.insert(id)
        })
    }

    fn description() -> &'static str {
        "At most one live piece per normal cell; walls and water stay empty"
    }
}

impl Invariant<GameModel> for SingleOccupancyInvariant {
    fn holds(model: &GameModel) -> bool {
        <Self as Invariant<Board>>::holds(model.board())
    }

    fn description() -> &'static str {
        <Self as Invariant<Board>>::description()
    }
}
