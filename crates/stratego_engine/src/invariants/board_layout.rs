//! Board layout invariant: walls on the border, the eight water cells in the
//! middle, normal cells everywhere else.

use super::Invariant;
use crate::board::{BOARD_SIZE, Board, layout_kind};
use crate::GameModel;

/// Invariant: every cell has the terrain of the fixed layout and sits at
/// its row-major slot.
pub struct BoardLayoutInvariant;

impl Invariant<Board> for BoardLayoutInvariant {
    fn holds(board: &Board) -> bool {
        let mut count = 0;
        for (index, cell) in board.cells().enumerate() {
            let pos = cell.position();
            let expected_index = (pos.y * BOARD_SIZE + pos.x) as usize;
            if !board.is_inside(pos) || expected_index != index || cell.kind() != layout_kind(pos) {
                return false;
            }
            count += 1;
        }
        count == (BOARD_SIZE * BOARD_SIZE) as usize
    }

    fn description() -> &'static str {
        "Walls border the board, water fills the center blocks, other cells are normal"
    }
}

impl Invariant<GameModel> for BoardLayoutInvariant {
    fn holds(model: &GameModel) -> bool {
        <Self as Invariant<Board>>::holds(model.board())
    }

    fn description() -> &'static str {
        <Self as Invariant<Board>>::description()
    }
}
