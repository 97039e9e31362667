//! Move and attack legality.

use tracing::instrument;

use crate::board::Board;
use crate::geometry::{Direction, Position};
use crate::piece::{Color, Piece};
use crate::rank::MovementKind;

/// Whether `target` lies within the piece's movement pattern, ignoring what
/// stands on `target` itself.
///
/// Adjacent movers need one orthogonal step. Scouts need a shared row or
/// column with every cell strictly in between walkable.
pub fn reaches(board: &Board, piece: &Piece, target: Position) -> bool {
    let from = piece.position();
    match piece.movement() {
        MovementKind::Immobile => false,
        MovementKind::Adjacent => from.is_adjacent(target),
        MovementKind::Scout => from
            .path_to(target)
            .is_some_and(|path| path.into_iter().all(|cell| board.walkable(cell))),
    }
}

/// Whether `piece` may step onto the empty square `target`.
#[instrument(skip(board, piece), fields(piece = %piece.label()))]
pub fn can_move(board: &Board, piece: &Piece, target: Position, limit: u32) -> bool {
    piece.alive()
        && piece.is_movable()
        && board.is_inside(target)
        && board.walkable(target)
        && piece.guard().allows(target, limit)
        && reaches(board, piece, target)
}

/// Whether `piece` may attack the enemy standing on `target`.
#[instrument(skip(board, piece), fields(piece = %piece.label()))]
pub fn can_attack(board: &Board, piece: &Piece, target: Position, limit: u32) -> bool {
    let enemy_there = matches!(
        board.piece_at(target),
        Ok(Some(other)) if other.color() != piece.color()
    );

    piece.alive()
        && piece.is_movable()
        && board.is_inside(target)
        && enemy_there
        && piece.guard().allows(target, limit)
        && reaches(board, piece, target)
}

/// Squares worth testing for a move or an attack by `piece`.
///
/// For scouts this walks each direction up to and including the first
/// non-walkable cell.
pub fn candidate_targets(board: &Board, piece: &Piece) -> Vec<Position> {
    let from = piece.position();
    match piece.movement() {
        MovementKind::Immobile => Vec::new(),
        MovementKind::Adjacent => from
            .neighbors()
            .into_iter()
            .filter(|pos| board.is_inside(*pos))
            .collect(),
        MovementKind::Scout => {
            let mut targets = Vec::new();
            for direction in Direction::all() {
                let mut cursor = from + direction;
                while board.is_inside(cursor) {
                    targets.push(cursor);
                    if !board.walkable(cursor) {
                        break;
                    }
                    cursor = cursor + direction;
                }
            }
            targets
        }
    }
}

/// Whether `piece` has at least one legal move or attack.
pub fn can_act(board: &Board, piece: &Piece, limit: u32) -> bool {
    candidate_targets(board, piece)
        .into_iter()
        .any(|target| can_move(board, piece, target, limit) || can_attack(board, piece, target, limit))
}

/// Whether any piece of `color` still on the board can act.
#[instrument(skip(board))]
pub fn player_can_act(board: &Board, color: Color, limit: u32) -> bool {
    board
        .pieces_of(color)
        .any(|piece| can_act(board, piece, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceId;
    use crate::rank::Rank;

    const LIMIT: u32 = 3;

    fn piece<'a>(board: &'a Board, id: PieceId) -> &'a Piece {
        board.piece(id).unwrap()
    }

    #[test]
    fn test_adjacent_mover_needs_one_step() {
        let mut board = Board::new();
        let id = board.place(Rank::Captain, Color::Red, Position::new(2, 8)).unwrap();
        let captain = piece(&board, id);

        assert!(can_move(&board, captain, Position::new(2, 7), LIMIT));
        assert!(can_move(&board, captain, Position::new(1, 8), LIMIT));
        assert!(!can_move(&board, captain, Position::new(2, 6), LIMIT));
        assert!(!can_move(&board, captain, Position::new(3, 7), LIMIT));
        assert!(!can_move(&board, captain, Position::new(2, 8), LIMIT));
    }

    #[test]
    fn test_walls_and_water_block() {
        let mut board = Board::new();
        let id = board.place(Rank::Major, Color::Blue, Position::new(3, 4)).unwrap();
        let major = piece(&board, id);
        assert!(!can_move(&board, major, Position::new(3, 5), LIMIT));

        let id = board.place(Rank::Major, Color::Blue, Position::new(1, 1)).unwrap();
        let major = piece(&board, id);
        assert!(!can_move(&board, major, Position::new(0, 1), LIMIT));
        assert!(!can_move(&board, major, Position::new(1, 0), LIMIT));
    }

    #[test]
    fn test_immobile_pieces_never_act() {
        let mut board = Board::new();
        let bomb = board.place(Rank::Bomb, Color::Red, Position::new(5, 5)).unwrap();
        let flag = board.place(Rank::Flag, Color::Red, Position::new(6, 5)).unwrap();
        board.place(Rank::Spy, Color::Blue, Position::new(5, 4)).unwrap();

        for id in [bomb, flag] {
            let p = piece(&board, id);
            assert!(!can_move(&board, p, Position::new(p.position().x, 6), LIMIT));
            assert!(!can_attack(&board, p, Position::new(5, 4), LIMIT));
            assert!(!can_act(&board, p, LIMIT));
        }
    }

    #[test]
    fn test_scout_long_range_needs_clear_line() {
        let mut board = Board::new();
        let id = board.place(Rank::Scout, Color::Red, Position::new(5, 10)).unwrap();
        let scout = piece(&board, id);

        assert!(can_move(&board, scout, Position::new(5, 1), LIMIT));
        assert!(can_move(&board, scout, Position::new(10, 10), LIMIT));
        assert!(!can_move(&board, scout, Position::new(6, 9), LIMIT));

        board.place(Rank::Bomb, Color::Red, Position::new(5, 6)).unwrap();
        let scout = piece(&board, id);
        assert!(can_move(&board, scout, Position::new(5, 7), LIMIT));
        assert!(!can_move(&board, scout, Position::new(5, 5), LIMIT));
    }

    #[test]
    fn test_scout_cannot_cross_water() {
        let mut board = Board::new();
        let id = board.place(Rank::Scout, Color::Blue, Position::new(3, 4)).unwrap();
        let scout = piece(&board, id);
        assert!(!can_move(&board, scout, Position::new(3, 7), LIMIT));
    }

    #[test]
    fn test_attack_requires_enemy() {
        let mut board = Board::new();
        let id = board.place(Rank::General, Color::Red, Position::new(2, 8)).unwrap();
        board.place(Rank::Sergeant, Color::Red, Position::new(2, 7)).unwrap();
        board.place(Rank::Sergeant, Color::Blue, Position::new(3, 8)).unwrap();
        let general = piece(&board, id);

        assert!(!can_attack(&board, general, Position::new(2, 7), LIMIT));
        assert!(can_attack(&board, general, Position::new(3, 8), LIMIT));
        assert!(!can_attack(&board, general, Position::new(1, 8), LIMIT));
        assert!(!can_attack(&board, general, Position::new(2, 12), LIMIT));
    }

    #[test]
    fn test_scout_attacks_from_afar() {
        let mut board = Board::new();
        let id = board.place(Rank::Scout, Color::Red, Position::new(6, 9)).unwrap();
        board.place(Rank::Spy, Color::Blue, Position::new(6, 2)).unwrap();
        let scout = piece(&board, id);
        assert!(can_attack(&board, scout, Position::new(6, 2), LIMIT));
        assert!(candidate_targets(&board, scout).contains(&Position::new(6, 2)));

        board.place(Rank::Bomb, Color::Blue, Position::new(6, 4)).unwrap();
        let scout = piece(&board, id);
        assert!(!can_attack(&board, scout, Position::new(6, 2), LIMIT));
        assert!(can_attack(&board, scout, Position::new(6, 4), LIMIT));
    }

    #[test]
    fn test_player_can_act() {
        let mut board = Board::new();
        board.place(Rank::Flag, Color::Blue, Position::new(1, 1)).unwrap();
        board.place(Rank::Bomb, Color::Blue, Position::new(2, 1)).unwrap();
        board.place(Rank::Bomb, Color::Blue, Position::new(1, 2)).unwrap();
        board.place(Rank::Miner, Color::Red, Position::new(8, 8)).unwrap();

        assert!(!player_can_act(&board, Color::Blue, LIMIT));
        assert!(player_can_act(&board, Color::Red, LIMIT));
    }
}
