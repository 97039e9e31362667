//! The 12×12 board and the arena owning every piece placed on it.
//!
//! Cells never move and only hold a [`PieceId`]. The pieces themselves live
//! in an arena owned by the board, so a piece has exactly one owner whether
//! it stands on a cell or lies in the graveyard.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::BoardError;
use crate::geometry::Position;
use crate::piece::{Color, Piece, PieceId};
use crate::rank::Rank;

/// Side length of the board, walls included.
pub const BOARD_SIZE: i32 = 12;

/// Terrain of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum CellKind {
    /// Playable square.
    Normal,
    /// Border square.
    Wall,
    /// Lake square in the middle of the board.
    Water,
}

/// A square of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    kind: CellKind,
    occupant: Option<PieceId>,
}

impl Cell {
    /// Coordinates of the cell.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Terrain.
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Piece standing here, if any.
    pub fn occupant(&self) -> Option<PieceId> {
        self.occupant
    }
}

/// Terrain of `pos` in the fixed layout.
pub fn layout_kind(pos: Position) -> CellKind {
    let last = BOARD_SIZE - 1;
    let lake_rows = [BOARD_SIZE / 2 - 1, BOARD_SIZE / 2];
    let lake_columns = [3, 4, BOARD_SIZE - 5, BOARD_SIZE - 4];

    if pos.x == 0 || pos.y == 0 || pos.x == last || pos.y == last {
        CellKind::Wall
    } else if lake_rows.contains(&pos.y) && lake_columns.contains(&pos.x) {
        CellKind::Water
    } else {
        CellKind::Normal
    }
}

/// The game board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order.
    cells: Vec<Cell>,
    /// Piece arena; `None` marks a discarded slot.
    pieces: Vec<Option<Piece>>,
}

impl Board {
    /// Builds walls, water and empty normal cells.
    #[instrument]
    pub fn new() -> Self {
        let cells = (0..BOARD_SIZE)
            .flat_map(|y| (0..BOARD_SIZE).map(move |x| Position::new(x, y)))
            .map(|position| Cell {
                position,
                kind: layout_kind(position),
                occupant: None,
            })
            .collect();

        Self {
            cells,
            pieces: Vec::new(),
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> i32 {
        BOARD_SIZE
    }

    /// Pure bounds predicate.
    pub fn is_inside(&self, pos: Position) -> bool {
        (0..BOARD_SIZE).contains(&pos.x) && (0..BOARD_SIZE).contains(&pos.y)
    }

    fn index(&self, pos: Position) -> Result<usize, BoardError> {
        if !self.is_inside(pos) {
            return Err(BoardError::OutOfBounds(pos));
        }
        // Both coordinates are in [0, BOARD_SIZE) here.
        Ok((pos.y * BOARD_SIZE + pos.x) as usize)
    }

    /// Cell at `pos`.
    pub fn cell(&self, pos: Position) -> Result<&Cell, BoardError> {
        let idx = self.index(pos)?;
        Ok(&self.cells[idx])
    }

    /// Identifier of the piece at `pos`.
    pub fn piece_id_at(&self, pos: Position) -> Result<Option<PieceId>, BoardError> {
        Ok(self.cell(pos)?.occupant)
    }

    /// Piece at `pos`.
    pub fn piece_at(&self, pos: Position) -> Result<Option<&Piece>, BoardError> {
        Ok(self.piece_id_at(pos)?.and_then(|id| self.piece(id)))
    }

    /// True iff `pos` is a normal, empty cell. Positions off the board are
    /// never walkable.
    pub fn walkable(&self, pos: Position) -> bool {
        self.cell(pos)
            .is_ok_and(|cell| cell.kind == CellKind::Normal && cell.occupant.is_none())
    }

    /// Piece with the given handle, dead or alive.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Creates a piece and puts it on `pos`.
    #[instrument(skip(self))]
    pub fn place(&mut self, rank: Rank, color: Color, pos: Position) -> Result<PieceId, BoardError> {
        let idx = self.index(pos)?;
        let cell = &self.cells[idx];
        if cell.kind != CellKind::Normal {
            return Err(BoardError::NotPlaceable(pos));
        }
        if cell.occupant.is_some() {
            return Err(BoardError::Occupied(pos));
        }

        // Slots freed by `discard_color` are reused first.
        let id = match self.pieces.iter().position(Option::is_none) {
            Some(free) => PieceId(free),
            None => PieceId(self.pieces.len()),
        };
        let piece = Some(Piece::new(id, rank, color, pos));
        match self.pieces.get_mut(id.0) {
            Some(slot) => *slot = piece,
            None => self.pieces.push(piece),
        }
        self.cells[idx].occupant = Some(id);
        debug!(%id, %rank, %color, %pos, "Piece placed");
        Ok(id)
    }

    /// Empties the cell at `pos`, returning its former occupant. The piece
    /// stays in the arena.
    pub(crate) fn vacate(&mut self, pos: Position) -> Result<Option<PieceId>, BoardError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].occupant.take())
    }

    /// Moves piece `id` from its square to `to`, which must be inside.
    pub(crate) fn relocate(&mut self, id: PieceId, to: Position) -> Result<(), BoardError> {
        let target = self.index(to)?;
        let Some(from) = self.piece(id).map(Piece::position) else {
            return Ok(());
        };
        let origin = self.index(from)?;

        if self.cells[origin].occupant == Some(id) {
            self.cells[origin].occupant = None;
        }
        self.cells[target].occupant = Some(id);
        if let Some(piece) = self.piece_mut(id) {
            piece.set_position(to);
        }
        Ok(())
    }

    /// Takes every piece of `color` off the board and frees its arena slot.
    #[instrument(skip(self))]
    pub fn discard_color(&mut self, color: Color) -> usize {
        let mut discarded = 0;
        for cell in &mut self.cells {
            let Some(id) = cell.occupant else { continue };
            let slot = &mut self.pieces[id.0];
            if slot.as_ref().is_some_and(|piece| piece.color() == color) {
                cell.occupant = None;
                *slot = None;
                discarded += 1;
            }
        }
        debug!(discarded, "Pieces discarded");
        discarded
    }

    /// Removes every piece and empties the arena.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.occupant = None;
        }
        self.pieces.clear();
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Pieces currently standing on the board, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells
            .iter()
            .filter_map(|cell| cell.occupant.and_then(|id| self.piece(id)))
    }

    /// Pieces of `color` currently standing on the board.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |piece| piece.color() == color)
    }

    /// Identifiers of the pieces standing on the board.
    pub fn piece_ids(&self) -> Vec<PieceId> {
        self.cells.iter().filter_map(|cell| cell.occupant).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
