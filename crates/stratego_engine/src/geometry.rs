//! Grid coordinates and orthogonal directions.
//!
//! Positions are plain values: `x` is the column, `y` the row, both counted
//! from the top-left wall corner. Arithmetic may leave the board; callers ask
//! the [`Board`](crate::Board) whether a position is inside.

use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::instrument;

use crate::error::ParseError;

/// A coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Creates a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the four orthogonal neighbours, in [`Direction`] order.
    pub fn neighbors(self) -> [Position; 4] {
        [
            self + Direction::Up,
            self + Direction::Down,
            self + Direction::Left,
            self + Direction::Right,
        ]
    }

    /// True when `other` is exactly one orthogonal step away.
    pub fn is_adjacent(self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }

    /// True when both positions share a row or a column (and differ).
    pub fn is_aligned(self, other: Position) -> bool {
        self != other && (self.x == other.x || self.y == other.y)
    }

    /// Cells strictly between `self` and `other` on a straight line.
    ///
    /// Returns `None` when the two positions are not aligned.
    pub fn path_to(self, other: Position) -> Option<Vec<Position>> {
        if !self.is_aligned(other) {
            return None;
        }

        let step = Position::new((other.x - self.x).signum(), (other.y - self.y).signum());
        let mut cells = Vec::new();
        let mut cursor = self + step;
        while cursor != other {
            cells.push(cursor);
            cursor = cursor + step;
        }
        Some(cells)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, rhs: Direction) -> Position {
        self + rhs.offset()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match u8::try_from(self.x) {
            Ok(column @ 1..=26) => write!(f, "{}{}", self.y, char::from(b'A' + column - 1)),
            _ => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

impl FromStr for Position {
    type Err = ParseError;

    /// Parses `<row><column letter>`, e.g. `7f` or `10A`.
    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| ParseError::Position(s.to_string()))?;
        let (digits, letters) = trimmed.split_at(split);

        let row: i32 = digits
            .parse()
            .map_err(|_| ParseError::Position(s.to_string()))?;
        if !(1..=10).contains(&row) {
            return Err(ParseError::Position(s.to_string()));
        }

        let mut chars = letters.chars();
        let column = match (chars.next(), chars.next()) {
            (Some(letter), None) if ('a'..='j').contains(&letter.to_ascii_lowercase()) => {
                i32::from(letter.to_ascii_lowercase() as u8 - b'a') + 1
            }
            _ => return Err(ParseError::Position(s.to_string())),
        };

        Ok(Position::new(column, row))
    }
}

/// One of the four orthogonal directions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Unit vector of this direction.
    pub const fn offset(self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }

    /// All directions.
    pub fn all() -> impl Iterator<Item = Direction> {
        Direction::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_addition() {
        let origin = Position::new(5, 5);
        assert_eq!(origin + Direction::Up, Position::new(5, 4));
        assert_eq!(origin + Direction::Down, Position::new(5, 6));
        assert_eq!(origin + Direction::Left, Position::new(4, 5));
        assert_eq!(origin + Direction::Right, Position::new(6, 5));
    }

    #[test]
    fn test_position_text_form() {
        let pos: Position = "7f".parse().unwrap();
        assert_eq!(pos, Position::new(6, 7));
        assert_eq!(pos.to_string(), "7F");

        let pos: Position = "10J".parse().unwrap();
        assert_eq!(pos, Position::new(10, 10));
    }

    #[test]
    fn test_position_rejects_garbage() {
        assert!("0a".parse::<Position>().is_err());
        assert!("11a".parse::<Position>().is_err());
        assert!("5k".parse::<Position>().is_err());
        assert!("5".parse::<Position>().is_err());
        assert!("ab".parse::<Position>().is_err());
        assert!("5ab".parse::<Position>().is_err());
    }

    #[test]
    fn test_direction_parse_case_insensitive() {
        assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("Left".parse::<Direction>().unwrap(), Direction::Left);
        assert!("north".parse::<Direction>().is_err());
    }

    #[test]
    fn test_path_between_aligned_cells() {
        let from = Position::new(1, 1);
        let path = from.path_to(Position::new(4, 1)).unwrap();
        assert_eq!(path, vec![Position::new(2, 1), Position::new(3, 1)]);

        let path = Position::new(3, 6).path_to(Position::new(3, 4)).unwrap();
        assert_eq!(path, vec![Position::new(3, 5)]);

        assert!(from.path_to(Position::new(2, 2)).is_none());
        assert!(from.path_to(from).is_none());
        assert!(from.path_to(Position::new(2, 1)).unwrap().is_empty());
    }
}
