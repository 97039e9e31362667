//! Starting army layouts.
//!
//! A layout is four rows of ten rank tokens, whitespace separated:
//!
//! ```text
//! D B 2 3 B 9 2 6 B 2
//! ...
//! ```
//!
//! The first row is the owner's back row. Red's back row is row 10 and its
//! front row 7; Blue's back row is row 1 and its front row 4.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{instrument, warn};

use crate::board::BOARD_SIZE;
use crate::error::ArmyError;
use crate::geometry::Position;
use crate::piece::Color;
use crate::rank::{ARMY_SIZE, Rank};

/// Ranks per layout row.
pub const ARMY_COLUMNS: usize = 10;
/// Rows per layout.
pub const ARMY_ROWS: usize = 4;

/// Board row holding the `index`-th layout row of `color`.
pub fn layout_row(color: Color, index: usize) -> i32 {
    // index < ARMY_ROWS
    let offset = index as i32;
    match color {
        Color::Red => BOARD_SIZE - 2 - offset,
        Color::Blue => 1 + offset,
    }
}

/// Row facing the enemy at the start of the game.
pub fn front_row(color: Color) -> i32 {
    layout_row(color, ARMY_ROWS - 1)
}

/// A validated 4×10 army.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmyLayout {
    rows: Vec<Vec<Rank>>,
}

impl ArmyLayout {
    /// Builds a layout from rows of ranks, checking shape and composition.
    #[instrument(skip(rows), fields(rows = rows.len()))]
    pub fn from_rows(rows: Vec<Vec<Rank>>) -> Result<Self, ArmyError> {
        if rows.len() != ARMY_ROWS {
            return Err(ArmyError::WrongRowCount { found: rows.len() });
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != ARMY_COLUMNS {
                return Err(ArmyError::WrongColumnCount {
                    line: index + 1,
                    found: row.len(),
                });
            }
        }

        let mut counts: BTreeMap<Rank, usize> = BTreeMap::new();
        for rank in rows.iter().flatten() {
            *counts.entry(*rank).or_default() += 1;
        }
        for rank in Rank::iter() {
            let found = counts.get(&rank).copied().unwrap_or(0);
            if found != rank.count() {
                return Err(ArmyError::WrongRankCount {
                    rank,
                    expected: rank.count(),
                    found,
                });
            }
        }

        Ok(Self { rows })
    }

    /// Lays `ranks` out row by row, ten per row.
    pub fn from_ranks(ranks: &[Rank]) -> Result<Self, ArmyError> {
        Self::from_rows(ranks.chunks(ARMY_COLUMNS).map(<[Rank]>::to_vec).collect())
    }

    /// The catalog army in rank order: flag and spy in the back row,
    /// bombs at the front.
    pub fn standard() -> Self {
        let ranks = Rank::full_army();
        debug_assert_eq!(ranks.len(), ARMY_SIZE);
        Self {
            rows: ranks.chunks(ARMY_COLUMNS).map(<[Rank]>::to_vec).collect(),
        }
    }

    /// Rows, back row first.
    pub fn rows(&self) -> &[Vec<Rank>] {
        &self.rows
    }

    /// Where each rank goes for an army of `color`.
    pub fn placements(&self, color: Color) -> Vec<(Rank, Position)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(index, row)| {
                let y = layout_row(color, index);
                row.iter()
                    .enumerate()
                    .map(move |(column, rank)| (*rank, Position::new(column as i32 + 1, y)))
            })
            .collect()
    }
}

impl FromStr for ArmyLayout {
    type Err = ArmyError;

    #[instrument(skip(s))]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for (index, line) in s.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_number = index + 1;
            let row = line
                .split_whitespace()
                .map(|token| {
                    Rank::from_symbol(token).map_err(|_| ArmyError::InvalidToken {
                        line: line_number,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .inspect_err(|e| warn!(error = %e, "Rejected army token"))?;

            if row.len() != ARMY_COLUMNS {
                return Err(ArmyError::WrongColumnCount {
                    line: line_number,
                    found: row.len(),
                });
            }
            rows.push(row);
        }

        Self::from_rows(rows)
    }
}

impl std::fmt::Display for ArmyLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            let tokens: Vec<_> = row.iter().map(|rank| rank.symbol()).collect();
            writeln!(f, "{}", tokens.join(" "))?;
        }
        Ok(())
    }
}
