//! Error types for the rule engine.
//!
//! Only contract violations travel as `Err`. Illegal moves and rejected
//! layouts are game events: they land in the [`History`](crate::History) and
//! move the state graph to an error state instead.

use derive_more::{Display, Error, From};
use tracing::warn;

use crate::geometry::Position;
use crate::history::InfoKind;
use crate::rank::Rank;
use crate::state_graph::State;

/// Failure to parse one of the textual forms (positions, ranks).
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseError {
    /// Not a `<row><column>` coordinate.
    #[display("Invalid position: {_0:?}")]
    Position(#[error(not(source))] String),
    /// Not a rank symbol (`1`-`10`, `D`, `B`).
    #[display("Invalid rank symbol: {_0:?}")]
    Rank(#[error(not(source))] String),
}

/// Bounds or placement violation on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Coordinates outside `[0, BOARD_SIZE)`.
    #[display("Position {_0:?} is outside the board")]
    OutOfBounds(#[error(not(source))] Position),
    /// Wall or water cell.
    #[display("Cell {_0} cannot hold a piece")]
    NotPlaceable(#[error(not(source))] Position),
    /// Cell already holds a piece.
    #[display("Cell {_0} is already occupied")]
    Occupied(#[error(not(source))] Position),
}

/// History log misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum HistoryError {
    /// The log already holds `bound` entries.
    #[display("History is full ({bound} entries)")]
    Full {
        /// Capacity of the log.
        bound: usize,
    },
    /// No entry of the requested kind.
    #[display("No {_0} entry in history")]
    Empty(#[error(not(source))] InfoKind),
}

/// Malformed army layout.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ArmyError {
    /// A token is not a rank symbol.
    #[display("Line {line}: invalid rank token {token:?}")]
    InvalidToken {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A line does not hold exactly ten tokens.
    #[display("Line {line}: expected 10 ranks, found {found}")]
    WrongColumnCount {
        /// 1-based line number.
        line: usize,
        /// Number of tokens found.
        found: usize,
    },
    /// The layout does not hold exactly four rows.
    #[display("Expected 4 rows, found {found}")]
    WrongRowCount {
        /// Number of non-empty lines found.
        found: usize,
    },
    /// A rank appears a wrong number of times.
    #[display("Expected {expected} {rank}, found {found}")]
    WrongRankCount {
        /// Rank whose count is off.
        rank: Rank,
        /// Count required by the army composition.
        expected: usize,
        /// Count found in the layout.
        found: usize,
    },
}

/// A command was issued in a state that does not allow it.
///
/// This is a programming error in the caller: the presentation layer must
/// only offer commands the current [`State`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Operation `{operation}` is not allowed in state {state:?}")]
pub struct ProtocolError {
    /// Name of the rejected operation.
    pub operation: &'static str,
    /// State the model was in.
    pub state: State,
}

/// Errors crossing the command boundary of [`GameModel`](crate::GameModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum EngineError {
    /// Command not permitted by the state graph.
    #[display("{_0}")]
    Protocol(ProtocolError),
    /// Coordinates outside the board.
    #[display("{_0}")]
    Board(BoardError),
}

/// Which step of loading a configuration failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConfigErrorKind {
    /// The file could not be read.
    #[display("unreadable file")]
    Read,
    /// The document is not valid TOML for [`EngineConfig`](crate::EngineConfig).
    #[display("malformed document")]
    Parse,
    /// A value is out of range.
    #[display("invalid value")]
    Invalid,
}

/// Configuration error, located at the engine line that raised it.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error ({kind}): {message} at {}:{}", origin.file(), origin.line())]
pub struct ConfigError {
    /// Failed step.
    pub kind: ConfigErrorKind,
    /// Details.
    pub message: String,
    /// Where the error was raised.
    pub origin: &'static std::panic::Location<'static>,
}

impl ConfigError {
    #[track_caller]
    pub(crate) fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        let err = Self {
            kind,
            message: message.into(),
            origin: std::panic::Location::caller(),
        };
        warn!(%err, "Configuration rejected");
        err
    }
}
