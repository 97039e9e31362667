//! Rule engine for Stratego.
//!
//! The engine is a synchronous, single-threaded library. A [`GameModel`]
//! owns the [`Board`], the [`History`], the [`StateGraph`] and both
//! [`Player`]s; presentation layers issue commands to it and read its state
//! back through queries and [`Change`] notifications.
//!
//! # Example
//!
//! ```
//! use stratego_engine::{ArmyLayout, Color, GameModel, Position, State};
//!
//! let mut model = GameModel::default();
//! model.init()?;
//! let army = ArmyLayout::standard();
//! model.load_army(&army, Color::Red)?;
//! model.load_army(&army, Color::Blue)?;
//! model.setup("Alice", "Bob")?;
//! model.next_player()?;
//!
//! // Red's colonel steps forward.
//! let change = model.move_or_attack("7A".parse()?, "6A".parse()?)?;
//! assert_eq!(change.state, State::GameTurn);
//! model.next_turn()?;
//! assert_eq!(model.current_state(), State::PlayerSwap);
//! # let _ = Position::new(1, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod army;
pub mod board;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod history;
pub mod invariants;
pub mod model;
pub mod piece;
pub mod player;
pub mod rank;
pub mod rules;
pub mod state_graph;

pub use army::{ARMY_COLUMNS, ARMY_ROWS, ArmyLayout, front_row, layout_row};
pub use board::{BOARD_SIZE, Board, Cell, CellKind};
pub use config::{EngineConfig, Variant};
pub use error::{ArmyError, BoardError, ConfigError, ConfigErrorKind, EngineError, HistoryError, ParseError, ProtocolError};
pub use event::{Change, GameEvent, ModelObserver};
pub use geometry::{Direction, Position};
pub use history::{DEFAULT_HISTORY_BOUND, History, InfoKind, TimedEntry};
pub use invariants::{Invariant, InvariantSet, InvariantViolation, ModelInvariants};
pub use model::GameModel;
pub use piece::{Color, Piece, PieceId, RepetitionGuard};
pub use player::Player;
pub use rank::{ARMY_SIZE, MovementKind, Rank, RankProfile};
pub use rules::{CombatOutcome, EndReason, Outcome};
pub use state_graph::{Event, State, StateGraph};
