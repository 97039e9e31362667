//! Shared layouts and helpers for integration tests.
//!
//! Each layout is written from the owner's back row to its front row, so the
//! last line lands on row 7 for Red and row 4 for Blue. Columns C, D, G and H
//! face the lakes.

#![allow(dead_code)]

use stratego_engine::{ArmyLayout, Change, Color, EngineConfig, GameModel, Position, State};

/// Spy on the front row, column E.
pub const SPY_E: &str = "\
D B B B B B B 2 2 2
2 2 2 2 2 3 3 3 3 3
4 4 4 4 5 5 5 5 6 6
6 6 7 7 1 7 8 8 9 10
";

/// Marshal on the front row, column E; spy on column J.
pub const MARSHAL_E: &str = "\
D B B B B B B 2 2 2
2 2 2 2 2 3 3 3 3 3
4 4 4 4 5 5 5 5 6 6
6 6 7 7 10 7 8 8 9 1
";

/// Scout on column A, miner on column B.
pub const SCOUT_MINER: &str = "\
D B B B B B 2 2 2 2
2 2 2 3 3 3 3 4 4 4
4 5 5 5 5 6 6 6 6 7
2 3 B 7 7 1 8 8 9 10
";

/// Bomb on column A.
pub const BOMB_A: &str = "\
D B B B B B 2 2 2 2
2 2 2 3 3 3 3 4 4 4
4 5 5 5 5 6 6 6 6 7
B 3 2 7 7 1 8 8 9 10
";

/// Bomb on column B, miner on column A.
pub const BOMB_B: &str = "\
D B B B B B 2 2 2 2
2 2 2 3 3 3 3 4 4 4
4 5 5 5 5 6 6 6 6 7
3 B 2 7 7 1 8 8 9 10
";

/// Flag on the front row, column A.
pub const FLAG_FRONT: &str = "\
B B B B B B 2 2 2 2
2 2 2 3 3 3 3 4 4 4
4 5 5 5 5 6 6 6 6 7
D 3 2 7 7 1 8 8 9 10
";

/// Valid composition, but every front-row piece is walled in.
pub const WALLED_IN: &str = "\
D 1 2 2 2 2 2 2 2 2
3 3 3 3 3 4 4 4 4 5
5 5 5 6 6 6 6 7 9 10
B B 7 7 B B 8 8 B B
";

/// Only the sergeant on column A can leave; everything behind it is
/// walled in by bombs, the lakes and its own pieces.
pub const BOXED_IN: &str = "\
D 1 2 2 2 2 2 2 2 2
3 3 3 3 3 4 4 4 5 5
B 5 5 6 6 6 6 7 9 10
4 B 7 7 B B 8 8 B B
";

/// Parses a `7F`-style coordinate.
pub fn pos(text: &str) -> Position {
    text.parse().expect("valid position")
}

/// Parses a layout constant.
pub fn layout(text: &str) -> ArmyLayout {
    text.parse().expect("valid layout")
}

/// A model with both armies loaded and players named, in `PlayerSwap`.
pub fn started_with(config: EngineConfig, red: &str, blue: &str) -> GameModel {
    let mut model = GameModel::new(config);
    model.init().expect("init");
    model.load_army(&layout(red), Color::Red).expect("load red");
    assert_eq!(model.current_state(), State::SetUp, "red army rejected");
    model.load_army(&layout(blue), Color::Blue).expect("load blue");
    assert_eq!(model.current_state(), State::SetUp, "blue army rejected");
    model.setup("Alice", "Bob").expect("setup");
    model
}

/// [`started_with`] using the default configuration.
pub fn started(red: &str, blue: &str) -> GameModel {
    started_with(EngineConfig::default(), red, blue)
}

/// Runs the action of the current player and the win check if it
/// succeeded. Returns the change of the action itself.
pub fn act(model: &mut GameModel, from: &str, to: &str) -> Change {
    let change = model
        .move_or_attack(pos(from), pos(to))
        .expect("action allowed");
    if model.current_state() == State::GameTurn {
        model.next_turn().expect("win check");
    }
    change
}

/// Hands the turn over, then [`act`]s.
pub fn play_turn(model: &mut GameModel, from: &str, to: &str) -> Change {
    model.next_player().expect("next player");
    act(model, from, to)
}
