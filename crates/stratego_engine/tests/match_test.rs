//! End-to-end matches: combat, casualties and the end of the game.

mod common;

use common::{
    BOMB_A, BOMB_B, BOXED_IN, FLAG_FRONT, MARSHAL_E, SCOUT_MINER, SPY_E, play_turn, pos, started,
};
use stratego_engine::{
    Color, CombatOutcome, EndReason, GameEvent, Outcome, Rank, State,
};

#[test]
fn test_marshal_takes_spy() {
    let mut model = started(SPY_E, MARSHAL_E);

    play_turn(&mut model, "7E", "6E");
    play_turn(&mut model, "4E", "5E");
    play_turn(&mut model, "7A", "6A");

    model.next_player().expect("blue's turn");
    let change = model
        .move_or_attack(pos("5E"), pos("6E"))
        .expect("marshal attacks");
    assert_eq!(change.state, State::GameTurn);

    assert!(change.events.iter().any(|event| matches!(
        event,
        GameEvent::CombatResolved {
            attacker_rank: Rank::Marshal,
            defender_rank: Rank::Spy,
            outcome: CombatOutcome::AttackerWins,
            ..
        }
    )));
    assert!(change.events.iter().any(|event| matches!(
        event,
        GameEvent::PieceDied {
            color: Color::Red,
            rank: Rank::Spy,
            ..
        }
    )));
    assert_eq!(change.casualties().count(), 1);

    let winner = model
        .board()
        .piece_at(pos("6E"))
        .expect("inside")
        .expect("marshal moved in");
    assert_eq!(winner.rank(), Rank::Marshal);
    assert_eq!(winner.color(), Color::Blue);
    assert!(winner.has_been_in_combat());
    assert!(model.board().piece_at(pos("5E")).expect("inside").is_none());

    let graveyard: Vec<_> = model.graveyard().collect();
    assert_eq!(graveyard.len(), 1);
    assert_eq!(graveyard[0].rank(), Rank::Spy);
    assert!(!graveyard[0].alive());

    let red = model.player(Color::Red).expect("red");
    assert_eq!(red.remaining(), 39);
    assert!(!red.has_piece(Rank::Spy));
    let blue = model.player(Color::Blue).expect("blue");
    assert_eq!(blue.eaten(), 1);
    assert_eq!(blue.eaten_of(Rank::Spy), 1);

    assert_eq!(model.next_turn().expect("check").state, State::PlayerSwap);
    assert!(model.outcome().is_none());
    assert!(model.check_invariants().is_ok());
}

#[test]
fn test_spy_takes_marshal_when_attacking() {
    let mut model = started(SPY_E, MARSHAL_E);

    play_turn(&mut model, "7E", "6E");
    play_turn(&mut model, "4E", "5E");
    let change = play_turn(&mut model, "6E", "5E");

    assert!(change.events.iter().any(|event| matches!(
        event,
        GameEvent::CombatResolved {
            outcome: CombatOutcome::AttackerWins,
            ..
        }
    )));
    let spy = model
        .board()
        .piece_at(pos("5E"))
        .expect("inside")
        .expect("spy moved in");
    assert_eq!(spy.rank(), Rank::Spy);
    assert!(!model.player(Color::Blue).expect("blue").has_piece(Rank::Marshal));
}

#[test]
fn test_equal_ranks_both_die() {
    let mut model = started(SPY_E, SPY_E);

    play_turn(&mut model, "7E", "6E");
    play_turn(&mut model, "4E", "5E");
    let change = play_turn(&mut model, "6E", "5E");

    assert_eq!(change.casualties().count(), 2);
    assert!(model.board().piece_at(pos("6E")).expect("inside").is_none());
    assert!(model.board().piece_at(pos("5E")).expect("inside").is_none());
    assert_eq!(model.removed_pieces().len(), 2);
    assert_eq!(model.player(Color::Red).expect("red").remaining(), 39);
    assert_eq!(model.player(Color::Blue).expect("blue").remaining(), 39);
    assert_eq!(
        model.history().last_success().expect("combat logged"),
        "Red Spy on 6E attacked Blue Spy on 5E. Both pieces of equal rank died."
    );
}

#[test]
fn test_scout_dies_on_bomb_from_afar() {
    let mut model = started(SCOUT_MINER, BOMB_A);

    let change = play_turn(&mut model, "7A", "4A");
    assert!(change.events.iter().any(|event| matches!(
        event,
        GameEvent::CombatResolved {
            attacker_rank: Rank::Scout,
            defender_rank: Rank::Bomb,
            outcome: CombatOutcome::DefenderWins,
            ..
        }
    )));

    assert!(model.board().piece_at(pos("7A")).expect("inside").is_none());
    let bomb = model
        .board()
        .piece_at(pos("4A"))
        .expect("inside")
        .expect("bomb stays");
    assert_eq!(bomb.rank(), Rank::Bomb);
    assert!(bomb.has_been_in_combat());
    assert_eq!(model.player(Color::Blue).expect("blue").eaten(), 1);
}

#[test]
fn test_miner_defuses_bomb() {
    let mut model = started(SCOUT_MINER, BOMB_B);

    play_turn(&mut model, "7B", "6B");
    play_turn(&mut model, "4J", "5J");
    play_turn(&mut model, "6B", "5B");
    play_turn(&mut model, "5J", "4J");
    let change = play_turn(&mut model, "5B", "4B");

    assert!(change.events.iter().any(|event| matches!(
        event,
        GameEvent::PieceDied {
            color: Color::Blue,
            rank: Rank::Bomb,
            ..
        }
    )));
    let miner = model
        .board()
        .piece_at(pos("4B"))
        .expect("inside")
        .expect("miner moved in");
    assert_eq!(miner.rank(), Rank::Miner);
    assert_eq!(model.player(Color::Blue).expect("blue").remaining_of(Rank::Bomb), 5);
}

#[test]
fn test_capturing_the_flag_ends_the_game() {
    let mut model = started(SCOUT_MINER, FLAG_FRONT);

    model.next_player().expect("red's turn");
    model
        .move_or_attack(pos("7A"), pos("4A"))
        .expect("scout charges");
    let change = model.next_turn().expect("check");

    let outcome = Outcome::Winner {
        color: Color::Red,
        reason: EndReason::FlagCaptured,
    };
    assert_eq!(change.state, State::GameOver);
    assert_eq!(change.events, vec![GameEvent::GameEnded { outcome }]);
    assert_eq!(model.outcome(), Some(outcome));
    assert_eq!(
        model.history().last_success().expect("logged"),
        "Alice won (flag captured)."
    );
    assert!(model.player(Color::Blue).expect("blue").has_lost());
}

#[test]
fn test_opponent_without_any_move_loses() {
    let mut model = started(MARSHAL_E, BOXED_IN);

    play_turn(&mut model, "7A", "6A");
    play_turn(&mut model, "4A", "5A");
    assert_eq!(model.current_state(), State::PlayerSwap);

    // The red captain takes the only blue piece that could still move.
    model.next_player().expect("red's turn");
    model
        .move_or_attack(pos("6A"), pos("5A"))
        .expect("captain attacks");
    assert!(model.player_can_act(Color::Red));
    assert!(!model.player_can_act(Color::Blue));
    assert!(!model.player(Color::Blue).expect("blue").has_lost());

    let change = model.next_turn().expect("check");
    let outcome = Outcome::Winner {
        color: Color::Red,
        reason: EndReason::OpponentStuck,
    };
    assert_eq!(change.state, State::GameOver);
    assert_eq!(change.events, vec![GameEvent::GameEnded { outcome }]);
    assert_eq!(model.outcome(), Some(outcome));
    assert_eq!(
        model.history().last_success().expect("logged"),
        "Alice won because the opponent cannot move anymore."
    );
}

#[test]
fn test_rematch_after_game_over() {
    let mut model = started(SCOUT_MINER, FLAG_FRONT);
    play_turn(&mut model, "7A", "4A");
    assert_eq!(model.current_state(), State::GameOver);

    assert_eq!(model.replay(true).expect("rematch").state, State::NotStarted);
    model.init().expect("init");
    assert_eq!(model.board().pieces().count(), 0);
    assert!(model.history().is_empty());
    assert!(model.outcome().is_none());
    assert!(model.removed_pieces().is_empty());
    assert!(model.players().is_err());
}

#[test]
fn test_leaving_after_game_over() {
    let mut model = started(SCOUT_MINER, FLAG_FRONT);
    play_turn(&mut model, "7A", "4A");

    assert_eq!(model.replay(false).expect("leave").state, State::EndOfGame);
    assert_eq!(
        model.history().last_success().expect("logged"),
        "End of the game!"
    );
    assert!(model.replay(true).is_err());
}
