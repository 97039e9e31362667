//! Finite state machine gating every command of the game model.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use strum::EnumIter;
use tracing::{debug, error, instrument};

/// Phase of a match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, strum::Display,
)]
pub enum State {
    /// Nothing initialised yet.
    NotStarted,
    /// Armies are being loaded.
    SetUp,
    /// A layout was rejected and must be acknowledged.
    ErrorSetup,
    /// The current player may act.
    PlayerTurn,
    /// Waiting for the turn to be handed over.
    PlayerSwap,
    /// An action happened; the win check is due.
    GameTurn,
    /// An action was rejected and must be acknowledged.
    ErrorAction,
    /// Someone won (or both did).
    GameOver,
    /// The session is over.
    EndOfGame,
    /// Trap state entered on protocol violation.
    Error,
}

/// Input of the state machine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, strum::Display,
)]
pub enum Event {
    /// Start a fresh session.
    Init,
    /// An army was loaded.
    Load,
    /// Both armies are in place and the players are named.
    Set,
    /// An army was rejected.
    FailedLoad,
    /// A move or attack succeeded.
    Act,
    /// A move or attack was refused.
    FailedAct,
    /// The win check found a result.
    Check,
    /// The win check found none.
    FailedCheck,
    /// Hand the turn to the next player.
    Next,
    /// The user saw the last error.
    ErrorAcknowledged,
    /// Play again.
    Rewind,
    /// Leave after a finished game.
    End,
    /// Abort the match.
    Stop,
}

type TransitionTable = HashMap<State, HashMap<Event, State>>;

static TRANSITIONS: LazyLock<TransitionTable> = LazyLock::new(|| {
    use Event::*;
    use State::*;

    let rows: [(State, &[(Event, State)]); 10] = [
        (NotStarted, &[(Init, SetUp)]),
        (
            SetUp,
            &[(Load, SetUp), (Set, PlayerSwap), (FailedLoad, ErrorSetup)],
        ),
        (ErrorSetup, &[(ErrorAcknowledged, SetUp)]),
        (
            PlayerTurn,
            &[(Act, GameTurn), (FailedAct, ErrorAction), (Stop, EndOfGame)],
        ),
        (GameTurn, &[(Check, GameOver), (FailedCheck, PlayerSwap)]),
        (PlayerSwap, &[(Next, PlayerTurn)]),
        (ErrorAction, &[(ErrorAcknowledged, PlayerTurn)]),
        (GameOver, &[(Rewind, NotStarted), (End, EndOfGame)]),
        (EndOfGame, &[]),
        (Error, &[]),
    ];

    rows.into_iter()
        .map(|(state, edges)| (state, edges.iter().copied().collect()))
        .collect()
});

/// Target of `event` from `state`, if the table allows it.
pub fn transition(state: State, event: Event) -> Option<State> {
    TRANSITIONS
        .get(&state)
        .and_then(|edges| edges.get(&event))
        .copied()
}

/// Events accepted in `state`.
pub fn accepted_events(state: State) -> Vec<Event> {
    let mut events: Vec<Event> = TRANSITIONS
        .get(&state)
        .map(|edges| edges.keys().copied().collect())
        .unwrap_or_default();
    events.sort_by_key(|event| *event as u8);
    events
}

/// The state machine of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateGraph {
    current: State,
}

impl StateGraph {
    /// Starts in [`State::NotStarted`].
    pub fn new() -> Self {
        Self {
            current: State::NotStarted,
        }
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.current
    }

    /// Whether `event` is allowed right now.
    pub fn can_consume(&self, event: Event) -> bool {
        transition(self.current, event).is_some()
    }

    /// Feeds `event`. An event the current state does not accept traps the
    /// machine in [`State::Error`].
    #[instrument(skip(self), fields(from = %self.current))]
    pub fn consume(&mut self, event: Event) -> State {
        match transition(self.current, event) {
            Some(next) => {
                debug!(%event, to = %next, "Transition");
                self.current = next;
            }
            None => {
                error!(%event, state = %self.current, "Event not allowed, entering Error");
                self.current = State::Error;
            }
        }
        self.current
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: State) {
        self.current = state;
    }
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_not_started_only_accepts_init() {
        for event in Event::iter() {
            let mut graph = StateGraph::new();
            let reached = graph.consume(event);
            if event == Event::Init {
                assert_eq!(reached, State::SetUp);
            } else {
                assert_eq!(reached, State::Error, "{event} should trap");
            }
        }
    }

    #[test]
    fn test_full_cycle() {
        let mut graph = StateGraph::new();
        for (event, expected) in [
            (Event::Init, State::SetUp),
            (Event::Load, State::SetUp),
            (Event::Set, State::PlayerSwap),
            (Event::Next, State::PlayerTurn),
            (Event::Act, State::GameTurn),
            (Event::Check, State::GameOver),
            (Event::Rewind, State::NotStarted),
        ] {
            assert!(graph.can_consume(event));
            assert_eq!(graph.consume(event), expected);
        }
    }

    #[test]
    fn test_error_states_need_acknowledgement() {
        let mut graph = StateGraph::new();
        graph.set_state(State::ErrorAction);
        assert!(!graph.can_consume(Event::Act));
        assert_eq!(graph.consume(Event::ErrorAcknowledged), State::PlayerTurn);

        graph.set_state(State::ErrorSetup);
        assert_eq!(graph.consume(Event::ErrorAcknowledged), State::SetUp);
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for state in [State::EndOfGame, State::Error] {
            assert!(accepted_events(state).is_empty());
            for event in Event::iter() {
                assert!(transition(state, event).is_none());
            }
        }
    }

    #[test]
    fn test_accepted_events_order() {
        assert_eq!(
            accepted_events(State::PlayerTurn),
            vec![Event::Act, Event::FailedAct, Event::Stop]
        );
        assert_eq!(
            accepted_events(State::GameOver),
            vec![Event::Rewind, Event::End]
        );
    }
}
