//! The game model: the one entry point of the engine.
//!
//! Every command follows the same path: check the [`StateGraph`] accepts the
//! events the command may fire, run the rules, write the [`History`], feed
//! the state graph, notify observers. A command the current state does not
//! allow returns [`EngineError::Protocol`] and leaves the model untouched.

use tracing::{debug, info, instrument, warn};

use crate::army::{ArmyLayout, front_row};
use crate::board::Board;
use crate::config::{EngineConfig, Variant};
use crate::error::{EngineError, ProtocolError};
use crate::event::{Change, GameEvent, ModelObserver};
use crate::geometry::Position;
use crate::history::{History, InfoKind};
use crate::invariants::{InvariantSet, InvariantViolation, ModelInvariants};
use crate::piece::{Color, Piece, PieceId};
use crate::player::Player;
use crate::rank::Rank;
use crate::rules::{self, CombatOutcome, EndReason, Outcome, Standing};
use crate::state_graph::{self, Event, State, StateGraph};

const RULES_HINT: &str = "Pieces move one square up, down, left or right. Scouts travel \
    along clear lines. Bombs and flags never move. A piece cannot shuttle between two \
    squares forever.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Move,
    Attack,
}

/// A match of Stratego.
pub struct GameModel {
    config: EngineConfig,
    board: Board,
    history: History,
    graph: StateGraph,
    players: Option<[Player; 2]>,
    turn: Option<Color>,
    graveyard: Vec<PieceId>,
    outcome: Option<Outcome>,
    dropped: usize,
    observers: Vec<Box<dyn ModelObserver>>,
}

impl std::fmt::Debug for GameModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameModel")
            .field("variant", self.config.variant())
            .field("state", &self.graph.state())
            .field("turn", &self.turn)
            .field("graveyard", &self.graveyard.len())
            .field("history", &self.history.len())
            .field("dropped", &self.dropped)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for GameModel {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GameModel {
    /// Creates a model in [`State::NotStarted`].
    #[instrument(skip(config), fields(variant = %config.variant()))]
    pub fn new(config: EngineConfig) -> Self {
        let history = History::new(*config.history_bound());
        Self {
            config,
            board: Board::new(),
            history,
            graph: StateGraph::new(),
            players: None,
            turn: None,
            graveyard: Vec::new(),
            outcome: None,
            dropped: 0,
            observers: Vec::new(),
        }
    }

    /// Default configuration with the given rule variant.
    pub fn with_variant(variant: Variant) -> Self {
        Self::new(EngineConfig::with_variant(variant))
    }

    /// Registers an observer notified after every command.
    pub fn add_observer(&mut self, observer: Box<dyn ModelObserver>) {
        self.observers.push(observer);
    }

    // ─────────────────────────────────────────────────────────────
    //  Command plumbing
    // ─────────────────────────────────────────────────────────────

    fn require(&self, operation: &'static str, events: &[Event]) -> Result<(), ProtocolError> {
        if events.iter().all(|event| self.graph.can_consume(*event)) {
            Ok(())
        } else {
            let state = self.graph.state();
            let err = ProtocolError { operation, state };
            warn!(%err, accepted = ?state_graph::accepted_events(state), "Protocol violation");
            Err(err)
        }
    }

    fn log(&mut self, kind: InfoKind, text: impl Into<String>) {
        if let Err(err) = self.history.add(kind, text) {
            self.dropped += 1;
            warn!(%err, %kind, dropped = self.dropped, "History entry dropped");
        }
    }

    fn emit(&mut self, event: Event, events: Vec<GameEvent>) -> Change {
        self.graph.consume(event);
        let change = Change {
            state: self.graph.state(),
            events,
        };

        #[cfg(debug_assertions)]
        self.assert_invariants();

        for observer in &mut self.observers {
            observer.on_change(&change);
        }
        change
    }

    /// Feeds the players and applies the counter resets they ask for.
    fn dispatch(&mut self, events: &[GameEvent]) {
        let Some(players) = self.players.as_mut() else {
            return;
        };

        let mut resets = Vec::new();
        for event in events {
            for player in players.iter_mut() {
                resets.extend(player.observe(event));
            }
        }

        for id in resets {
            if let Some(piece) = self.board.piece_mut(id) {
                debug!(piece = %piece.label(), "Back-and-forth counter reset");
                piece.reset_counter();
            }
        }
    }

    fn limit(&self) -> u32 {
        *self.config.back_and_forth_limit()
    }

    // ─────────────────────────────────────────────────────────────
    //  Setup
    // ─────────────────────────────────────────────────────────────

    /// Resets board, history, players and turn, then enters [`State::SetUp`].
    #[instrument(skip(self))]
    pub fn init(&mut self) -> Result<Change, EngineError> {
        self.require("init", &[Event::Init])?;

        self.board.clear();
        self.history.clear();
        self.graveyard.clear();
        self.players = None;
        self.turn = None;
        self.outcome = None;
        self.dropped = 0;

        info!("Session initialized");
        Ok(self.emit(Event::Init, vec![GameEvent::Initialized]))
    }

    /// Places `layout` for `color`, replacing that color's previous army.
    ///
    /// A layout whose front row cannot make a single legal action is taken
    /// off the board again and the model enters [`State::ErrorSetup`].
    #[instrument(skip(self, layout))]
    pub fn load_army(&mut self, layout: &ArmyLayout, color: Color) -> Result<Change, EngineError> {
        self.require("load_army", &[Event::Load, Event::FailedLoad])?;

        self.board.discard_color(color);
        for (rank, pos) in layout.placements(color) {
            if let Err(err) = self.board.place(rank, color, pos) {
                self.board.discard_color(color);
                return Err(err.into());
            }
        }

        if self.can_start_without_any_legal_move(color) {
            self.board.discard_color(color);
            warn!(%color, "Army has no legal first move");
            self.log(
                InfoKind::Failure,
                format!("The {color} army is valid but no piece of its front row can move."),
            );
            self.log(
                InfoKind::Hint,
                "Put movable pieces on the front row, next to a free square.",
            );
            return Ok(self.emit(Event::FailedLoad, vec![GameEvent::ArmyRejected { color }]));
        }

        info!(%color, "Army loaded");
        self.log(InfoKind::Success, format!("The {color} army was loaded."));
        Ok(self.emit(Event::Load, vec![GameEvent::ArmyLoaded { color }]))
    }

    /// Parses an army from its text form, then loads it.
    ///
    /// Malformed text is a rejected layout, not an error.
    #[instrument(skip(self, text))]
    pub fn load_army_str(&mut self, text: &str, color: Color) -> Result<Change, EngineError> {
        self.require("load_army", &[Event::Load, Event::FailedLoad])?;

        match text.parse::<ArmyLayout>() {
            Ok(layout) => self.load_army(&layout, color),
            Err(err) => {
                warn!(%color, %err, "Malformed army");
                self.log(
                    InfoKind::Failure,
                    format!("The {color} army is malformed: {err}."),
                );
                self.log(
                    InfoKind::Hint,
                    "An army is 4 lines of 10 ranks (1-10, D for the flag, B for bombs).",
                );
                Ok(self.emit(Event::FailedLoad, vec![GameEvent::ArmyRejected { color }]))
            }
        }
    }

    /// Names the players and closes the setup.
    ///
    /// Blank names fall back to the configured pseudonyms.
    #[instrument(skip(self))]
    pub fn setup(&mut self, red_name: &str, blue_name: &str) -> Result<Change, EngineError> {
        self.require("setup", &[Event::Set])?;

        let red = self.make_player(Color::Red, red_name);
        let blue = self.make_player(Color::Blue, blue_name);
        info!(red = red.name(), blue = blue.name(), "Game set up");
        self.players = Some([red, blue]);

        self.log(InfoKind::Success, "Game set up. Have fun!");
        Ok(self.emit(Event::Set, vec![GameEvent::GameSetUp]))
    }

    fn make_player(&self, color: Color, name: &str) -> Player {
        let name = match (name.trim(), color) {
            ("", Color::Red) => self.config.red_name().as_str(),
            ("", Color::Blue) => self.config.blue_name().as_str(),
            (given, _) => given,
        };
        Player::with_army(color, name, self.board.pieces_of(color).map(Piece::rank))
    }

    // ─────────────────────────────────────────────────────────────
    //  Turn protocol
    // ─────────────────────────────────────────────────────────────

    /// Hands the turn over (Red first) and updates which pieces are shown.
    #[instrument(skip(self))]
    pub fn next_player(&mut self) -> Result<Change, EngineError> {
        self.require("next_player", &[Event::Next])?;

        let color = self.turn.map_or(Color::Red, Color::opponent);
        self.turn = Some(color);
        self.refresh_visibility(color);

        debug!(%color, "Turn handed over");
        Ok(self.emit(Event::Next, vec![GameEvent::TurnStarted { color }]))
    }

    fn refresh_visibility(&mut self, current: Color) {
        let keep_fought = *self.config.variant() == Variant::Reveal;
        for id in self.board.piece_ids() {
            if let Some(piece) = self.board.piece_mut(id) {
                let visible = piece.color() == current || (keep_fought && piece.has_been_in_combat());
                piece.set_revealed(visible);
            }
        }
    }

    /// Moves the piece on `from` to the empty square `to`.
    #[instrument(skip(self))]
    pub fn move_piece(&mut self, from: Position, to: Position) -> Result<Change, EngineError> {
        self.act("move", from, to, Some(Action::Move))
    }

    /// Attacks the enemy on `to` with the piece on `from`.
    #[instrument(skip(self))]
    pub fn attack(&mut self, from: Position, to: Position) -> Result<Change, EngineError> {
        self.act("attack", from, to, Some(Action::Attack))
    }

    /// Attacks when `to` is occupied, moves otherwise.
    #[instrument(skip(self))]
    pub fn move_or_attack(&mut self, from: Position, to: Position) -> Result<Change, EngineError> {
        self.act("move_or_attack", from, to, None)
    }

    fn act(
        &mut self,
        operation: &'static str,
        from: Position,
        to: Position,
        action: Option<Action>,
    ) -> Result<Change, EngineError> {
        self.require(operation, &[Event::Act, Event::FailedAct])?;
        let color = self.turn.ok_or(ProtocolError {
            operation,
            state: self.graph.state(),
        })?;

        let Some(piece) = self.board.piece_at(from)?.cloned() else {
            return Ok(self.refuse(
                color,
                from,
                to,
                format!("No piece stands on {from}."),
                "The selected square is empty.".to_string(),
            ));
        };
        if piece.color() != color {
            return Ok(self.refuse(
                color,
                from,
                to,
                format!("The piece on {from} does not belong to you."),
                format!("Select a {color} piece."),
            ));
        }

        let action = match action {
            Some(action) => action,
            None if self.board.piece_id_at(to)?.is_some() => Action::Attack,
            None => Action::Move,
        };

        let limit = self.limit();
        match action {
            Action::Move if rules::can_move(&self.board, &piece, to, limit) => {
                self.perform_move(&piece, to)
            }
            Action::Attack if rules::can_attack(&self.board, &piece, to, limit) => {
                self.perform_attack(&piece, to)
            }
            Action::Move => Ok(self.refuse_action(&piece, to, "Invalid move.")),
            Action::Attack => Ok(self.refuse_action(&piece, to, "Invalid attack.")),
        }
    }

    fn refuse(
        &mut self,
        color: Color,
        from: Position,
        to: Position,
        failure: String,
        hint: String,
    ) -> Change {
        warn!(%color, %from, %to, %failure, "Action refused");
        self.log(InfoKind::Failure, failure);
        self.log(InfoKind::Hint, hint);
        self.emit(
            Event::FailedAct,
            vec![GameEvent::ActionRefused { color, from, to }],
        )
    }

    fn refuse_action(&mut self, piece: &Piece, to: Position, failure: &str) -> Change {
        self.refuse(
            piece.color(),
            piece.position(),
            to,
            format!("{failure} The {} cannot reach {to}.", piece.label()),
            RULES_HINT.to_string(),
        )
    }

    fn perform_move(&mut self, piece: &Piece, to: Position) -> Result<Change, EngineError> {
        let (id, color, rank, from) = (piece.id(), piece.color(), piece.rank(), piece.position());

        if let Some(actor) = self.board.piece_mut(id) {
            actor.guard_mut().record(from, to);
        }
        self.board.relocate(id, to)?;

        debug!(%color, %rank, %from, %to, "Piece moved");
        self.log(
            InfoKind::Success,
            format!("{color} {rank} moved from {from} to {to}."),
        );

        let events = vec![GameEvent::PieceMoved {
            piece: id,
            color,
            rank,
            from,
            to,
        }];
        self.dispatch(&events);
        Ok(self.emit(Event::Act, events))
    }

    fn perform_attack(&mut self, attacker: &Piece, to: Position) -> Result<Change, EngineError> {
        let Some(defender) = self.board.piece_at(to)?.cloned() else {
            return Ok(self.refuse_action(attacker, to, "Invalid attack."));
        };
        let (id, color, rank, from) = (
            attacker.id(),
            attacker.color(),
            attacker.rank(),
            attacker.position(),
        );
        let outcome = CombatOutcome::resolve(rank, defender.rank());

        if let Some(actor) = self.board.piece_mut(id) {
            actor.guard_mut().record(from, to);
            actor.mark_in_combat();
        }
        if let Some(target) = self.board.piece_mut(defender.id()) {
            target.mark_in_combat();
        }

        let mut dead = Vec::new();
        if !outcome.defender_survives() {
            self.board.vacate(to)?;
            dead.push(defender.id());
        }
        if outcome.attacker_survives() {
            self.board.relocate(id, to)?;
        } else {
            self.board.vacate(from)?;
            dead.push(id);
        }

        let verdict = match outcome {
            CombatOutcome::AttackerWins => format!("The {color} {rank} won the fight."),
            CombatOutcome::DefenderWins => format!(
                "The {} {} won the fight.",
                defender.color(),
                defender.rank()
            ),
            CombatOutcome::BothDie => "Both pieces of equal rank died.".to_string(),
        };
        info!(%color, %rank, defender = %defender.rank(), %outcome, "Combat");
        self.log(
            InfoKind::Success,
            format!(
                "{color} {rank} on {from} attacked {} {} on {to}. {verdict}",
                defender.color(),
                defender.rank()
            ),
        );

        let mut events = vec![GameEvent::CombatResolved {
            attacker: id,
            attacker_color: color,
            attacker_rank: rank,
            defender: defender.id(),
            defender_rank: defender.rank(),
            from,
            at: to,
            outcome,
        }];
        for dead_id in dead {
            if let Some(piece) = self.board.piece_mut(dead_id) {
                piece.kill();
                events.push(GameEvent::PieceDied {
                    piece: dead_id,
                    color: piece.color(),
                    rank: piece.rank(),
                });
            }
            self.graveyard.push(dead_id);
        }

        self.dispatch(&events);
        Ok(self.emit(Event::Act, events))
    }

    /// Runs the win check after an action.
    ///
    /// Ends the game ([`State::GameOver`]) or hands back to
    /// [`State::PlayerSwap`].
    #[instrument(skip(self))]
    pub fn next_turn(&mut self) -> Result<Change, EngineError> {
        self.require("next_turn", &[Event::Check, Event::FailedCheck])?;
        let [red, blue] = self.standings("next_turn")?;

        let Some(outcome) = rules::decide(red, blue) else {
            return Ok(self.emit(Event::FailedCheck, Vec::new()));
        };

        info!(%outcome, "Game over");
        let text = self.outcome_text(&outcome);
        self.log(InfoKind::Success, text);
        self.outcome = Some(outcome);
        Ok(self.emit(Event::Check, vec![GameEvent::GameEnded { outcome }]))
    }

    fn standings(&self, operation: &'static str) -> Result<[Standing; 2], ProtocolError> {
        let players = self.players.as_ref().ok_or(ProtocolError {
            operation,
            state: self.graph.state(),
        })?;
        let limit = self.limit();
        Ok(players.each_ref().map(|player| {
            Standing::new(
                player.color(),
                player.loss_reason(),
                rules::player_can_act(&self.board, player.color(), limit),
            )
        }))
    }

    fn outcome_text(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Winner { color, reason } => {
                let name = self
                    .players
                    .as_ref()
                    .map_or_else(|| color.to_string(), |players| players[color.index()].name().to_string());
                match reason {
                    EndReason::OpponentStuck => {
                        format!("{name} won because the opponent cannot move anymore.")
                    }
                    _ => format!("{name} won ({reason})."),
                }
            }
            Outcome::Draw {
                reason: EndReason::BothStuck,
            } => "Both players won because neither can move anymore.".to_string(),
            Outcome::Draw { .. } => "Both players won.".to_string(),
        }
    }

    /// Abandons the match from [`State::PlayerTurn`].
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> Result<Change, EngineError> {
        self.require("stop", &[Event::Stop])?;
        info!("Game stopped");
        self.log(InfoKind::Success, "Game over. See you soon!");
        Ok(self.emit(Event::Stop, vec![GameEvent::Finished]))
    }

    /// Leaves [`State::ErrorSetup`] or [`State::ErrorAction`].
    #[instrument(skip(self))]
    pub fn acknowledge_error(&mut self) -> Result<Change, EngineError> {
        self.require("acknowledge_error", &[Event::ErrorAcknowledged])?;
        Ok(self.emit(Event::ErrorAcknowledged, vec![GameEvent::ErrorAcknowledged]))
    }

    /// After a finished game: back to [`State::NotStarted`] for a rematch,
    /// or to [`State::EndOfGame`].
    #[instrument(skip(self))]
    pub fn replay(&mut self, rematch: bool) -> Result<Change, EngineError> {
        self.require("replay", &[Event::Rewind, Event::End])?;
        if rematch {
            info!("Rematch requested");
            Ok(self.emit(Event::Rewind, vec![GameEvent::Rewound]))
        } else {
            self.log(InfoKind::Success, "End of the game!");
            Ok(self.emit(Event::End, vec![GameEvent::Finished]))
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Current state of the protocol.
    pub fn current_state(&self) -> State {
        self.graph.state()
    }

    /// Whether the current state accepts `event`.
    pub fn can_consume(&self, event: Event) -> bool {
        self.graph.can_consume(event)
    }

    /// Events the current state accepts.
    pub fn accepted_events(&self) -> Vec<Event> {
        state_graph::accepted_events(self.graph.state())
    }

    /// Player whose turn it is.
    pub fn current_player(&self) -> Result<&Player, EngineError> {
        let not_yet = || ProtocolError {
            operation: "current_player",
            state: self.graph.state(),
        };
        let players = self.players.as_ref().ok_or_else(not_yet)?;
        let color = self.turn.ok_or_else(not_yet)?;
        Ok(&players[color.index()])
    }

    /// Both players, Red first. Available once the game is set up.
    pub fn players(&self) -> Result<&[Player; 2], EngineError> {
        self.players.as_ref().ok_or_else(|| {
            ProtocolError {
                operation: "players",
                state: self.graph.state(),
            }
            .into()
        })
    }

    /// Player of `color`.
    pub fn player(&self, color: Color) -> Result<&Player, EngineError> {
        Ok(&self.players()?[color.index()])
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The history log.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Entries refused by the full history since the last [`init`](Self::init).
    pub fn dropped_entries(&self) -> usize {
        self.dropped
    }

    /// Dead pieces, in order of death.
    pub fn removed_pieces(&self) -> &[PieceId] {
        &self.graveyard
    }

    /// Dead pieces, resolved.
    pub fn graveyard(&self) -> impl Iterator<Item = &Piece> {
        self.graveyard.iter().filter_map(|id| self.board.piece(*id))
    }

    /// Result of the finished game.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whether piece `id` is alive and has a legal move or attack.
    pub fn piece_can_act(&self, id: PieceId) -> bool {
        self.board
            .piece(id)
            .is_some_and(|piece| piece.alive() && rules::can_act(&self.board, piece, self.limit()))
    }

    /// Whether any piece of `color` has a legal move or attack.
    pub fn player_can_act(&self, color: Color) -> bool {
        rules::player_can_act(&self.board, color, self.limit())
    }

    /// True when no piece of `color`'s front row has a legal first action.
    pub fn can_start_without_any_legal_move(&self, color: Color) -> bool {
        let row = front_row(color);
        let limit = self.limit();
        !self
            .board
            .pieces_of(color)
            .filter(|piece| piece.position().y == row)
            .any(|piece| rules::can_act(&self.board, piece, limit))
    }

    /// The standard army of `color`, in rank order, with its squares.
    pub fn default_army(color: Color) -> Vec<(Rank, Position)> {
        ArmyLayout::standard().placements(color)
    }

    /// Checks every structural invariant of the model.
    pub fn check_invariants(&self) -> Result<(), Vec<InvariantViolation>> {
        ModelInvariants::check_all(self)
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        let result = self.check_invariants();
        debug_assert!(result.is_ok(), "Invariant violated: {result:?}");
    }
}
