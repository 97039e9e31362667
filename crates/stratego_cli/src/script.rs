//! Scripted matches.
//!
//! A script holds one action per line, `<from> <to>` in board coordinates
//! (`7A 6A`). Blank lines and lines starting with `#` are skipped. Each action
//! is played by whoever's turn it is; a refused action is acknowledged and
//! the same player reads the next line.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use stratego_engine::{
    ArmyLayout, Color, EngineConfig, GameModel, InfoKind, Outcome, Position, State,
};
use tracing::{debug, info, instrument, warn};

/// One parsed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    /// 1-based line in the script.
    pub line: usize,
    /// Square of the acting piece.
    pub from: Position,
    /// Target square.
    pub to: Position,
}

/// Parses a script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let [from, to] = tokens.as_slice() else {
            bail!("line {line}: expected `<from> <to>`, found {trimmed:?}");
        };
        let from = from
            .parse()
            .with_context(|| format!("line {line}: bad start square"))?;
        let to = to
            .parse()
            .with_context(|| format!("line {line}: bad target square"))?;
        steps.push(ScriptStep { line, from, to });
    }
    Ok(steps)
}

/// Summary of one side after the match.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    /// Army color.
    pub color: Color,
    /// Pseudonym.
    pub name: String,
    /// Live pieces left.
    pub remaining: usize,
    /// Enemy pieces killed.
    pub eaten: usize,
}

/// What a scripted match ended with.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// State the model was left in.
    pub state: State,
    /// Result, if the game ended.
    pub outcome: Option<Outcome>,
    /// Actions that went through.
    pub actions: usize,
    /// Actions refused by the rules.
    pub refused: usize,
    /// Script lines never played because the game was over.
    pub unplayed: usize,
    /// History entries lost because the history was full.
    pub dropped_entries: usize,
    /// Red then Blue.
    pub players: Vec<PlayerReport>,
    /// Success entries of the history, oldest first.
    pub log: Vec<String>,
}

impl MatchReport {
    fn collect(model: &GameModel, actions: usize, refused: usize, unplayed: usize) -> Self {
        let players = model
            .players()
            .map(|players| {
                players
                    .iter()
                    .map(|player| PlayerReport {
                        color: player.color(),
                        name: player.name().to_string(),
                        remaining: player.remaining(),
                        eaten: player.eaten(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            state: model.current_state(),
            outcome: model.outcome(),
            actions,
            refused,
            unplayed,
            dropped_entries: model.dropped_entries(),
            players,
            log: model
                .history()
                .entries(InfoKind::Success)
                .iter()
                .map(|entry| entry.to_string())
                .collect(),
        }
    }
}

/// Creates a model, loads both armies and names the players.
#[instrument(skip(config, red, blue))]
pub fn prepare(
    config: EngineConfig,
    red: &ArmyLayout,
    blue: &ArmyLayout,
    red_name: &str,
    blue_name: &str,
) -> Result<GameModel> {
    let mut model = GameModel::new(config);
    model.init()?;
    for (layout, color) in [(red, Color::Red), (blue, Color::Blue)] {
        model.load_army(layout, color)?;
        if model.current_state() == State::ErrorSetup {
            let reason = model.history().last_failure().unwrap_or("rejected");
            bail!("{color} army rejected: {reason}");
        }
    }
    model.setup(red_name, blue_name)?;
    Ok(model)
}

/// Plays `steps` on a model that was just set up.
#[instrument(skip_all, fields(steps = steps.len()))]
pub fn run_match(model: &mut GameModel, steps: &[ScriptStep]) -> Result<MatchReport> {
    let mut actions = 0;
    let mut refused = 0;

    for (index, step) in steps.iter().enumerate() {
        if matches!(model.current_state(), State::GameOver | State::EndOfGame) {
            let unplayed = steps.len() - index;
            info!(unplayed, "Game over before the end of the script");
            return Ok(MatchReport::collect(model, actions, refused, unplayed));
        }

        if model.current_state() == State::PlayerSwap {
            model.next_player()?;
        }

        let change = model
            .move_or_attack(step.from, step.to)
            .with_context(|| format!("line {}: {} {}", step.line, step.from, step.to))?;

        match change.state {
            State::ErrorAction => {
                refused += 1;
                warn!(line = step.line, from = %step.from, to = %step.to, "Action refused");
                model.acknowledge_error()?;
            }
            State::GameTurn => {
                actions += 1;
                debug!(line = step.line, "Action played");
                model.next_turn()?;
            }
            other => bail!(
                "line {}: unexpected state {other}, expecting one of {:?}",
                step.line,
                model.accepted_events()
            ),
        }
    }

    Ok(MatchReport::collect(model, actions, refused, 0))
}
