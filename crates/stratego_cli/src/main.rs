//! Stratego - command-line driver
//!
//! Validates army layouts and replays scripted matches against the engine.

#![warn(missing_docs)]

mod cli;
mod script;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use stratego_engine::{
    ArmyLayout, Color, EngineConfig, GameModel, InfoKind, Rank, State, Variant,
};
use strum::IntoEnumIterator;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { files } => run_validate(&files),
        Command::Layout => {
            print!("{}", ArmyLayout::standard());
            Ok(())
        }
        Command::Ranks => {
            for rank in Rank::iter() {
                println!(
                    "{:>2}  {:<10} x{}  {}",
                    rank.symbol(),
                    rank.to_string(),
                    rank.count(),
                    rank.profile().description
                );
            }
            Ok(())
        }
        Command::Play {
            red,
            blue,
            script,
            config,
            variant,
            red_name,
            blue_name,
            json,
        } => run_play(PlayArgs {
            red,
            blue,
            script,
            config,
            variant,
            red_name,
            blue_name,
            json,
        }),
    }
}

fn read_layout(path: &Path) -> Result<ArmyLayout> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    text.parse()
        .with_context(|| format!("Invalid layout in {}", path.display()))
}

/// Validate layouts: composition, then a legal first move.
#[instrument(skip_all, fields(count = files.len()))]
fn run_validate(files: &[PathBuf]) -> Result<()> {
    let mut invalid = 0;

    for path in files {
        let layout = match read_layout(path) {
            Ok(layout) => layout,
            Err(err) => {
                warn!(path = %path.display(), "Rejected");
                println!("{}: {err:#}", path.display());
                invalid += 1;
                continue;
            }
        };

        let mut model = GameModel::default();
        model.init()?;
        model.load_army(&layout, Color::Red)?;
        if model.current_state() == State::ErrorSetup {
            let reason = model.history().last_failure().unwrap_or("rejected");
            println!("{}: {reason}", path.display());
            invalid += 1;
        } else {
            println!("{}: ok", path.display());
        }
    }

    if invalid > 0 {
        bail!("{invalid} of {} layouts are invalid", files.len());
    }
    info!("All layouts valid");
    Ok(())
}

struct PlayArgs {
    red: Option<PathBuf>,
    blue: Option<PathBuf>,
    script: PathBuf,
    config: Option<PathBuf>,
    variant: Option<Variant>,
    red_name: String,
    blue_name: String,
    json: bool,
}

/// Loads everything `args` names and plays the script.
fn play_match(args: &PlayArgs) -> Result<(GameModel, script::MatchReport)> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(variant) = args.variant {
        config.set_variant(variant);
    }

    let red = match &args.red {
        Some(path) => read_layout(path)?,
        None => ArmyLayout::standard(),
    };
    let blue = match &args.blue {
        Some(path) => read_layout(path)?,
        None => ArmyLayout::standard(),
    };

    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read {}", args.script.display()))?;
    let steps = script::parse_script(&text)?;

    let mut model = script::prepare(config, &red, &blue, &args.red_name, &args.blue_name)?;
    let report = script::run_match(&mut model, &steps)?;
    Ok((model, report))
}

/// Replay a scripted match and print what happened.
#[instrument(skip_all, fields(script = %args.script.display()))]
fn run_play(args: PlayArgs) -> Result<()> {
    let (model, report) = play_match(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", model.history().render(InfoKind::Success));
    if report.refused > 0 {
        print!("{}", model.history().render(InfoKind::Failure));
    }
    if report.dropped_entries > 0 {
        warn!(dropped = report.dropped_entries, "History full");
        println!(
            "({} history entries were dropped, raise history_bound to keep them.)",
            report.dropped_entries
        );
    }
    match report.outcome {
        Some(outcome) => println!("{outcome}"),
        None => println!("No winner yet ({} actions played).", report.actions),
    }
    Ok(())
}
