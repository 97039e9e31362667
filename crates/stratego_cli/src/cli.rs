//! Command-line interface for the stratego engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stratego_engine::Variant;

/// Stratego - rule engine driver
#[derive(Parser, Debug)]
#[command(name = "stratego")]
#[command(about = "Validate army layouts and replay scripted matches", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check army layout files
    Validate {
        /// Layout files (4 lines of 10 ranks)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the standard army layout
    Layout,

    /// List the ranks with their symbol, count and rules
    Ranks,

    /// Replay a scripted match
    Play {
        /// Red army layout (standard army if omitted)
        #[arg(long)]
        red: Option<PathBuf>,

        /// Blue army layout (standard army if omitted)
        #[arg(long)]
        blue: Option<PathBuf>,

        /// Script with one `<from> <to>` action per line, e.g. `7A 6A`
        #[arg(short, long)]
        script: PathBuf,

        /// Engine configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured rule variant (classic, reveal)
        #[arg(long)]
        variant: Option<Variant>,

        /// Red player's name
        #[arg(long, default_value = "")]
        red_name: String,

        /// Blue player's name
        #[arg(long, default_value = "")]
        blue_name: String,

        /// Print a JSON report instead of the history
        #[arg(long)]
        json: bool,
    },
}
