//! Chronoscape - Discovery progression engine
//!
//! CLI entry point.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use chronoscape::cli::answer::{AnswerCommand, AnswerOptions};
use chronoscape::cli::hover::{HoverCommand, HoverOptions};
use chronoscape::cli::ink::{InkCommand, InkOptions};
use chronoscape::cli::lens_cmd::{LensCommand, LensOptions};
use chronoscape::cli::reset::{ResetCommand, ResetOptions};
use chronoscape::cli::reveal::{RevealCommand, RevealOptions};
use chronoscape::cli::riddle_cmd::{RiddleCommand, RiddleOptions};
use chronoscape::cli::status::{StatusCommand, StatusOptions};
use chronoscape::config::{progress_path, SceneConfig};
use chronoscape::core::LensKind;
use chronoscape::error::exit_codes;
use chronoscape::storage::FileStateStore;

// =============================================================================
// CLI Definition
// =============================================================================

/// Chronoscape - Discovery progression engine
#[derive(Parser)]
#[command(name = "chronoscape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, short, global = true)]
    json: bool,

    /// Suppress output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the session snapshot
    Status,

    /// Hover over an ordered zone
    Hover {
        /// The zone to hover
        zone_id: String,
    },

    /// Hover over an ink zone
    Ink {
        /// The ink zone to hover
        zone_id: String,
    },

    /// Rest the pointer over a lens zone
    Reveal {
        /// The lens zone
        zone_id: String,
        /// Treat the pointer as outside the zone
        #[arg(long)]
        outside: bool,
    },

    /// Switch the equipped lens
    Lens {
        /// The lens to equip (default, uv)
        lens: String,
    },

    /// Submit an answer to a riddle
    Riddle {
        /// The riddle to answer
        riddle_id: String,
        /// The answer text
        answer: String,
    },

    /// Submit an answer to the final challenge
    Answer {
        /// The answer text
        answer: String,
    },

    /// Wipe all session progress
    Reset,
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("chronoscape error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Run the CLI and return the exit code.
fn run() -> Result<i32, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let scene = SceneConfig::load();
    let path = progress_path().ok_or("could not determine progress path (no home directory)")?;
    let store = FileStateStore::open(&path)?;

    let code = match cli.command {
        Commands::Status => {
            let cmd = StatusCommand::new(store, scene);
            let options = StatusOptions {
                json: cli.json,
                quiet: cli.quiet,
            };
            let output = cmd.run();
            print!("{}", cmd.format_output(&output, &options));
            exit_codes::SUCCESS
        }
        Commands::Hover { zone_id } => {
            let mut cmd = HoverCommand::new(store, scene);
            let options = HoverOptions {
                json: cli.json,
                quiet: cli.quiet,
            };
            let output = cmd.run(&zone_id);
            print!("{}", cmd.format_output(&output, &options));
            if output.success {
                exit_codes::SUCCESS
            } else {
                exit_codes::ERROR
            }
        }
        Commands::Ink { zone_id } => {
            let mut cmd = InkCommand::new(store, scene);
            let options = InkOptions {
                json: cli.json,
                quiet: cli.quiet,
            };
            let output = cmd.run(&zone_id);
            print!("{}", cmd.format_output(&output, &options));
            if !output.success {
                exit_codes::ERROR
            } else if output.revealed {
                exit_codes::SUCCESS
            } else {
                exit_codes::REJECTED
            }
        }
        Commands::Reveal { zone_id, outside } => {
            let mut cmd = RevealCommand::new(store, scene);
            let options = RevealOptions {
                json: cli.json,
                quiet: cli.quiet,
                outside,
            };
            let output = cmd.run(&zone_id, &options);
            print!("{}", cmd.format_output(&output, &options));
            if !output.success {
                exit_codes::ERROR
            } else if output.uncovered {
                exit_codes::SUCCESS
            } else {
                exit_codes::REJECTED
            }
        }
        Commands::Lens { lens } => {
            let lens: LensKind = lens.parse()?;
            let mut cmd = LensCommand::new(store, scene);
            let options = LensOptions {
                json: cli.json,
                quiet: cli.quiet,
            };
            let output = cmd.run(lens);
            print!("{}", cmd.format_output(&output, &options));
            if output.success {
                exit_codes::SUCCESS
            } else {
                exit_codes::REJECTED
            }
        }
        Commands::Riddle { riddle_id, answer } => {
            let mut cmd = RiddleCommand::new(store, scene);
            let options = RiddleOptions {
                json: cli.json,
                quiet: cli.quiet,
            };
            let output = cmd.run(&riddle_id, &answer);
            print!("{}", cmd.format_output(&output, &options));
            if output.error.is_some() {
                exit_codes::ERROR
            } else if output.success {
                exit_codes::SUCCESS
            } else {
                exit_codes::REJECTED
            }
        }
        Commands::Answer { answer } => {
            let mut cmd = AnswerCommand::new(store, scene);
            let options = AnswerOptions {
                json: cli.json,
                quiet: cli.quiet,
            };
            let output = cmd.run(&answer);
            print!("{}", cmd.format_output(&output, &options));
            if output.success {
                exit_codes::SUCCESS
            } else {
                exit_codes::REJECTED
            }
        }
        Commands::Reset => {
            let mut cmd = ResetCommand::new(store, scene);
            let options = ResetOptions {
                json: cli.json,
                quiet: cli.quiet,
            };
            let output = cmd.run();
            print!("{}", cmd.format_output(&output, &options));
            exit_codes::SUCCESS
        }
    };

    Ok(code)
}
