//! Taskboard command-line driver.
//!
//! Usage:
//!   # Replay a session script, printing sent intents and the final board
//!   taskboard replay session.jsonl
//!   taskboard replay session.jsonl --http --view board
//!
//!   # Check a snapshot (the `newData` payload) for order, status and id problems
//!   taskboard check snapshot.json
//!
//!   # Render a snapshot
//!   taskboard show snapshot.json --view board
//!
//! Configuration is read from ~/.config/taskboard/config.ron when present.

mod config;
mod replay;
mod view;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use taskboard_board::{Board, invariants};
use taskboard_types::GroupedTasks;

use crate::config::Config;
use crate::replay::{IntentFormat, parse_script, replay};
use crate::view::{ViewMode, render};

/// Drive and inspect taskboard client sessions.
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(about = "Replay, check and render taskboard client state")]
struct Args {
    /// Config file (default: ~/.config/taskboard/config.ron)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Board rendering, overriding the config
    #[arg(long, global = true, value_enum)]
    view: Option<ViewMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a JSON-lines session script through a client session
    Replay {
        script: PathBuf,
        /// Print intents as fallback HTTP requests instead of push events
        #[arg(long)]
        http: bool,
        /// Close order gaps on delete
        #[arg(long)]
        compact: bool,
    },
    /// Check a snapshot file for invariant violations
    Check { snapshot: PathBuf },
    /// Render a snapshot file
    Show { snapshot: PathBuf },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_snapshot(path: &Path) -> Result<GroupedTasks> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing snapshot {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(view) = args.view {
        config.view = view;
    }
    init_tracing(&config);

    let mut stdout = std::io::stdout().lock();
    match args.command {
        Command::Replay { script, http, compact } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let steps = parse_script(&text).with_context(|| format!("parsing {}", script.display()))?;
            if compact {
                config.client.compact_on_delete = true;
            }
            let format = if http { IntentFormat::Http } else { IntentFormat::Json };

            let (board, summary) = replay(&steps, &config.client, format, &mut stdout).await?;
            writeln!(stdout)?;
            write!(stdout, "{}", render(&board, config.view))?;
            info!(?summary, "done");
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { snapshot } => {
            let violations = invariants::check_snapshot(&read_snapshot(&snapshot)?);
            if violations.is_empty() {
                writeln!(stdout, "{}: ok", snapshot.display())?;
                return Ok(ExitCode::SUCCESS);
            }
            for violation in &violations {
                writeln!(stdout, "{}: {violation}", snapshot.display())?;
            }
            Ok(ExitCode::FAILURE)
        }
        Command::Show { snapshot } => {
            let board = Board::from_snapshot(read_snapshot(&snapshot)?);
            write!(stdout, "{}", render(&board, config.view))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
