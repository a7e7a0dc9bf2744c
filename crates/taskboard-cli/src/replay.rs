//! Session replay.
//!
//! A script is JSON lines, one step per line; blank lines and `#` comments
//! are skipped:
//!
//! ```text
//! {"step":"connect"}
//! {"step":"server","message":{"event":"newData","data":{"todo":[...]}}}
//! {"step":"local","action":{"action":"create_task","title":"Write docs"}}
//! {"step":"disconnect"}
//! ```
//!
//! Steps run through a real session actor. Every intent it sends is written
//! as one JSON line (or as an HTTP request line with `--http`), and the
//! final board is rendered at the end.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use taskboard_board::{Board, Outcome, invariants};
use taskboard_client::{
    ActorError, ClientConfig, HttpRequest, LocalAction, SessionEvent, SyncResult, spawn_session,
};
use taskboard_types::{Intent, ServerMessage};

/// One script step.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Connect,
    Disconnect,
    Server { message: ServerMessage },
    Local { action: LocalAction },
}

/// Bad script line.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

pub fn parse_script(text: &str) -> Result<Vec<Step>, ScriptError> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| serde_json::from_str(text).map_err(|source| ScriptError { line, source }))
        .collect()
}

/// How sent intents are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntentFormat {
    /// Push-channel envelope, `{"event":..,"data":..}`.
    #[default]
    Json,
    /// Request/response fallback, `METHOD url body`.
    Http,
}

/// Counts from a finished replay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub intents: usize,
    pub skipped: usize,
    pub notices: usize,
    pub rejected: usize,
}

/// Run `steps` through a fresh session, writing intents to `out`.
///
/// Returns the final board and counts.
pub async fn replay<W: Write>(
    steps: &[Step],
    config: &ClientConfig,
    format: IntentFormat,
    out: &mut W,
) -> Result<(Board, ReplaySummary)> {
    let (tx, mut outbound) = mpsc::unbounded_channel();
    let handle = spawn_session(tx, config.clone());
    let mut events = handle.subscribe();
    let mut summary = ReplaySummary { steps: steps.len(), ..Default::default() };

    for (index, step) in steps.iter().enumerate() {
        let result = match step {
            Step::Connect => handle.connected().await,
            Step::Disconnect => handle.disconnected().await,
            Step::Server { message } => handle.deliver(message.clone()).await.map(|result| {
                if is_skip(&result) {
                    debug!(step = index + 1, ?result, "server message skipped");
                    summary.skipped += 1;
                }
            }),
            Step::Local { action } => handle.perform(action.clone()).await.map(|_| ()),
        };

        match result {
            Ok(()) => {}
            Err(ActorError::Shutdown) => anyhow::bail!("session actor stopped at step {}", index + 1),
            Err(ActorError::Session(error)) => {
                warn!(step = index + 1, %error, "step rejected");
                summary.rejected += 1;
            }
        }

        while let Ok(intent) = outbound.try_recv() {
            write_intent(out, &intent, config, format)?;
            summary.intents += 1;
        }
        summary.notices += drain_notices(&mut events);
    }

    let board = handle.board();
    info!(
        steps = summary.steps,
        intents = summary.intents,
        skipped = summary.skipped,
        "replay finished"
    );
    for violation in invariants::check(&board) {
        warn!(%violation, "final board");
    }
    Ok((board, summary))
}

fn is_skip(result: &SyncResult) -> bool {
    matches!(result, SyncResult::Skipped { .. } | SyncResult::Delta(Outcome::Skipped { .. }))
}

fn write_intent<W: Write>(out: &mut W, intent: &Intent, config: &ClientConfig, format: IntentFormat) -> Result<()> {
    match format {
        IntentFormat::Json => {
            let line = serde_json::to_string(intent).context("serializing intent")?;
            writeln!(out, "{line}")?;
        }
        IntentFormat::Http => {
            let request = HttpRequest::from(intent);
            match &request.body {
                Some(body) => writeln!(out, "{} {} {body}", request.method, request.url(&config.api_base))?,
                None => writeln!(out, "{} {}", request.method, request.url(&config.api_base))?,
            }
        }
    }
    Ok(())
}

/// Log pending notices, returning how many there were.
fn drain_notices(events: &mut broadcast::Receiver<SessionEvent>) -> usize {
    let mut count = 0;
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Notice(notice)) => {
                warn!(event = notice.event, "{}", notice.message);
                count += 1;
            }
            Ok(other) => debug!(?other, "session event"),
            Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                warn!(missed, "session events dropped");
            }
            Err(_) => return count,
        }
    }
}
