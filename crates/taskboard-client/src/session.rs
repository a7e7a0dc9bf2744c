//! Sync session: binds a board to the push channel.
//!
//! # State Machine
//!
//! ```text
//! +----------------+
//! |  Disconnected  | deltas dropped, local edits stay local
//! +-------+--------+
//!         | on_connected(): send getTasks
//!         v
//! +----------------+
//! |   Connected    | waiting for newData, deltas dropped
//! +-------+--------+
//!         | newData: replace board, bump generation
//!         v
//! +----------------+
//! |     Synced     | each partialDataUpdate goes through the reducer,
//! +----------------+ one at a time, in arrival order
//!         | on_disconnected(): back to Disconnected
//! ```
//!
//! A full snapshot is the only thing that repairs order gaps left by remote
//! deletes; local rebalancing is advisory and the next snapshot always wins.

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use taskboard_board::{Board, BoardError, Outcome, apply};
use taskboard_types::{GroupedTasks, Intent, PartialUpdate, ServerMessage, UpdateKind};

use crate::config::ClientConfig;
use crate::controller::{self, LocalAction};
use crate::events::{ConnectionStatus, SyncGeneration};
use crate::sink::{IntentSink, TransportError};

/// Result of handling one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResult {
    /// The board was replaced by a full snapshot.
    FullSync { generation: SyncGeneration, task_count: usize },
    /// A delta went through the reducer (which may itself have skipped it).
    Delta(Outcome),
    /// The message was dropped before reaching the board (see reason).
    Skipped { reason: SkipReason },
}

/// Why the session dropped a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A delta arrived before the first snapshot of this connection.
    NotSynced { kind: UpdateKind },
    /// A message arrived while the channel was down.
    Disconnected,
}

/// Errors from session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// An intent was produced but couldn't be handed to the transport.
    #[error("failed to send {event}: {source}")]
    Transport {
        event: &'static str,
        /// User-facing text for the failure.
        notice: &'static str,
        #[source]
        source: TransportError,
    },
    /// The push channel is down; the intent was not sent.
    #[error("not connected, {event} not sent")]
    NotConnected { event: &'static str, notice: &'static str },
    /// A drag named a slot that doesn't exist.
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl SessionError {
    /// Text to show the user, if this failure should be shown at all.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            SessionError::Transport { notice, .. } | SessionError::NotConnected { notice, .. } => Some(*notice),
            SessionError::Board(_) => None,
        }
    }
}

/// What a local action did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalEffect {
    /// The local board changed.
    pub board_changed: bool,
    /// Intent handed to the transport.
    pub sent: Option<Intent>,
}

/// One client's session: the board, its lifecycle state, and the outbound sink.
///
/// Single writer: everything that changes the board goes through `&mut self`.
#[derive(Debug)]
pub struct SyncSession<S> {
    state: ConnectionStatus,
    board: Board,
    sink: S,
    config: ClientConfig,
    generation: SyncGeneration,
}

impl<S: IntentSink> SyncSession<S> {
    pub fn new(sink: S, config: ClientConfig) -> Self {
        Self {
            state: ConnectionStatus::Disconnected,
            board: Board::new(),
            sink,
            config,
            generation: SyncGeneration::default(),
        }
    }

    pub fn state(&self) -> ConnectionStatus {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Reader's copy of the board (shares storage).
    pub fn snapshot(&self) -> Board {
        self.board.snapshot()
    }

    /// Number of full snapshots applied so far.
    pub fn generation(&self) -> SyncGeneration {
        self.generation
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // ========================================================================
    // Channel lifecycle
    // ========================================================================

    /// The push channel came up (first connect or reconnect).
    #[instrument(level = "debug", skip_all)]
    pub fn on_connected(&mut self) -> Result<(), SessionError> {
        if self.state != ConnectionStatus::Disconnected {
            debug!(state = %self.state, "connect while already connected, resyncing");
        }
        self.state = ConnectionStatus::Connected;
        info!("push channel connected");

        if self.config.request_snapshot_on_connect {
            self.request_snapshot()?;
        }
        Ok(())
    }

    /// Ask the server for a full snapshot.
    pub fn request_snapshot(&mut self) -> Result<(), SessionError> {
        self.dispatch(Intent::GetTasks).map(|_| ())
    }

    /// The push channel went away. Unsent or unechoed edits are not retried.
    pub fn on_disconnected(&mut self) {
        if self.state != ConnectionStatus::Disconnected {
            info!(previous = %self.state, "push channel lost");
        }
        self.state = ConnectionStatus::Disconnected;
    }

    // ========================================================================
    // Inbound
    // ========================================================================

    /// Handle one inbound push-channel message.
    #[instrument(level = "debug", skip_all, fields(state = %self.state))]
    pub fn handle(&mut self, message: ServerMessage) -> SyncResult {
        match message {
            ServerMessage::NewData(snapshot) => self.apply_snapshot(snapshot),
            ServerMessage::PartialDataUpdate(update) => self.apply_delta(&update),
        }
    }

    fn apply_snapshot(&mut self, snapshot: GroupedTasks) -> SyncResult {
        if self.state == ConnectionStatus::Disconnected {
            warn!("snapshot arrived while disconnected, dropping");
            return SyncResult::Skipped { reason: SkipReason::Disconnected };
        }

        self.board = Board::from_snapshot(snapshot);
        self.state = ConnectionStatus::Synced;
        let generation = self.generation.bump();
        let task_count = self.board.task_count();
        info!(generation = generation.0, task_count, "full snapshot applied");
        SyncResult::FullSync { generation, task_count }
    }

    fn apply_delta(&mut self, update: &PartialUpdate) -> SyncResult {
        let kind = update.kind();
        match self.state {
            ConnectionStatus::Synced => {}
            ConnectionStatus::Connected => {
                debug!(%kind, task_id = %update.task_id(), "delta before first snapshot, dropping");
                return SyncResult::Skipped { reason: SkipReason::NotSynced { kind } };
            }
            ConnectionStatus::Disconnected => {
                debug!(%kind, "delta while disconnected, dropping");
                return SyncResult::Skipped { reason: SkipReason::Disconnected };
            }
        }

        let reduction = apply(&self.board, update, self.config.reduce_options());
        self.board = reduction.board;
        SyncResult::Delta(reduction.outcome)
    }

    // ========================================================================
    // Local actions
    // ========================================================================

    /// Run a user gesture: commit its board change, then send its intent.
    ///
    /// A send failure leaves the committed board as it is.
    #[instrument(level = "debug", skip_all)]
    pub fn perform(&mut self, action: &LocalAction) -> Result<LocalEffect, SessionError> {
        let mutation = controller::plan(&self.board, action)?;
        let board_changed = match mutation.board {
            Some(board) => {
                self.board = board;
                true
            }
            None => false,
        };

        let sent = match mutation.intent {
            Some(intent) => Some(self.dispatch(intent)?),
            None => None,
        };
        Ok(LocalEffect { board_changed, sent })
    }

    fn dispatch(&mut self, intent: Intent) -> Result<Intent, SessionError> {
        let event = intent.event_name();
        if self.state == ConnectionStatus::Disconnected {
            warn!(event, "push channel down, intent not sent");
            return Err(SessionError::NotConnected { event, notice: intent.failure_message() });
        }

        let notice = intent.failure_message();
        match self.sink.send(intent.clone()) {
            Ok(()) => {
                debug!(event, "intent sent");
                Ok(intent)
            }
            Err(source) => {
                warn!(event, error = %source, "intent send failed");
                Err(SessionError::Transport { event, notice, source })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
