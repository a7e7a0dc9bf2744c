//! Actor that owns a sync session.
//!
//! The session is single-writer. The actor holds it in one tokio task and
//! processes commands sequentially from an mpsc channel, so inbound server
//! messages and user gestures interleave in arrival order and each runs to
//! completion before the next.
//!
//! ```text
//!   SessionHandle (Clone)        mpsc       SessionActor (tokio task)
//!   ┌─────────────────────┐   ────────▶   ┌──────────────────────────┐
//!   │ .deliver()          │               │ SyncSession<S>           │
//!   │ .drag_task()        │   ◀────────   │   board, state, sink     │
//!   │ .rename_task()      │    oneshot    └─────┬──────────────┬─────┘
//!   └─────────────────────┘                     │ watch        │ broadcast
//!                                               ▼              ▼
//!                                         Board snapshots   SessionEvent
//! ```

use futures::{Stream, StreamExt};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, trace};

use taskboard_board::Board;
use taskboard_types::{ServerMessage, SubtaskId, TaskId};

use crate::config::ClientConfig;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::controller::{LocalAction, SubtaskSlot, TaskSlot};
use crate::events::{ConnectionStatus, Notice, SessionEvent};
use crate::session::{LocalEffect, SessionError, SyncResult, SyncSession};
use crate::sink::IntentSink;

// ============================================================================
// Error Type
// ============================================================================

/// Errors from the actor system.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("session actor shut down")]
    Shutdown,
    #[error(transparent)]
    Session(#[from] SessionError),
}

// ============================================================================
// Commands (internal)
// ============================================================================

/// Internal command sent from SessionHandle → SessionActor via mpsc.
enum SessionCommand {
    Connected {
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Disconnected {
        reply: oneshot::Sender<()>,
    },
    Server {
        message: ServerMessage,
        reply: oneshot::Sender<SyncResult>,
    },
    Local {
        action: LocalAction,
        reply: oneshot::Sender<Result<LocalEffect, SessionError>>,
    },
    Status {
        reply: oneshot::Sender<ConnectionStatus>,
    },
}

// ============================================================================
// SessionHandle (public API)
// ============================================================================

/// Handle to a running session actor.
///
/// Each method sends a command via mpsc and awaits the oneshot reply. The
/// board is read without a round trip through the watch channel.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCommand>,
    board: watch::Receiver<Board>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    async fn request<T>(&self, command: SessionCommand, rx: oneshot::Receiver<T>) -> Result<T, ActorError> {
        self.tx.send(command).map_err(|_| ActorError::Shutdown)?;
        rx.await.map_err(|_| ActorError::Shutdown)
    }

    // ── Channel lifecycle ────────────────────────────────────────────────

    /// Report that the push channel connected.
    pub async fn connected(&self) -> Result<(), ActorError> {
        let (reply, rx) = oneshot::channel();
        Ok(self.request(SessionCommand::Connected { reply }, rx).await??)
    }

    /// Report that the push channel was lost.
    pub async fn disconnected(&self) -> Result<(), ActorError> {
        let (reply, rx) = oneshot::channel();
        self.request(SessionCommand::Disconnected { reply }, rx).await
    }

    /// Hand one inbound message to the session.
    pub async fn deliver(&self, message: ServerMessage) -> Result<SyncResult, ActorError> {
        let (reply, rx) = oneshot::channel();
        self.request(SessionCommand::Server { message, reply }, rx).await
    }

    /// Deliver every message from an inbound stream, in order.
    ///
    /// Returns how many were delivered once the stream ends.
    pub async fn pump<St>(&self, inbound: St) -> Result<usize, ActorError>
    where
        St: Stream<Item = ServerMessage>,
    {
        let mut inbound = std::pin::pin!(inbound);
        let mut delivered = 0;
        while let Some(message) = inbound.next().await {
            self.deliver(message).await?;
            delivered += 1;
        }
        Ok(delivered)
    }

    pub async fn status(&self) -> Result<ConnectionStatus, ActorError> {
        let (reply, rx) = oneshot::channel();
        self.request(SessionCommand::Status { reply }, rx).await
    }

    // ── Local gestures ───────────────────────────────────────────────────

    /// Run any local gesture.
    pub async fn perform(&self, action: LocalAction) -> Result<LocalEffect, ActorError> {
        let (reply, rx) = oneshot::channel();
        Ok(self.request(SessionCommand::Local { action, reply }, rx).await??)
    }

    pub async fn drag_task(&self, source: TaskSlot, destination: Option<TaskSlot>) -> Result<LocalEffect, ActorError> {
        self.perform(LocalAction::DragTask { source, destination }).await
    }

    pub async fn drag_subtask(
        &self,
        source: SubtaskSlot,
        destination: Option<SubtaskSlot>,
    ) -> Result<LocalEffect, ActorError> {
        self.perform(LocalAction::DragSubtask { source, destination }).await
    }

    pub async fn rename_task(&self, task_id: TaskId, title: impl Into<String>) -> Result<LocalEffect, ActorError> {
        self.perform(LocalAction::RenameTask { task_id, title: title.into() }).await
    }

    pub async fn rename_subtask(
        &self,
        task_id: TaskId,
        subtask_id: SubtaskId,
        title: impl Into<String>,
    ) -> Result<LocalEffect, ActorError> {
        self.perform(LocalAction::RenameSubtask { task_id, subtask_id, title: title.into() }).await
    }

    pub async fn create_task(&self, title: impl Into<String>) -> Result<LocalEffect, ActorError> {
        self.perform(LocalAction::CreateTask { title: title.into() }).await
    }

    pub async fn create_subtask(&self, task_id: TaskId, title: impl Into<String>) -> Result<LocalEffect, ActorError> {
        self.perform(LocalAction::CreateSubtask { task_id, title: title.into() }).await
    }

    pub async fn delete_task(&self, task_id: TaskId) -> Result<LocalEffect, ActorError> {
        self.perform(LocalAction::DeleteTask { task_id }).await
    }

    pub async fn delete_subtask(&self, task_id: TaskId, subtask_id: SubtaskId) -> Result<LocalEffect, ActorError> {
        self.perform(LocalAction::DeleteSubtask { task_id, subtask_id }).await
    }

    pub async fn toggle_subtasks(&self, task_id: TaskId) -> Result<LocalEffect, ActorError> {
        self.perform(LocalAction::ToggleSubtasks { task_id }).await
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// Current board snapshot.
    pub fn board(&self) -> Board {
        self.board.borrow().clone()
    }

    /// Watch the board; changes whenever a message or gesture alters it.
    pub fn watch_board(&self) -> watch::Receiver<Board> {
        self.board.clone()
    }

    /// Subscribe to status changes, resyncs and user notices.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

// ============================================================================
// Actor Implementation
// ============================================================================

struct SessionActor<S> {
    session: SyncSession<S>,
    board_tx: watch::Sender<Board>,
    events: broadcast::Sender<SessionEvent>,
}

impl<S: IntentSink> SessionActor<S> {
    /// Process commands until every handle is dropped.
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<SessionCommand>) {
        while let Some(command) = rx.recv().await {
            self.handle_command(command);
        }
        debug!("session actor shutting down: channel closed");
    }

    fn handle_command(&mut self, command: SessionCommand) {
        let status_before = self.session.state();

        // Publish before replying so a caller that awaited the reply sees the result.
        match command {
            SessionCommand::Connected { reply } => {
                let result = self.session.on_connected();
                self.report(&result);
                self.settle(status_before);
                let _ = reply.send(result);
            }
            SessionCommand::Disconnected { reply } => {
                self.session.on_disconnected();
                self.settle(status_before);
                let _ = reply.send(());
            }
            SessionCommand::Server { message, reply } => {
                let result = self.session.handle(message);
                trace!(?result, "server message handled");
                if let SyncResult::FullSync { generation, task_count } = &result {
                    self.emit(SessionEvent::Resynced { generation: *generation, task_count: *task_count });
                }
                self.settle(status_before);
                let _ = reply.send(result);
            }
            SessionCommand::Local { action, reply } => {
                let result = self.session.perform(&action);
                self.report(&result);
                self.settle(status_before);
                let _ = reply.send(result);
            }
            SessionCommand::Status { reply } => {
                let _ = reply.send(self.session.state());
            }
        }
    }

    /// Announce a status change and publish the board.
    fn settle(&self, status_before: ConnectionStatus) {
        let status = self.session.state();
        if status != status_before {
            self.emit(SessionEvent::StatusChanged(status));
        }
        self.publish_board();
    }

    /// Turn a failed send into a user notice.
    fn report<T>(&self, result: &Result<T, SessionError>) {
        let Err(error) = result else { return };
        match error {
            SessionError::Transport { event, notice, .. } | SessionError::NotConnected { event, notice } => {
                self.emit(SessionEvent::Notice(Notice::for_event(*notice, *event)));
            }
            SessionError::Board(_) => debug!(%error, "local action rejected"),
        }
    }

    fn emit(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    fn publish_board(&self) {
        let board = self.session.board();
        self.board_tx.send_if_modified(|current| {
            if current == board {
                false
            } else {
                *current = board.snapshot();
                true
            }
        });
    }
}

// ============================================================================
// Public spawn function
// ============================================================================

/// Spawn a session actor on the current tokio runtime.
///
/// The session starts disconnected with an empty board; call
/// [`SessionHandle::connected`] once the push channel is up.
pub fn spawn_session<S>(sink: S, config: ClientConfig) -> SessionHandle
where
    S: IntentSink + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let (board_tx, board) = watch::channel(Board::new());
    let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

    let actor = SessionActor {
        session: SyncSession::new(sink, config),
        board_tx,
        events: events.clone(),
    };
    tokio::spawn(actor.run(rx));
    SessionHandle { tx, board, events }
}
