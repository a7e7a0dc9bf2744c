//! Session event types.
//!
//! Provides [`SessionEvent`], everything the session actor broadcasts to
//! subscribers besides the board itself, and [`ConnectionStatus`] for
//! connection lifecycle tracking.

use serde::Serialize;

/// Sync session lifecycle.
///
/// ```text
/// Disconnected ──connect──▶ Connected ──newData──▶ Synced
///      ▲                        │                    │
///      └──────── channel lost ──┴────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    /// Channel up, waiting for the first full snapshot.
    Connected,
    /// Snapshot applied; deltas are live.
    Synced,
}

/// Monotonic generation counter, bumped on every full snapshot.
///
/// Consumers can compare generations to tell whether the board was replaced
/// wholesale since they last looked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SyncGeneration(pub u64);

impl SyncGeneration {
    pub(crate) fn bump(&mut self) -> SyncGeneration {
        self.0 += 1;
        *self
    }
}

/// A message for the user, shown as a transient notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Human-facing text, e.g. "Failed to add task".
    pub message: String,
    /// Push-channel event that triggered it, if any.
    pub event: Option<&'static str>,
}

impl Notice {
    pub fn for_event(message: impl Into<String>, event: &'static str) -> Self {
        Self { message: message.into(), event: Some(event) }
    }
}

/// Events broadcast by the session actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    StatusChanged(ConnectionStatus),
    /// A full snapshot replaced the board.
    Resynced { generation: SyncGeneration, task_count: usize },
    Notice(Notice),
}
