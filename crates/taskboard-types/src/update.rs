//! Inbound push-channel messages.
//!
//! The server pushes two kinds of message: a full snapshot (`newData`) and a
//! single delta (`partialDataUpdate`). Deltas are a closed set of variants,
//! each carrying only the fields that kind can legally contain; every variant
//! names the `status` of the group it targets.
//!
//! Wire shape:
//!
//! ```json
//! {"event":"partialDataUpdate","data":{"type":"UPDATE_TASK","status":"todo","id":"t1","order":0}}
//! ```

use serde::{Deserialize, Serialize};

use crate::group::GroupKey;
use crate::ids::{SubtaskId, TaskId};
use crate::snapshot::GroupedTasks;
use crate::task::{Subtask, Task};

/// One delta event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum PartialUpdate {
    /// A task was created in group `status`.
    CreateTask { status: GroupKey, task: Task },
    /// A task changed. `status` is the group it now belongs to.
    UpdateTask {
        status: GroupKey,
        #[serde(alias = "_id")]
        id: TaskId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtasks: Option<Vec<Subtask>>,
        /// Set when the change came from a different client.
        #[serde(default)]
        updated_by_others: bool,
    },
    /// A task was deleted from group `status`.
    DeleteTask {
        status: GroupKey,
        #[serde(alias = "_id")]
        id: TaskId,
    },
    /// A subtask was added to a task in group `status`.
    CreateSubtask { status: GroupKey, task_id: TaskId, subtask: Subtask },
    /// A subtask changed.
    UpdateSubtask {
        status: GroupKey,
        task_id: TaskId,
        #[serde(alias = "_id", alias = "subtaskId")]
        id: SubtaskId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order: Option<u32>,
    },
    /// A subtask was deleted.
    DeleteSubtask {
        status: GroupKey,
        task_id: TaskId,
        #[serde(alias = "_id", alias = "subtaskId")]
        id: SubtaskId,
    },
}

/// Discriminant of [`PartialUpdate`], for logs and outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    CreateTask,
    UpdateTask,
    DeleteTask,
    CreateSubtask,
    UpdateSubtask,
    DeleteSubtask,
}

impl UpdateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateKind::CreateTask => "CREATE_TASK",
            UpdateKind::UpdateTask => "UPDATE_TASK",
            UpdateKind::DeleteTask => "DELETE_TASK",
            UpdateKind::CreateSubtask => "CREATE_SUBTASK",
            UpdateKind::UpdateSubtask => "UPDATE_SUBTASK",
            UpdateKind::DeleteSubtask => "DELETE_SUBTASK",
        }
    }
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialUpdate {
    pub fn kind(&self) -> UpdateKind {
        match self {
            PartialUpdate::CreateTask { .. } => UpdateKind::CreateTask,
            PartialUpdate::UpdateTask { .. } => UpdateKind::UpdateTask,
            PartialUpdate::DeleteTask { .. } => UpdateKind::DeleteTask,
            PartialUpdate::CreateSubtask { .. } => UpdateKind::CreateSubtask,
            PartialUpdate::UpdateSubtask { .. } => UpdateKind::UpdateSubtask,
            PartialUpdate::DeleteSubtask { .. } => UpdateKind::DeleteSubtask,
        }
    }

    /// Group this event targets.
    pub fn status(&self) -> GroupKey {
        match self {
            PartialUpdate::CreateTask { status, .. }
            | PartialUpdate::UpdateTask { status, .. }
            | PartialUpdate::DeleteTask { status, .. }
            | PartialUpdate::CreateSubtask { status, .. }
            | PartialUpdate::UpdateSubtask { status, .. }
            | PartialUpdate::DeleteSubtask { status, .. } => *status,
        }
    }

    /// Task this event touches (the parent, for subtask events).
    pub fn task_id(&self) -> &TaskId {
        match self {
            PartialUpdate::CreateTask { task, .. } => &task.id,
            PartialUpdate::UpdateTask { id, .. } | PartialUpdate::DeleteTask { id, .. } => id,
            PartialUpdate::CreateSubtask { task_id, .. }
            | PartialUpdate::UpdateSubtask { task_id, .. }
            | PartialUpdate::DeleteSubtask { task_id, .. } => task_id,
        }
    }
}

/// Inbound push-channel envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full snapshot; replaces the whole board.
    NewData(GroupedTasks),
    /// Single delta.
    PartialDataUpdate(PartialUpdate),
}
