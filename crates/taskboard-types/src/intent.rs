//! Outbound intents.
//!
//! An intent asks the server to change something. It is fire-and-forget:
//! the client learns the outcome from the push channel (the echo), never
//! from a reply. Update bodies carry only whitelisted fields and omit the
//! ones that aren't changing.
//!
//! Wire shape:
//!
//! ```json
//! {"event":"updateTask","data":{"id":"t1","updateBody":{"order":2}}}
//! ```

use serde::{Deserialize, Serialize};

use crate::group::GroupKey;
use crate::ids::{SubtaskId, TaskId};

/// Fields a task update may carry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GroupKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn order(order: u32) -> Self {
        Self { order: Some(order), ..Self::default() }
    }

    pub fn moved(status: GroupKey, order: u32) -> Self {
        Self { status: Some(status), order: Some(order), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.status.is_none() && self.order.is_none()
    }
}

/// Fields a subtask update may carry. Status is not one of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl SubtaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn order(order: u32) -> Self {
        Self { order: Some(order), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.order.is_none()
    }
}

/// Body of a subtask creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubtask {
    pub title: String,
}

/// Outbound push-channel envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    /// Ask for a full snapshot.
    GetTasks,
    CreateTask { title: String },
    UpdateTask { id: TaskId, update_body: TaskPatch },
    DeleteTask { id: TaskId },
    CreateSubtask { task_id: TaskId, body: NewSubtask },
    UpdateSubtask { task_id: TaskId, subtask_id: SubtaskId, update_body: SubtaskPatch },
    DeleteSubtask { task_id: TaskId, subtask_id: SubtaskId },
}

impl Intent {
    /// Push-channel event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            Intent::GetTasks => "getTasks",
            Intent::CreateTask { .. } => "createTask",
            Intent::UpdateTask { .. } => "updateTask",
            Intent::DeleteTask { .. } => "deleteTask",
            Intent::CreateSubtask { .. } => "createSubtask",
            Intent::UpdateSubtask { .. } => "updateSubtask",
            Intent::DeleteSubtask { .. } => "deleteSubtask",
        }
    }

    /// Event payload alone, for transports that take `(name, payload)`.
    ///
    /// `Null` for `getTasks`, which has no payload.
    pub fn payload(&self) -> serde_json::Value {
        match serde_json::to_value(self) {
            Ok(mut envelope) => envelope
                .get_mut("data")
                .map(serde_json::Value::take)
                .unwrap_or(serde_json::Value::Null),
            Err(_) => serde_json::Value::Null,
        }
    }

    /// Message shown to the user when this intent couldn't be sent.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Intent::GetTasks => "Failed to load tasks",
            Intent::CreateTask { .. } => "Failed to add task",
            Intent::UpdateTask { .. } => "Failed to update task",
            Intent::DeleteTask { .. } => "Failed to delete task",
            Intent::CreateSubtask { .. } => "Failed to add subtask",
            Intent::UpdateSubtask { .. } => "Failed to update subtask",
            Intent::DeleteSubtask { .. } => "Failed to delete subtask",
        }
    }
}
