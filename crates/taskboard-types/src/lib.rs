//! Shared task and wire types for taskboard.
//!
//! This crate is the data-model foundation: typed ids, the three fixed task
//! groups, tasks and their subtasks, the full snapshot pushed on connect, the
//! partial-update events pushed afterwards, and the intents a client emits.
//! It has **no internal taskboard dependencies**: a pure leaf crate that the
//! board engine and the client build on.
//!
//! # Ownership Overview
//!
//! ```text
//! Board (three groups, fixed display order)
//!     └── Group (GroupKey: todo | in_progress | completed)
//!         └── Task (TaskId, order unique within its group)
//!             └── Subtask (SubtaskId, order unique within its task)
//! ```
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`GroupKey`]      | Which group (doubles as task status)         |
//! | [`Task`]          | Task with ordered subtasks                   |
//! | [`Subtask`]       | Subtask owned by exactly one task            |
//! | [`GroupedTasks`]  | Full snapshot payload (`newData`)            |
//! | [`PartialUpdate`] | One delta event (`partialDataUpdate`)        |
//! | [`ServerMessage`] | Inbound push-channel envelope                |
//! | [`Intent`]        | Outbound push-channel envelope               |
//! |-------------------|----------------------------------------------|

pub mod ids;
pub mod group;
pub mod task;
pub mod snapshot;
pub mod update;
pub mod intent;

// Re-export primary types at crate root for convenience.
pub use ids::{SubtaskId, TaskId};
pub use group::{GroupKey, ParseGroupKeyError};
pub use task::{Subtask, Task};
pub use snapshot::GroupedTasks;
pub use update::{PartialUpdate, ServerMessage, UpdateKind};
pub use intent::{Intent, NewSubtask, SubtaskPatch, TaskPatch};
