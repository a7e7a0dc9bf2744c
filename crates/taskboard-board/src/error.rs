//! Error types for board operations.

use thiserror::Error;

use taskboard_types::{GroupKey, SubtaskId, TaskId};

use crate::invariants::Violation;

/// Errors from ordering helpers and strict board lookups.
///
/// The reducer never returns these: a partial update that can't be resolved
/// is a skip, not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A list index outside the list.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Task not held in the given group.
    #[error("task {task_id} not found in group {group}")]
    TaskNotFound { group: GroupKey, task_id: TaskId },

    /// Subtask not held by the given task.
    #[error("subtask {subtask_id} not found under task {task_id}")]
    SubtaskNotFound { task_id: TaskId, subtask_id: SubtaskId },

    /// The board breaks one or more structural invariants.
    #[error("board violates {} invariant(s), first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Invariants(Vec<Violation>),
}
