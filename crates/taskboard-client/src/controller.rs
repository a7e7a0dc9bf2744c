//! Local mutation controller.
//!
//! Turns user gestures into a board change and/or an outbound intent. The
//! planners are pure: they read the current board and return a
//! [`LocalMutation`] for the session to commit and send.
//!
//! | Gesture            | Local board                  | Intent                          |
//! |--------------------|------------------------------|---------------------------------|
//! | Task drag          | reorder / move, renumbered   | `updateTask {order}` or `{status, order}` |
//! | Subtask drag       | reorder / move, renumbered   | `updateSubtask {order}`, none across tasks |
//! | Rename             | unchanged until echoed       | `updateTask`/`updateSubtask {title}` |
//! | Create / delete    | unchanged until echoed       | `create*` / `delete*`           |
//! | Toggle subtasks    | `show_subtasks` flipped      | none                            |

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use taskboard_board::{Board, BoardError};
use taskboard_types::{GroupKey, Intent, NewSubtask, SubtaskId, SubtaskPatch, TaskId, TaskPatch};

/// A position in one group's task list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSlot {
    pub group: GroupKey,
    pub index: usize,
}

impl TaskSlot {
    pub fn new(group: GroupKey, index: usize) -> Self {
        Self { group, index }
    }
}

/// A position in one task's subtask list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskSlot {
    pub group: GroupKey,
    pub task_id: TaskId,
    pub index: usize,
}

impl SubtaskSlot {
    pub fn new(group: GroupKey, task_id: impl Into<TaskId>, index: usize) -> Self {
        Self { group, task_id: task_id.into(), index }
    }

    fn same_list(&self, other: &SubtaskSlot) -> bool {
        self.group == other.group && self.task_id == other.task_id
    }
}

/// A user gesture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LocalAction {
    /// Drag end for a task. No destination means it was dropped outside any list.
    DragTask { source: TaskSlot, destination: Option<TaskSlot> },
    /// Drag end for a subtask.
    DragSubtask { source: SubtaskSlot, destination: Option<SubtaskSlot> },
    /// Inline edit of a task title ended.
    RenameTask { task_id: TaskId, title: String },
    /// Inline edit of a subtask title ended.
    RenameSubtask { task_id: TaskId, subtask_id: SubtaskId, title: String },
    CreateTask { title: String },
    CreateSubtask { task_id: TaskId, title: String },
    DeleteTask { task_id: TaskId },
    DeleteSubtask { task_id: TaskId, subtask_id: SubtaskId },
    ToggleSubtasks { task_id: TaskId },
}

/// What a gesture does: an optional next board and an optional intent.
#[derive(Clone, Debug, Default)]
pub struct LocalMutation {
    pub board: Option<Board>,
    pub intent: Option<Intent>,
}

impl LocalMutation {
    pub fn none() -> Self {
        Self::default()
    }

    fn send(intent: Intent) -> Self {
        Self { board: None, intent: Some(intent) }
    }

    pub fn is_noop(&self) -> bool {
        self.board.is_none() && self.intent.is_none()
    }
}

/// Plan any gesture against `board`.
pub fn plan(board: &Board, action: &LocalAction) -> Result<LocalMutation, BoardError> {
    match action {
        LocalAction::DragTask { source, destination } => plan_task_drag(board, *source, *destination),
        LocalAction::DragSubtask { source, destination } => {
            plan_subtask_drag(board, source, destination.as_ref())
        }
        LocalAction::RenameTask { task_id, title } => Ok(plan_rename_task(board, task_id, title)),
        LocalAction::RenameSubtask { task_id, subtask_id, title } => {
            Ok(plan_rename_subtask(board, task_id, subtask_id, title))
        }
        LocalAction::CreateTask { title } => Ok(plan_create_task(title)),
        LocalAction::CreateSubtask { task_id, title } => Ok(plan_create_subtask(task_id, title)),
        LocalAction::DeleteTask { task_id } => Ok(LocalMutation::send(Intent::DeleteTask { id: task_id.clone() })),
        LocalAction::DeleteSubtask { task_id, subtask_id } => Ok(LocalMutation::send(Intent::DeleteSubtask {
            task_id: task_id.clone(),
            subtask_id: subtask_id.clone(),
        })),
        LocalAction::ToggleSubtasks { task_id } => Ok(plan_toggle_subtasks(board, task_id)),
    }
}

// ============================================================================
// Drags
// ============================================================================

/// Drag end for a task.
pub fn plan_task_drag(
    board: &Board,
    source: TaskSlot,
    destination: Option<TaskSlot>,
) -> Result<LocalMutation, BoardError> {
    let Some(destination) = destination else {
        trace!(?source, "task dropped outside any list");
        return Ok(LocalMutation::none());
    };
    if source == destination {
        return Ok(LocalMutation::none());
    }

    let mut next = board.clone();
    let (id, patch) = if source.group == destination.group {
        let moved = next.reorder_task(source.group, source.index, destination.index)?;
        (moved.id.clone(), TaskPatch::order(moved.order))
    } else {
        let moved = next.move_task(
            (source.group, source.index),
            (destination.group, destination.index),
        )?;
        (moved.id.clone(), TaskPatch::moved(moved.status, moved.order))
    };
    debug!(task_id = %id, ?source, ?destination, "task dragged");

    Ok(LocalMutation {
        board: Some(next),
        intent: Some(Intent::UpdateTask { id, update_body: patch }),
    })
}

/// Drag end for a subtask.
///
/// A drag between two tasks' lists changes only the local board.
pub fn plan_subtask_drag(
    board: &Board,
    source: &SubtaskSlot,
    destination: Option<&SubtaskSlot>,
) -> Result<LocalMutation, BoardError> {
    let Some(destination) = destination else {
        trace!(?source, "subtask dropped outside any list");
        return Ok(LocalMutation::none());
    };
    if source == destination {
        return Ok(LocalMutation::none());
    }

    let mut next = board.clone();
    if source.same_list(destination) {
        let moved = next.reorder_subtask(source.group, &source.task_id, source.index, destination.index)?;
        let intent = Intent::UpdateSubtask {
            task_id: source.task_id.clone(),
            subtask_id: moved.id.clone(),
            update_body: SubtaskPatch::order(moved.order),
        };
        return Ok(LocalMutation { board: Some(next), intent: Some(intent) });
    }

    let moved = next.move_subtask(
        (source.group, &source.task_id, source.index),
        (destination.group, &destination.task_id, destination.index),
    )?;
    debug!(
        subtask_id = %moved.id,
        from = %source.task_id,
        to = %destination.task_id,
        "subtask moved between tasks, local only"
    );
    Ok(LocalMutation { board: Some(next), intent: None })
}

// ============================================================================
// Titles
// ============================================================================

/// Trimmed title, or `None` if nothing is left.
fn clean_title(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Inline rename of a task. The board changes when the server echoes it.
pub fn plan_rename_task(board: &Board, task_id: &TaskId, input: &str) -> LocalMutation {
    let Some(title) = clean_title(input) else {
        return LocalMutation::none();
    };
    match board.task(task_id) {
        Some(task) if task.title != title => LocalMutation::send(Intent::UpdateTask {
            id: task_id.clone(),
            update_body: TaskPatch::title(title),
        }),
        Some(_) => LocalMutation::none(),
        None => {
            debug!(%task_id, "rename for a task not on the board");
            LocalMutation::none()
        }
    }
}

/// Inline rename of a subtask.
pub fn plan_rename_subtask(board: &Board, task_id: &TaskId, subtask_id: &SubtaskId, input: &str) -> LocalMutation {
    let Some(title) = clean_title(input) else {
        return LocalMutation::none();
    };
    match board.task(task_id).and_then(|task| task.subtask(subtask_id)) {
        Some(subtask) if subtask.title != title => LocalMutation::send(Intent::UpdateSubtask {
            task_id: task_id.clone(),
            subtask_id: subtask_id.clone(),
            update_body: SubtaskPatch::title(title),
        }),
        Some(_) => LocalMutation::none(),
        None => {
            debug!(%task_id, %subtask_id, "rename for a subtask not on the board");
            LocalMutation::none()
        }
    }
}

pub fn plan_create_task(input: &str) -> LocalMutation {
    match clean_title(input) {
        Some(title) => LocalMutation::send(Intent::CreateTask { title: title.to_string() }),
        None => LocalMutation::none(),
    }
}

pub fn plan_create_subtask(task_id: &TaskId, input: &str) -> LocalMutation {
    match clean_title(input) {
        Some(title) => LocalMutation::send(Intent::CreateSubtask {
            task_id: task_id.clone(),
            body: NewSubtask { title: title.to_string() },
        }),
        None => LocalMutation::none(),
    }
}

pub fn plan_toggle_subtasks(board: &Board, task_id: &TaskId) -> LocalMutation {
    let mut next = board.clone();
    match next.toggle_subtasks(task_id) {
        Some(_) => LocalMutation { board: Some(next), intent: None },
        None => LocalMutation::none(),
    }
}

// ============================================================================
// Tests
// ============================================================================
