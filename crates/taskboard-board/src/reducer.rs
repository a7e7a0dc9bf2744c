//! Partial-update reducer.
//!
//! Applies one pushed delta event to a board snapshot and returns the next
//! snapshot. The input board is never modified; untouched groups in the
//! result share storage with it.
//!
//! # Reconciliation Rules
//!
//! - CREATE_TASK / CREATE_SUBTASK: placed at the order they carry (normally
//!   the end). A duplicate delivery of an id the board already holds is skipped.
//! - UPDATE_TASK, task found in the target group: fields merged in place; an
//!   order change rebalances the siblings.
//! - UPDATE_TASK, task not in the target group: a cross-group move made
//!   elsewhere. Any copy in another group is removed, the merged task is
//!   placed in the target group at its order.
//! - A task event carrying subtasks is authoritative for them: any of those
//!   subtask ids held by another task is taken from it.
//! - DELETE_*: removed by id. Orders are left as they are unless
//!   `compact_on_delete` is set; the server sends compensating updates.
//! - Anything that names a task or subtask the board doesn't hold is a skip:
//!   delivery is at-least-once, so duplicate and late events are expected.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use taskboard_types::{GroupKey, PartialUpdate, Subtask, SubtaskId, Task, TaskId, UpdateKind};

use crate::board::Board;
use crate::ordering::{
    Ordered, insert_at_order, move_to_order, remove_closing_gap, remove_leaving_gap, renumber,
};

/// Reducer settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReduceOptions {
    /// Close the order gap a removal leaves instead of waiting for the server.
    pub compact_on_delete: bool,
}

/// Result of applying one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The event changed the board.
    Applied { kind: UpdateKind },
    /// A task that wasn't in the target group was moved (or first placed) there.
    Relocated { task_id: TaskId, from: Option<GroupKey>, to: GroupKey },
    /// The event was not applied (see reason). The board is unchanged.
    Skipped { kind: UpdateKind, reason: SkipReason },
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Outcome::Skipped { .. })
    }
}

/// Why an event was skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No task with this id in the target group.
    TaskNotFound { group: GroupKey, task_id: TaskId },
    /// The parent task holds no subtask with this id.
    SubtaskNotFound { task_id: TaskId, subtask_id: SubtaskId },
    /// The id being created is already on the board (duplicate delivery).
    TaskAlreadyExists { task_id: TaskId },
    /// The subtask id being created is already on the board.
    SubtaskAlreadyExists { subtask_id: SubtaskId },
}

/// Next snapshot plus what happened.
#[derive(Clone, Debug)]
pub struct Reduction {
    pub board: Board,
    pub outcome: Outcome,
}

/// Apply one partial update to `board`.
pub fn apply(board: &Board, update: &PartialUpdate, options: ReduceOptions) -> Reduction {
    let kind = update.kind();
    let mut next = board.clone();

    let result = match update {
        PartialUpdate::CreateTask { status, task } => create_task(&mut next, *status, task, options),
        PartialUpdate::UpdateTask { status, id, title, order, subtasks, updated_by_others } => {
            update_task(
                &mut next,
                TaskUpdate {
                    status: *status,
                    id,
                    title: title.as_deref(),
                    order: *order,
                    subtasks: subtasks.as_deref(),
                    updated_by_others: *updated_by_others,
                },
                options,
            )
        }
        PartialUpdate::DeleteTask { status, id } => delete_task(&mut next, *status, id, options),
        PartialUpdate::CreateSubtask { status, task_id, subtask } => {
            create_subtask(&mut next, *status, task_id, subtask)
        }
        PartialUpdate::UpdateSubtask { status, task_id, id, title, order } => {
            update_subtask(&mut next, *status, task_id, id, title.as_deref(), *order)
        }
        PartialUpdate::DeleteSubtask { status, task_id, id } => {
            delete_subtask(&mut next, *status, task_id, id, options)
        }
    };

    match result {
        Ok(outcome) => {
            trace!(%kind, ?outcome, "partial update applied");
            Reduction { board: next, outcome }
        }
        Err(reason) => {
            debug!(%kind, ?reason, "partial update skipped");
            Reduction {
                board: board.clone(),
                outcome: Outcome::Skipped { kind, reason },
            }
        }
    }
}

/// Apply a sequence of updates in order, returning the final board.
pub fn apply_all<'a>(
    board: &Board,
    updates: impl IntoIterator<Item = &'a PartialUpdate>,
    options: ReduceOptions,
) -> Board {
    updates
        .into_iter()
        .fold(board.clone(), |acc, update| apply(&acc, update, options).board)
}

type Step = std::result::Result<Outcome, SkipReason>;

/// Remove `id` from `list`, closing the gap or not per `options`.
fn remove_by_id<T: Ordered>(list: &mut Vec<T>, id: &T::Id, options: ReduceOptions) -> Option<T> {
    if options.compact_on_delete {
        remove_closing_gap(list, id)
    } else {
        remove_leaving_gap(list, id)
    }
}

/// Take every subtask in `incoming` away from tasks other than `owner`.
fn claim_subtasks(board: &mut Board, owner: &TaskId, incoming: &[Subtask], options: ReduceOptions) {
    for subtask in incoming {
        for key in GroupKey::ALL {
            let holders: Vec<usize> = board
                .group(key)
                .tasks()
                .iter()
                .enumerate()
                .filter(|(_, task)| task.id != *owner && task.subtask_position(&subtask.id).is_some())
                .map(|(index, _)| index)
                .collect();
            for index in holders {
                let holder = &mut board.tasks_mut(key)[index];
                remove_by_id(&mut holder.subtasks, &subtask.id, options);
                debug!(subtask_id = %subtask.id, from = %holder.id, to = %owner, "subtask claimed by another task");
            }
        }
    }
}

/// Sort an incoming subtask list and drop repeated ids, keeping the first.
fn settle_subtasks(subtasks: &mut Vec<Subtask>, options: ReduceOptions) {
    subtasks.sort_by_key(|s| s.order);
    let mut seen = HashSet::new();
    let before = subtasks.len();
    subtasks.retain(|s| seen.insert(s.id.clone()));
    if subtasks.len() != before {
        debug!(dropped = before - subtasks.len(), "repeated subtask ids in event");
        if options.compact_on_delete {
            renumber(subtasks);
        }
    }
}

fn create_task(board: &mut Board, status: GroupKey, task: &Task, options: ReduceOptions) -> Step {
    if board.locate_task(&task.id).is_some() {
        return Err(SkipReason::TaskAlreadyExists { task_id: task.id.clone() });
    }

    let mut task = task.clone();
    task.status = status;
    settle_subtasks(&mut task.subtasks, options);
    claim_subtasks(board, &task.id, &task.subtasks, options);

    let tasks = board.tasks_mut(status);
    let expected = tasks.len() as u32;
    let requested = task.order;
    let placed = insert_at_order(tasks, task);
    if placed != requested || requested != expected {
        debug!(group = %status, requested, placed, expected, "created task placed away from the end");
    }

    Ok(Outcome::Applied { kind: UpdateKind::CreateTask })
}

struct TaskUpdate<'a> {
    status: GroupKey,
    id: &'a TaskId,
    title: Option<&'a str>,
    order: Option<u32>,
    subtasks: Option<&'a [Subtask]>,
    updated_by_others: bool,
}

impl TaskUpdate<'_> {
    fn merge_onto(&self, task: &mut Task, options: ReduceOptions) {
        task.status = self.status;
        if let Some(title) = self.title {
            task.title = title.to_string();
        }
        if let Some(subtasks) = self.subtasks {
            task.subtasks = subtasks.to_vec();
            settle_subtasks(&mut task.subtasks, options);
        }
    }
}

fn update_task(board: &mut Board, update: TaskUpdate<'_>, options: ReduceOptions) -> Step {
    let status = update.status;
    if let Some(subtasks) = update.subtasks {
        claim_subtasks(board, update.id, subtasks, options);
    }

    if let Some(index) = board.group(status).position(update.id) {
        let tasks = board.tasks_mut(status);
        let existing_order = tasks[index].order;
        update.merge_onto(&mut tasks[index], options);

        match update.order {
            Some(new_order) if new_order != existing_order => {
                let applied = move_to_order(tasks, update.id, new_order);
                trace!(task_id = %update.id, existing_order, new_order, ?applied, "rebalanced group after order change");
            }
            _ => tasks.sort_by_key(|t| t.order),
        }
        return Ok(Outcome::Applied { kind: UpdateKind::UpdateTask });
    }

    // Not in the target group: it moved here from somewhere else.
    let mut relocated: Option<(GroupKey, Task)> = None;
    for key in GroupKey::ALL.into_iter().filter(|k| *k != status) {
        if board.group(key).position(update.id).is_none() {
            continue;
        }
        if let Some(task) = remove_by_id(board.tasks_mut(key), update.id, options) {
            relocated = Some((key, task));
        }
    }

    let from = relocated.as_ref().map(|(key, _)| *key);
    match (from, update.updated_by_others) {
        (Some(from), true) => {
            debug!(task_id = %update.id, %from, to = %status, "task moved by another client");
        }
        (Some(from), false) => {
            warn!(task_id = %update.id, %from, to = %status, "relocating task not flagged as updated by others");
        }
        (None, _) => {
            debug!(task_id = %update.id, to = %status, "update for a task not held locally, inserting");
        }
    }

    // Carry local-only and unsent fields over from the old copy when there is one.
    let mut task = match relocated {
        Some((_, task)) => task,
        None => Task::placeholder(update.id.clone(), status),
    };
    let group_len = board.group(status).len() as u32;
    update.merge_onto(&mut task, options);
    task.order = update.order.unwrap_or(group_len);
    insert_at_order(board.tasks_mut(status), task);

    Ok(Outcome::Relocated { task_id: update.id.clone(), from, to: status })
}

fn delete_task(board: &mut Board, status: GroupKey, id: &TaskId, options: ReduceOptions) -> Step {
    if board.group(status).position(id).is_none() {
        return Err(SkipReason::TaskNotFound { group: status, task_id: id.clone() });
    }

    remove_by_id(board.tasks_mut(status), id, options);
    Ok(Outcome::Applied { kind: UpdateKind::DeleteTask })
}

/// Index of `task_id` in `status`, or the skip reason.
fn find_parent(board: &Board, status: GroupKey, task_id: &TaskId) -> std::result::Result<usize, SkipReason> {
    board.group(status).position(task_id).ok_or_else(|| SkipReason::TaskNotFound {
        group: status,
        task_id: task_id.clone(),
    })
}

fn create_subtask(board: &mut Board, status: GroupKey, task_id: &TaskId, subtask: &Subtask) -> Step {
    let index = find_parent(board, status, task_id)?;
    if board.subtask_owner(&subtask.id).is_some() {
        return Err(SkipReason::SubtaskAlreadyExists { subtask_id: subtask.id.clone() });
    }

    let subtasks = &mut board.tasks_mut(status)[index].subtasks;
    insert_at_order(subtasks, subtask.clone());
    Ok(Outcome::Applied { kind: UpdateKind::CreateSubtask })
}

fn update_subtask(
    board: &mut Board,
    status: GroupKey,
    task_id: &TaskId,
    id: &SubtaskId,
    title: Option<&str>,
    order: Option<u32>,
) -> Step {
    let index = find_parent(board, status, task_id)?;
    let Some(position) = board.group(status).tasks()[index].subtask_position(id) else {
        return Err(SkipReason::SubtaskNotFound { task_id: task_id.clone(), subtask_id: id.clone() });
    };

    let subtasks = &mut board.tasks_mut(status)[index].subtasks;
    let existing_order = subtasks[position].order;
    if let Some(title) = title {
        subtasks[position].title = title.to_string();
    }
    match order {
        Some(new_order) if new_order != existing_order => {
            move_to_order(subtasks, id, new_order);
        }
        _ => subtasks.sort_by_key(|s| s.order),
    }
    Ok(Outcome::Applied { kind: UpdateKind::UpdateSubtask })
}

fn delete_subtask(
    board: &mut Board,
    status: GroupKey,
    task_id: &TaskId,
    id: &SubtaskId,
    options: ReduceOptions,
) -> Step {
    let index = find_parent(board, status, task_id)?;
    if board.group(status).tasks()[index].subtask_position(id).is_none() {
        return Err(SkipReason::SubtaskNotFound { task_id: task_id.clone(), subtask_id: id.clone() });
    }

    remove_by_id(&mut board.tasks_mut(status)[index].subtasks, id, options);
    Ok(Outcome::Applied { kind: UpdateKind::DeleteSubtask })
}

// ============================================================================
// Tests
// ============================================================================
