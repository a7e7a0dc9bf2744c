//! Structural invariant checks.
//!
//! - order: sibling orders are exactly `0..n-1` in display order, for every
//!   group and every subtask list
//! - status: every task's status equals its group's key
//! - membership: a task id lives in one group, a subtask id under one task
//!
//! The reducer keeps these best-effort (a delete can leave a gap until the
//! next snapshot), so the checker reports rather than panics.

use std::collections::HashSet;
use std::fmt;

use taskboard_types::{GroupKey, GroupedTasks, SubtaskId, TaskId};

use crate::ordering::is_contiguous;
use crate::{Board, BoardError, Result};

/// One broken invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// A group's task orders aren't `0..n-1` in display order.
    TaskOrder { group: GroupKey, orders: Vec<u32> },
    /// A task's subtask orders aren't `0..m-1` in display order.
    SubtaskOrder { task_id: TaskId, orders: Vec<u32> },
    /// A task's status differs from the group holding it.
    StatusMismatch { task_id: TaskId, group: GroupKey, status: GroupKey },
    /// A task id appears more than once on the board.
    DuplicateTask { task_id: TaskId },
    /// A subtask id appears more than once on the board.
    DuplicateSubtask { subtask_id: SubtaskId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TaskOrder { group, orders } => {
                write!(f, "group {group} has task orders {orders:?}")
            }
            Violation::SubtaskOrder { task_id, orders } => {
                write!(f, "task {task_id} has subtask orders {orders:?}")
            }
            Violation::StatusMismatch { task_id, group, status } => {
                write!(f, "task {task_id} has status {status} but sits in {group}")
            }
            Violation::DuplicateTask { task_id } => write!(f, "task {task_id} appears more than once"),
            Violation::DuplicateSubtask { subtask_id } => {
                write!(f, "subtask {subtask_id} appears more than once")
            }
        }
    }
}

/// Every violation on the board, in group display order.
pub fn check(board: &Board) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen_tasks = HashSet::new();
    let mut seen_subtasks = HashSet::new();

    for group in board.groups() {
        if !is_contiguous(group.tasks()) {
            let orders = group.tasks().iter().map(|t| t.order).collect();
            violations.push(Violation::TaskOrder { group: group.key(), orders });
        }

        for task in group.tasks() {
            if task.status != group.key() {
                violations.push(Violation::StatusMismatch {
                    task_id: task.id.clone(),
                    group: group.key(),
                    status: task.status,
                });
            }
            if !seen_tasks.insert(&task.id) {
                violations.push(Violation::DuplicateTask { task_id: task.id.clone() });
            }

            if !is_contiguous(&task.subtasks) {
                let orders = task.subtasks.iter().map(|s| s.order).collect();
                violations.push(Violation::SubtaskOrder { task_id: task.id.clone(), orders });
            }
            for subtask in &task.subtasks {
                if !seen_subtasks.insert(&subtask.id) {
                    violations.push(Violation::DuplicateSubtask { subtask_id: subtask.id.clone() });
                }
            }
        }
    }

    violations
}

/// Check a snapshot as the server sent it.
///
/// Loading a snapshot aligns statuses and sorts by order, which would hide
/// those problems, so statuses are checked on the raw lists first.
pub fn check_snapshot(snapshot: &GroupedTasks) -> Vec<Violation> {
    let mut violations: Vec<Violation> = GroupKey::ALL
        .into_iter()
        .flat_map(|key| {
            snapshot
                .group(key)
                .iter()
                .filter(move |task| task.status != key)
                .map(move |task| Violation::StatusMismatch {
                    task_id: task.id.clone(),
                    group: key,
                    status: task.status,
                })
        })
        .collect();
    violations.extend(check(&Board::from_snapshot(snapshot.clone())));
    violations
}

/// `Ok` when [`check`] finds nothing.
pub fn validate(board: &Board) -> Result<()> {
    let violations = check(board);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(BoardError::Invariants(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_types::{GroupedTasks, Subtask, Task};

    #[test]
    fn test_clean_board_passes() {
        let board = Board::from_snapshot(GroupedTasks {
            todo: vec![Task::new("a", "A", GroupKey::Todo, 0), Task::new("b", "B", GroupKey::Todo, 1)],
            ..Default::default()
        });
        assert!(check(&board).is_empty());
        assert!(validate(&board).is_ok());
        assert!(validate(&Board::new()).is_ok());
    }

    #[test]
    fn test_reports_gap_and_duplicates() {
        let board = Board::from_snapshot(GroupedTasks {
            todo: vec![
                Task::new("a", "A", GroupKey::Todo, 0).with_subtasks(vec![
                    Subtask::new("s", "one", GroupKey::Todo, 0),
                    Subtask::new("s", "dup", GroupKey::Todo, 2),
                ]),
                Task::new("b", "B", GroupKey::Todo, 2),
            ],
            completed: vec![Task::new("a", "A again", GroupKey::Completed, 0)],
            ..Default::default()
        });

        let violations = check(&board);
        assert!(violations.contains(&Violation::TaskOrder { group: GroupKey::Todo, orders: vec![0, 2] }));
        assert!(violations.contains(&Violation::SubtaskOrder { task_id: TaskId::new("a"), orders: vec![0, 2] }));
        assert!(violations.contains(&Violation::DuplicateSubtask { subtask_id: SubtaskId::new("s") }));
        assert!(violations.contains(&Violation::DuplicateTask { task_id: TaskId::new("a") }));

        let err = validate(&board).unwrap_err();
        assert!(err.to_string().starts_with("board violates 4 invariant(s)"));
    }

    #[test]
    fn test_check_snapshot_sees_raw_status() {
        let snapshot = GroupedTasks {
            completed: vec![
                Task::new("x", "X", GroupKey::Todo, 1),
                Task::new("y", "Y", GroupKey::Completed, 0),
            ],
            ..Default::default()
        };
        assert_eq!(
            check_snapshot(&snapshot),
            [Violation::StatusMismatch {
                task_id: TaskId::new("x"),
                group: GroupKey::Completed,
                status: GroupKey::Todo,
            }]
        );
    }
}
