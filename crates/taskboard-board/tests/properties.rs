//! Property-based tests for board invariants.
//!
//! Random sequences of pushed updates and local drags are applied to an
//! empty board, checking after every step that:
//!
//! 1. orders stay contiguous (when deletes compact)
//! 2. every task's status matches its group
//! 3. no task or subtask id is held twice
//! 4. dragging a task or subtask onto its own index changes nothing
//! 5. events naming unknown ids leave the board unchanged

use proptest::prelude::*;

use taskboard_board::{Board, ReduceOptions, Violation, apply, invariants};
use taskboard_types::{GroupKey, PartialUpdate, Subtask, SubtaskId, Task, TaskId};

// =============================================================================
// Generators
// =============================================================================

#[derive(Clone, Debug)]
enum Step {
    Remote(PartialUpdate),
    Reorder { group: GroupKey, from: usize, to: usize },
    Move { from: (GroupKey, usize), to: (GroupKey, usize) },
    ReorderSubtask { group: GroupKey, task_id: TaskId, from: usize, to: usize },
    MoveSubtask { from: (GroupKey, TaskId, usize), to: (GroupKey, TaskId, usize) },
}

fn group_key() -> impl Strategy<Value = GroupKey> {
    prop_oneof![Just(GroupKey::Todo), Just(GroupKey::InProgress), Just(GroupKey::Completed)]
}

fn task_id() -> impl Strategy<Value = TaskId> {
    (0..6u8).prop_map(|n| TaskId::new(format!("t{n}")))
}

fn subtask_id() -> impl Strategy<Value = SubtaskId> {
    (0..8u8).prop_map(|n| SubtaskId::new(format!("s{n}")))
}

/// A task's full subtask list as the server would send it: distinct ids, orders `0..n`.
fn subtask_list() -> impl Strategy<Value = Vec<Subtask>> {
    let ids: Vec<u8> = (0..8).collect();
    (prop::sample::subsequence(ids, 0..=3), group_key()).prop_map(|(ids, status)| {
        ids.into_iter()
            .enumerate()
            .map(|(order, n)| Subtask::new(format!("s{n}"), format!("s{n}"), status, order as u32))
            .collect()
    })
}

fn remote() -> impl Strategy<Value = PartialUpdate> {
    prop_oneof![
        (group_key(), task_id(), 0..8u32, subtask_list()).prop_map(|(status, id, order, subtasks)| {
            PartialUpdate::CreateTask {
                status,
                task: Task::new(id.clone(), id.as_str(), status, order).with_subtasks(subtasks),
            }
        }),
        (group_key(), task_id(), proptest::option::of(0..8u32), proptest::option::of(subtask_list()), any::<bool>())
            .prop_map(|(status, id, order, subtasks, updated_by_others)| PartialUpdate::UpdateTask {
                status,
                id,
                title: Some("renamed".into()),
                order,
                subtasks,
                updated_by_others,
            }),
        (group_key(), task_id()).prop_map(|(status, id)| PartialUpdate::DeleteTask { status, id }),
        (group_key(), task_id(), subtask_id(), 0..8u32).prop_map(|(status, task_id, id, order)| {
            PartialUpdate::CreateSubtask {
                status,
                task_id,
                subtask: Subtask::new(id.clone(), id.as_str(), status, order),
            }
        }),
        (group_key(), task_id(), subtask_id(), proptest::option::of(0..8u32)).prop_map(
            |(status, task_id, id, order)| PartialUpdate::UpdateSubtask {
                status,
                task_id,
                id,
                title: None,
                order,
            }
        ),
        (group_key(), task_id(), subtask_id())
            .prop_map(|(status, task_id, id)| PartialUpdate::DeleteSubtask { status, task_id, id }),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => remote().prop_map(Step::Remote),
        1 => (group_key(), 0..6usize, 0..6usize).prop_map(|(group, from, to)| Step::Reorder { group, from, to }),
        1 => (group_key(), 0..6usize, group_key(), 0..6usize)
            .prop_map(|(a, i, b, j)| Step::Move { from: (a, i), to: (b, j) }),
        1 => (group_key(), task_id(), 0..4usize, 0..4usize)
            .prop_map(|(group, task_id, from, to)| Step::ReorderSubtask { group, task_id, from, to }),
        1 => (group_key(), task_id(), 0..4usize, group_key(), task_id(), 0..4usize)
            .prop_map(|(a, t, i, b, u, j)| Step::MoveSubtask { from: (a, t, i), to: (b, u, j) }),
    ]
}

/// Run `steps`, calling `check` on the board after each one.
fn run(steps: &[Step], options: ReduceOptions, mut check: impl FnMut(&Board)) -> Board {
    let mut board = Board::new();
    for step in steps {
        match step {
            Step::Remote(update) => board = apply(&board, update, options).board,
            // out-of-range drags are rejected and leave the board alone
            Step::Reorder { group, from, to } => {
                let _ = board.reorder_task(*group, *from, *to);
            }
            Step::Move { from, to } => {
                let _ = board.move_task(*from, *to);
            }
            Step::ReorderSubtask { group, task_id, from, to } => {
                let _ = board.reorder_subtask(*group, task_id, *from, *to);
            }
            Step::MoveSubtask { from, to } => {
                let _ = board.move_subtask((from.0, &from.1, from.2), (to.0, &to.1, to.2));
            }
        }
        check(&board);
    }
    board
}

fn non_order(violations: Vec<Violation>) -> Vec<Violation> {
    violations
        .into_iter()
        .filter(|v| !matches!(v, Violation::TaskOrder { .. } | Violation::SubtaskOrder { .. }))
        .collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// With compacting deletes, every invariant holds after every step.
    #[test]
    fn prop_invariants_hold_with_compaction(steps in prop::collection::vec(step(), 0..60)) {
        let options = ReduceOptions { compact_on_delete: true };
        let mut failures = Vec::new();
        run(&steps, options, |board| failures.extend(invariants::check(board)));
        prop_assert!(failures.is_empty(), "violations: {:?}", failures);
    }

    /// Gap-leaving deletes may break contiguity but never status or membership.
    #[test]
    fn prop_status_and_membership_hold_without_compaction(steps in prop::collection::vec(step(), 0..60)) {
        let mut failures = Vec::new();
        run(&steps, ReduceOptions::default(), |board| {
            failures.extend(non_order(invariants::check(board)));
        });
        prop_assert!(failures.is_empty(), "violations: {:?}", failures);
    }

    /// Dropping a task back where it came from is a no-op.
    #[test]
    fn prop_reorder_to_same_index_is_identity(
        steps in prop::collection::vec(step(), 0..40),
        group in group_key(),
        index in 0..6usize,
    ) {
        let board = run(&steps, ReduceOptions { compact_on_delete: true }, |_| {});
        let mut dragged = board.clone();
        if dragged.reorder_task(group, index, index).is_ok() {
            prop_assert_eq!(dragged, board);
        }
    }

    /// Dropping a subtask back where it came from is a no-op, whichever entry point.
    #[test]
    fn prop_subtask_drag_to_same_index_is_identity(
        steps in prop::collection::vec(step(), 0..40),
        group in group_key(),
        task_id in task_id(),
        index in 0..4usize,
    ) {
        let board = run(&steps, ReduceOptions { compact_on_delete: true }, |_| {});

        let mut reordered = board.clone();
        if reordered.reorder_subtask(group, &task_id, index, index).is_ok() {
            prop_assert_eq!(&reordered, &board);
        }
        let mut moved = board.clone();
        if moved.move_subtask((group, &task_id, index), (group, &task_id, index)).is_ok() {
            prop_assert_eq!(&moved, &board);
        }
    }

    /// Deletes and subtask updates for ids the board doesn't hold change nothing.
    #[test]
    fn prop_unknown_ids_are_ignored(
        steps in prop::collection::vec(step(), 0..40),
        status in group_key(),
        task_id in task_id(),
    ) {
        let options = ReduceOptions { compact_on_delete: true };
        let board = run(&steps, options, |_| {});
        let ghost_task = TaskId::new("ghost");
        let ghost_subtask = SubtaskId::new("ghost");

        let events = [
            PartialUpdate::DeleteTask { status, id: ghost_task.clone() },
            PartialUpdate::DeleteSubtask { status, task_id: task_id.clone(), id: ghost_subtask.clone() },
            PartialUpdate::UpdateSubtask {
                status,
                task_id: task_id.clone(),
                id: ghost_subtask.clone(),
                title: Some("x".into()),
                order: Some(0),
            },
            PartialUpdate::CreateSubtask {
                status,
                task_id: ghost_task,
                subtask: Subtask::new("fresh", "fresh", status, 0),
            },
        ];
        for event in &events {
            let reduction = apply(&board, event, options);
            prop_assert!(!reduction.outcome.is_applied());
            prop_assert_eq!(&reduction.board, &board);
        }
    }
}
