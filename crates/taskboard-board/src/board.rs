//! Grouped state store.
//!
//! A [`Board`] holds exactly one [`Group`] per [`GroupKey`], always all three,
//! in display order. Each group's task list sits behind an `Arc`: cloning a
//! board is three reference-count bumps, and a mutation copies only the group
//! it touches (`Arc::make_mut`). That makes every state transition a function
//! from an old snapshot to a new one while readers keep the snapshot they hold.
//!
//! # Structure
//!
//! ```text
//! Board
//! ├── todo         Arc<Vec<Task>>   # order 0..n-1, status == todo
//! ├── in_progress  Arc<Vec<Task>>   # order 0..n-1, status == in_progress
//! └── completed    Arc<Vec<Task>>   # order 0..n-1, status == completed
//!                    └── Task.subtasks: Vec<Subtask>  # order 0..m-1
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use taskboard_types::{GroupKey, GroupedTasks, Subtask, SubtaskId, Task, TaskId};

use crate::ordering::{move_between_lists, renumber, reorder_within_list};
use crate::{BoardError, Result};

/// One group of tasks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    key: GroupKey,
    tasks: Arc<Vec<Task>>,
}

impl Group {
    fn new(key: GroupKey, tasks: Vec<Task>) -> Self {
        Self { key, tasks: Arc::new(tasks) }
    }

    pub fn key(&self) -> GroupKey {
        self.key
    }

    /// Tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn position(&self, task_id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == task_id)
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == task_id)
    }

    /// Whether two groups share the same task list allocation.
    ///
    /// Used to confirm a transition left a group untouched.
    pub fn shares_storage_with(&self, other: &Group) -> bool {
        Arc::ptr_eq(&self.tasks, &other.tasks)
    }
}

/// The three-group snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    groups: [Group; 3],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Empty board: three groups, no tasks.
    pub fn new() -> Self {
        Self {
            groups: GroupKey::ALL.map(|key| Group::new(key, Vec::new())),
        }
    }

    /// Build a board from a full server snapshot.
    ///
    /// The server is the authority on order values, so they are kept as sent;
    /// each list is sorted by order for display, and every task's status is
    /// aligned with the group that holds it.
    pub fn from_snapshot(snapshot: GroupedTasks) -> Self {
        let groups = snapshot.into_groups().map(|(key, mut tasks)| {
            for task in &mut tasks {
                if task.status != key {
                    debug!(task_id = %task.id, sent = %task.status, group = %key, "aligning task status with its group");
                    task.status = key;
                }
                task.subtasks.sort_by_key(|s| s.order);
            }
            tasks.sort_by_key(|t| t.order);
            Group::new(key, tasks)
        });
        Self { groups }
    }

    /// A reader's copy of the current state. Shares every group's storage.
    pub fn snapshot(&self) -> Board {
        self.clone()
    }

    /// Flatten back into the wire snapshot shape.
    pub fn to_snapshot(&self) -> GroupedTasks {
        let mut snapshot = GroupedTasks::default();
        for group in &self.groups {
            *snapshot.group_mut(group.key) = group.tasks.to_vec();
        }
        snapshot
    }

    pub fn group(&self, key: GroupKey) -> &Group {
        &self.groups[key.index()]
    }

    /// Groups in display order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Mutable access to one group's tasks, copying the list if it is shared.
    pub(crate) fn tasks_mut(&mut self, key: GroupKey) -> &mut Vec<Task> {
        Arc::make_mut(&mut self.groups[key.index()].tasks)
    }

    /// Replace a group's task list wholesale.
    pub(crate) fn set_tasks(&mut self, key: GroupKey, tasks: Vec<Task>) {
        self.groups[key.index()].tasks = Arc::new(tasks);
    }

    /// Find which group holds a task, and where.
    pub fn locate_task(&self, task_id: &TaskId) -> Option<(GroupKey, usize)> {
        self.groups
            .iter()
            .find_map(|g| g.position(task_id).map(|index| (g.key, index)))
    }

    /// Look up a task in any group.
    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.groups.iter().find_map(|g| g.task(task_id))
    }

    /// Look up a task, requiring it to be in `key`.
    pub fn task_in(&self, key: GroupKey, task_id: &TaskId) -> Result<&Task> {
        self.group(key).task(task_id).ok_or_else(|| BoardError::TaskNotFound {
            group: key,
            task_id: task_id.clone(),
        })
    }

    /// Look up a subtask under a task in `key`.
    pub fn subtask_in(&self, key: GroupKey, task_id: &TaskId, subtask_id: &SubtaskId) -> Result<&Subtask> {
        self.task_in(key, task_id)?
            .subtask(subtask_id)
            .ok_or_else(|| BoardError::SubtaskNotFound {
                task_id: task_id.clone(),
                subtask_id: subtask_id.clone(),
            })
    }

    /// Find the task that owns a subtask, anywhere on the board.
    pub fn subtask_owner(&self, subtask_id: &SubtaskId) -> Option<&Task> {
        self.all_tasks().find(|t| t.subtask(subtask_id).is_some())
    }

    /// Every task, group by group in display order.
    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.groups.iter().flat_map(|g| g.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.task_count() == 0
    }

    /// Flip a task's local subtask visibility. Returns the new value.
    pub fn toggle_subtasks(&mut self, task_id: &TaskId) -> Option<bool> {
        let (key, index) = self.locate_task(task_id)?;
        let task = &mut self.tasks_mut(key)[index];
        task.show_subtasks = !task.show_subtasks;
        Some(task.show_subtasks)
    }

    // ========================================================================
    // Local edits (drag-and-drop)
    // ========================================================================

    /// Move the task at `from` to `to` within one group and renumber it.
    pub fn reorder_task(&mut self, key: GroupKey, from: usize, to: usize) -> Result<&Task> {
        let mut tasks = reorder_within_list(self.group(key).tasks(), from, to)?;
        renumber(&mut tasks);
        self.set_tasks(key, tasks);
        Ok(&self.group(key).tasks()[to])
    }

    /// Move a task between groups, taking the destination's status.
    ///
    /// Both groups are renumbered.
    pub fn move_task(&mut self, from: (GroupKey, usize), to: (GroupKey, usize)) -> Result<&Task> {
        let (source_key, source_index) = from;
        let (dest_key, dest_index) = to;
        if source_key == dest_key {
            return self.reorder_task(source_key, source_index, dest_index);
        }

        let (mut source, mut dest) = move_between_lists(
            self.group(source_key).tasks(),
            self.group(dest_key).tasks(),
            source_index,
            dest_index,
        )?;
        dest[dest_index].status = dest_key;
        renumber(&mut source);
        renumber(&mut dest);
        self.set_tasks(source_key, source);
        self.set_tasks(dest_key, dest);
        Ok(&self.group(dest_key).tasks()[dest_index])
    }

    /// Reorder within one task's subtask list.
    pub fn reorder_subtask(&mut self, key: GroupKey, task_id: &TaskId, from: usize, to: usize) -> Result<&Subtask> {
        let index = self.task_index(key, task_id)?;
        let mut subtasks = reorder_within_list(&self.group(key).tasks()[index].subtasks, from, to)?;
        renumber(&mut subtasks);
        let task = &mut self.tasks_mut(key)[index];
        task.subtasks = subtasks;
        Ok(&task.subtasks[to])
    }

    /// Move a subtask from one task's list to another's.
    ///
    /// The subtask takes the destination task's status. Both lists are renumbered.
    pub fn move_subtask(
        &mut self,
        from: (GroupKey, &TaskId, usize),
        to: (GroupKey, &TaskId, usize),
    ) -> Result<&Subtask> {
        let (source_key, source_task, source_index) = from;
        let (dest_key, dest_task, dest_index) = to;
        if source_key == dest_key && source_task == dest_task {
            return self.reorder_subtask(source_key, source_task, source_index, dest_index);
        }

        let source_pos = self.task_index(source_key, source_task)?;
        let dest_pos = self.task_index(dest_key, dest_task)?;
        let (mut source, mut dest) = move_between_lists(
            &self.group(source_key).tasks()[source_pos].subtasks,
            &self.group(dest_key).tasks()[dest_pos].subtasks,
            source_index,
            dest_index,
        )?;
        dest[dest_index].status = self.group(dest_key).tasks()[dest_pos].status;
        renumber(&mut source);
        renumber(&mut dest);

        self.tasks_mut(source_key)[source_pos].subtasks = source;
        let task = &mut self.tasks_mut(dest_key)[dest_pos];
        task.subtasks = dest;
        Ok(&task.subtasks[dest_index])
    }

    fn task_index(&self, key: GroupKey, task_id: &TaskId) -> Result<usize> {
        self.group(key).position(task_id).ok_or_else(|| BoardError::TaskNotFound {
            group: key,
            task_id: task_id.clone(),
        })
    }
}

impl Serialize for Board {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        GroupedTasks::deserialize(deserializer).map(Board::from_snapshot)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Board {
        Board::from_snapshot(GroupedTasks {
            todo: vec![
                Task::new("b", "B", GroupKey::Todo, 1),
                Task::new("a", "A", GroupKey::Todo, 0),
            ],
            in_progress: vec![Task::new("c", "C", GroupKey::Completed, 0).with_subtasks(vec![
                Subtask::new("s1", "one", GroupKey::InProgress, 1),
                Subtask::new("s0", "zero", GroupKey::InProgress, 0),
            ])],
            completed: vec![],
        })
    }

    #[test]
    fn test_new_board_has_three_empty_groups() {
        let board = Board::new();
        let keys: Vec<_> = board.groups().map(Group::key).collect();
        assert_eq!(keys, GroupKey::ALL.to_vec());
        assert!(board.is_empty());
    }

    #[test]
    fn test_from_snapshot_sorts_and_aligns_status() {
        let board = sample();
        let todo: Vec<_> = board.group(GroupKey::Todo).tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(todo, ["a", "b"]);

        let c = board.task(&TaskId::new("c")).unwrap();
        assert_eq!(c.status, GroupKey::InProgress);
        assert_eq!(c.subtasks[0].id, "s0");
    }

    #[test]
    fn test_locate_and_lookup() {
        let board = sample();
        assert_eq!(board.locate_task(&TaskId::new("b")), Some((GroupKey::Todo, 1)));
        assert_eq!(board.locate_task(&TaskId::new("zz")), None);
        assert!(board.task_in(GroupKey::Completed, &TaskId::new("c")).is_err());
        assert!(board.subtask_in(GroupKey::InProgress, &TaskId::new("c"), &SubtaskId::new("s1")).is_ok());
        assert_eq!(board.subtask_owner(&SubtaskId::new("s1")).map(|t| t.id.as_str()), Some("c"));
    }

    #[test]
    fn test_mutation_copies_only_touched_group() {
        let before = sample();
        let mut after = before.clone();
        after.toggle_subtasks(&TaskId::new("a"));

        assert!(!after.group(GroupKey::Todo).shares_storage_with(before.group(GroupKey::Todo)));
        assert!(after.group(GroupKey::InProgress).shares_storage_with(before.group(GroupKey::InProgress)));
        // the old snapshot is unchanged
        assert!(!before.task(&TaskId::new("a")).unwrap().show_subtasks);
        assert!(after.task(&TaskId::new("a")).unwrap().show_subtasks);
    }

    #[test]
    fn test_toggle_subtasks_twice_restores() {
        let mut board = sample();
        let original = board.clone();
        assert_eq!(board.toggle_subtasks(&TaskId::new("c")), Some(true));
        assert_eq!(board.toggle_subtasks(&TaskId::new("c")), Some(false));
        assert_eq!(board, original);
        assert_eq!(board.toggle_subtasks(&TaskId::new("nope")), None);
    }

    #[test]
    fn test_reorder_task_renumbers() {
        let mut board = sample();
        let moved = board.reorder_task(GroupKey::Todo, 1, 0).unwrap().id.clone();
        assert_eq!(moved, "b");
        let todo: Vec<_> = board.group(GroupKey::Todo).tasks().iter().map(|t| (t.id.as_str(), t.order)).collect();
        assert_eq!(todo, [("b", 0), ("a", 1)]);
        assert!(board.reorder_task(GroupKey::Todo, 5, 0).is_err());
    }

    #[test]
    fn test_move_task_between_groups() {
        let mut board = sample();
        let moved = board.move_task((GroupKey::Todo, 0), (GroupKey::Completed, 0)).unwrap();
        assert_eq!(moved.status, GroupKey::Completed);
        assert_eq!(moved.order, 0);
        let todo: Vec<_> = board.group(GroupKey::Todo).tasks().iter().map(|t| (t.id.as_str(), t.order)).collect();
        assert_eq!(todo, [("b", 0)]);
    }

    #[test]
    fn test_move_subtask_across_tasks() {
        let mut board = sample();
        let c = TaskId::new("c");
        let a = TaskId::new("a");
        let moved = board.move_subtask((GroupKey::InProgress, &c, 0), (GroupKey::Todo, &a, 0)).unwrap();
        assert_eq!(moved.id, "s0");
        assert_eq!(moved.status, GroupKey::Todo);

        let remaining = &board.task(&c).unwrap().subtasks;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].order, 0);
        assert!(board.move_subtask((GroupKey::Todo, &c, 0), (GroupKey::Todo, &a, 0)).is_err());
    }

    #[test]
    fn test_snapshot_roundtrip_through_json() {
        let board = sample();
        let json = serde_json::to_string(&board).unwrap();
        let parsed: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);
    }
}
