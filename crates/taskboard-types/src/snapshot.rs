//! Full snapshot payload (`newData`).

use serde::{Deserialize, Serialize};

use crate::group::GroupKey;
use crate::task::Task;

/// Every task, keyed by group. Missing groups deserialize as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedTasks {
    #[serde(default)]
    pub todo: Vec<Task>,
    #[serde(default)]
    pub in_progress: Vec<Task>,
    #[serde(default)]
    pub completed: Vec<Task>,
}

impl GroupedTasks {
    pub fn group(&self, key: GroupKey) -> &[Task] {
        match key {
            GroupKey::Todo => &self.todo,
            GroupKey::InProgress => &self.in_progress,
            GroupKey::Completed => &self.completed,
        }
    }

    pub fn group_mut(&mut self, key: GroupKey) -> &mut Vec<Task> {
        match key {
            GroupKey::Todo => &mut self.todo,
            GroupKey::InProgress => &mut self.in_progress,
            GroupKey::Completed => &mut self.completed,
        }
    }

    /// Split into per-group lists, in display order.
    pub fn into_groups(self) -> [(GroupKey, Vec<Task>); 3] {
        [
            (GroupKey::Todo, self.todo),
            (GroupKey::InProgress, self.in_progress),
            (GroupKey::Completed, self.completed),
        ]
    }

    pub fn task_count(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.completed.len()
    }
}
