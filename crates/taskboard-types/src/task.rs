//! Tasks and subtasks.
//!
//! A task is owned by exactly one group and a subtask by exactly one task.
//! `order` is the zero-based position among siblings; the board keeps it
//! contiguous. `show_subtasks` is local UI state: it is never serialized, so
//! it can't leak into anything sent to the server. It is read back when an
//! input carries it and defaults to collapsed when it doesn't.

use serde::{Deserialize, Serialize};

use crate::group::GroupKey;
use crate::ids::{SubtaskId, TaskId};

/// A subtask, owned by its parent task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    #[serde(alias = "_id")]
    pub id: SubtaskId,
    pub title: String,
    #[serde(default)]
    pub status: GroupKey,
    #[serde(default)]
    pub order: u32,
}

impl Subtask {
    pub fn new(id: impl Into<SubtaskId>, title: impl Into<String>, status: GroupKey, order: u32) -> Self {
        Self { id: id.into(), title: title.into(), status, order }
    }
}

/// A task with its ordered subtasks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    pub status: GroupKey,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Local-only: whether the subtask list is expanded.
    #[serde(default, skip_serializing)]
    pub show_subtasks: bool,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>, status: GroupKey, order: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            order,
            subtasks: Vec::new(),
            show_subtasks: false,
        }
    }

    /// Empty task carrying only identity and status.
    ///
    /// Base object for partial updates that name a task the client doesn't
    /// hold yet: incoming fields are merged onto this.
    pub fn placeholder(id: TaskId, status: GroupKey) -> Self {
        Self::new(id, String::new(), status, 0)
    }

    /// Builder: attach subtasks.
    pub fn with_subtasks(mut self, subtasks: Vec<Subtask>) -> Self {
        self.subtasks = subtasks;
        self
    }

    /// Look up a subtask by id.
    pub fn subtask(&self, id: &SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| &s.id == id)
    }

    /// Index of a subtask in the current list.
    pub fn subtask_position(&self, id: &SubtaskId) -> Option<usize> {
        self.subtasks.iter().position(|s| &s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_subtasks_is_never_serialized() {
        let mut task = Task::new("t1", "Write docs", GroupKey::Todo, 0);
        task.show_subtasks = true;
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("showSubtasks").is_none());
        assert_eq!(json["status"], "todo");
    }

    #[test]
    fn test_deserialize_defaults_and_mongo_id() {
        let task: Task = serde_json::from_str(
            r#"{"_id":"abc","title":"Ship","status":"in_progress","showSubtasks":true,
                "subtasks":[{"_id":"s1","title":"Tag release","status":"in_progress","order":0}]}"#,
        )
        .unwrap();
        assert_eq!(task.id, "abc");
        assert_eq!(task.order, 0);
        assert_eq!(task.status, GroupKey::InProgress);
        assert_eq!(task.subtasks.len(), 1);
        assert_eq!(task.subtasks[0].id, "s1");
        // local-only field is still readable from a saved snapshot
        assert!(task.show_subtasks);
    }

    #[test]
    fn test_missing_show_subtasks_defaults_to_collapsed() {
        let task: Task = serde_json::from_str(r#"{"id":"t","title":"T","status":"todo","order":2}"#).unwrap();
        assert!(!task.show_subtasks);
    }

    #[test]
    fn test_subtask_lookup() {
        let task = Task::new("t1", "Plan", GroupKey::Todo, 0).with_subtasks(vec![
            Subtask::new("a", "one", GroupKey::Todo, 0),
            Subtask::new("b", "two", GroupKey::Todo, 1),
        ]);
        assert_eq!(task.subtask_position(&SubtaskId::new("b")), Some(1));
        assert!(task.subtask(&SubtaskId::new("zz")).is_none());
    }

    #[test]
    fn test_placeholder_is_empty() {
        let task = Task::placeholder(TaskId::new("x"), GroupKey::Completed);
        assert!(task.title.is_empty());
        assert!(task.subtasks.is_empty());
        assert!(!task.show_subtasks);
        assert_eq!(task.status, GroupKey::Completed);
    }
}
