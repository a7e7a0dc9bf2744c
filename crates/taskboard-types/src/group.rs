//! The fixed set of task groups.
//!
//! A task's status and the group that holds it are the same value: moving a
//! task between groups is a status change. The set is closed and the display
//! order is fixed (`todo`, `in_progress`, `completed`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};

/// Group key, doubling as task and subtask status.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum GroupKey {
    /// Not started.
    #[default]
    #[strum(serialize = "todo", serialize = "to_do")]
    Todo,
    /// Being worked on.
    #[strum(serialize = "in_progress", serialize = "in-progress", serialize = "doing")]
    InProgress,
    /// Finished.
    #[strum(serialize = "completed", serialize = "done")]
    Completed,
}

/// Unknown group name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown group '{0}' (expected todo, in_progress or completed)")]
pub struct ParseGroupKeyError(pub String);

impl GroupKey {
    /// Every group, in display order.
    pub const ALL: [GroupKey; 3] = [GroupKey::Todo, GroupKey::InProgress, GroupKey::Completed];

    /// Parse from a group name (case-insensitive, a few aliases accepted).
    pub fn parse(s: &str) -> Result<Self, ParseGroupKeyError> {
        <Self as FromStr>::from_str(s.trim()).map_err(|_| ParseGroupKeyError(s.to_string()))
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKey::Todo => "todo",
            GroupKey::InProgress => "in_progress",
            GroupKey::Completed => "completed",
        }
    }

    /// Header label for views (`in_progress` reads as "in progress").
    pub fn label(&self) -> &'static str {
        match self {
            GroupKey::Todo => "todo",
            GroupKey::InProgress => "in progress",
            GroupKey::Completed => "completed",
        }
    }

    /// Position in display order.
    pub fn index(&self) -> usize {
        match self {
            GroupKey::Todo => 0,
            GroupKey::InProgress => 1,
            GroupKey::Completed => 2,
        }
    }

    /// Inverse of [`GroupKey::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Iterate all groups in display order.
    pub fn iter_all() -> impl Iterator<Item = GroupKey> {
        Self::iter()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
