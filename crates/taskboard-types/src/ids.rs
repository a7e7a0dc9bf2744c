//! Typed identifiers for tasks and subtasks.
//!
//! Ids are assigned by the server and are opaque strings on the wire. The
//! newtypes exist so a subtask id can never be passed where a task id is
//! expected. The `short()` form is for human-facing output only and never used
//! as a lookup key.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A task identifier (server-assigned).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

/// A subtask identifier (server-assigned).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtaskId(String);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Wrap a server-assigned id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw id string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First 8 characters, for human display only (not lookup).
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((end, _)) => &self.0[..end],
                    None => &self.0,
                }
            }

            /// Check if this is the empty id (never assigned by a server).
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<&str> for $T {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $T {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $T {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $T {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $T {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($name, "({})"), self.0)
            }
        }
    };
}

impl_typed_id!(TaskId, "TaskId");
impl_typed_id!(SubtaskId, "SubtaskId");

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_truncates_long_ids() {
        let id = TaskId::new("64f1a2b3c4d5e6f708192a3b");
        assert_eq!(id.short(), "64f1a2b3");
    }

    #[test]
    fn test_short_keeps_short_ids() {
        let id = SubtaskId::new("s1");
        assert_eq!(id.short(), "s1");
    }

    #[test]
    fn test_debug_names_the_kind() {
        assert_eq!(format!("{:?}", TaskId::new("a")), "TaskId(a)");
        assert_eq!(format!("{:?}", SubtaskId::new("b")), "SubtaskId(b)");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&TaskId::new("t-1")).unwrap();
        assert_eq!(json, "\"t-1\"");
        let parsed: SubtaskId = serde_json::from_str("\"s-9\"").unwrap();
        assert_eq!(parsed, "s-9");
    }

    #[test]
    fn test_borrow_allows_str_lookup() {
        let mut set = std::collections::HashSet::new();
        set.insert(TaskId::new("x"));
        assert!(set.contains("x"));
    }
}
