//! Grouped task board and its reconciliation engine.
//!
//! Everything here is pure and synchronous: a [`Board`] snapshot goes in,
//! a new one comes out. The session that owns a board and talks to the
//! server lives in `taskboard-client`.
//!
//! # Orders
//!
//! Every group's tasks, and every task's subtasks, carry an `order` that
//! should be the contiguous sequence `0..n-1` in display order. All
//! rebalancing, whether from a local drag or a remote update, goes through
//! [`shift_orders_for_update`]. A delete pushed by the server leaves a gap
//! until the server's follow-up updates (or the next full snapshot) close it,
//! unless [`ReduceOptions::compact_on_delete`] is set.
//!
//! # Modules
//!
//! |----------------|--------------------------------------------------|
//! | Module         | Purpose                                          |
//! |----------------|--------------------------------------------------|
//! | `ordering`     | List reorder/move helpers and rebalancing        |
//! | `board`        | Copy-on-write three-group store, local edits     |
//! | `reducer`      | Apply one pushed partial update                  |
//! | `invariants`   | Structural checks over a board                   |
//! |----------------|--------------------------------------------------|

mod board;
mod error;
pub mod invariants;
pub mod ordering;
pub mod reducer;

pub use board::{Board, Group};
pub use error::BoardError;
pub use invariants::Violation;
pub use ordering::{
    Ordered, insert_at_order, is_contiguous, move_between_lists, move_to_order, renumber,
    reorder_within_list, shift_orders_for_update,
};
pub use reducer::{Outcome, ReduceOptions, Reduction, SkipReason, apply, apply_all};

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;
