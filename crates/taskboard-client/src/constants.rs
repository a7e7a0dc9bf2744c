//! Client configuration constants.
//!
//! Centralizes hardcoded values for easier configuration and documentation.

/// Base URL for the request/response fallback transport.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/v1";

/// Collection path for tasks under the API base.
pub const TASKS_PATH: &str = "/tasks";

/// Capacity of the session event broadcast channel.
///
/// Subscribers that fall further behind than this see `Lagged` and skip ahead;
/// the board itself is read through a watch channel and is never lost.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

