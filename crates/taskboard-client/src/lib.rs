//! Taskboard client library.
//!
//! Keeps a local board in step with a taskboard server over a push channel.
//! The pieces, from the inside out:
//!
//! - [`controller`]: pure planners turning user gestures into a board change
//!   and an outbound [`Intent`](taskboard_types::Intent)
//! - [`SyncSession`]: the lifecycle state machine that owns the board, feeds
//!   inbound messages through the reducer and sends intents through an
//!   [`IntentSink`]
//! - [`spawn_session`]: a tokio actor around a session, driven through a
//!   cloneable [`SessionHandle`]
//!
//! The transport itself is out of scope: whoever owns the socket calls
//! [`SessionHandle::connected`], [`SessionHandle::deliver`] and
//! [`SessionHandle::disconnected`], and drains the sink. [`http`] maps the
//! same intents onto REST routes for the request/response fallback.

pub mod actor;
pub mod config;
pub mod constants;
pub mod controller;
pub mod events;
pub mod http;
pub mod session;
pub mod sink;

pub use actor::{ActorError, SessionHandle, spawn_session};
pub use config::ClientConfig;
pub use controller::{LocalAction, LocalMutation, SubtaskSlot, TaskSlot};
pub use events::{ConnectionStatus, Notice, SessionEvent, SyncGeneration};
pub use http::{HttpRequest, Method};
pub use session::{LocalEffect, SessionError, SkipReason, SyncResult, SyncSession};
pub use sink::{IntentSink, TransportError};
