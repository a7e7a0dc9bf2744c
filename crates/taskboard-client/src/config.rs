//! Session configuration.

use serde::{Deserialize, Serialize};
use taskboard_board::ReduceOptions;

use crate::constants::DEFAULT_API_BASE;

/// Settings for one sync session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Close order gaps on delete instead of waiting for the server's
    /// compensating updates.
    pub compact_on_delete: bool,
    /// Send `getTasks` as soon as the channel connects.
    pub request_snapshot_on_connect: bool,
    /// Base URL for the request/response fallback.
    pub api_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            compact_on_delete: false,
            request_snapshot_on_connect: true,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn reduce_options(&self) -> ReduceOptions {
        ReduceOptions { compact_on_delete: self.compact_on_delete }
    }
}
