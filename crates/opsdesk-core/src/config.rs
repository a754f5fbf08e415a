//! Chat configuration.
//!
//! The history bound, title truncation threshold, context window, and remote
//! timeout are product constants, not algorithmic ones. They live here as
//! named, overridable settings instead of inlined literals.

use serde::{Deserialize, Serialize};

/// Default bound on retained messages per session.
pub const DEFAULT_MAX_HISTORY: usize = 25;
/// Default character limit for auto-derived session titles.
pub const DEFAULT_TITLE_MAX_CHARS: usize = 40;
/// Default number of trailing turns sent to the remote backend.
pub const DEFAULT_CONTEXT_WINDOW: usize = 6;
/// Default remote request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Tunable settings for the conversation session manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum number of messages a session retains before evicting the
    /// oldest entries.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// Maximum character count of an auto-derived title before truncation.
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
    /// Number of trailing conversation turns included in remote requests.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    /// Timeout applied to remote backend requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            context_window: DEFAULT_CONTEXT_WINDOW,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

fn default_title_max_chars() -> usize {
    DEFAULT_TITLE_MAX_CHARS
}

fn default_context_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
