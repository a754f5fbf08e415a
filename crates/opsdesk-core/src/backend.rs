//! Remote assistant backend abstraction.

use crate::session::ConversationMessage;
use async_trait::async_trait;
use serde::Serialize;

/// The bounded conversation context sent alongside each remote completion
/// request: the trailing window of turns plus caller-supplied profile data.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationContext {
    /// Trailing conversation turns, oldest first.
    pub history: Vec<ConversationMessage>,
    /// Opaque profile context supplied by the caller.
    pub profile: serde_json::Value,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            profile: serde_json::Value::Null,
        }
    }
}

/// An abstract remote conversational backend.
///
/// The turn-processing pipeline treats any error from `complete` as a
/// recoverable failure and substitutes a fallback reply; implementations
/// should bound their requests with a timeout so a hung call takes the same
/// path.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Requests a completion for `message` given the conversation context.
    async fn complete(
        &self,
        message: &str,
        context: &ConversationContext,
    ) -> anyhow::Result<String>;
}
