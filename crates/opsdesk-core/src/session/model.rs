//! Session domain model.
//!
//! This module contains the core `ChatSession` entity that represents one
//! named, bounded conversation thread in the application's domain layer.

use super::message::ConversationMessage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel title assigned to a session at creation, before a title has been
/// derived from the first user message.
pub const NEW_SESSION_TITLE: &str = "New Chat";

/// Title assigned when a rename request reduces to the empty string.
pub const UNTITLED_SESSION_TITLE: &str = "Untitled";

/// Represents a conversation session in the application's domain layer.
///
/// A session contains:
/// - An opaque unique identifier, stable for the session's lifetime
/// - A human-readable title
/// - The bounded conversation history, oldest first
/// - Timestamps for creation and last update
///
/// This is the "pure" domain model that business logic operates on,
/// independent of any specific storage format or version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Conversation history, oldest first, bounded by the store
    pub messages: Vec<ConversationMessage>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
}

impl ChatSession {
    /// Creates an empty session with a fresh UUID and the sentinel title.
    pub fn new() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            title: NEW_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Returns the trailing `window` messages, oldest first.
    pub fn recent_turns(&self, window: usize) -> &[ConversationMessage] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }

    /// Returns true while the title is still the creation sentinel.
    pub fn has_sentinel_title(&self) -> bool {
        self.title == NEW_SESSION_TITLE
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
