//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including roles and message content.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message from the user.
    #[serde(rename = "user")]
    User,
    /// Message from the AI assistant.
    ///
    /// The persisted snapshot labels non-user turns `"model"`, so the
    /// variant serializes under that name.
    #[serde(rename = "model")]
    Assistant,
}

/// A single message in a conversation history.
///
/// Each message has a role (user or assistant), text, and a timestamp
/// assigned at creation time by the store. Messages are immutable once
/// created; a session only appends or evicts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The text of the message.
    pub text: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
}

impl ConversationMessage {
    /// Creates a message with the current timestamp.
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Creates a user message with the current timestamp.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    /// Creates an assistant message with the current timestamp.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    /// Returns true when this message was authored by the user.
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_labels() {
        let user = serde_json::to_value(MessageRole::User).unwrap();
        let assistant = serde_json::to_value(MessageRole::Assistant).unwrap();
        assert_eq!(user, "user");
        assert_eq!(assistant, "model");
    }

    #[test]
    fn test_constructor_assigns_timestamp() {
        let message = ConversationMessage::user("Hello");
        assert!(message.is_user());
        assert!(!message.timestamp.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(&message.timestamp).is_ok());
    }
}
