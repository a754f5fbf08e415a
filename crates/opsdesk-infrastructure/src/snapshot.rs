//! Snapshot DTOs and migrations.
//!
//! The persisted snapshot keeps the wire layout the assistant has always
//! written: camelCase keys, `"user"`/`"model"` role labels, and the whole
//! `{sessions, activeSessionId}` structure as one document. Version 1 is the
//! legacy layout without a schema tag; version 2 adds `schemaVersion` so
//! future shape changes can migrate instead of silently discarding data.

use opsdesk_core::error::{OpsdeskError, Result};
use opsdesk_core::session::{ChatSession, ConversationMessage, StoreState};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current snapshot schema version.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 2;

/// One persisted session record. The shape is unchanged between snapshot
/// versions so far; only the envelope gained a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Unique session identifier
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Conversation history, oldest first
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
}

/// Represents V1 of the snapshot schema: the legacy layout without a
/// `schemaVersion` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotV1 {
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub active_session_id: Option<String>,
}

/// Represents V2 of the snapshot schema. Adds the `schemaVersion` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotV2 {
    pub schema_version: u32,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub active_session_id: Option<String>,
}

/// Migration from SnapshotV1 to SnapshotV2.
/// Changes: adds the `schemaVersion` tag; records are carried over as-is.
impl SnapshotV1 {
    pub fn migrate(self) -> SnapshotV2 {
        SnapshotV2 {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            sessions: self.sessions,
            active_session_id: self.active_session_id,
        }
    }
}

impl SnapshotV2 {
    /// Converts the snapshot DTO to the domain store state.
    pub fn into_state(self) -> StoreState {
        StoreState {
            sessions: self.sessions.into_iter().map(SessionRecord::into_session).collect(),
            active_session_id: self.active_session_id,
        }
    }

    /// Builds a snapshot DTO from the domain store state.
    pub fn from_state(state: &StoreState) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            sessions: state.sessions.iter().map(SessionRecord::from_session).collect(),
            active_session_id: state.active_session_id.clone(),
        }
    }
}

impl SessionRecord {
    fn into_session(self) -> ChatSession {
        ChatSession {
            id: self.id,
            title: self.title,
            messages: self.messages,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn from_session(session: &ChatSession) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            messages: session.messages.clone(),
            created_at: session.created_at.clone(),
            updated_at: session.updated_at.clone(),
        }
    }
}

/// Decodes a raw snapshot document, migrating legacy layouts.
///
/// A document without a `schemaVersion` key is treated as the legacy V1
/// layout. An unknown version is a migration error; the repository treats it
/// like a corrupt read.
pub fn decode_snapshot(value: Value) -> Result<StoreState> {
    match value.get("schemaVersion") {
        None => {
            let v1: SnapshotV1 = serde_json::from_value(value)?;
            Ok(v1.migrate().into_state())
        }
        Some(version) => {
            let version = version.as_u64().ok_or_else(|| {
                OpsdeskError::migration("schemaVersion is not an integer".to_string())
            })?;
            match version {
                2 => {
                    let v2: SnapshotV2 = serde_json::from_value(value)?;
                    Ok(v2.into_state())
                }
                other => Err(OpsdeskError::migration(format!(
                    "Unsupported snapshot schema version: {}",
                    other
                ))),
            }
        }
    }
}

/// Encodes the store state as a current-version snapshot document.
pub fn encode_snapshot(state: &StoreState) -> Result<Value> {
    Ok(serde_json::to_value(SnapshotV2::from_state(state))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_writes_wire_layout() {
        let mut state = StoreState::default();
        state.sessions.push(ChatSession {
            id: "s-1".to_string(),
            title: "Pitch review".to_string(),
            messages: vec![ConversationMessage::user("hello")],
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        });
        state.active_session_id = Some("s-1".to_string());

        let value = encode_snapshot(&state).unwrap();
        assert_eq!(value["schemaVersion"], 2);
        assert_eq!(value["activeSessionId"], "s-1");
        assert_eq!(value["sessions"][0]["createdAt"], "2024-01-01T00:00:00+00:00");
        assert_eq!(value["sessions"][0]["messages"][0]["role"], "user");
    }

    #[test]
    fn test_round_trip() {
        let mut state = StoreState::default();
        let mut session = ChatSession::new();
        session.messages.push(ConversationMessage::user("hello"));
        session.messages.push(ConversationMessage::assistant("hi there"));
        state.active_session_id = Some(session.id.clone());
        state.sessions.push(session);

        let decoded = decode_snapshot(encode_snapshot(&state).unwrap()).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_legacy_snapshot_migrates() {
        let legacy = json!({
            "sessions": [{
                "id": "legacy-1",
                "title": "Old chat",
                "messages": [
                    {"role": "user", "text": "ping", "timestamp": "2023-06-01T10:00:00Z"},
                    {"role": "model", "text": "pong", "timestamp": "2023-06-01T10:00:01Z"}
                ],
                "createdAt": "2023-06-01T10:00:00Z",
                "updatedAt": "2023-06-01T10:00:01Z"
            }],
            "activeSessionId": "legacy-1"
        });

        let state = decode_snapshot(legacy).unwrap();
        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.sessions[0].title, "Old chat");
        assert_eq!(state.sessions[0].messages.len(), 2);
        assert_eq!(state.active_session_id.as_deref(), Some("legacy-1"));
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let future = json!({"schemaVersion": 99, "sessions": [], "activeSessionId": null});
        let err = decode_snapshot(future).unwrap_err();
        assert!(matches!(err, OpsdeskError::Migration(_)));
    }

    #[test]
    fn test_empty_legacy_document() {
        let state = decode_snapshot(json!({})).unwrap();
        assert!(state.sessions.is_empty());
        assert!(state.active_session_id.is_none());
    }
}
