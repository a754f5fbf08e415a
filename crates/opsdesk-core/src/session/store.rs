//! The session store.
//!
//! `SessionStore` is the single source of truth for all sessions and the
//! active-session pointer. All mutation goes through it so the session
//! invariants hold:
//!
//! - A session's history never exceeds the configured bound; appending past
//!   the bound evicts the oldest entries.
//! - A title is derived exactly once from the first user message while the
//!   title is still the creation sentinel; only an explicit rename changes it
//!   afterwards.
//! - If the active pointer is set, it references an existing session;
//!   deleting the active session repoints it to the first remaining session.

use super::message::ConversationMessage;
use super::model::{ChatSession, NEW_SESSION_TITLE, UNTITLED_SESSION_TITLE};
use crate::config::ChatConfig;
use serde::{Deserialize, Serialize};

/// The serializable state owned by a [`SessionStore`]: the session list and
/// the active-session pointer. Persisted as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    /// All sessions, newest-created first (insertion order, not recency of use)
    pub sessions: Vec<ChatSession>,
    /// Weak reference (by id) to the currently displayed session
    pub active_session_id: Option<String>,
}

/// In-memory store for conversation sessions.
///
/// The store is a plain value; callers that need shared mutable access wrap
/// it (the application layer uses `Arc<RwLock<SessionStore>>`). Persistence
/// is the caller's concern: read the state via [`SessionStore::state`] after
/// each mutation and hand it to a `StoreRepository`.
#[derive(Debug)]
pub struct SessionStore {
    state: StoreState,
    config: ChatConfig,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new(config: ChatConfig) -> Self {
        Self {
            state: StoreState::default(),
            config,
        }
    }

    /// Rebuilds a store from previously persisted state.
    ///
    /// A dangling active pointer (referencing a session that no longer
    /// exists) is cleared rather than rejected, so a partially corrupted
    /// snapshot still loads.
    pub fn from_state(mut state: StoreState, config: ChatConfig) -> Self {
        let dangling = state
            .active_session_id
            .as_ref()
            .is_some_and(|id| !state.sessions.iter().any(|s| &s.id == id));
        if dangling {
            tracing::warn!(
                "[SessionStore] Active session {:?} not found in loaded state, clearing",
                state.active_session_id
            );
            state.active_session_id = None;
        }
        Self { state, config }
    }

    /// Returns the current store state.
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Returns all sessions, newest-created first.
    pub fn sessions(&self) -> &[ChatSession] {
        &self.state.sessions
    }

    /// Returns the ID of the currently active session.
    pub fn active_session_id(&self) -> Option<&str> {
        self.state.active_session_id.as_deref()
    }

    /// Returns the currently active session.
    pub fn get_active(&self) -> Option<&ChatSession> {
        let id = self.state.active_session_id.as_deref()?;
        self.find(id)
    }

    /// Finds a session by its ID.
    pub fn find(&self, session_id: &str) -> Option<&ChatSession> {
        self.state.sessions.iter().find(|s| s.id == session_id)
    }

    /// Creates a new session, inserts it at the front of the list, and sets
    /// it active.
    pub fn create_session(&mut self) -> &ChatSession {
        let session = ChatSession::new();
        self.state.active_session_id = Some(session.id.clone());
        self.state.sessions.insert(0, session);
        &self.state.sessions[0]
    }

    /// Removes the session with the given ID.
    ///
    /// Missing IDs are a no-op, not an error. If the removed session was
    /// active, the first remaining session in list order becomes active, or
    /// the pointer clears when the list is empty.
    pub fn delete_session(&mut self, session_id: &str) {
        let before = self.state.sessions.len();
        self.state.sessions.retain(|s| s.id != session_id);
        if self.state.sessions.len() == before {
            return;
        }

        if self.state.active_session_id.as_deref() == Some(session_id) {
            self.state.active_session_id = self.state.sessions.first().map(|s| s.id.clone());
        }
    }

    /// Renames a session.
    ///
    /// The new title is trimmed; an empty result falls back to
    /// [`UNTITLED_SESSION_TITLE`]. Missing IDs are a no-op.
    pub fn rename_session(&mut self, session_id: &str, new_title: &str) {
        let Some(session) = self.find_mut(session_id) else {
            return;
        };

        let trimmed = new_title.trim();
        session.title = if trimmed.is_empty() {
            UNTITLED_SESSION_TITLE.to_string()
        } else {
            trimmed.to_string()
        };
        session.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// Appends messages to a session, evicting the oldest entries when the
    /// history bound is exceeded.
    ///
    /// Messages that are empty after trimming are ignored. While the title is
    /// still the creation sentinel and the combined history contains a user
    /// message, the title is derived from the first user message. Missing IDs
    /// are a no-op.
    pub fn append_messages(&mut self, session_id: &str, messages: Vec<ConversationMessage>) {
        let max_history = self.config.max_history;
        let title_max_chars = self.config.title_max_chars;

        let Some(session) = self.find_mut(session_id) else {
            return;
        };

        let incoming: Vec<ConversationMessage> = messages
            .into_iter()
            .filter(|m| !m.text.trim().is_empty())
            .collect();
        if incoming.is_empty() {
            return;
        }

        session.messages.extend(incoming);

        // Title derivation looks at the combined list before eviction so the
        // very first user message wins even when it is about to be dropped.
        if session.title == NEW_SESSION_TITLE {
            if let Some(first_user) = session.messages.iter().find(|m| m.is_user()) {
                session.title = derive_title(&first_user.text, title_max_chars);
            }
        }

        if session.messages.len() > max_history {
            let excess = session.messages.len() - max_history;
            session.messages.drain(..excess);
        }

        session.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// Sets the active session pointer. Missing IDs are a no-op.
    pub fn select_session(&mut self, session_id: &str) {
        if self.state.sessions.iter().any(|s| s.id == session_id) {
            self.state.active_session_id = Some(session_id.to_string());
        }
    }

    fn find_mut(&mut self, session_id: &str) -> Option<&mut ChatSession> {
        self.state.sessions.iter_mut().find(|s| s.id == session_id)
    }
}

/// Derives a session title from message text: whitespace runs collapse to
/// single spaces, the result is trimmed, and anything past `max_chars`
/// characters is cut and marked with an ellipsis.
fn derive_title(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > max_chars {
        let head: String = collapsed.chars().take(max_chars).collect();
        format!("{head}…")
    } else {
        collapsed
    }
}
