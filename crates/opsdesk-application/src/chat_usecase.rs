//! Chat use case implementation.
//!
//! `ChatUseCase` glues the session store, the directive interpreter, and the
//! remote assistant backend into one user-visible "send" action, and pairs
//! every store mutation with a persistence write.
//!
//! # Failure policy
//!
//! Nothing in this module propagates to the caller as an error once a send is
//! accepted: a matched directive that fails answers with a failure-worded
//! reply, a remote backend failure answers with the fixed fallback reply, and
//! a persistence failure is logged while the store keeps operating in memory.

use opsdesk_core::backend::{AssistantBackend, ConversationContext};
use opsdesk_core::config::ChatConfig;
use opsdesk_core::directive::DirectiveInterpreter;
use opsdesk_core::ops::OpsGateway;
use opsdesk_core::session::{
    ChatSession, ConversationMessage, SessionStore, StoreRepository, StoreState,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// Fixed assistant reply appended when the remote backend fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't reach the assistant just now. Please try again in a moment.";

/// Outcome of a send request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The input was empty, or a send for the target session is already in
    /// flight. Nothing was appended.
    Ignored,
    /// The turn completed with an assistant reply (remote, directive, or
    /// fallback).
    Replied { session_id: String, reply: String },
}

/// Use case for the conversation session manager.
///
/// All collaborators are injected, so tests run against in-memory doubles and
/// multiple instances can coexist. Construction loads the persisted store;
/// `dispose` is just dropping the value.
pub struct ChatUseCase {
    store: Arc<RwLock<SessionStore>>,
    repository: Arc<dyn StoreRepository>,
    backend: Arc<dyn AssistantBackend>,
    interpreter: DirectiveInterpreter,
    config: ChatConfig,
    profile: RwLock<serde_json::Value>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ChatUseCase {
    /// Creates a new `ChatUseCase`, rehydrating the store from the
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns an error only when the repository itself fails; an unreadable
    /// snapshot already loads as an empty state inside the repository.
    pub async fn new(
        repository: Arc<dyn StoreRepository>,
        backend: Arc<dyn AssistantBackend>,
        gateway: Arc<dyn OpsGateway>,
        config: ChatConfig,
    ) -> anyhow::Result<Self> {
        let state = repository.load().await?;
        let store = SessionStore::from_state(state, config.clone());

        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            repository,
            backend,
            interpreter: DirectiveInterpreter::new(gateway),
            config,
            profile: RwLock::new(serde_json::Value::Null),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    /// Sets the profile context sent with every remote completion request.
    pub async fn set_profile(&self, profile: serde_json::Value) {
        *self.profile.write().await = profile;
    }

    /// Processes one user-initiated send.
    ///
    /// The sequence: reject empty input, resolve (or create) the active
    /// session, reject when a send for that session is already in flight,
    /// append the user turn, try the directive interpreter, otherwise call
    /// the remote backend with the trailing context window. Every accepted
    /// send ends with an assistant reply appended to the session captured at
    /// send time, even when the session stopped being active in between.
    pub async fn send_message(&self, input: &str) -> SendOutcome {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return SendOutcome::Ignored;
        }

        let session_id = {
            let mut store = self.store.write().await;
            let active = store.active_session_id().map(str::to_string);
            match active {
                Some(id) => id,
                None => store.create_session().id.clone(),
            }
        };

        // Single-flight per session: the guard frees the slot on every exit
        // path, including panics.
        let Some(_guard) = FlightGuard::try_acquire(&self.in_flight, &session_id) else {
            tracing::debug!(
                "[ChatUseCase] Send for session {} already in flight, ignoring",
                session_id
            );
            return SendOutcome::Ignored;
        };

        {
            let mut store = self.store.write().await;
            store.append_messages(&session_id, vec![ConversationMessage::user(trimmed)]);
        }
        self.persist().await;

        if let Some(reply) = self.interpreter.intercept(trimmed).await {
            self.append_assistant(&session_id, &reply).await;
            return SendOutcome::Replied { session_id, reply };
        }

        let context = self.build_context(&session_id).await;
        let reply = match self.backend.complete(trimmed, &context).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("[ChatUseCase] Remote completion failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };

        self.append_assistant(&session_id, &reply).await;
        SendOutcome::Replied { session_id, reply }
    }

    /// Creates a new session and sets it active.
    pub async fn create_session(&self) -> ChatSession {
        let session = {
            let mut store = self.store.write().await;
            store.create_session().clone()
        };
        self.persist().await;
        session
    }

    /// Deletes a session. Missing IDs are a no-op.
    pub async fn delete_session(&self, session_id: &str) {
        {
            let mut store = self.store.write().await;
            store.delete_session(session_id);
        }
        self.persist().await;
    }

    /// Renames a session. Missing IDs are a no-op.
    pub async fn rename_session(&self, session_id: &str, new_title: &str) {
        {
            let mut store = self.store.write().await;
            store.rename_session(session_id, new_title);
        }
        self.persist().await;
    }

    /// Sets the active session pointer. Missing IDs are a no-op.
    pub async fn select_session(&self, session_id: &str) {
        {
            let mut store = self.store.write().await;
            store.select_session(session_id);
        }
        self.persist().await;
    }

    /// Lists all sessions, newest-created first.
    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.store.read().await.sessions().to_vec()
    }

    /// Returns the currently active session.
    pub async fn active_session(&self) -> Option<ChatSession> {
        self.store.read().await.get_active().cloned()
    }

    /// Returns the ID of the currently active session.
    pub async fn active_session_id(&self) -> Option<String> {
        self.store
            .read()
            .await
            .active_session_id()
            .map(str::to_string)
    }

    /// Returns a copy of the current store state.
    pub async fn state(&self) -> StoreState {
        self.store.read().await.state().clone()
    }

    async fn build_context(&self, session_id: &str) -> ConversationContext {
        let profile = self.profile.read().await.clone();
        let store = self.store.read().await;
        let history = store
            .find(session_id)
            .map(|session| session.recent_turns(self.config.context_window).to_vec())
            .unwrap_or_default();
        ConversationContext { history, profile }
    }

    async fn append_assistant(&self, session_id: &str, reply: &str) {
        {
            let mut store = self.store.write().await;
            store.append_messages(session_id, vec![ConversationMessage::assistant(reply)]);
        }
        self.persist().await;
    }

    async fn persist(&self) {
        let state = self.store.read().await.state().clone();
        if let Err(e) = self.repository.save(&state).await {
            tracing::warn!(
                "[ChatUseCase] Failed to persist store, continuing in memory: {}",
                e
            );
        }
    }
}

/// Removes its session from the in-flight set when dropped.
struct FlightGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
    session_id: String,
}

impl FlightGuard {
    /// Registers `session_id` as in flight; `None` when a send for the
    /// session is already running.
    fn try_acquire(in_flight: &Arc<Mutex<HashSet<String>>>, session_id: &str) -> Option<Self> {
        let mut set = match in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !set.insert(session_id.to_string()) {
            return None;
        }

        Some(Self {
            in_flight: Arc::clone(in_flight),
            session_id: session_id.to_string(),
        })
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let mut set = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        set.remove(&self.session_id);
    }
}
