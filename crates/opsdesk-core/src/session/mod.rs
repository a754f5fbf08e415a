//! Session domain module.
//!
//! This module contains all session-related domain models, the in-memory
//! store that enforces their invariants, and the repository interface for
//! persistence.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ConversationMessage`)
//! - `model`: Core session domain model (`ChatSession`)
//! - `store`: The session store (`SessionStore`, `StoreState`)
//! - `repository`: Repository trait for whole-store persistence

mod message;
mod model;
mod repository;
mod store;

// Re-export public API
pub use message::{ConversationMessage, MessageRole};
pub use model::{ChatSession, NEW_SESSION_TITLE, UNTITLED_SESSION_TITLE};
pub use repository::StoreRepository;
pub use store::{SessionStore, StoreState};
