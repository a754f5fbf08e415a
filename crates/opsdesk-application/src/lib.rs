//! Application layer for opsdesk.
//!
//! Hosts the chat use case: the orchestration glue between the session
//! store, the directive interpreter, and the remote assistant backend.

pub mod chat_usecase;

pub use chat_usecase::{ChatUseCase, FALLBACK_REPLY, SendOutcome};
