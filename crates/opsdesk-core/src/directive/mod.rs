//! Operational directives embedded in user input.
//!
//! Before a user turn is sent to the remote conversational backend, it is
//! scanned for a small fixed set of directives (send a channel message, show
//! pipeline stats, list leads, check system health). A matched directive is
//! executed locally and short-circuits the remote backend for that turn.

mod interpreter;
mod matcher;
mod model;

pub use interpreter::DirectiveInterpreter;
pub use matcher::match_directive;
pub use model::Directive;
