//! Interaction layer for opsdesk.
//!
//! HTTP clients for the remote collaborators: the chat completion endpoint
//! the assistant delegates to, and the operations endpoint family the
//! directive interpreter calls.

pub mod assistant_api_client;
pub mod config;
pub mod ops_api_client;

pub use assistant_api_client::AssistantApiClient;
pub use config::{EndpointConfig, SecretConfig, load_secret_config};
pub use ops_api_client::OpsApiClient;
