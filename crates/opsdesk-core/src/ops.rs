//! Operations gateway abstraction.
//!
//! The directive interpreter performs its side effects through this trait so
//! the HTTP transport stays swappable in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope returned by every operations endpoint: a success flag
/// plus an optional payload or error string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpsReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OpsReply {
    /// Creates a successful reply carrying a payload.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates a failed reply carrying an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Returns the payload with double-encoded JSON unwrapped.
    pub fn normalized_data(&self) -> Option<Value> {
        self.data.clone().map(normalize_payload)
    }
}

/// Parse-or-pass-through adapter for endpoint payloads.
///
/// Some endpoints return their payload as a JSON string rather than a
/// structured value. A string that parses to an object or array is unwrapped;
/// anything else passes through unchanged.
pub fn normalize_payload(value: Value) -> Value {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(parsed @ (Value::Object(_) | Value::Array(_))) => parsed,
            _ => Value::String(s),
        },
        other => other,
    }
}

/// An abstract gateway to the operations backend.
///
/// Each method maps to one endpoint of the notification/side-effect family.
#[async_trait]
pub trait OpsGateway: Send + Sync {
    /// Sends a message to a notification channel.
    async fn send_channel_message(&self, channel: &str, text: &str) -> anyhow::Result<OpsReply>;

    /// Fetches current pipeline statistics.
    async fn pipeline_stats(&self) -> anyhow::Result<OpsReply>;

    /// Fetches the current lead records.
    async fn list_leads(&self) -> anyhow::Result<OpsReply>;

    /// Checks backend system health.
    async fn health_check(&self) -> anyhow::Result<OpsReply>;
}
