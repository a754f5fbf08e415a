//! OpsApiClient - REST client for the operations endpoint family.
//!
//! Every endpoint answers the same envelope: a success flag plus an optional
//! payload or error string. Payloads may arrive double-encoded (a JSON string
//! instead of a structured value); they are normalized here, at the service
//! boundary, so nothing downstream has to care.

use crate::config::load_secret_config;
use async_trait::async_trait;
use opsdesk_core::config::ChatConfig;
use opsdesk_core::error::{OpsdeskError, Result};
use opsdesk_core::ops::{OpsGateway, OpsReply, normalize_payload};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::time::Duration;

/// Client for the operations endpoints (notifications, stats, leads, health).
#[derive(Clone)]
pub struct OpsApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpsApiClient {
    /// Creates a new client against the given base URL.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        config: &ChatConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| OpsdeskError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Loads endpoint configuration from secret.json.
    pub fn try_from_secrets(config: &ChatConfig) -> Result<Self> {
        let secrets = load_secret_config()?;
        let ops = secrets.ops.ok_or_else(|| {
            OpsdeskError::config("Ops configuration not found in secret.json".to_string())
        })?;

        Self::new(ops.base_url, ops.api_key, config)
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        self.authorized(self.client.get(format!("{}/{}", self.base_url, endpoint)))
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        self.authorized(self.client.post(format!("{}/{}", self.base_url, endpoint)))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn request_reply(&self, request: RequestBuilder, endpoint: &str) -> Result<OpsReply> {
        let response = request.send().await.map_err(|err| {
            OpsdeskError::backend(format!("{} request failed: {}", endpoint, err))
        })?;

        if !response.status().is_success() {
            return Err(OpsdeskError::backend(format!(
                "{} returned {}",
                endpoint,
                response.status()
            )));
        }

        let mut reply: OpsReply = response.json().await.map_err(|err| {
            OpsdeskError::backend(format!("Failed to parse {} response: {}", endpoint, err))
        })?;

        reply.data = reply.data.map(normalize_payload);
        Ok(reply)
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[async_trait]
impl OpsGateway for OpsApiClient {
    async fn send_channel_message(&self, channel: &str, text: &str) -> anyhow::Result<OpsReply> {
        let body = SendMessageRequest { channel, text };
        Ok(self
            .request_reply(self.post("send-message").json(&body), "send-message")
            .await?)
    }

    async fn pipeline_stats(&self) -> anyhow::Result<OpsReply> {
        Ok(self
            .request_reply(self.get("pipeline-stats"), "pipeline-stats")
            .await?)
    }

    async fn list_leads(&self) -> anyhow::Result<OpsReply> {
        Ok(self.request_reply(self.get("leads"), "leads").await?)
    }

    async fn health_check(&self) -> anyhow::Result<OpsReply> {
        Ok(self.request_reply(self.get("health"), "health").await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let client =
            OpsApiClient::new("https://hooks.example.com/", None, &ChatConfig::default()).unwrap();
        assert_eq!(client.base_url, "https://hooks.example.com");
    }

    #[test]
    fn test_send_message_request_shape() {
        let body = SendMessageRequest {
            channel: "#wins",
            text: "Acme signed",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["channel"], "#wins");
        assert_eq!(value["text"], "Acme signed");
    }
}
