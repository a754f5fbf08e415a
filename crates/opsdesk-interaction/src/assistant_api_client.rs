//! AssistantApiClient - REST client for the remote chat completion endpoint.
//!
//! The endpoint accepts `{message, context}` and answers `{response}`. Any
//! non-2xx status or malformed body surfaces as an error; the pipeline above
//! converts that into its fallback reply. Configuration is loaded from
//! secret.json.

use crate::config::load_secret_config;
use async_trait::async_trait;
use opsdesk_core::backend::{AssistantBackend, ConversationContext};
use opsdesk_core::config::ChatConfig;
use opsdesk_core::error::{OpsdeskError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the remote chat completion endpoint.
#[derive(Clone)]
pub struct AssistantApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AssistantApiClient {
    /// Creates a new client against the given base URL.
    ///
    /// The request timeout comes from `config.request_timeout_secs`; a hung
    /// remote call expires into the ordinary failure path instead of leaving
    /// a session stuck in flight.
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
        let assistant = secrets.assistant.ok_or_else(|| {
            OpsdeskError::config("Assistant configuration not found in secret.json".to_string())
        })?;

        Self::new(assistant.base_url, assistant.api_key, config)
    }

    async fn send_request(&self, body: &CompletionRequest<'_>) -> Result<String> {
        let url = format!("{}/chat", self.base_url);

        let mut request = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| OpsdeskError::backend(format!("Chat request failed: {}", err)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read chat error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|err| OpsdeskError::backend(format!("Failed to parse chat response: {}", err)))?;

        parsed
            .response
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                OpsdeskError::backend("Chat endpoint returned no response text".to_string())
            })
    }
}

#[async_trait]
impl AssistantBackend for AssistantApiClient {
    async fn complete(
        &self,
        message: &str,
        context: &ConversationContext,
    ) -> anyhow::Result<String> {
        let request = CompletionRequest { message, context };
        Ok(self.send_request(&request).await?)
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    message: &'a str,
    context: &'a ConversationContext,
}

#[derive(Deserialize)]
struct CompletionResponse {
    response: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

/// Error bodies arrive either as a bare string or as a structured object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Message(String),
    Detailed {
        message: Option<String>,
        status: Option<String>,
    },
}

fn map_http_error(status: StatusCode, body: String) -> OpsdeskError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| match wrapper.error {
            ErrorBody::Message(message) => message,
            ErrorBody::Detailed {
                message,
                status: status_text,
            } => {
                let message = message.unwrap_or_else(|| body.clone());
                match status_text {
                    Some(status_text) if !status_text.is_empty() => {
                        format!("{}: {}", status_text, message)
                    }
                    _ => message,
                }
            }
        })
        .unwrap_or_else(|_| body.clone());

    OpsdeskError::backend(format!("Chat endpoint returned {}: {}", status, message))
}
