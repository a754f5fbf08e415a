//! Directive execution against the operations gateway.

use super::matcher::match_directive;
use super::model::Directive;
use crate::ops::{OpsGateway, OpsReply};
use std::sync::Arc;

/// Executes directives found in user input and synthesizes local replies.
///
/// A matched directive never falls through to the remote backend: even when
/// the operations call fails, the interpreter answers with a failure-worded
/// reply instead.
pub struct DirectiveInterpreter {
    gateway: Arc<dyn OpsGateway>,
}

impl DirectiveInterpreter {
    /// Creates a new interpreter over the given operations gateway.
    pub fn new(gateway: Arc<dyn OpsGateway>) -> Self {
        Self { gateway }
    }

    /// Scans `input` for a directive and executes it.
    ///
    /// # Returns
    ///
    /// - `Some(reply)`: A directive matched; `reply` is the synthesized
    ///   assistant text and the remote backend must not be called
    /// - `None`: No directive matched; the turn proceeds to the backend
    pub async fn intercept(&self, input: &str) -> Option<String> {
        let directive = match_directive(input)?;
        Some(self.execute(directive).await)
    }

    async fn execute(&self, directive: Directive) -> String {
        match directive {
            Directive::SendChannelMessage { channel, text } => {
                match self.gateway.send_channel_message(&channel, &text).await {
                    Ok(reply) if reply.success => {
                        format!("Done - your message was sent to {}.", channel)
                    }
                    Ok(reply) => failure_reply("send the message", reply.error.as_deref()),
                    Err(e) => {
                        tracing::warn!("[DirectiveInterpreter] send_channel_message failed: {}", e);
                        failure_reply("send the message", Some(&e.to_string()))
                    }
                }
            }
            Directive::PipelineStats => match self.gateway.pipeline_stats().await {
                Ok(reply) if reply.success => {
                    with_payload("Here are the current pipeline stats", &reply)
                }
                Ok(reply) => failure_reply("fetch pipeline stats", reply.error.as_deref()),
                Err(e) => {
                    tracing::warn!("[DirectiveInterpreter] pipeline_stats failed: {}", e);
                    failure_reply("fetch pipeline stats", Some(&e.to_string()))
                }
            },
            Directive::ListLeads => match self.gateway.list_leads().await {
                Ok(reply) if reply.success => with_payload("Here are the latest leads", &reply),
                Ok(reply) => failure_reply("fetch the leads", reply.error.as_deref()),
                Err(e) => {
                    tracing::warn!("[DirectiveInterpreter] list_leads failed: {}", e);
                    failure_reply("fetch the leads", Some(&e.to_string()))
                }
            },
            Directive::HealthCheck => match self.gateway.health_check().await {
                Ok(reply) if reply.success => "All systems are up and running.".to_string(),
                Ok(reply) => match reply.error {
                    Some(error) => format!("Health check reported a problem: {}", error),
                    None => "Health check reported a problem.".to_string(),
                },
                Err(e) => {
                    tracing::warn!("[DirectiveInterpreter] health_check failed: {}", e);
                    failure_reply("reach the health endpoint", Some(&e.to_string()))
                }
            },
        }
    }
}

fn with_payload(lead_in: &str, reply: &OpsReply) -> String {
    match reply.normalized_data() {
        Some(data) => {
            let rendered =
                serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
            format!("{}:\n{}", lead_in, rendered)
        }
        None => format!("{}: nothing to show right now.", lead_in),
    }
}

fn failure_reply(action: &str, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("I couldn't {}: {}", action, detail),
        None => format!("I couldn't {} right now. Please try again later.", action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockOpsGateway {
        sent: Mutex<Vec<(String, String)>>,
        fail_sends: bool,
        stats_reply: Option<OpsReply>,
    }

    #[async_trait]
    impl OpsGateway for MockOpsGateway {
        async fn send_channel_message(
            &self,
            channel: &str,
            text: &str,
        ) -> anyhow::Result<OpsReply> {
            if self.fail_sends {
                anyhow::bail!("connection refused");
            }
            self.sent
                .lock()
                .unwrap()
                .push((channel.to_string(), text.to_string()));
            Ok(OpsReply::ok(json!({"delivered": true})))
        }

        async fn pipeline_stats(&self) -> anyhow::Result<OpsReply> {
            Ok(self
                .stats_reply
                .clone()
                .unwrap_or_else(|| OpsReply::ok(json!({"open": 3}))))
        }

        async fn list_leads(&self) -> anyhow::Result<OpsReply> {
            Ok(OpsReply::ok(json!([{"name": "Acme Corp"}])))
        }

        async fn health_check(&self) -> anyhow::Result<OpsReply> {
            Ok(OpsReply::ok(json!({"healthy": true})))
        }
    }

    #[tokio::test]
    async fn test_no_directive_returns_none() {
        let interpreter = DirectiveInterpreter::new(Arc::new(MockOpsGateway::default()));
        assert!(interpreter.intercept("write a haiku").await.is_none());
    }

    #[tokio::test]
    async fn test_send_directive_reaches_gateway() {
        let gateway = Arc::new(MockOpsGateway::default());
        let interpreter = DirectiveInterpreter::new(gateway.clone());

        let reply = interpreter
            .intercept("send to #wins: Acme signed")
            .await
            .unwrap();

        assert!(reply.contains("#wins"));
        assert_eq!(
            gateway.sent.lock().unwrap().as_slice(),
            &[("#wins".to_string(), "Acme signed".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failed_side_effect_still_replies() {
        let gateway = Arc::new(MockOpsGateway {
            fail_sends: true,
            ..Default::default()
        });
        let interpreter = DirectiveInterpreter::new(gateway);

        let reply = interpreter
            .intercept("send to #wins: Acme signed")
            .await
            .unwrap();

        assert!(reply.contains("couldn't"));
        assert!(reply.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_produces_failure_reply() {
        let gateway = Arc::new(MockOpsGateway {
            stats_reply: Some(OpsReply::failed("warehouse offline")),
            ..Default::default()
        });
        let interpreter = DirectiveInterpreter::new(gateway);

        let reply = interpreter.intercept("show pipeline stats").await.unwrap();
        assert!(reply.contains("warehouse offline"));
    }

    #[tokio::test]
    async fn test_stats_reply_renders_payload() {
        let interpreter = DirectiveInterpreter::new(Arc::new(MockOpsGateway::default()));
        let reply = interpreter.intercept("show pipeline stats").await.unwrap();
        assert!(reply.contains("pipeline stats"));
        assert!(reply.contains("\"open\": 3"));
    }

    #[tokio::test]
    async fn test_double_encoded_payload_is_unwrapped() {
        let gateway = Arc::new(MockOpsGateway {
            stats_reply: Some(OpsReply::ok(serde_json::Value::String(
                r#"{"open": 7}"#.to_string(),
            ))),
            ..Default::default()
        });
        let interpreter = DirectiveInterpreter::new(gateway);

        let reply = interpreter.intercept("show pipeline stats").await.unwrap();
        assert!(reply.contains("\"open\": 7"));
    }
}
