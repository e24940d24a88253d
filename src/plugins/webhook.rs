//! A transport that relays messages to an external plugin service over HTTP.

use crate::core::{ConversationPlugin, EmailPlugin};
use crate::formatting::{PlainTextFormatter, TextFormatter};
use crate::messaging::{ConversationCommand, Fields, MessageTemplate, MessageType};
use crate::plugins::log::DEFAULT_COMMAND_PREFIX;
use crate::plugins::TransportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Retry and timeout settings for webhook delivery.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WebhookRetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry, doubled after each failed attempt.
    pub initial_backoff_ms: u64,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for WebhookRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 250,
            timeout_seconds: 10,
        }
    }
}

/// Posts each message as JSON to a webhook URL.
pub struct WebhookTransport {
    name: String,
    url: String,
    command_prefix: String,
    retry: WebhookRetryConfig,
    client: reqwest::Client,
    formatter: PlainTextFormatter,
}

impl WebhookTransport {
    /// Creates a new `WebhookTransport`.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        retry: WebhookRetryConfig,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(retry.timeout_seconds))
            .build()?;
        Ok(Self {
            name: name.into(),
            url: url.into(),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            retry,
            client,
            formatter: PlainTextFormatter,
        })
    }

    pub fn with_command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = prefix.into();
        self
    }

    /// Posts the payload, retrying server errors and transport failures.
    ///
    /// Client errors (4xx) are not retried.
    async fn post(&self, payload: &Value) -> Result<(), TransportError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut backoff = Duration::from_millis(self.retry.initial_backoff_ms);

        for attempt in 1..=attempts {
            match self.client.post(&self.url).json(payload).send().await {
                Ok(res) if res.status().is_success() => {
                    debug!(attempt, "Webhook accepted message");
                    return Ok(());
                }
                Ok(res) if res.status().is_client_error() => {
                    let status = res.status();
                    let text = res.text().await.unwrap_or_default();
                    error!(status = %status, body = %text, "Webhook rejected message");
                    return Err(TransportError::Delivery(format!(
                        "status {}, body: {}",
                        status, text
                    )));
                }
                Ok(res) => {
                    warn!(attempt, status = %res.status(), "Webhook delivery failed");
                }
                Err(e) if attempts == 1 => return Err(e.into()),
                Err(e) => {
                    warn!(attempt, error = %e, "HTTP request to webhook failed");
                }
            }

            if attempt < attempts {
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        Err(TransportError::RetryExhausted { attempts })
    }
}

#[async_trait]
impl ConversationPlugin for WebhookTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(transport = %self.name, channel = channel_id))]
    async fn send(
        &self,
        channel_id: &str,
        title: &str,
        template: MessageTemplate,
        notification_type: MessageType,
        persist: bool,
        fields: &Fields,
    ) -> Result<(), TransportError> {
        let payload = json!({
            "kind": "channel",
            "target": channel_id,
            "title": title,
            "template": template,
            "message_type": notification_type,
            "persist": persist,
            "fields": fields,
            "text": self.formatter.format_message(title, template, fields),
        });
        self.post(&payload).await?;
        info!("Relayed channel message.");
        Ok(())
    }

    #[instrument(skip_all, fields(transport = %self.name, address = %address))]
    async fn send_direct(
        &self,
        address: &str,
        title: &str,
        template: MessageTemplate,
        message_type: Option<MessageType>,
        items: &[Fields],
    ) -> Result<(), TransportError> {
        let payload = json!({
            "kind": "direct",
            "target": address,
            "title": title,
            "template": template,
            "message_type": message_type,
            "items": items,
            "text": self.formatter.format_items(title, template, items),
        });
        self.post(&payload).await?;
        info!("Relayed direct message.");
        Ok(())
    }

    fn get_command_name(&self, command: Option<ConversationCommand>) -> Option<String> {
        command.map(|c| format!("{}{}", self.command_prefix, c))
    }
}

#[async_trait]
impl EmailPlugin for WebhookTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(transport = %self.name, address = %address))]
    async fn send(
        &self,
        address: &str,
        title: &str,
        template: MessageTemplate,
        message_type: MessageType,
        fields: &Fields,
    ) -> Result<(), TransportError> {
        let payload = json!({
            "kind": "email",
            "target": address,
            "title": title,
            "template": template,
            "message_type": message_type,
            "fields": fields,
            "text": self.formatter.format_message(title, template, fields),
        });
        self.post(&payload).await?;
        info!("Relayed email.");
        Ok(())
    }
}
