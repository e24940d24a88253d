//! A transport that writes rendered messages to the log instead of sending them.
//!
//! Useful as a dry-run plugin and for checking which messages a project
//! would receive before wiring up a real integration.

use crate::core::{ConversationPlugin, EmailPlugin};
use crate::formatting::{PlainTextFormatter, TextFormatter};
use crate::messaging::{ConversationCommand, Fields, MessageTemplate, MessageType};
use crate::plugins::TransportError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, instrument};

pub const DEFAULT_COMMAND_PREFIX: &str = "/dispatch-";

pub struct LogTransport {
    name: String,
    command_prefix: String,
    formatter: PlainTextFormatter,
    sent: AtomicUsize,
}

impl LogTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            formatter: PlainTextFormatter,
            sent: AtomicUsize::new(0),
        }
    }

    pub fn with_command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = prefix.into();
        self
    }

    /// Number of messages written so far.
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversationPlugin for LogTransport {
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
        let text = self.formatter.format_message(title, template, fields);
        info!(%notification_type, persist, "Channel message:\n{}", text);
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    #[instrument(skip_all, fields(transport = %self.name, address = %address, items = items.len()))]
    async fn send_direct(
        &self,
        address: &str,
        title: &str,
        template: MessageTemplate,
        message_type: Option<MessageType>,
        items: &[Fields],
    ) -> Result<(), TransportError> {
        let text = self.formatter.format_items(title, template, items);
        info!(message_type = ?message_type, "Direct message:\n{}", text);
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get_command_name(&self, command: Option<ConversationCommand>) -> Option<String> {
        command.map(|c| format!("{}{}", self.command_prefix, c))
    }
}

#[async_trait]
impl EmailPlugin for LogTransport {
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
        let text = self.formatter.format_message(title, template, fields);
        info!(%message_type, "Email:\n{}", text);
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
