//! Recording transports for testing the report dispatchers.

use async_trait::async_trait;
use report_dispatch::core::{ConversationPlugin, EmailPlugin};
use report_dispatch::messaging::{ConversationCommand, Fields, MessageTemplate, MessageType};
use report_dispatch::plugins::TransportError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSend {
    pub channel_id: String,
    pub title: String,
    pub template: MessageTemplate,
    pub notification_type: MessageType,
    pub persist: bool,
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectSend {
    pub address: String,
    pub title: String,
    pub template: MessageTemplate,
    pub message_type: Option<MessageType>,
    pub items: Vec<Fields>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailSend {
    pub address: String,
    pub title: String,
    pub template: MessageTemplate,
    pub message_type: MessageType,
    pub fields: Fields,
}

/// A conversation transport that records every call.
#[derive(Debug, Default)]
pub struct RecordingConversationPlugin {
    pub sends: Mutex<Vec<ChannelSend>>,
    pub directs: Mutex<Vec<DirectSend>>,
    fail: AtomicBool,
}

impl RecordingConversationPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on_send(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sends(&self) -> Vec<ChannelSend> {
        self.sends.lock().unwrap().clone()
    }

    pub fn directs(&self) -> Vec<DirectSend> {
        self.directs.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::Delivery("conversation unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationPlugin for RecordingConversationPlugin {
    fn name(&self) -> &str {
        "recording_conversation"
    }

    async fn send(
        &self,
        channel_id: &str,
        title: &str,
        template: MessageTemplate,
        notification_type: MessageType,
        persist: bool,
        fields: &Fields,
    ) -> Result<(), TransportError> {
        self.check_failure()?;
        self.sends.lock().unwrap().push(ChannelSend {
            channel_id: channel_id.to_string(),
            title: title.to_string(),
            template,
            notification_type,
            persist,
            fields: fields.clone(),
        });
        Ok(())
    }

    async fn send_direct(
        &self,
        address: &str,
        title: &str,
        template: MessageTemplate,
        message_type: Option<MessageType>,
        items: &[Fields],
    ) -> Result<(), TransportError> {
        self.check_failure()?;
        self.directs.lock().unwrap().push(DirectSend {
            address: address.to_string(),
            title: title.to_string(),
            template,
            message_type,
            items: items.to_vec(),
        });
        Ok(())
    }

    fn get_command_name(&self, command: Option<ConversationCommand>) -> Option<String> {
        command.map(|c| format!("/dispatch-{}", c))
    }
}

/// An email transport that records every call, or fails as if its retry
/// policy had given up.
#[derive(Debug, Default)]
pub struct RecordingEmailPlugin {
    pub sent: Mutex<Vec<EmailSend>>,
    fail: AtomicBool,
}

impl RecordingEmailPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on_send(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<EmailSend> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailPlugin for RecordingEmailPlugin {
    fn name(&self) -> &str {
        "recording_email"
    }

    async fn send(
        &self,
        address: &str,
        title: &str,
        template: MessageTemplate,
        message_type: MessageType,
        fields: &Fields,
    ) -> Result<(), TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::RetryExhausted { attempts: 3 });
        }
        self.sent.lock().unwrap().push(EmailSend {
            address: address.to_string(),
            title: title.to_string(),
            template,
            message_type,
            fields: fields.clone(),
        });
        Ok(())
    }
}
