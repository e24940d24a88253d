//! Core domain types and service traits for report dispatch
//!
//! This module defines the incident and report aggregates the dispatchers
//! read from, and the trait contracts for the collaborators they borrow:
//! the incident store, the plugin registry and the two transport kinds.

use crate::messaging::{ConversationCommand, Fields, MessageTemplate, MessageType};
use crate::plugins::TransportError;
use crate::store::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type IncidentId = i64;
pub type ProjectId = i64;

/// An incident and everything the report dispatchers need to reach its people.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    pub id: IncidentId,
    /// Short unique name, e.g. "dispatch-default-default-42".
    pub name: String,
    pub title: String,
    pub project: Project,
    pub conversation: Conversation,
    pub commander: Participant,
    pub tactical_group: Group,
    pub notifications_group: Group,
    #[serde(default)]
    pub ticket: Option<Ticket>,
    #[serde(default)]
    pub last_tactical_report: Option<ReportStamp>,
    /// Set while a delayed tactical report reminder is pending.
    #[serde(default)]
    pub delay_tactical_report_reminder: Option<DateTime<Utc>>,
    /// Set while a delayed executive report reminder is pending.
    #[serde(default)]
    pub delay_executive_report_reminder: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub organization: Organization,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub channel_id: String,
}

/// An incident role holder, such as the commander.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub individual: Individual,
    #[serde(default)]
    pub team: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Individual {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub weblink: Option<String>,
}

/// An email distribution group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    #[serde(default)]
    pub weblink: Option<String>,
}

/// The part of a filed report the reminder recency check looks at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportStamp {
    pub created_at: DateTime<Utc>,
}

/// A tactical or executive report filed for an incident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Report {
    #[serde(default)]
    pub incident_id: Option<IncidentId>,
    /// Free-form report body, e.g. "conditions", "actions", "needs".
    #[serde(default)]
    pub details: HashMap<String, String>,
    /// Backing document for executive reports.
    #[serde(default)]
    pub document: Option<Document>,
}

impl Report {
    /// Returns the detail stored under `key`, if any.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(default)]
    pub weblink: Option<String>,
}

// =============================================================================
// Service Traits
// =============================================================================

/// Loads and persists incidents.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Fetches an incident by id.
    ///
    /// # Returns
    /// * `Err(StoreError::NotFound)` when no incident has that id
    async fn get(&self, incident_id: IncidentId) -> Result<Incident, StoreError>;

    /// Persists the incident's current state immediately.
    async fn commit(&self, incident: &Incident) -> Result<(), StoreError>;
}

/// A chat transport able to post to channels and message individuals.
#[async_trait]
pub trait ConversationPlugin: Send + Sync {
    /// A descriptive name for the transport, used for logging.
    fn name(&self) -> &str;

    /// Posts a templated message to a channel.
    ///
    /// When `persist` is set the transport keeps a record of the sent message.
    async fn send(
        &self,
        channel_id: &str,
        title: &str,
        template: MessageTemplate,
        notification_type: MessageType,
        persist: bool,
        fields: &Fields,
    ) -> Result<(), TransportError>;

    /// Sends a one-to-one message to an individual.
    async fn send_direct(
        &self,
        address: &str,
        title: &str,
        template: MessageTemplate,
        message_type: Option<MessageType>,
        items: &[Fields],
    ) -> Result<(), TransportError>;

    /// Returns the transport's display form of a command, e.g. a slash command.
    fn get_command_name(&self, command: Option<ConversationCommand>) -> Option<String>;
}

/// An email transport.
#[async_trait]
pub trait EmailPlugin: Send + Sync {
    fn name(&self) -> &str;

    async fn send(
        &self,
        address: &str,
        title: &str,
        template: MessageTemplate,
        message_type: MessageType,
        fields: &Fields,
    ) -> Result<(), TransportError>;
}

/// The capability a plugin instance provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    Conversation,
    Email,
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginType::Conversation => f.write_str("conversation"),
            PluginType::Email => f.write_str("email"),
        }
    }
}

/// An active plugin instance, one variant per transport kind.
#[derive(Clone)]
pub enum PluginInstance {
    Conversation(Arc<dyn ConversationPlugin>),
    Email(Arc<dyn EmailPlugin>),
}

impl PluginInstance {
    pub fn plugin_type(&self) -> PluginType {
        match self {
            PluginInstance::Conversation(_) => PluginType::Conversation,
            PluginInstance::Email(_) => PluginType::Email,
        }
    }
}

impl fmt::Debug for PluginInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginInstance::Conversation(p) => write!(f, "Conversation({})", p.name()),
            PluginInstance::Email(p) => write!(f, "Email({})", p.name()),
        }
    }
}

/// Looks up the plugin instance active for a project and capability.
#[async_trait]
pub trait PluginRegistry: Send + Sync {
    /// Returns the active instance, or `None` when the capability is not
    /// enabled for the project.
    async fn get_active_instance(
        &self,
        project_id: ProjectId,
        plugin_type: PluginType,
    ) -> Option<PluginInstance>;

    /// The active conversation transport for a project, if any.
    async fn active_conversation(&self, project_id: ProjectId) -> Option<Arc<dyn ConversationPlugin>> {
        match self
            .get_active_instance(project_id, PluginType::Conversation)
            .await
        {
            Some(PluginInstance::Conversation(plugin)) => Some(plugin),
            _ => None,
        }
    }

    /// The active email transport for a project, if any.
    async fn active_email(&self, project_id: ProjectId) -> Option<Arc<dyn EmailPlugin>> {
        match self.get_active_instance(project_id, PluginType::Email).await {
            Some(PluginInstance::Email(plugin)) => Some(plugin),
            _ => None,
        }
    }
}
