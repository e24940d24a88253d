//! Message vocabulary shared by the report dispatchers and the transports.
//!
//! Templates are opaque identifiers here: rendering belongs to the plugin
//! that receives them. The field maps passed alongside a template must carry
//! the placeholder names that template expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Named fields interpolated into a message template.
pub type Fields = Map<String, Value>;

/// Identifies a message template known to the transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageTemplate {
    IncidentTacticalReport,
    IncidentExecutiveReport,
    IncidentReportReminder,
    IncidentReportReminderDelayed,
}

impl MessageTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageTemplate::IncidentTacticalReport => "INCIDENT_TACTICAL_REPORT",
            MessageTemplate::IncidentExecutiveReport => "INCIDENT_EXECUTIVE_REPORT",
            MessageTemplate::IncidentReportReminder => "INCIDENT_REPORT_REMINDER",
            MessageTemplate::IncidentReportReminderDelayed => "INCIDENT_REPORT_REMINDER_DELAYED",
        }
    }

    /// The placeholder names the template renders, in display order.
    pub fn placeholders(&self) -> &'static [&'static str] {
        match self {
            MessageTemplate::IncidentTacticalReport => &[
                "name",
                "title",
                "conditions",
                "actions",
                "needs",
                "contact_fullname",
                "contact_team",
                "contact_weblink",
            ],
            MessageTemplate::IncidentExecutiveReport => &[
                "name",
                "title",
                "current_status",
                "overview",
                "next_steps",
                "weblink",
                "notifications_group",
                "contact_fullname",
                "contact_weblink",
            ],
            MessageTemplate::IncidentReportReminder
            | MessageTemplate::IncidentReportReminderDelayed => &[
                "command",
                "name",
                "report_type",
                "ticket_weblink",
                "title",
                "incident_id",
                "organization_slug",
            ],
        }
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags the kind of notification a transport is delivering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    IncidentTacticalReport,
    IncidentExecutiveReport,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::IncidentTacticalReport => "incident-tactical-report",
            MessageType::IncidentExecutiveReport => "incident-executive-report",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation commands a commander can run to file a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationCommand {
    TacticalReport,
    ExecutiveReport,
}

impl ConversationCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationCommand::TacticalReport => "tactical-report",
            ConversationCommand::ExecutiveReport => "executive-report",
        }
    }
}

impl fmt::Display for ConversationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of report a reminder is about.
///
/// Tags that are neither tactical nor executive are kept verbatim in
/// `Other` so they can still be carried into reminder messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportType {
    TacticalReport,
    ExecutiveReport,
    Other(String),
}

impl ReportType {
    pub const TACTICAL: &'static str = "Tactical Report";
    pub const EXECUTIVE: &'static str = "Executive Report";

    pub fn as_str(&self) -> &str {
        match self {
            ReportType::TacticalReport => Self::TACTICAL,
            ReportType::ExecutiveReport => Self::EXECUTIVE,
            ReportType::Other(tag) => tag,
        }
    }
}

impl From<&str> for ReportType {
    fn from(tag: &str) -> Self {
        match tag {
            Self::TACTICAL | "tactical" | "tactical-report" => ReportType::TacticalReport,
            Self::EXECUTIVE | "executive" | "executive-report" => ReportType::ExecutiveReport,
            other => ReportType::Other(other.to_string()),
        }
    }
}

impl From<String> for ReportType {
    fn from(tag: String) -> Self {
        ReportType::from(tag.as_str())
    }
}

impl From<ReportType> for String {
    fn from(report_type: ReportType) -> Self {
        report_type.as_str().to_string()
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
