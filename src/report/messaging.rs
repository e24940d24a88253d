use crate::config::{EmailFailurePolicy, ReportsConfig};
use crate::core::{Incident, IncidentId, IncidentStore, PluginRegistry, Report};
use crate::messaging::{ConversationCommand, Fields, MessageTemplate, MessageType, ReportType};
use crate::report::DispatchError;
use crate::resolve::resolve_attr;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Maps a report type to the command that files it and the message type
/// used for its reminders.
///
/// Report types other than tactical and executive map to `(None, None)`.
pub fn get_report_reminder_settings(
    report_type: &ReportType,
) -> (Option<ConversationCommand>, Option<MessageType>) {
    match report_type {
        ReportType::TacticalReport => (
            Some(ConversationCommand::TacticalReport),
            Some(MessageType::IncidentTacticalReport),
        ),
        ReportType::ExecutiveReport => (
            Some(ConversationCommand::ExecutiveReport),
            Some(MessageType::IncidentExecutiveReport),
        ),
        ReportType::Other(_) => (None, None),
    }
}

fn into_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

fn skipped(reason: &'static str) {
    metrics::counter!("report_messages_skipped_total", "reason" => reason).increment(1);
}

fn sent(kind: &'static str) {
    metrics::counter!("report_messages_sent_total", "kind" => kind).increment(1);
}

fn failed(kind: &'static str) {
    metrics::counter!("report_send_failures_total", "kind" => kind).increment(1);
}

/// Sends reports and reminders for incidents.
pub struct ReportMessenger<S: IncidentStore, P: PluginRegistry> {
    store: Arc<S>,
    plugins: Arc<P>,
    config: ReportsConfig,
}

impl<S: IncidentStore, P: PluginRegistry> ReportMessenger<S, P> {
    /// Creates a new `ReportMessenger`.
    pub fn new(store: Arc<S>, plugins: Arc<P>, config: ReportsConfig) -> Self {
        Self {
            store,
            plugins,
            config,
        }
    }

    /// Sends a tactical report to the incident's conversation channel.
    #[instrument(skip(self, conditions, actions, needs))]
    pub async fn send_tactical_report_to_conversation(
        &self,
        incident_id: IncidentId,
        conditions: &str,
        actions: &str,
        needs: &str,
    ) -> Result<(), DispatchError> {
        let incident = self.store.get(incident_id).await?;

        let Some(plugin) = self.plugins.active_conversation(incident.project.id).await else {
            warn!("Tactical report not sent, no conversation plugin enabled.");
            skipped("no_conversation_plugin");
            return Ok(());
        };

        let fields = into_fields(json!({
            "conditions": conditions,
            "actions": actions,
            "needs": needs,
        }));

        let result = plugin
            .send(
                &incident.conversation.channel_id,
                "Incident Tactical Report",
                MessageTemplate::IncidentTacticalReport,
                MessageType::IncidentTacticalReport,
                true,
                &fields,
            )
            .await;
        if let Err(e) = result {
            failed("tactical_conversation");
            return Err(e.into());
        }
        sent("tactical_conversation");

        debug!(
            channel = %incident.conversation.channel_id,
            "Tactical report sent to conversation."
        );
        Ok(())
    }

    /// Emails a tactical report to the incident's tactical group.
    ///
    /// With the default [`EmailFailurePolicy::Log`], transport failures are
    /// logged and not returned, so the caller cannot tell whether the email
    /// went out.
    #[instrument(skip(self, tactical_report))]
    pub async fn send_tactical_report_to_tactical_group(
        &self,
        incident_id: IncidentId,
        tactical_report: &Report,
    ) -> Result<(), DispatchError> {
        let incident = self.store.get(incident_id).await?;

        let Some(plugin) = self.plugins.active_email(incident.project.id).await else {
            warn!("Tactical report not sent. No email plugin enabled.");
            skipped("no_email_plugin");
            return Ok(());
        };

        let notification_text = "Tactical Report";
        let commander = &incident.commander;
        let fields = into_fields(json!({
            "name": incident.name,
            "title": incident.title,
            "conditions": tactical_report.detail("conditions"),
            "actions": tactical_report.detail("actions"),
            "needs": tactical_report.detail("needs"),
            "contact_fullname": commander.individual.name,
            "contact_team": commander.team,
            "contact_weblink": commander.individual.weblink,
        }));

        let address = &incident.tactical_group.email;
        let result = plugin
            .send(
                address,
                notification_text,
                MessageTemplate::IncidentTacticalReport,
                MessageType::IncidentTacticalReport,
                &fields,
            )
            .await;

        match result {
            Ok(()) => {
                sent("tactical_group");
                debug!(%address, "Tactical report sent to tactical group.");
            }
            Err(e) => {
                failed("tactical_group");
                match self.config.tactical_group_failures {
                    EmailFailurePolicy::Log => {
                        error!(%address, error = %e, "Error in sending {} email", notification_text);
                    }
                    EmailFailurePolicy::Propagate => return Err(e.into()),
                }
            }
        }
        Ok(())
    }

    /// Emails an executive report to the incident's notifications group.
    ///
    /// With the default [`EmailFailurePolicy::Propagate`], transport failures
    /// are returned to the caller.
    #[instrument(skip(self, executive_report))]
    pub async fn send_executive_report_to_notifications_group(
        &self,
        incident_id: IncidentId,
        executive_report: &Report,
    ) -> Result<(), DispatchError> {
        let incident = self.store.get(incident_id).await?;

        let Some(plugin) = self.plugins.active_email(incident.project.id).await else {
            warn!("Executive report not sent. No email plugin enabled.");
            skipped("no_email_plugin");
            return Ok(());
        };

        let notification_text = "Executive Report";
        let address = &incident.notifications_group.email;
        let fields = into_fields(json!({
            "name": incident.name,
            "title": incident.title,
            "current_status": executive_report.detail("current_status"),
            "overview": executive_report.detail("overview"),
            "next_steps": executive_report.detail("next_steps"),
            "weblink": resolve_attr(executive_report, "document.weblink"),
            "notifications_group": address,
            "contact_fullname": incident.commander.individual.name,
            "contact_weblink": incident.commander.individual.weblink,
        }));

        let result = plugin
            .send(
                address,
                notification_text,
                MessageTemplate::IncidentExecutiveReport,
                MessageType::IncidentExecutiveReport,
                &fields,
            )
            .await;

        match result {
            Ok(()) => {
                sent("notifications_group");
                debug!(%address, "Executive report sent to notifications group.");
            }
            Err(e) => {
                failed("notifications_group");
                match self.config.notifications_group_failures {
                    EmailFailurePolicy::Log => {
                        error!(%address, error = %e, "Error in sending {} email", notification_text);
                    }
                    EmailFailurePolicy::Propagate => return Err(e.into()),
                }
            }
        }
        Ok(())
    }

    /// Sends the incident commander a direct message asking for a report.
    ///
    /// A delayed reminder (`reminder == true`) first clears the matching
    /// pending-reminder field and commits the incident. Nothing is sent while
    /// the last tactical report is younger than the configured quiet period.
    #[instrument(skip_all, fields(incident_id = incident.id, report_type = %report_type, reminder = reminder))]
    pub async fn send_incident_report_reminder(
        &self,
        incident: &mut Incident,
        report_type: &ReportType,
        reminder: bool,
    ) -> Result<(), DispatchError> {
        let message_text = format!("Incident {} Reminder", report_type);
        let message_template = if reminder {
            MessageTemplate::IncidentReportReminderDelayed
        } else {
            MessageTemplate::IncidentReportReminder
        };
        let (command_name, message_type) = get_report_reminder_settings(report_type);

        if reminder {
            match report_type {
                ReportType::TacticalReport => incident.delay_tactical_report_reminder = None,
                ReportType::ExecutiveReport => incident.delay_executive_report_reminder = None,
                ReportType::Other(_) => {}
            }
            self.store.commit(incident).await?;
        }

        if let Some(last_report) = &incident.last_tactical_report {
            let quiet_period = self.config.reminder_quiet_period();
            if Utc::now() - last_report.created_at < quiet_period {
                debug!(
                    last_reported_at = %last_report.created_at,
                    "Recent tactical report found, reminder not sent."
                );
                skipped("recent_report");
                return Ok(());
            }
        }

        let Some(plugin) = self.plugins.active_conversation(incident.project.id).await else {
            warn!("Incident report reminder not sent, no conversation plugin enabled.");
            skipped("no_conversation_plugin");
            return Ok(());
        };

        let report_command = plugin.get_command_name(command_name);
        let ticket_weblink = resolve_attr(&*incident, "ticket.weblink");

        let items = vec![into_fields(json!({
            "command": report_command,
            "name": incident.name,
            "report_type": report_type,
            "ticket_weblink": ticket_weblink,
            "title": incident.title,
            "incident_id": incident.id,
            "organization_slug": incident.project.organization.slug,
        }))];

        let address = &incident.commander.individual.email;
        let result = plugin
            .send_direct(address, &message_text, message_template, message_type, &items)
            .await;
        if let Err(e) = result {
            failed("report_reminder");
            return Err(e.into());
        }
        sent("report_reminder");

        debug!(%address, "Incident report reminder sent.");
        Ok(())
    }
}
