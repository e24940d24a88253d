//! Sample incidents and reports for tests.

use crate::core::{
    Conversation, Document, Group, Incident, IncidentId, Individual, Organization, Participant,
    Project, ProjectId, Report, Ticket,
};
use std::collections::HashMap;

pub const SAMPLE_PROJECT_ID: ProjectId = 1;

/// An incident in project [`SAMPLE_PROJECT_ID`] with every optional field set
/// except the report timestamps and pending reminders.
pub fn sample_incident(id: IncidentId) -> Incident {
    Incident {
        id,
        name: format!("dispatch-acme-default-{}", id),
        title: "Checkout latency spike".to_string(),
        project: Project {
            id: SAMPLE_PROJECT_ID,
            name: "default".to_string(),
            organization: Organization {
                slug: "acme".to_string(),
            },
        },
        conversation: Conversation {
            channel_id: format!("C{:06}", id),
        },
        commander: Participant {
            individual: Individual {
                name: "Jordan Lee".to_string(),
                email: "jordan.lee@acme.example".to_string(),
                weblink: Some("https://directory.acme.example/jlee".to_string()),
            },
            team: Some("Payments".to_string()),
        },
        tactical_group: Group {
            email: format!("incident-{}-tactical@acme.example", id),
        },
        notifications_group: Group {
            email: "incident-notifications@acme.example".to_string(),
        },
        ticket: Some(Ticket {
            weblink: Some(format!("https://tickets.acme.example/INC-{}", id)),
        }),
        last_tactical_report: None,
        delay_tactical_report_reminder: None,
        delay_executive_report_reminder: None,
    }
}

/// A report whose details are the given key/value pairs.
pub fn report_with_details(details: &[(&str, &str)], document_weblink: Option<&str>) -> Report {
    Report {
        incident_id: None,
        details: details
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
        document: document_weblink.map(|w| Document {
            weblink: Some(w.to_string()),
        }),
    }
}
