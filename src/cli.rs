//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. These arguments are parsed at startup and then merged with
//! the configuration from the `report-dispatch.toml` file and environment variables.

use crate::core::IncidentId;
use clap::{Parser, Subcommand};
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Sends incident status reports and report reminders through the
/// conversation and email plugins active for each project.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the JSON file holding incidents.
    #[arg(short, long, value_name = "FILE")]
    pub incidents: Option<PathBuf>,

    /// Logging level, e.g. "debug" or "report_dispatch=trace".
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Post a tactical report to the incident's conversation channel.
    TacticalConversation {
        #[arg(long)]
        incident_id: IncidentId,
        #[arg(long)]
        conditions: String,
        #[arg(long)]
        actions: String,
        #[arg(long)]
        needs: String,
    },
    /// Email a tactical report to the incident's tactical group.
    TacticalGroup {
        #[arg(long)]
        incident_id: IncidentId,
        /// JSON file holding the report.
        #[arg(long, value_name = "FILE")]
        report: PathBuf,
    },
    /// Email an executive report to the incident's notifications group.
    ExecutiveGroup {
        #[arg(long)]
        incident_id: IncidentId,
        /// JSON file holding the report.
        #[arg(long, value_name = "FILE")]
        report: PathBuf,
    },
    /// Remind the incident commander to file a report.
    Reminder {
        #[arg(long)]
        incident_id: IncidentId,
        /// "Tactical Report" or "Executive Report".
        #[arg(long, default_value = "Tactical Report")]
        report_type: String,
        /// Send the escalated reminder and clear its pending flag.
        #[arg(long)]
        delayed: bool,
    },
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        if let Some(path) = &self.incidents {
            dict.insert(
                "incidents_path".into(),
                Value::from(path.to_string_lossy().into_owned()),
            );
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
