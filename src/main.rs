//! report-dispatch - incident report and reminder sender
//!
//! Loads incidents and plugin configuration, then runs one dispatch
//! operation chosen on the command line.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use report_dispatch::{
    cli::{Cli, Command},
    config::Config,
    core::{IncidentStore, Report},
    messaging::ReportType,
    report::ReportMessenger,
    services::setup_plugin_registry,
    store::JsonIncidentStore,
};
use std::{path::Path, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            // Logging is not configured yet, install a default subscriber for this error.
            tracing_subscriber::fmt().init();
            error!("Failed to load configuration: {:#}", err);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    match &config.incidents_path {
        Some(path) => info!("Incidents: {}", path.display()),
        None => info!("Incidents: Not configured"),
    }
    info!(
        "Reminder Quiet Period: {}m",
        config.reports.reminder_quiet_period_minutes
    );
    info!(
        "Tactical Group Failures: {:?}",
        config.reports.tactical_group_failures
    );
    info!(
        "Notifications Group Failures: {:?}",
        config.reports.notifications_group_failures
    );
    info!("Plugins: {}", config.plugins.len());
    info!("-------------------------------------------------------");

    let incidents_path = config
        .incidents_path
        .clone()
        .ok_or_else(|| anyhow!("an incidents file is required (--incidents or incidents_path)"))?;
    let store = Arc::new(JsonIncidentStore::open(&incidents_path).await?);
    let plugins = Arc::new(setup_plugin_registry(&config)?);
    let messenger = ReportMessenger::new(store.clone(), plugins, config.reports.clone());

    let command = cli
        .command
        .ok_or_else(|| anyhow!("no command given"))?;

    match command {
        Command::TacticalConversation {
            incident_id,
            conditions,
            actions,
            needs,
        } => {
            messenger
                .send_tactical_report_to_conversation(incident_id, &conditions, &actions, &needs)
                .await?;
        }
        Command::TacticalGroup {
            incident_id,
            report,
        } => {
            let report = load_report(&report).await?;
            messenger
                .send_tactical_report_to_tactical_group(incident_id, &report)
                .await?;
        }
        Command::ExecutiveGroup {
            incident_id,
            report,
        } => {
            let report = load_report(&report).await?;
            messenger
                .send_executive_report_to_notifications_group(incident_id, &report)
                .await?;
        }
        Command::Reminder {
            incident_id,
            report_type,
            delayed,
        } => {
            let mut incident = store.get(incident_id).await?;
            let report_type = ReportType::from(report_type.as_str());
            messenger
                .send_incident_report_reminder(&mut incident, &report_type, delayed)
                .await?;
        }
    }

    info!("Done.");
    Ok(())
}

async fn load_report(path: &Path) -> Result<Report> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read report {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("malformed report {}", path.display()))
}
