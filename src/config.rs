//! Configuration management for report-dispatch
//!
//! This module defines the main `Config` struct and its sub-structs,
//! responsible for holding all application settings. It uses the `figment`
//! crate to load configuration from a `report-dispatch.toml` file and merge it
//! with environment variables and command-line overrides.

use crate::cli::Cli;
use crate::core::{PluginType, ProjectId};
use crate::plugins::webhook::WebhookRetryConfig;
use anyhow::Result;
use chrono::TimeDelta;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "report-dispatch.toml";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Path to the JSON file holding incidents.
    #[serde(default)]
    pub incidents_path: Option<PathBuf>,
    /// Report dispatch behaviour.
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Plugin instances to activate, one per (project, capability).
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

/// What to do when an email transport fails.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailFailurePolicy {
    /// Log the failure at error level and return normally.
    Log,
    /// Return the failure to the caller.
    Propagate,
}

/// Configuration for report dispatch.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportsConfig {
    /// Reminders are suppressed while the last tactical report is younger than this.
    pub reminder_quiet_period_minutes: u64,
    /// Failure handling for tactical reports emailed to the tactical group.
    pub tactical_group_failures: EmailFailurePolicy,
    /// Failure handling for executive reports emailed to the notifications group.
    pub notifications_group_failures: EmailFailurePolicy,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            reminder_quiet_period_minutes: 60,
            tactical_group_failures: EmailFailurePolicy::Log,
            notifications_group_failures: EmailFailurePolicy::Propagate,
        }
    }
}

impl ReportsConfig {
    /// The reminder quiet period as a time span.
    ///
    /// Values too large to represent saturate to `TimeDelta::MAX`.
    pub fn reminder_quiet_period(&self) -> TimeDelta {
        i64::try_from(self.reminder_quiet_period_minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .unwrap_or(TimeDelta::MAX)
    }
}

/// How a configured plugin delivers its messages.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Write rendered messages to the log.
    Log,
    /// Relay messages to an external plugin service.
    Webhook,
}

/// A plugin instance activated for one project.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PluginConfig {
    pub project_id: ProjectId,
    pub plugin_type: PluginType,
    pub transport: TransportKind,
    /// The relay endpoint, required for webhook transports.
    #[serde(default)]
    pub url: Option<String>,
    /// Prefix prepended to command names, e.g. "/dispatch-".
    #[serde(default)]
    pub command_prefix: Option<String>,
    /// Delivery retry settings for webhook transports.
    #[serde(default)]
    pub retry: WebhookRetryConfig,
}

impl Config {
    /// Loads the application configuration by layering sources: defaults,
    /// the TOML file, environment variables and command-line arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // Allow overriding with environment variables, e.g., REPORT_DISPATCH_LOG_LEVEL=debug
            .merge(Env::prefixed("REPORT_DISPATCH_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            incidents_path: None,
            reports: ReportsConfig::default(),
            plugins: Vec::new(),
        }
    }
}
