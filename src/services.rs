//! Encapsulation for setting up the plugin instances named in the configuration.

use crate::{
    config::{Config, PluginConfig, TransportKind},
    core::{PluginInstance, PluginType},
    plugins::{InMemoryPluginRegistry, LogTransport, WebhookTransport},
};
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the plugin registry from the `[[plugins]]` entries of the configuration.
///
/// Webhook plugins without a URL are skipped with a warning, leaving the
/// capability disabled for that project.
pub fn setup_plugin_registry(config: &Config) -> Result<InMemoryPluginRegistry> {
    let mut registry = InMemoryPluginRegistry::new();

    for plugin in &config.plugins {
        let name = format!("{}-{}", plugin.plugin_type, plugin.project_id);
        let Some(instance) = build_instance(&name, plugin)? else {
            continue;
        };
        info!(
            project_id = plugin.project_id,
            plugin_type = %plugin.plugin_type,
            transport = ?plugin.transport,
            "Plugin instance enabled."
        );
        registry.register(plugin.project_id, instance);
    }

    Ok(registry)
}

fn build_instance(name: &str, plugin: &PluginConfig) -> Result<Option<PluginInstance>> {
    let instance = match plugin.transport {
        TransportKind::Log => {
            let mut transport = LogTransport::new(name);
            if let Some(prefix) = &plugin.command_prefix {
                transport = transport.with_command_prefix(prefix.clone());
            }
            let transport = Arc::new(transport);
            match plugin.plugin_type {
                PluginType::Conversation => PluginInstance::Conversation(transport),
                PluginType::Email => PluginInstance::Email(transport),
            }
        }
        TransportKind::Webhook => {
            let url = match plugin.url.as_deref() {
                Some(url) if !url.is_empty() => url,
                _ => {
                    warn!(
                        project_id = plugin.project_id,
                        plugin_type = %plugin.plugin_type,
                        "Webhook plugin configured without a URL. It will be disabled."
                    );
                    return Ok(None);
                }
            };
            if plugin.retry.max_attempts == 0 {
                bail!("plugin {}: retry.max_attempts must be at least 1", name);
            }
            let mut transport = WebhookTransport::new(name, url, plugin.retry.clone())?;
            if let Some(prefix) = &plugin.command_prefix {
                transport = transport.with_command_prefix(prefix.clone());
            }
            let transport = Arc::new(transport);
            match plugin.plugin_type {
                PluginType::Conversation => PluginInstance::Conversation(transport),
                PluginType::Email => PluginInstance::Email(transport),
            }
        }
    };
    Ok(Some(instance))
}
