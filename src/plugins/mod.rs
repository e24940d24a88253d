//! Plugin registry and relay transports.
//!
//! The registry hands out the one plugin instance active for a given
//! (project, capability) pair. The transports in this module do not talk
//! to chat or mail providers themselves: `log` writes the rendered message
//! to the tracing output and `webhook` relays it to an external plugin
//! service over HTTP.
pub mod log;
pub mod webhook;

use crate::core::{PluginInstance, PluginRegistry, PluginType, ProjectId};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

pub use self::log::LogTransport;
pub use self::webhook::WebhookTransport;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// The transport's own retry policy gave up. The message may still
    /// have been delivered.
    #[error("delivery retries exhausted after {attempts} attempts")]
    RetryExhausted { attempts: u32 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A registry holding plugin instances keyed by project and capability.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPluginRegistry {
    instances: HashMap<(ProjectId, PluginType), PluginInstance>,
}

impl InMemoryPluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates `instance` for `project_id`.
    ///
    /// Only one instance per capability is kept; registering a second one
    /// replaces the first.
    pub fn register(&mut self, project_id: ProjectId, instance: PluginInstance) {
        let plugin_type = instance.plugin_type();
        if let Some(previous) = self.instances.insert((project_id, plugin_type), instance) {
            warn!(
                project_id,
                %plugin_type,
                ?previous,
                "Replaced an already active plugin instance"
            );
        }
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, project_id: ProjectId, instance: PluginInstance) -> Self {
        self.register(project_id, instance);
        self
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[async_trait]
impl PluginRegistry for InMemoryPluginRegistry {
    async fn get_active_instance(
        &self,
        project_id: ProjectId,
        plugin_type: PluginType,
    ) -> Option<PluginInstance> {
        self.instances.get(&(project_id, plugin_type)).cloned()
    }
}
