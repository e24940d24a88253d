//! An incident store backed by memory, optionally committed to a JSON file.

use crate::core::{Incident, IncidentId, IncidentStore};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("incident {0} not found")]
    NotFound(IncidentId),

    #[error("failed to commit incident {incident_id}: {reason}")]
    Commit { incident_id: IncidentId, reason: String },

    #[error("incident store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("incident store data is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Holds incidents keyed by id.
///
/// When created with [`JsonIncidentStore::open`], every commit rewrites the
/// backing file with the full incident list.
pub struct JsonIncidentStore {
    incidents: Mutex<BTreeMap<IncidentId, Incident>>,
    path: Option<PathBuf>,
}

impl JsonIncidentStore {
    /// Creates a store that only lives in memory.
    pub fn in_memory(incidents: impl IntoIterator<Item = Incident>) -> Self {
        Self {
            incidents: Mutex::new(incidents.into_iter().map(|i| (i.id, i)).collect()),
            path: None,
        }
    }

    /// Loads incidents from a JSON array file and commits back to it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read_to_string(&path).await?;
        let incidents: Vec<Incident> = serde_json::from_str(&raw)?;
        debug!(count = incidents.len(), path = %path.display(), "Loaded incidents");
        Ok(Self {
            incidents: Mutex::new(incidents.into_iter().map(|i| (i.id, i)).collect()),
            path: Some(path),
        })
    }
}

#[async_trait]
impl IncidentStore for JsonIncidentStore {
    async fn get(&self, incident_id: IncidentId) -> Result<Incident, StoreError> {
        self.incidents
            .lock()
            .await
            .get(&incident_id)
            .cloned()
            .ok_or(StoreError::NotFound(incident_id))
    }

    #[instrument(skip(self, incident), fields(incident_id = incident.id))]
    async fn commit(&self, incident: &Incident) -> Result<(), StoreError> {
        let mut incidents = self.incidents.lock().await;
        if !incidents.contains_key(&incident.id) {
            return Err(StoreError::Commit {
                incident_id: incident.id,
                reason: "incident is not tracked by this store".to_string(),
            });
        }
        incidents.insert(incident.id, incident.clone());

        if let Some(path) = &self.path {
            let all: Vec<&Incident> = incidents.values().collect();
            let body = serde_json::to_string_pretty(&all)?;
            tokio::fs::write(path, body).await?;
            debug!(path = %path.display(), "Committed incidents to disk");
        }
        Ok(())
    }
}
