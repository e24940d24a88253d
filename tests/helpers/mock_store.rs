//! An incident store whose commits always fail.

use async_trait::async_trait;
use report_dispatch::core::{Incident, IncidentId, IncidentStore};
use report_dispatch::store::StoreError;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct FailingCommitStore {
    pub incident: Incident,
    pub commit_attempts: AtomicUsize,
}

impl FailingCommitStore {
    pub fn new(incident: Incident) -> Self {
        Self {
            incident,
            commit_attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IncidentStore for FailingCommitStore {
    async fn get(&self, incident_id: IncidentId) -> Result<Incident, StoreError> {
        if incident_id == self.incident.id {
            Ok(self.incident.clone())
        } else {
            Err(StoreError::NotFound(incident_id))
        }
    }

    async fn commit(&self, incident: &Incident) -> Result<(), StoreError> {
        self.commit_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Commit {
            incident_id: incident.id,
            reason: "database is read-only".to_string(),
        })
    }
}
