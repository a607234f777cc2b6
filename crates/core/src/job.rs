//! Background sync-job records.
//!
//! The job queue itself (storage, worker loop) is supplied by the host
//! platform's background-job system; this type is only the record a
//! producer creates and a handler resolves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::JobId;

/// Terminal and in-flight states of a sync job.
///
/// `CompletedWithErrors` marks a best-effort push whose attempt finished but
/// recorded remote failures, distinct from a clean `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncJobStatus {
    #[default]
    Pending,
    Complete,
    CompletedWithErrors,
    Failed,
}

/// A queued request for an asynchronous push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: JobId,
    /// Tag identifying the producer that owns this job (e.g. "push-orders").
    pub owner: String,
    /// Kind of object the id batch refers to (e.g. "order", "webhooks").
    pub object_type: String,
    /// Batch of host record ids to process.
    pub object_ids: Vec<i64>,
    pub status: SyncJobStatus,
    pub errors: Vec<String>,
    /// Number of times this work item has been rescheduled. Reschedules
    /// create a brand-new job carrying `attempt + 1`.
    pub attempt: u32,
    pub created_at: DateTime<Utc>,
}

impl SyncJob {
    /// Create a fresh pending job.
    #[must_use]
    pub fn new(owner: &str, object_type: &str, object_ids: Vec<i64>) -> Self {
        Self {
            id: JobId::generate(),
            owner: owner.to_string(),
            object_type: object_type.to_string(),
            object_ids,
            status: SyncJobStatus::Pending,
            errors: Vec::new(),
            attempt: 0,
            created_at: Utc::now(),
        }
    }

    /// A new pending job for the same work, one attempt later.
    #[must_use]
    pub fn reschedule(&self) -> Self {
        Self {
            id: JobId::generate(),
            status: SyncJobStatus::Pending,
            errors: Vec::new(),
            attempt: self.attempt + 1,
            created_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Record an error without changing status.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}
