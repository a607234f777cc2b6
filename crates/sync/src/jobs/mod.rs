//! Background sync-job producers and the dispatcher that routes to them.
//!
//! Each producer consumes a queued [`SyncJob`], builds remote payloads from
//! domain entities, calls the remote API, and records the terminal state on
//! the job. The queue itself lives behind [`JobStore`]; the worker loop here
//! only polls it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use poynt_bridge_core::job::{SyncJob, SyncJobStatus};
use poynt_bridge_core::types::JobId;
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::host::{settings_keys, JobStore, SettingsStore};

pub mod push_orders;
pub mod push_transactions;
pub mod register_webhooks;

pub use push_orders::PushOrdersProducer;
pub use push_transactions::{PushTransactionsProducer, StatusTransactionFlow, TransactionFlow};
pub use register_webhooks::RegisterWebhooksProducer;

/// A handler for one kind of sync job.
#[async_trait]
pub trait JobProducer: Send + Sync {
    /// Owner tag this producer claims (matched against [`SyncJob::owner`]).
    fn owner(&self) -> &'static str;

    /// Object type this producer's id batches refer to.
    fn object_type(&self) -> &'static str;

    /// Process the job and return it with its terminal status set. The
    /// dispatcher persists the returned record.
    async fn handle(&self, job: SyncJob) -> Result<SyncJob>;
}

/// Routes queued jobs to their producers by owner tag.
pub struct JobDispatcher {
    jobs: Arc<dyn JobStore>,
    settings: Arc<dyn SettingsStore>,
    producers: Vec<Arc<dyn JobProducer>>,
}

impl JobDispatcher {
    /// Create a dispatcher with no producers registered.
    #[must_use]
    pub fn new(jobs: Arc<dyn JobStore>, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            jobs,
            settings,
            producers: Vec::new(),
        }
    }

    /// Register a producer.
    #[must_use]
    pub fn with_producer(mut self, producer: Arc<dyn JobProducer>) -> Self {
        self.producers.push(producer);
        self
    }

    /// Whether the commerce subsystem is onboarded and active. Jobs are
    /// left queued while it is not.
    pub async fn commerce_active(&self) -> Result<bool> {
        let flag = self.settings.get(settings_keys::COMMERCE_ACTIVE).await?;
        Ok(flag.as_deref() == Some("yes"))
    }

    /// Resolve one job: look it up, run the guards, route to its producer,
    /// and persist the terminal state.
    ///
    /// # Errors
    ///
    /// `NotFound` when the job id is unknown; storage errors pass through.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, id: JobId) -> Result<()> {
        let mut job = self
            .jobs
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("job {id}")))?;

        if job.object_ids.is_empty() {
            job.record_error("job carries no object ids");
            job.status = SyncJobStatus::Failed;
            self.jobs.update(&job).await?;
            return Ok(());
        }

        let Some(producer) = self
            .producers
            .iter()
            .find(|producer| producer.owner() == job.owner)
        else {
            warn!(owner = %job.owner, "no producer registered for job owner");
            job.record_error(format!("no producer for owner '{}'", job.owner));
            job.status = SyncJobStatus::Failed;
            self.jobs.update(&job).await?;
            return Ok(());
        };

        if job.object_type != producer.object_type() {
            job.record_error(format!(
                "expected object type '{}', got '{}'",
                producer.object_type(),
                job.object_type
            ));
            job.status = SyncJobStatus::Failed;
            self.jobs.update(&job).await?;
            return Ok(());
        }

        let resolved = producer.handle(job).await?;
        info!(job = %resolved.id, status = ?resolved.status, "job resolved");
        self.jobs.update(&resolved).await?;
        Ok(())
    }

    /// Pop and dispatch the next pending job. Returns whether a job was
    /// processed, so the worker can skip its sleep while the queue drains.
    pub async fn poll_once(&self) -> Result<bool> {
        if !self.commerce_active().await? {
            return Ok(false);
        }
        match self.jobs.next_pending().await? {
            Some(job) => {
                self.dispatch(job.id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Poll the job queue until the process exits.
pub async fn run_worker(dispatcher: Arc<JobDispatcher>, poll_interval: Duration) {
    loop {
        match dispatcher.poll_once().await {
            Ok(true) => {}
            Ok(false) => tokio::time::sleep(poll_interval).await,
            Err(error) => {
                warn!(%error, "job poll failed");
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    struct NoopProducer;

    #[async_trait]
    impl JobProducer for NoopProducer {
        fn owner(&self) -> &'static str {
            "noop"
        }

        fn object_type(&self) -> &'static str {
            "order"
        }

        async fn handle(&self, mut job: SyncJob) -> Result<SyncJob> {
            job.status = SyncJobStatus::Complete;
            Ok(job)
        }
    }

    async fn active_host() -> Arc<MemoryHost> {
        let host = Arc::new(MemoryHost::new());
        host.put(settings_keys::COMMERCE_ACTIVE, "yes").await.unwrap();
        host
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_owner() {
        let host = active_host().await;
        let dispatcher = JobDispatcher::new(host.clone(), host.clone())
            .with_producer(Arc::new(NoopProducer));

        let job = SyncJob::new("noop", "order", vec![1]);
        host.create(job.clone()).await.unwrap();
        dispatcher.dispatch(job.id).await.unwrap();

        let stored = JobStore::get(&*host, job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SyncJobStatus::Complete);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let host = active_host().await;
        let dispatcher = JobDispatcher::new(host.clone(), host);
        let err = dispatcher.dispatch(JobId::generate()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_batch_fails_the_job() {
        let host = active_host().await;
        let dispatcher = JobDispatcher::new(host.clone(), host.clone())
            .with_producer(Arc::new(NoopProducer));

        let job = SyncJob::new("noop", "order", Vec::new());
        host.create(job.clone()).await.unwrap();
        dispatcher.dispatch(job.id).await.unwrap();

        let stored = JobStore::get(&*host, job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SyncJobStatus::Failed);
        assert!(!stored.errors.is_empty());
    }

    #[tokio::test]
    async fn test_object_type_mismatch_fails_the_job() {
        let host = active_host().await;
        let dispatcher = JobDispatcher::new(host.clone(), host.clone())
            .with_producer(Arc::new(NoopProducer));

        let job = SyncJob::new("noop", "webhooks", vec![1]);
        host.create(job.clone()).await.unwrap();
        dispatcher.dispatch(job.id).await.unwrap();

        let stored = JobStore::get(&*host, job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SyncJobStatus::Failed);
    }

    #[tokio::test]
    async fn test_poll_skips_while_commerce_inactive() {
        let host = Arc::new(MemoryHost::new());
        let dispatcher = JobDispatcher::new(host.clone(), host.clone())
            .with_producer(Arc::new(NoopProducer));

        let job = SyncJob::new("noop", "order", vec![1]);
        host.create(job.clone()).await.unwrap();

        assert!(!dispatcher.poll_once().await.unwrap());
        let stored = JobStore::get(&*host, job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SyncJobStatus::Pending);

        host.put(settings_keys::COMMERCE_ACTIVE, "yes").await.unwrap();
        assert!(dispatcher.poll_once().await.unwrap());
    }
}
