//! In-memory host platform, used by the binary scaffold and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use poynt_bridge_core::job::{SyncJob, SyncJobStatus};
use poynt_bridge_core::types::{CustomerId, JobId, OrderId};
use tokio::sync::RwLock;

use super::{
    CustomerRecords, HostCustomer, HostError, HostOrder, JobStore, OrderRecords, SettingsStore,
};

/// An in-memory stand-in for the host commerce platform.
///
/// Orders, customers, jobs, and settings all live behind `RwLock`ed maps;
/// `persist` overwrites the stored record wholesale, which matches the
/// at-least-once, last-writer-wins semantics of the real metadata layer.
#[derive(Default)]
pub struct MemoryHost {
    orders: RwLock<HashMap<i64, HostOrder>>,
    customers: RwLock<HashMap<i64, HostCustomer>>,
    jobs: RwLock<Vec<SyncJob>>,
    settings: RwLock<HashMap<String, String>>,
}

impl MemoryHost {
    /// Create an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an order record.
    pub async fn insert_order(&self, order: HostOrder) {
        self.orders.write().await.insert(order.id, order);
    }

    /// Seed a customer record.
    pub async fn insert_customer(&self, customer: HostCustomer) {
        self.customers.write().await.insert(customer.id, customer);
    }

    /// Number of jobs currently stored, regardless of status.
    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[async_trait]
impl OrderRecords for MemoryHost {
    async fn get(&self, id: OrderId) -> Result<Option<HostOrder>, HostError> {
        Ok(self.orders.read().await.get(&id.as_i64()).cloned())
    }

    async fn persist(&self, order: &HostOrder) -> Result<(), HostError> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }
}

#[async_trait]
impl CustomerRecords for MemoryHost {
    async fn get(&self, id: CustomerId) -> Result<Option<HostCustomer>, HostError> {
        Ok(self.customers.read().await.get(&id.as_i64()).cloned())
    }

    async fn persist(&self, customer: &HostCustomer) -> Result<(), HostError> {
        self.customers
            .write()
            .await
            .insert(customer.id, customer.clone());
        Ok(())
    }
}

#[async_trait]
impl JobStore for MemoryHost {
    async fn create(&self, job: SyncJob) -> Result<(), HostError> {
        self.jobs.write().await.push(job);
        Ok(())
    }

    async fn get(&self, id: JobId) -> Result<Option<SyncJob>, HostError> {
        Ok(self.jobs.read().await.iter().find(|j| j.id == id).cloned())
    }

    async fn update(&self, job: &SyncJob) -> Result<(), HostError> {
        let mut jobs = self.jobs.write().await;
        if let Some(stored) = jobs.iter_mut().find(|j| j.id == job.id) {
            *stored = job.clone();
            Ok(())
        } else {
            Err(HostError::Storage(format!("unknown job {}", job.id)))
        }
    }

    async fn next_pending(&self) -> Result<Option<SyncJob>, HostError> {
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .find(|j| j.status == SyncJobStatus::Pending)
            .cloned())
    }
}

#[async_trait]
impl SettingsStore for MemoryHost {
    async fn get(&self, key: &str) -> Result<Option<String>, HostError> {
        Ok(self.settings.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.settings
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_order_round_trip() {
        let host = MemoryHost::new();
        let mut order = HostOrder::empty(7);
        order.update_meta("_x", "1");
        host.insert_order(order.clone()).await;

        let loaded = OrderRecords::get(&host, OrderId::new(7)).await.unwrap().unwrap();
        assert_eq!(loaded.get_meta("_x"), Some("1"));
        assert!(OrderRecords::get(&host, OrderId::new(8)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persist_overwrites() {
        let host = MemoryHost::new();
        let mut order = HostOrder::empty(1);
        host.insert_order(order.clone()).await;

        order.update_meta("_poynt_order_remoteId", "abc123");
        OrderRecords::persist(&host, &order).await.unwrap();

        let loaded = OrderRecords::get(&host, OrderId::new(1)).await.unwrap().unwrap();
        assert_eq!(loaded.get_meta("_poynt_order_remoteId"), Some("abc123"));
    }

    #[tokio::test]
    async fn test_job_store_pending_and_update() {
        let host = MemoryHost::new();
        let mut job = SyncJob::new("push-orders", "order", vec![1]);
        host.create(job.clone()).await.unwrap();

        let pending = host.next_pending().await.unwrap().unwrap();
        assert_eq!(pending.id, job.id);

        job.status = SyncJobStatus::Complete;
        host.update(&job).await.unwrap();
        assert!(host.next_pending().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_job_fails() {
        let host = MemoryHost::new();
        let job = SyncJob::new("push-orders", "order", vec![1]);
        assert!(host.update(&job).await.is_err());
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let host = MemoryHost::new();
        host.put("k", "v").await.unwrap();
        assert_eq!(
            SettingsStore::get(&host, "k").await.unwrap().as_deref(),
            Some("v")
        );
        assert!(SettingsStore::get(&host, "missing").await.unwrap().is_none());
    }
}
