//! Host-platform collaborator interfaces.
//!
//! The commerce platform supplies order storage, metadata persistence, the
//! background-job queue, and an options store. None of that is reimplemented
//! here; the sync layer consumes it through these traits. [`memory`]
//! provides the in-memory implementation used by the binary scaffold and
//! the tests.

use async_trait::async_trait;
use poynt_bridge_core::job::SyncJob;
use poynt_bridge_core::types::{CustomerId, JobId, OrderId};
use thiserror::Error;

pub mod memory;
pub mod types;

pub use memory::MemoryHost;
pub use types::{HostAddress, HostCustomer, HostItemKind, HostOrder, HostOrderItem, HostPaymentToken};

/// Errors surfaced by host platform storage.
#[derive(Debug, Error)]
pub enum HostError {
    /// The storage layer rejected or lost the operation.
    #[error("host storage failure: {0}")]
    Storage(String),
}

/// Order repository plus metadata flush.
#[async_trait]
pub trait OrderRecords: Send + Sync {
    /// Load an order by id. `None` when the record does not exist.
    async fn get(&self, id: OrderId) -> Result<Option<HostOrder>, HostError>;

    /// Flush the record, including all buffered metadata writes, in one
    /// persistence operation.
    async fn persist(&self, order: &HostOrder) -> Result<(), HostError>;
}

/// Customer repository plus metadata flush.
#[async_trait]
pub trait CustomerRecords: Send + Sync {
    /// Load a customer by id. `None` when the record does not exist.
    async fn get(&self, id: CustomerId) -> Result<Option<HostCustomer>, HostError>;

    /// Flush the record, including all buffered metadata writes.
    async fn persist(&self, customer: &HostCustomer) -> Result<(), HostError>;
}

/// Background-job store supplied by the host scheduler.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Enqueue a new job.
    async fn create(&self, job: SyncJob) -> Result<(), HostError>;

    /// Load a job by id.
    async fn get(&self, id: JobId) -> Result<Option<SyncJob>, HostError>;

    /// Persist updated job fields.
    async fn update(&self, job: &SyncJob) -> Result<(), HostError>;

    /// Pop the oldest pending job, if any. Used by the worker loop.
    async fn next_pending(&self) -> Result<Option<SyncJob>, HostError>;
}

/// Options-style key/value storage for credentials and tokens.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a setting.
    async fn get(&self, key: &str) -> Result<Option<String>, HostError>;

    /// Write a setting.
    async fn put(&self, key: &str, value: &str) -> Result<(), HostError>;
}

/// Well-known settings keys.
pub mod settings_keys {
    /// Persisted remote access token.
    pub const ACCESS_TOKEN: &str = "poynt_bridge_access_token";
    /// Application id received via the onboarding webhook.
    pub const APPLICATION_ID: &str = "poynt_bridge_application_id";
    /// Business id received via the onboarding webhook.
    pub const BUSINESS_ID: &str = "poynt_bridge_business_id";
    /// Service id received via the onboarding webhook.
    pub const SERVICE_ID: &str = "poynt_bridge_service_id";
    /// Private key received via the onboarding webhook.
    pub const PRIVATE_KEY: &str = "poynt_bridge_private_key";
    /// Whether the commerce subsystem is active; producers fail fast when
    /// this is anything but "yes".
    pub const COMMERCE_ACTIVE: &str = "poynt_bridge_commerce_active";
}
