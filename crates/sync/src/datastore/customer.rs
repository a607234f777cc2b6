//! Customer data store.

use std::sync::Arc;

use poynt_bridge_core::customer::Customer;
use poynt_bridge_core::types::CustomerId;
use tracing::instrument;

use crate::adapters::CustomerAdapter;
use crate::host::CustomerRecords;

use super::DataStoreError;

/// Facade for reading and saving customers through host customer records.
pub struct CustomerDataStore {
    customers: Arc<dyn CustomerRecords>,
    adapter: CustomerAdapter,
}

impl CustomerDataStore {
    /// Create a store pinned to one provider.
    #[must_use]
    pub fn new(customers: Arc<dyn CustomerRecords>, provider: impl Into<String>) -> Self {
        Self {
            customers,
            adapter: CustomerAdapter::new(provider),
        }
    }

    /// Load a customer by id.
    ///
    /// # Errors
    ///
    /// `NotFound` when the host record does not exist.
    #[instrument(skip(self))]
    pub async fn read(&self, id: CustomerId) -> Result<Customer, DataStoreError> {
        let record = self
            .customers
            .get(id)
            .await?
            .ok_or_else(|| DataStoreError::NotFound(format!("customer {id}")))?;
        Ok(self.adapter.convert_from_source(&record))
    }

    /// Persist a customer's mapped fields back to its host record in one
    /// flush.
    ///
    /// # Errors
    ///
    /// `MissingOwner` when the customer has no id or its host record does
    /// not exist.
    #[instrument(skip(self, customer))]
    pub async fn save(&self, customer: &Customer) -> Result<Customer, DataStoreError> {
        let id = customer
            .id
            .ok_or_else(|| DataStoreError::MissingOwner("customer without id".to_string()))?;
        let mut record = self
            .customers
            .get(id)
            .await?
            .ok_or_else(|| DataStoreError::MissingOwner(format!("customer {id}")))?;

        self.adapter.apply_to_source(customer, &mut record);
        self.customers.persist(&record).await?;

        Ok(customer.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::{HostCustomer, MemoryHost};

    #[tokio::test]
    async fn test_read_save_round_trip() {
        let host = Arc::new(MemoryHost::new());
        let mut record = HostCustomer::empty(5);
        record.email = Some("ada@example.test".to_string());
        host.insert_customer(record).await;

        let store = CustomerDataStore::new(host.clone(), "poynt");
        let mut customer = store.read(CustomerId::new(5)).await.unwrap();
        assert!(customer.remote_id.is_none());

        customer.remote_id = Some("cust-77".to_string());
        store.save(&customer).await.unwrap();

        let reloaded = store.read(CustomerId::new(5)).await.unwrap();
        assert_eq!(reloaded.remote_id.as_deref(), Some("cust-77"));
        assert_eq!(reloaded.email.as_deref(), Some("ada@example.test"));
    }

    #[tokio::test]
    async fn test_save_without_owner_fails() {
        let host = Arc::new(MemoryHost::new());
        let store = CustomerDataStore::new(host, "poynt");

        let customer = Customer {
            id: Some(CustomerId::new(9)),
            ..Customer::default()
        };
        let err = store.save(&customer).await.unwrap_err();
        assert!(matches!(err, DataStoreError::MissingOwner(_)));
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let host = Arc::new(MemoryHost::new());
        let store = CustomerDataStore::new(host, "poynt");
        let err = store.read(CustomerId::new(1)).await.unwrap_err();
        assert!(matches!(err, DataStoreError::NotFound(_)));
    }
}
