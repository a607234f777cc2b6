//! Stored payment method data store.
//!
//! Payment methods live on the owning customer's token list; there is no
//! standalone token table. Saving therefore loads the customer record,
//! replaces or appends the token, and flushes the customer in one persist.

use std::sync::Arc;

use poynt_bridge_core::payment_method::PaymentMethod;
use poynt_bridge_core::types::CustomerId;
use tracing::instrument;

use crate::adapters::PaymentTokenAdapter;
use crate::host::CustomerRecords;

use super::DataStoreError;

/// Facade for reading and saving stored payment methods.
pub struct PaymentMethodDataStore {
    customers: Arc<dyn CustomerRecords>,
    adapter: PaymentTokenAdapter,
}

impl PaymentMethodDataStore {
    /// Create a store pinned to one provider.
    #[must_use]
    pub fn new(customers: Arc<dyn CustomerRecords>, provider: impl Into<String>) -> Self {
        Self {
            customers,
            adapter: PaymentTokenAdapter::new(provider),
        }
    }

    /// Load a stored payment method by owner and token id.
    ///
    /// # Errors
    ///
    /// `NotFound` when the customer or the token does not exist.
    #[instrument(skip(self))]
    pub async fn read(
        &self,
        customer_id: CustomerId,
        token_id: &str,
    ) -> Result<PaymentMethod, DataStoreError> {
        let record = self
            .customers
            .get(customer_id)
            .await?
            .ok_or_else(|| DataStoreError::NotFound(format!("customer {customer_id}")))?;
        let token = record
            .tokens
            .iter()
            .find(|token| token.id == token_id)
            .ok_or_else(|| DataStoreError::NotFound(format!("payment token {token_id}")))?;
        Ok(self.adapter.convert_from_source(token)?)
    }

    /// Persist a payment method onto its owner's token list. An existing
    /// token with the same id is replaced; otherwise the token is appended.
    ///
    /// # Errors
    ///
    /// `MissingOwner` when the method has no customer id or the owner
    /// record does not exist.
    #[instrument(skip(self, method))]
    pub async fn save(&self, method: &PaymentMethod) -> Result<PaymentMethod, DataStoreError> {
        let customer_id = method.customer_id.ok_or_else(|| {
            DataStoreError::MissingOwner("payment method without customer".to_string())
        })?;
        let mut record = self
            .customers
            .get(customer_id)
            .await?
            .ok_or_else(|| DataStoreError::MissingOwner(format!("customer {customer_id}")))?;

        let token = self.adapter.convert_to_source(method);
        match record.tokens.iter_mut().find(|slot| slot.id == token.id) {
            Some(slot) => *slot = token.clone(),
            None => record.tokens.push(token.clone()),
        }
        self.customers.persist(&record).await?;

        Ok(self.adapter.convert_from_source(&token)?)
    }
}
