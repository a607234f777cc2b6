//! Data stores: facades over host metadata storage.
//!
//! Entity state is marshaled through the source adapters and written as
//! provider-scoped metadata keys of the form `_{provider}_{kind}_{property}`
//! (dots in property paths replaced with underscores). All writes for one
//! `save` call buffer on the host record and flush in a single persistence
//! operation.

use thiserror::Error;

use crate::adapters::ConversionError;
use crate::host::{HostError, HostOrder};

pub mod customer;
pub mod payment_method;
pub mod transaction;

pub use customer::CustomerDataStore;
pub use payment_method::PaymentMethodDataStore;
pub use transaction::OrderTransactionDataStore;

/// Errors surfaced by data-store reads and saves.
#[derive(Debug, Error)]
pub enum DataStoreError {
    /// The requested entity or its host record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The entity's owning order/customer record does not exist.
    #[error("missing owner: {0}")]
    MissingOwner(String),

    /// No payments provider name could be resolved.
    #[error("no payments provider name available")]
    MissingProviderName,

    /// Host storage failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Adapter failed to marshal a value.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Metadata key construction.
pub mod keys {
    /// Flag set when an approved, non-auth-only payment or capture has
    /// moved funds.
    pub const IS_CAPTURED: &str = "_mwc_payments_is_captured";

    /// Provider name stored on the order at checkout time.
    pub const PROVIDER_NAME: &str = "_mwc_payments_provider_name";

    /// Key for one mapped entity property:
    /// `_{provider}_{kind}_{property}`, dots replaced with underscores.
    #[must_use]
    pub fn property_key(provider: &str, kind: &str, property: &str) -> String {
        format!("_{provider}_{kind}_{}", property.replace('.', "_"))
    }

    /// Key holding an order's remote id for the given provider.
    #[must_use]
    pub fn order_remote_id(provider: &str) -> String {
        property_key(provider, "order", "remoteId")
    }

    /// Key holding a customer's remote id for the given provider.
    #[must_use]
    pub fn customer_remote_id(provider: &str) -> String {
        property_key(provider, "customer", "remoteId")
    }
}

/// Resolve the payments provider name for an order-scoped store.
///
/// Precedence is fixed: explicit constructor argument, then the value
/// stored on the order, then the order's payment method name.
///
/// # Errors
///
/// Returns [`DataStoreError::MissingProviderName`] when all three sources
/// are absent - there is exactly one failure mode.
pub fn resolve_provider(
    explicit: Option<&str>,
    order: &HostOrder,
) -> Result<String, DataStoreError> {
    explicit
        .or_else(|| order.get_meta(keys::PROVIDER_NAME))
        .or(order.payment_method.as_deref())
        .map(ToString::to_string)
        .ok_or(DataStoreError::MissingProviderName)
}
