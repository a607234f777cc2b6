//! Order transaction data store.
//!
//! Transactions persist as provider-scoped metadata on their owning order,
//! one record per kind and provider. The mapped property list is fixed and
//! explicit; reads populate only the fields whose key exists, saves write
//! every resolvable property and flush once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use poynt_bridge_core::payment_method::{PaymentMethod, PaymentMethodDetails};
use poynt_bridge_core::transaction::{Transaction, TransactionKind};
use poynt_bridge_core::types::{CurrencyAmount, CurrencyCode, OrderId, TransactionStatus};
use tracing::instrument;

use crate::adapters::{PaymentTokenAdapter, resolve_currency};
use crate::host::{HostOrder, OrderRecords};

use super::{DataStoreError, keys, resolve_provider};

/// Fixed list of mapped transaction properties, in write order.
const TRANSACTION_PROPERTIES: &[&str] = &[
    "remoteId",
    "remoteParentId",
    "createdAt",
    "totalAmount",
    "currency",
    "status",
    "authOnly",
    "paymentMethod.remoteId",
    "paymentMethod.brand",
    "paymentMethod.lastFour",
];

/// Facade for reading and saving transactions on order metadata.
pub struct OrderTransactionDataStore {
    orders: Arc<dyn OrderRecords>,
    /// Provider name override; when `None` the resolver falls back to the
    /// order's stored value, then its payment method.
    provider: Option<String>,
    default_currency: CurrencyCode,
}

impl OrderTransactionDataStore {
    /// Create a store that resolves the provider name from the order.
    #[must_use]
    pub fn new(orders: Arc<dyn OrderRecords>, default_currency: CurrencyCode) -> Self {
        Self {
            orders,
            provider: None,
            default_currency,
        }
    }

    /// Create a store pinned to an explicit provider name.
    #[must_use]
    pub fn with_provider(
        orders: Arc<dyn OrderRecords>,
        provider: impl Into<String>,
        default_currency: CurrencyCode,
    ) -> Self {
        Self {
            orders,
            provider: Some(provider.into()),
            default_currency,
        }
    }

    /// Load the transaction of the given kind stored on an order.
    ///
    /// Fields without a stored key stay at entity defaults.
    ///
    /// # Errors
    ///
    /// `NotFound` when the order record is missing; `MissingProviderName`
    /// when no provider can be resolved.
    #[instrument(skip(self))]
    pub async fn read(
        &self,
        order_id: OrderId,
        kind: TransactionKind,
    ) -> Result<Transaction, DataStoreError> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| DataStoreError::NotFound(format!("order {order_id}")))?;
        let provider = resolve_provider(self.provider.as_deref(), &order)?;
        let currency = resolve_currency(order.currency.as_deref(), self.default_currency);

        let get = |property: &str| {
            order
                .get_meta(&keys::property_key(&provider, kind.as_str(), property))
                .map(ToString::to_string)
        };

        let total = get("totalAmount")
            .map(|raw| {
                let code = get("currency")
                    .and_then(|c| CurrencyCode::parse(&c).ok())
                    .unwrap_or(currency);
                CurrencyAmount::parse(&raw, code)
            })
            .transpose()
            .unwrap_or_default()
            .unwrap_or(CurrencyAmount::zero(currency));

        let payment_method = read_payment_method(&order, &provider, kind);

        Ok(Transaction {
            id: order.transaction_id.clone(),
            kind,
            remote_id: get("remoteId"),
            remote_parent_id: get("remoteParentId"),
            provider: provider.clone(),
            created_at: get("createdAt")
                .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
                .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc)),
            total,
            status: get("status").map_or_else(
                TransactionStatus::default,
                |raw| TransactionStatus::from_slug(&raw),
            ),
            payment_method,
            order_id,
            auth_only: get("authOnly").as_deref() == Some("yes"),
        })
    }

    /// Persist a transaction onto its owning order's metadata.
    ///
    /// Every mapped property that resolves to a value is written under
    /// `_{provider}_{kind}_{property}`; dates are formatted ISO-8601. Kind
    /// and status specific side effects are applied, then everything is
    /// flushed in one persistence operation.
    ///
    /// # Errors
    ///
    /// `MissingOwner` when the owning order record does not exist.
    #[instrument(skip(self, transaction), fields(order_id = %transaction.order_id, kind = %transaction.kind))]
    pub async fn save(&self, transaction: &Transaction) -> Result<Transaction, DataStoreError> {
        let mut order = self
            .orders
            .get(transaction.order_id)
            .await?
            .ok_or_else(|| {
                DataStoreError::MissingOwner(format!("order {}", transaction.order_id))
            })?;
        let provider = resolve_provider(self.provider.as_deref(), &order)?;

        for property in TRANSACTION_PROPERTIES {
            if let Some(value) = property_value(transaction, property) {
                order.update_meta(
                    keys::property_key(&provider, transaction.kind.as_str(), property),
                    value,
                );
            }
        }

        apply_side_effects(transaction, &provider, &mut order);

        // Single flush for all buffered writes
        self.orders.persist(&order).await?;

        Ok(transaction.clone())
    }
}

/// Resolve one mapped property via nested getters. The list is closed;
/// unknown paths resolve to nothing.
fn property_value(transaction: &Transaction, property: &str) -> Option<String> {
    match property {
        "remoteId" => transaction.remote_id.clone(),
        "remoteParentId" => transaction.remote_parent_id.clone(),
        "createdAt" => Some(transaction.created_at.to_rfc3339()),
        "totalAmount" => Some(transaction.total.to_store_string()),
        "currency" => Some(transaction.total.currency_code.as_str().to_string()),
        "status" => Some(transaction.status.as_str().to_string()),
        "authOnly" => Some(if transaction.auth_only { "yes" } else { "no" }.to_string()),
        "paymentMethod.remoteId" => transaction
            .payment_method
            .as_ref()
            .and_then(|m| m.remote_id.clone()),
        "paymentMethod.brand" => transaction.payment_method.as_ref().and_then(|m| {
            match &m.details {
                PaymentMethodDetails::Card { brand, .. } => Some(brand.clone()),
                PaymentMethodDetails::BankAccount { .. } => None,
            }
        }),
        "paymentMethod.lastFour" => transaction
            .payment_method
            .as_ref()
            .and_then(|m| m.last_four().map(ToString::to_string)),
        _ => None,
    }
}

fn apply_side_effects(transaction: &Transaction, provider: &str, order: &mut HostOrder) {
    // Approved payment/capture that moved funds marks the order captured
    if transaction.captures_funds() {
        order.update_meta(keys::IS_CAPTURED, "yes");
    }

    // Payments expose their remote id as the order's visible transaction id
    if transaction.kind == TransactionKind::Payment {
        order.transaction_id = transaction.remote_id.clone();
    }

    // A carried payment method becomes a stored token on the order
    if let Some(method) = &transaction.payment_method {
        let adapter = PaymentTokenAdapter::new(provider);
        order.attach_token(adapter.convert_to_source(method));
    }
}

fn read_payment_method(
    order: &HostOrder,
    provider: &str,
    kind: TransactionKind,
) -> Option<PaymentMethod> {
    let get = |property: &str| {
        order
            .get_meta(&keys::property_key(provider, kind.as_str(), property))
            .map(ToString::to_string)
    };

    let remote_id = get("paymentMethod.remoteId");
    let brand = get("paymentMethod.brand");
    let last_four = get("paymentMethod.lastFour");

    if remote_id.is_none() && brand.is_none() && last_four.is_none() {
        return None;
    }

    Some(PaymentMethod {
        id: None,
        remote_id,
        customer_id: order.customer_id.map(Into::into),
        created_at: None,
        details: PaymentMethodDetails::Card {
            brand: brand.unwrap_or_default(),
            last_four: last_four.unwrap_or_default(),
            expiry_month: None,
            expiry_year: None,
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use poynt_bridge_core::types::CustomerId;

    fn sample_order() -> HostOrder {
        let mut order = HostOrder::empty(42);
        order.currency = Some("USD".to_string());
        order.payment_method = Some("poynt".to_string());
        order
    }

    fn approved_payment(order_id: i64) -> Transaction {
        Transaction {
            id: Some("host-txn-1".to_string()),
            kind: TransactionKind::Payment,
            remote_id: Some("rmt-1".to_string()),
            remote_parent_id: None,
            provider: "poynt".to_string(),
            created_at: Utc::now(),
            total: CurrencyAmount::from_minor_units(1999, CurrencyCode::USD),
            status: TransactionStatus::Approved,
            payment_method: Some(PaymentMethod {
                id: Some("tok-1".to_string()),
                remote_id: Some("card-remote".to_string()),
                customer_id: Some(CustomerId::new(5)),
                created_at: None,
                details: PaymentMethodDetails::Card {
                    brand: "visa".to_string(),
                    last_four: "4242".to_string(),
                    expiry_month: Some(12),
                    expiry_year: Some(2030),
                },
            }),
            order_id: OrderId::new(order_id),
            auth_only: false,
        }
    }

    async fn store_with_order() -> (Arc<MemoryHost>, OrderTransactionDataStore) {
        let host = Arc::new(MemoryHost::new());
        host.insert_order(sample_order()).await;
        let store = OrderTransactionDataStore::new(host.clone(), CurrencyCode::USD);
        (host, store)
    }

    #[tokio::test]
    async fn test_save_writes_property_keys_and_flushes_once() {
        let (host, store) = store_with_order().await;
        store.save(&approved_payment(42)).await.unwrap();

        let order = OrderRecords::get(host.as_ref(), OrderId::new(42))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.get_meta("_poynt_payment_remoteId"), Some("rmt-1"));
        assert_eq!(order.get_meta("_poynt_payment_status"), Some("APPROVED"));
        assert_eq!(order.get_meta("_poynt_payment_totalAmount"), Some("19.99"));
        assert_eq!(
            order.get_meta("_poynt_payment_paymentMethod_lastFour"),
            Some("4242")
        );
    }

    #[tokio::test]
    async fn test_approved_payment_sets_captured_flag_and_transaction_id() {
        let (host, store) = store_with_order().await;
        store.save(&approved_payment(42)).await.unwrap();

        let order = OrderRecords::get(host.as_ref(), OrderId::new(42))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.get_meta(keys::IS_CAPTURED), Some("yes"));
        assert_eq!(order.transaction_id.as_deref(), Some("rmt-1"));
        // carried payment method became an attached token
        assert_eq!(order.tokens.len(), 1);
        assert_eq!(order.tokens[0].token.as_deref(), Some("card-remote"));
    }

    #[tokio::test]
    async fn test_auth_only_payment_does_not_set_captured_flag() {
        let (host, store) = store_with_order().await;
        let mut transaction = approved_payment(42);
        transaction.auth_only = true;
        store.save(&transaction).await.unwrap();

        let order = OrderRecords::get(host.as_ref(), OrderId::new(42))
            .await
            .unwrap()
            .unwrap();
        assert!(order.get_meta(keys::IS_CAPTURED).is_none());
    }

    #[tokio::test]
    async fn test_refund_persists_remote_id_under_refund_keys() {
        let (host, store) = store_with_order().await;
        let mut transaction = approved_payment(42);
        transaction.kind = TransactionKind::Refund;
        transaction.remote_id = Some("refund-7".to_string());
        transaction.payment_method = None;
        store.save(&transaction).await.unwrap();

        let order = OrderRecords::get(host.as_ref(), OrderId::new(42))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.get_meta("_poynt_refund_remoteId"), Some("refund-7"));
        // refunds never touch the captured flag
        assert!(order.get_meta(keys::IS_CAPTURED).is_none());
    }

    #[tokio::test]
    async fn test_save_without_owner_fails() {
        let host = Arc::new(MemoryHost::new());
        let store = OrderTransactionDataStore::new(host, CurrencyCode::USD);
        let err = store.save(&approved_payment(42)).await.unwrap_err();
        assert!(matches!(err, DataStoreError::MissingOwner(_)));
    }

    #[tokio::test]
    async fn test_read_round_trips_saved_fields() {
        let (_host, store) = store_with_order().await;
        let saved = approved_payment(42);
        store.save(&saved).await.unwrap();

        let loaded = store.read(OrderId::new(42), TransactionKind::Payment).await.unwrap();
        assert_eq!(loaded.remote_id, saved.remote_id);
        assert_eq!(loaded.status, saved.status);
        assert_eq!(loaded.total, saved.total);
        assert!(!loaded.auth_only);
        assert_eq!(
            loaded.payment_method.unwrap().last_four(),
            Some("4242")
        );
    }

    #[tokio::test]
    async fn test_read_unstored_fields_stay_at_defaults() {
        let (_host, store) = store_with_order().await;
        let loaded = store.read(OrderId::new(42), TransactionKind::Capture).await.unwrap();
        assert!(loaded.remote_id.is_none());
        assert_eq!(loaded.status, TransactionStatus::Pending);
        assert_eq!(loaded.total, CurrencyAmount::zero(CurrencyCode::USD));
        assert!(loaded.payment_method.is_none());
    }

    #[tokio::test]
    async fn test_read_missing_order_is_not_found() {
        let host = Arc::new(MemoryHost::new());
        let store = OrderTransactionDataStore::new(host, CurrencyCode::USD);
        let err = store
            .read(OrderId::new(9), TransactionKind::Payment)
            .await
            .unwrap_err();
        assert!(matches!(err, DataStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_provider_is_fatal() {
        let host = Arc::new(MemoryHost::new());
        let mut order = sample_order();
        order.payment_method = None;
        host.insert_order(order).await;

        let store = OrderTransactionDataStore::new(host, CurrencyCode::USD);
        let err = store
            .read(OrderId::new(42), TransactionKind::Payment)
            .await
            .unwrap_err();
        assert!(matches!(err, DataStoreError::MissingProviderName));
    }
}
