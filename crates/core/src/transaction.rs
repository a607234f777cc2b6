//! Payment transactions recorded against an order.
//!
//! Transaction kinds form a closed enum with an explicit kind→slug mapping
//! table; the slug is the `{type}` segment of the stored metadata keys
//! (`_{provider}_{type}_{property}`). Each transaction is a new record keyed
//! by kind and provider; transactions are never updated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payment_method::PaymentMethod;
use crate::types::{CurrencyAmount, OrderId, TransactionStatus};

/// The closed set of transaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Payment,
    Capture,
    Refund,
    Void,
}

/// Explicit kind → metadata slug mapping.
const KIND_SLUGS: [(TransactionKind, &str); 4] = [
    (TransactionKind::Payment, "payment"),
    (TransactionKind::Capture, "capture"),
    (TransactionKind::Refund, "refund"),
    (TransactionKind::Void, "void"),
];

impl TransactionKind {
    /// Metadata slug used in stored key names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        KIND_SLUGS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or("payment", |(_, slug)| slug)
    }

    /// Resolve a kind from its metadata slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        KIND_SLUGS
            .iter()
            .find(|(_, candidate)| *candidate == slug)
            .map(|(kind, _)| *kind)
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment action against an order.
///
/// The transaction holds a weak reference to its order by id; it does not
/// own the order. `remote_id` is set if and only if the corresponding remote
/// push succeeded - its absence is the signal that a dependent push must be
/// rescheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<String>,
    pub kind: TransactionKind,
    pub remote_id: Option<String>,
    /// Remote id of the parent transaction (a capture's payment).
    pub remote_parent_id: Option<String>,
    /// Payments provider name (e.g. "poynt").
    pub provider: String,
    pub created_at: DateTime<Utc>,
    pub total: CurrencyAmount,
    pub status: TransactionStatus,
    pub payment_method: Option<PaymentMethod>,
    pub order_id: OrderId,
    /// True for an authorization-only payment that has not yet captured
    /// funds. Only meaningful for `Payment` transactions.
    pub auth_only: bool,
}

impl Transaction {
    /// True for an approved payment or capture that moved funds.
    #[must_use]
    pub fn captures_funds(&self) -> bool {
        self.status == TransactionStatus::Approved
            && match self.kind {
                TransactionKind::Payment => !self.auth_only,
                TransactionKind::Capture => true,
                TransactionKind::Refund | TransactionKind::Void => false,
            }
    }
}
