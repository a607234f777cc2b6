//! Source adapters: stateless bidirectional conversion between host
//! commerce records and domain entities.
//!
//! Adapters never persist anything; persistence belongs to the data stores.
//! They fail only when a required upstream field is structurally absent or
//! unparseable - optional fields map to explicit empty/zero values, never
//! silently dropped.

use poynt_bridge_core::types::{CurrencyCode, MoneyError};
use thiserror::Error;

pub mod customer;
pub mod order;
pub mod payment_token;

pub use customer::CustomerAdapter;
pub use order::OrderAdapter;
pub use payment_token::PaymentTokenAdapter;

/// Adapter failure: a required upstream field cannot be mapped.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A required field is structurally absent from the host record.
    #[error("missing required field '{field}' on {record}")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    /// A money field could not be parsed.
    #[error("bad amount in '{field}': {source}")]
    BadAmount {
        field: &'static str,
        #[source]
        source: MoneyError,
    },
}

/// Resolve the currency for an order's items: the owning order's currency
/// when present, otherwise the store-wide default. Shared by every
/// item-type adapter.
#[must_use]
pub fn resolve_currency(order_currency: Option<&str>, default: CurrencyCode) -> CurrencyCode {
    order_currency
        .and_then(|raw| CurrencyCode::parse(raw).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_currency_prefers_order() {
        assert_eq!(
            resolve_currency(Some("EUR"), CurrencyCode::USD),
            CurrencyCode::EUR
        );
    }

    #[test]
    fn test_resolve_currency_falls_back_to_default() {
        assert_eq!(resolve_currency(None, CurrencyCode::GBP), CurrencyCode::GBP);
        // Unknown codes fall back too rather than failing the conversion
        assert_eq!(
            resolve_currency(Some("???"), CurrencyCode::CAD),
            CurrencyCode::CAD
        );
    }
}
