//! The order aggregate and its item collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    Address, CurrencyAmount, CurrencyCode, CustomerId, EntityId, OrderId, OrderStatus, ProductId,
};

/// A vendor-neutral commerce order.
///
/// Created when the host platform creates an order, mutated on status
/// transitions and on each sync attempt (`remote_id` is attached once a
/// remote push succeeds). This subsystem never deletes orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Customer-facing order number (may differ from the record id).
    pub number: String,
    pub status: OrderStatus,
    pub currency_code: CurrencyCode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer_id: Option<CustomerId>,
    pub customer_ip: Option<String>,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub line_items: Vec<LineItem>,
    pub fee_items: Vec<FeeItem>,
    pub shipping_items: Vec<ShippingItem>,
    pub tax_items: Vec<TaxItem>,
    /// Sum of line item totals, before fees/shipping/tax.
    pub line_amount: CurrencyAmount,
    pub shipping_amount: CurrencyAmount,
    pub fee_amount: CurrencyAmount,
    pub tax_amount: CurrencyAmount,
    pub total_amount: CurrencyAmount,
    /// Host-side payment gateway identifier (e.g. "poynt").
    pub payment_method: Option<String>,
    /// External order id, present once the remote push succeeded.
    pub remote_id: Option<String>,
    /// Shipping method identifier chosen at checkout, used for
    /// local-delivery detection.
    pub shipping_method: Option<String>,
}

impl Order {
    /// Currency used for every amount on this order.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency_code
    }
}

/// A product line on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: EntityId,
    pub label: String,
    pub quantity: u32,
    pub product_id: Option<ProductId>,
    pub sku: Option<String>,
    /// Pre-discount amount for the full quantity.
    pub subtotal: CurrencyAmount,
    /// Post-discount amount for the full quantity.
    pub total: CurrencyAmount,
    pub tax: CurrencyAmount,
}

impl LineItem {
    /// Per-unit price derived from the subtotal.
    ///
    /// Returns `None` for a zero quantity rather than dividing by zero;
    /// the host platform should never produce such a line, but imported
    /// or hand-edited orders occasionally do.
    #[must_use]
    pub fn unit_price(&self) -> Option<CurrencyAmount> {
        if self.quantity == 0 {
            return None;
        }
        Some(CurrencyAmount::new(
            self.subtotal.amount / rust_decimal::Decimal::from(self.quantity),
            self.subtotal.currency_code,
        ))
    }
}

/// A fee line on an order. Negative totals represent discounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeItem {
    pub id: EntityId,
    pub label: String,
    pub total: CurrencyAmount,
    pub tax: CurrencyAmount,
}

/// A shipping line on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingItem {
    pub id: EntityId,
    pub label: String,
    /// Shipping method identifier (e.g. "flat_rate", "local_delivery").
    pub method: String,
    pub total: CurrencyAmount,
    pub tax: CurrencyAmount,
}

/// A tax line on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxItem {
    pub id: EntityId,
    pub label: String,
    /// Tax rate name (e.g. "VAT").
    pub name: String,
    /// Percentage rate applied.
    pub rate: rust_decimal::Decimal,
    pub total: CurrencyAmount,
}
