//! Raw host-platform record shapes.
//!
//! These mirror what the commerce platform actually stores: string-typed
//! amounts, loosely-typed item rows, and a flat key/value metadata map per
//! record. Metadata writes buffer on the record; the owning store's
//! `persist` call is the single flush.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A postal address as the host platform stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Kind discriminator for order item rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostItemKind {
    Line,
    Fee,
    Shipping,
    Tax,
}

/// One item row on a host order.
///
/// Which optional fields are populated depends on `kind`: line items carry
/// `quantity`/`product_id`/`subtotal`, shipping rows carry `method`, tax
/// rows carry `rate_name`/`rate_percent`. Amounts are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostOrderItem {
    pub id: i64,
    pub kind: HostItemKind,
    pub label: String,
    pub quantity: Option<u32>,
    pub product_id: Option<i64>,
    pub sku: Option<String>,
    pub subtotal: Option<String>,
    pub total: String,
    pub tax: String,
    pub method: Option<String>,
    pub rate_name: Option<String>,
    pub rate_percent: Option<String>,
}

/// A stored payment token attached to a customer or order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPaymentToken {
    pub id: String,
    /// Gateway that owns the token (e.g. "poynt").
    pub gateway: String,
    /// Token kind: "card" or "bank_account".
    pub kind: String,
    /// Remote token reference, when the gateway has one.
    pub token: Option<String>,
    pub customer_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub card_brand: Option<String>,
    pub last_four: Option<String>,
    pub expiry_month: Option<u8>,
    pub expiry_year: Option<u16>,
    pub bank_name: Option<String>,
    pub masked_account: Option<String>,
}

/// A commerce order as the host platform hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostOrder {
    pub id: i64,
    pub number: String,
    pub status: String,
    pub currency: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer_id: Option<i64>,
    pub customer_ip: Option<String>,
    pub billing: HostAddress,
    pub shipping: HostAddress,
    pub items: Vec<HostOrderItem>,
    /// Grand total as a decimal string.
    pub total: String,
    /// Payment gateway identifier chosen at checkout.
    pub payment_method: Option<String>,
    /// Shipping method identifier chosen at checkout.
    pub shipping_method: Option<String>,
    /// Externally-visible transaction id shown to the merchant.
    pub transaction_id: Option<String>,
    /// Payment tokens attached to this order.
    pub tokens: Vec<HostPaymentToken>,
    meta: BTreeMap<String, String>,
}

impl HostOrder {
    /// An empty order record with the given id, for building in tests and
    /// `convert_to_source`.
    #[must_use]
    pub fn empty(id: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            number: id.to_string(),
            status: "pending".to_string(),
            currency: None,
            created_at: now,
            updated_at: now,
            customer_id: None,
            customer_ip: None,
            billing: HostAddress::default(),
            shipping: HostAddress::default(),
            items: Vec::new(),
            total: "0".to_string(),
            payment_method: None,
            shipping_method: None,
            transaction_id: None,
            tokens: Vec::new(),
            meta: BTreeMap::new(),
        }
    }

    /// Read a metadata value.
    #[must_use]
    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// Buffer a metadata write. Nothing is persisted until the record is
    /// passed to the order store's `persist`.
    pub fn update_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(key.into(), value.into());
    }

    /// All buffered metadata, in deterministic key order.
    #[must_use]
    pub const fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    /// Attach a payment token to the order.
    pub fn attach_token(&mut self, token: HostPaymentToken) {
        self.tokens.push(token);
    }
}

/// A customer record as the host platform hands it over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCustomer {
    pub id: i64,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub billing: HostAddress,
    pub shipping: HostAddress,
    pub tokens: Vec<HostPaymentToken>,
    meta: BTreeMap<String, String>,
}

impl HostCustomer {
    /// An empty customer record with the given id.
    #[must_use]
    pub fn empty(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Read a metadata value.
    #[must_use]
    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// Buffer a metadata write.
    pub fn update_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(key.into(), value.into());
    }
}
