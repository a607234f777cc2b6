//! Stored payment method representations.
//!
//! The host platform owns the stored-token lifecycle; adapters only convert
//! representations between host tokens and these variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CustomerId;

/// A stored payment method belonging to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: Option<String>,
    pub remote_id: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub created_at: Option<DateTime<Utc>>,
    pub details: PaymentMethodDetails,
}

/// Variant-specific payment method details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethodDetails {
    Card {
        /// Card network (e.g. "visa").
        brand: String,
        last_four: String,
        expiry_month: Option<u8>,
        expiry_year: Option<u16>,
    },
    BankAccount {
        bank_name: String,
        /// Masked account number, last digits only.
        masked_account: String,
    },
}

impl PaymentMethod {
    /// Stored-metadata slug for the variant.
    #[must_use]
    pub const fn kind_slug(&self) -> &'static str {
        match self.details {
            PaymentMethodDetails::Card { .. } => "card",
            PaymentMethodDetails::BankAccount { .. } => "bank_account",
        }
    }

    /// Last four digits of the underlying instrument, when known.
    #[must_use]
    pub fn last_four(&self) -> Option<&str> {
        match &self.details {
            PaymentMethodDetails::Card { last_four, .. } => Some(last_four),
            PaymentMethodDetails::BankAccount { masked_account, .. } => {
                let len = masked_account.len();
                (len >= 4).then(|| masked_account.get(len - 4..)).flatten()
            }
        }
    }
}
