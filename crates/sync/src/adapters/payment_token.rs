//! Payment token conversion between host stored tokens and the domain
//! payment method.

use chrono::Utc;
use poynt_bridge_core::payment_method::{PaymentMethod, PaymentMethodDetails};
use poynt_bridge_core::types::CustomerId;

use crate::host::HostPaymentToken;

use super::ConversionError;

/// Bidirectional payment token adapter.
///
/// The host platform owns the token lifecycle; this adapter only converts
/// representations.
#[derive(Debug, Clone)]
pub struct PaymentTokenAdapter {
    provider: String,
}

impl PaymentTokenAdapter {
    /// Create an adapter scoped to one payments provider.
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }

    /// Map a stored token onto a domain payment method.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::MissingField`] when a card token lacks
    /// its brand or last four, or a bank token lacks its account fields.
    pub fn convert_from_source(
        &self,
        source: &HostPaymentToken,
    ) -> Result<PaymentMethod, ConversionError> {
        let details = match source.kind.as_str() {
            "bank_account" => PaymentMethodDetails::BankAccount {
                bank_name: source.bank_name.clone().ok_or(ConversionError::MissingField {
                    record: "payment token",
                    field: "bank_name",
                })?,
                masked_account: source.masked_account.clone().ok_or(
                    ConversionError::MissingField {
                        record: "payment token",
                        field: "masked_account",
                    },
                )?,
            },
            // The host stores anything card-like under a handful of slugs;
            // treat everything that is not a bank account as a card.
            _ => PaymentMethodDetails::Card {
                brand: source.card_brand.clone().ok_or(ConversionError::MissingField {
                    record: "payment token",
                    field: "card_brand",
                })?,
                last_four: source.last_four.clone().ok_or(ConversionError::MissingField {
                    record: "payment token",
                    field: "last_four",
                })?,
                expiry_month: source.expiry_month,
                expiry_year: source.expiry_year,
            },
        };

        Ok(PaymentMethod {
            id: Some(source.id.clone()),
            remote_id: source.token.clone(),
            customer_id: source.customer_id.map(CustomerId::new),
            created_at: source.created_at,
            details,
        })
    }

    /// Build a stored token from a domain payment method. Does not persist.
    #[must_use]
    pub fn convert_to_source(&self, method: &PaymentMethod) -> HostPaymentToken {
        let mut token = HostPaymentToken {
            id: method.id.clone().unwrap_or_default(),
            gateway: self.provider.clone(),
            kind: method.kind_slug().to_string(),
            token: method.remote_id.clone(),
            customer_id: method.customer_id.map(|id| id.as_i64()),
            created_at: method.created_at.or_else(|| Some(Utc::now())),
            card_brand: None,
            last_four: None,
            expiry_month: None,
            expiry_year: None,
            bank_name: None,
            masked_account: None,
        };

        match &method.details {
            PaymentMethodDetails::Card {
                brand,
                last_four,
                expiry_month,
                expiry_year,
            } => {
                token.card_brand = Some(brand.clone());
                token.last_four = Some(last_four.clone());
                token.expiry_month = *expiry_month;
                token.expiry_year = *expiry_year;
            }
            PaymentMethodDetails::BankAccount {
                bank_name,
                masked_account,
            } => {
                token.bank_name = Some(bank_name.clone());
                token.masked_account = Some(masked_account.clone());
            }
        }

        token
    }
}
