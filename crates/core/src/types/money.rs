//! Currency amounts backed by decimal arithmetic.
//!
//! Amounts are stored in the currency's standard unit (dollars, not cents)
//! as a [`Decimal`], so values representable in a currency's minor unit
//! round-trip exactly through the minor-unit constructors.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when constructing or converting a [`CurrencyAmount`].
#[derive(Debug, Error)]
pub enum MoneyError {
    /// The string value is not a valid decimal amount.
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    /// The string value is not a recognized ISO 4217 currency code.
    #[error("unknown currency code '{0}'")]
    UnknownCurrency(String),
}

/// A signed monetary amount with its currency.
///
/// Negative amounts are legal and meaningful: the host platform represents
/// discounts as negative fee lines, and the payload builders split fee sums
/// by sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl CurrencyAmount {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// Build an amount from minor units (e.g., cents for USD).
    #[must_use]
    pub fn from_minor_units(units: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(units, currency_code.minor_unit_scale()),
            currency_code,
        }
    }

    /// Express the amount in minor units, truncating any sub-minor-unit
    /// precision. Values constructed via [`Self::from_minor_units`] always
    /// convert back losslessly.
    #[must_use]
    pub fn to_minor_units(&self) -> i64 {
        let scaled = self.amount * Decimal::from(10_i64.pow(self.currency_code.minor_unit_scale()));
        scaled.trunc().to_i64().unwrap_or_default()
    }

    /// Parse an amount from the host platform's string representation.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidAmount`] when the string is not a
    /// decimal number.
    pub fn parse(raw: &str, currency_code: CurrencyCode) -> Result<Self, MoneyError> {
        let amount = raw
            .trim()
            .parse::<Decimal>()
            .map_err(|_| MoneyError::InvalidAmount(raw.to_string()))?;
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// True when the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Absolute value in the same currency.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
            currency_code: self.currency_code,
        }
    }

    /// Format the bare amount for the host platform's string storage.
    #[must_use]
    pub fn to_store_string(&self) -> String {
        self.amount.to_string()
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Number of decimal places in the currency's minor unit.
    #[must_use]
    pub const fn minor_unit_scale(self) -> u32 {
        // All supported currencies use two minor-unit digits.
        2
    }

    /// The ISO 4217 alphabetic code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Parse an ISO 4217 alphabetic code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::UnknownCurrency`] for unsupported codes.
    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units_round_trip() {
        for cents in [0_i64, 1, 99, 100, 12_345, -500, -1] {
            let amount = CurrencyAmount::from_minor_units(cents, CurrencyCode::USD);
            assert_eq!(amount.to_minor_units(), cents);
        }
    }

    #[test]
    fn test_from_minor_units_scale() {
        let amount = CurrencyAmount::from_minor_units(1999, CurrencyCode::USD);
        assert_eq!(amount.to_store_string(), "19.99");
    }

    #[test]
    fn test_parse_valid() {
        let amount = CurrencyAmount::parse("42.50", CurrencyCode::EUR).unwrap();
        assert_eq!(amount.to_minor_units(), 4250);
        assert_eq!(amount.currency_code, CurrencyCode::EUR);
    }

    #[test]
    fn test_parse_invalid() {
        let err = CurrencyAmount::parse("not-a-number", CurrencyCode::USD).unwrap_err();
        assert!(matches!(err, MoneyError::InvalidAmount(_)));
    }

    #[test]
    fn test_negative_and_abs() {
        let discount = CurrencyAmount::from_minor_units(-500, CurrencyCode::USD);
        assert!(discount.is_negative());
        assert_eq!(discount.abs().to_minor_units(), 500);
        assert!(!CurrencyAmount::zero(CurrencyCode::USD).is_negative());
    }

    #[test]
    fn test_currency_code_parse() {
        assert_eq!(CurrencyCode::parse("usd").unwrap(), CurrencyCode::USD);
        assert_eq!(CurrencyCode::parse(" GBP ").unwrap(), CurrencyCode::GBP);
        assert!(CurrencyCode::parse("XYZ").is_err());
    }
}
