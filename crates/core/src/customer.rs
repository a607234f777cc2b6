//! Customer profile entity.

use serde::{Deserialize, Serialize};

use crate::types::{Address, CustomerId};

/// A vendor-neutral customer record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<CustomerId>,
    /// External customer id on the payments service, once synced.
    pub remote_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub billing_address: Address,
    pub shipping_address: Address,
}

impl Customer {
    /// Display name composed from the name parts that are present.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let customer = Customer {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            ..Customer::default()
        };
        assert_eq!(customer.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_full_name_partial() {
        let customer = Customer {
            first_name: Some("Ada".to_string()),
            ..Customer::default()
        };
        assert_eq!(customer.full_name(), "Ada");
        assert_eq!(Customer::default().full_name(), "");
    }
}
