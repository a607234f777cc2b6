//! Billing and shipping addresses.

use serde::{Deserialize, Serialize};

/// A postal address attached to an order or customer.
///
/// Every field is optional; the host platform frequently has partial
/// addresses (e.g., digital orders) and adapters map absent fields to
/// `None` rather than dropping the whole address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province_code: Option<String>,
    pub country_code: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Address {
    /// True when no field carries a value.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.company.is_none()
            && self.address1.is_none()
            && self.address2.is_none()
            && self.city.is_none()
            && self.province_code.is_none()
            && self.country_code.is_none()
            && self.postal_code.is_none()
            && self.phone.is_none()
            && self.email.is_none()
    }
}
