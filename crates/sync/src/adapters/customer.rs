//! Customer conversion between host records and the domain model.

use poynt_bridge_core::customer::Customer;
use poynt_bridge_core::types::CustomerId;

use crate::datastore::keys;
use crate::host::HostCustomer;

/// Bidirectional customer adapter.
///
/// The remote customer id is stored as provider-scoped metadata on the
/// host record, so both directions take the provider name.
#[derive(Debug, Clone)]
pub struct CustomerAdapter {
    provider: String,
}

impl CustomerAdapter {
    /// Create an adapter scoped to one payments provider.
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }

    /// Map a host customer onto the domain model. Absent fields become
    /// `None`; nothing here is required.
    #[must_use]
    pub fn convert_from_source(&self, source: &HostCustomer) -> Customer {
        Customer {
            id: Some(CustomerId::new(source.id)),
            remote_id: source
                .get_meta(&keys::customer_remote_id(&self.provider))
                .map(ToString::to_string),
            first_name: source.first_name.clone(),
            last_name: source.last_name.clone(),
            email: source.email.clone(),
            billing_address: super::order::address_from_source(&source.billing),
            shipping_address: super::order::address_from_source(&source.shipping),
        }
    }

    /// Write every mapped field back onto a provided host record. Does not
    /// persist.
    pub fn apply_to_source(&self, customer: &Customer, target: &mut HostCustomer) {
        if let Some(id) = customer.id {
            target.id = id.as_i64();
        }
        target.first_name = customer.first_name.clone();
        target.last_name = customer.last_name.clone();
        target.email = customer.email.clone();
        target.billing = super::order::address_to_source(&customer.billing_address);
        target.shipping = super::order::address_to_source(&customer.shipping_address);
        if let Some(remote_id) = &customer.remote_id {
            target.update_meta(keys::customer_remote_id(&self.provider), remote_id.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_customer() -> HostCustomer {
        let mut customer = HostCustomer::empty(5);
        customer.email = Some("ada@example.test".to_string());
        customer.first_name = Some("Ada".to_string());
        customer.last_name = Some("Lovelace".to_string());
        customer.update_meta("_poynt_customer_remoteId", "cust-77");
        customer
    }

    #[test]
    fn test_convert_from_source() {
        let adapter = CustomerAdapter::new("poynt");
        let customer = adapter.convert_from_source(&sample_customer());
        assert_eq!(customer.id, Some(CustomerId::new(5)));
        assert_eq!(customer.remote_id.as_deref(), Some("cust-77"));
        assert_eq!(customer.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_round_trip() {
        let adapter = CustomerAdapter::new("poynt");
        let first = adapter.convert_from_source(&sample_customer());

        let mut back = HostCustomer::empty(5);
        adapter.apply_to_source(&first, &mut back);
        let second = adapter.convert_from_source(&back);

        assert_eq!(first, second);
    }
}
