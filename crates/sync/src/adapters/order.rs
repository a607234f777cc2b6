//! Order and order-item conversion between host records and the domain
//! model.

use poynt_bridge_core::order::{FeeItem, LineItem, Order, ShippingItem, TaxItem};
use poynt_bridge_core::types::{
    Address, CurrencyAmount, CurrencyCode, CustomerId, EntityId, OrderId, OrderStatus, ProductId,
};
use rust_decimal::Decimal;

use crate::datastore::keys;
use crate::host::{HostAddress, HostItemKind, HostOrder, HostOrderItem};

use super::{ConversionError, resolve_currency};

/// Bidirectional order adapter.
///
/// Stateless apart from the store-wide default currency used when a host
/// record carries none.
#[derive(Debug, Clone, Copy)]
pub struct OrderAdapter {
    default_currency: CurrencyCode,
}

impl OrderAdapter {
    /// Create an adapter with the store's default currency.
    #[must_use]
    pub const fn new(default_currency: CurrencyCode) -> Self {
        Self { default_currency }
    }

    /// Map a host order onto the domain model.
    ///
    /// Aggregate amounts are recomputed from the item rows; the host's
    /// stored grand total is taken as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] when a required field is absent or an
    /// amount fails to parse. Optional fields become explicit empty/zero
    /// values instead.
    pub fn convert_from_source(&self, source: &HostOrder) -> Result<Order, ConversionError> {
        let currency = resolve_currency(source.currency.as_deref(), self.default_currency);

        let mut line_items = Vec::new();
        let mut fee_items = Vec::new();
        let mut shipping_items = Vec::new();
        let mut tax_items = Vec::new();

        for item in &source.items {
            match item.kind {
                HostItemKind::Line => line_items.push(line_item_from_source(item, currency)?),
                HostItemKind::Fee => fee_items.push(fee_item_from_source(item, currency)?),
                HostItemKind::Shipping => {
                    shipping_items.push(shipping_item_from_source(item, currency)?);
                }
                HostItemKind::Tax => tax_items.push(tax_item_from_source(item, currency)?),
            }
        }

        let line_amount = sum(line_items.iter().map(|i| i.total), currency);
        let fee_amount = sum(fee_items.iter().map(|i| i.total), currency);
        let shipping_amount = sum(shipping_items.iter().map(|i| i.total), currency);
        let tax_amount = sum(tax_items.iter().map(|i| i.total), currency);
        let total_amount =
            CurrencyAmount::parse(&source.total, currency).map_err(|source| {
                ConversionError::BadAmount {
                    field: "total",
                    source,
                }
            })?;

        let remote_id = source
            .payment_method
            .as_deref()
            .and_then(|provider| source.get_meta(&keys::order_remote_id(provider)))
            .map(ToString::to_string);

        Ok(Order {
            id: OrderId::new(source.id),
            number: source.number.clone(),
            status: OrderStatus::from_slug(&source.status),
            currency_code: currency,
            created_at: source.created_at,
            updated_at: source.updated_at,
            customer_id: source.customer_id.map(CustomerId::new),
            customer_ip: source.customer_ip.clone(),
            billing_address: address_from_source(&source.billing),
            shipping_address: address_from_source(&source.shipping),
            line_items,
            fee_items,
            shipping_items,
            tax_items,
            line_amount,
            shipping_amount,
            fee_amount,
            tax_amount,
            total_amount,
            payment_method: source.payment_method.clone(),
            remote_id,
            shipping_method: source.shipping_method.clone(),
        })
    }

    /// Write every mapped field of a domain order back onto a fresh host
    /// record. Does not persist - that is the data store's job.
    #[must_use]
    pub fn convert_to_source(&self, order: &Order) -> HostOrder {
        let mut target = HostOrder::empty(order.id.as_i64());
        self.apply_to_source(order, &mut target);
        target
    }

    /// Write every mapped field onto a provided host record, leaving
    /// unmapped metadata intact.
    pub fn apply_to_source(&self, order: &Order, target: &mut HostOrder) {
        target.id = order.id.as_i64();
        target.number = order.number.clone();
        target.status = order.status.as_str().to_string();
        target.currency = Some(order.currency_code.as_str().to_string());
        target.created_at = order.created_at;
        target.updated_at = order.updated_at;
        target.customer_id = order.customer_id.map(|id| id.as_i64());
        target.customer_ip = order.customer_ip.clone();
        target.billing = address_to_source(&order.billing_address);
        target.shipping = address_to_source(&order.shipping_address);
        target.total = order.total_amount.to_store_string();
        target.payment_method = order.payment_method.clone();
        target.shipping_method = order.shipping_method.clone();

        target.items = order
            .line_items
            .iter()
            .map(line_item_to_source)
            .chain(order.fee_items.iter().map(fee_item_to_source))
            .chain(order.shipping_items.iter().map(shipping_item_to_source))
            .chain(order.tax_items.iter().map(tax_item_to_source))
            .collect();

        if let (Some(provider), Some(remote_id)) = (&order.payment_method, &order.remote_id) {
            target.update_meta(keys::order_remote_id(provider), remote_id.clone());
        }
    }
}

fn sum(amounts: impl Iterator<Item = CurrencyAmount>, currency: CurrencyCode) -> CurrencyAmount {
    let total = amounts.map(|a| a.amount).sum();
    CurrencyAmount::new(total, currency)
}

// =============================================================================
// Address conversion
// =============================================================================

pub(crate) fn address_from_source(source: &HostAddress) -> Address {
    Address {
        first_name: source.first_name.clone(),
        last_name: source.last_name.clone(),
        company: source.company.clone(),
        address1: source.address1.clone(),
        address2: source.address2.clone(),
        city: source.city.clone(),
        province_code: source.state.clone(),
        country_code: source.country.clone(),
        postal_code: source.postcode.clone(),
        phone: source.phone.clone(),
        email: source.email.clone(),
    }
}

pub(crate) fn address_to_source(address: &Address) -> HostAddress {
    HostAddress {
        first_name: address.first_name.clone(),
        last_name: address.last_name.clone(),
        company: address.company.clone(),
        address1: address.address1.clone(),
        address2: address.address2.clone(),
        city: address.city.clone(),
        state: address.province_code.clone(),
        country: address.country_code.clone(),
        postcode: address.postal_code.clone(),
        phone: address.phone.clone(),
        email: address.email.clone(),
    }
}

// =============================================================================
// Item conversion
// =============================================================================

fn amount(
    raw: &str,
    currency: CurrencyCode,
    field: &'static str,
) -> Result<CurrencyAmount, ConversionError> {
    CurrencyAmount::parse(raw, currency).map_err(|source| ConversionError::BadAmount {
        field,
        source,
    })
}

fn line_item_from_source(
    item: &HostOrderItem,
    currency: CurrencyCode,
) -> Result<LineItem, ConversionError> {
    let quantity = item.quantity.ok_or(ConversionError::MissingField {
        record: "line item",
        field: "quantity",
    })?;
    let subtotal_raw = item.subtotal.as_deref().ok_or(ConversionError::MissingField {
        record: "line item",
        field: "subtotal",
    })?;

    Ok(LineItem {
        id: EntityId::new(item.id),
        label: item.label.clone(),
        quantity,
        product_id: item.product_id.map(ProductId::new),
        sku: item.sku.clone(),
        subtotal: amount(subtotal_raw, currency, "subtotal")?,
        total: amount(&item.total, currency, "total")?,
        tax: amount(&item.tax, currency, "tax")?,
    })
}

fn fee_item_from_source(
    item: &HostOrderItem,
    currency: CurrencyCode,
) -> Result<FeeItem, ConversionError> {
    Ok(FeeItem {
        id: EntityId::new(item.id),
        label: item.label.clone(),
        total: amount(&item.total, currency, "total")?,
        tax: amount(&item.tax, currency, "tax")?,
    })
}

fn shipping_item_from_source(
    item: &HostOrderItem,
    currency: CurrencyCode,
) -> Result<ShippingItem, ConversionError> {
    Ok(ShippingItem {
        id: EntityId::new(item.id),
        label: item.label.clone(),
        method: item.method.clone().unwrap_or_default(),
        total: amount(&item.total, currency, "total")?,
        tax: amount(&item.tax, currency, "tax")?,
    })
}

fn tax_item_from_source(
    item: &HostOrderItem,
    currency: CurrencyCode,
) -> Result<TaxItem, ConversionError> {
    let rate = item
        .rate_percent
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(str::parse::<Decimal>)
        .transpose()
        .map_err(|_| ConversionError::MissingField {
            record: "tax item",
            field: "rate_percent",
        })?
        .unwrap_or_default();

    Ok(TaxItem {
        id: EntityId::new(item.id),
        label: item.label.clone(),
        name: item.rate_name.clone().unwrap_or_default(),
        rate,
        total: amount(&item.total, currency, "total")?,
    })
}

fn line_item_to_source(item: &LineItem) -> HostOrderItem {
    HostOrderItem {
        id: item.id.as_i64(),
        kind: HostItemKind::Line,
        label: item.label.clone(),
        quantity: Some(item.quantity),
        product_id: item.product_id.map(|id| id.as_i64()),
        sku: item.sku.clone(),
        subtotal: Some(item.subtotal.to_store_string()),
        total: item.total.to_store_string(),
        tax: item.tax.to_store_string(),
        method: None,
        rate_name: None,
        rate_percent: None,
    }
}

fn fee_item_to_source(item: &FeeItem) -> HostOrderItem {
    HostOrderItem {
        id: item.id.as_i64(),
        kind: HostItemKind::Fee,
        label: item.label.clone(),
        quantity: None,
        product_id: None,
        sku: None,
        subtotal: None,
        total: item.total.to_store_string(),
        tax: item.tax.to_store_string(),
        method: None,
        rate_name: None,
        rate_percent: None,
    }
}

fn shipping_item_to_source(item: &ShippingItem) -> HostOrderItem {
    HostOrderItem {
        id: item.id.as_i64(),
        kind: HostItemKind::Shipping,
        label: item.label.clone(),
        quantity: None,
        product_id: None,
        sku: None,
        subtotal: None,
        total: item.total.to_store_string(),
        tax: item.tax.to_store_string(),
        method: Some(item.method.clone()),
        rate_name: None,
        rate_percent: None,
    }
}

fn tax_item_to_source(item: &TaxItem) -> HostOrderItem {
    HostOrderItem {
        id: item.id.as_i64(),
        kind: HostItemKind::Tax,
        label: item.label.clone(),
        quantity: None,
        product_id: None,
        sku: None,
        subtotal: None,
        total: item.total.to_store_string(),
        tax: "0".to_string(),
        method: None,
        rate_name: Some(item.name.clone()),
        rate_percent: Some(item.rate.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::HostOrder;

    fn host_item(id: i64, kind: HostItemKind, total: &str) -> HostOrderItem {
        HostOrderItem {
            id,
            kind,
            label: format!("item {id}"),
            quantity: None,
            product_id: None,
            sku: None,
            subtotal: None,
            total: total.to_string(),
            tax: "0".to_string(),
            method: None,
            rate_name: None,
            rate_percent: None,
        }
    }

    fn sample_order() -> HostOrder {
        let mut order = HostOrder::empty(42);
        order.number = "1042".to_string();
        order.status = "processing".to_string();
        order.currency = Some("USD".to_string());
        order.payment_method = Some("poynt".to_string());
        order.shipping_method = Some("flat_rate".to_string());
        order.customer_id = Some(5);
        order.customer_ip = Some("203.0.113.9".to_string());
        order.total = "36.00".to_string();
        order.billing.first_name = Some("Ada".to_string());
        order.billing.city = Some("Tempe".to_string());
        order.items = vec![
            HostOrderItem {
                quantity: Some(2),
                product_id: Some(9),
                sku: Some("WID-1".to_string()),
                subtotal: Some("30.00".to_string()),
                ..host_item(1, HostItemKind::Line, "28.00")
            },
            host_item(2, HostItemKind::Fee, "2.00"),
            HostOrderItem {
                method: Some("flat_rate".to_string()),
                ..host_item(3, HostItemKind::Shipping, "5.00")
            },
            HostOrderItem {
                rate_name: Some("VAT".to_string()),
                rate_percent: Some("2.9".to_string()),
                ..host_item(4, HostItemKind::Tax, "1.00")
            },
        ];
        order
    }

    #[test]
    fn test_convert_from_source_maps_everything() {
        let adapter = OrderAdapter::new(CurrencyCode::USD);
        let order = adapter.convert_from_source(&sample_order()).unwrap();

        assert_eq!(order.id, OrderId::new(42));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_amount.to_minor_units(), 2800);
        assert_eq!(order.fee_amount.to_minor_units(), 200);
        assert_eq!(order.shipping_amount.to_minor_units(), 500);
        assert_eq!(order.tax_amount.to_minor_units(), 100);
        assert_eq!(order.total_amount.to_minor_units(), 3600);
        assert_eq!(order.billing_address.city.as_deref(), Some("Tempe"));
        assert!(order.remote_id.is_none());
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let adapter = OrderAdapter::new(CurrencyCode::USD);
        let first = adapter.convert_from_source(&sample_order()).unwrap();
        let back = adapter.convert_to_source(&first);
        let second = adapter.convert_from_source(&back).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_remote_id_round_trips_through_meta() {
        let adapter = OrderAdapter::new(CurrencyCode::USD);
        let mut source = sample_order();
        source.update_meta("_poynt_order_remoteId", "abc123");

        let order = adapter.convert_from_source(&source).unwrap();
        assert_eq!(order.remote_id.as_deref(), Some("abc123"));

        let back = adapter.convert_to_source(&order);
        assert_eq!(back.get_meta("_poynt_order_remoteId"), Some("abc123"));
    }

    #[test]
    fn test_missing_quantity_is_a_conversion_error() {
        let adapter = OrderAdapter::new(CurrencyCode::USD);
        let mut source = sample_order();
        if let Some(first) = source.items.first_mut() {
            first.quantity = None;
        }
        let err = adapter.convert_from_source(&source).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::MissingField {
                field: "quantity",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_amount_is_a_conversion_error() {
        let adapter = OrderAdapter::new(CurrencyCode::USD);
        let mut source = sample_order();
        source.total = "banana".to_string();
        let err = adapter.convert_from_source(&source).unwrap_err();
        assert!(matches!(err, ConversionError::BadAmount { field: "total", .. }));
    }

    #[test]
    fn test_default_currency_used_when_order_has_none() {
        let adapter = OrderAdapter::new(CurrencyCode::EUR);
        let mut source = sample_order();
        source.currency = None;
        let order = adapter.convert_from_source(&source).unwrap();
        assert_eq!(order.currency_code, CurrencyCode::EUR);
    }
}
