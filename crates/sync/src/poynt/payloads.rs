//! Wire payloads sent to the remote API, built from domain entities.
//!
//! Every monetary field is an integer amount in minor units; the currency
//! rides alongside in the amounts block. Builders are pure functions of the
//! domain entity plus the delivery-mode configuration.

use poynt_bridge_core::order::Order;
use poynt_bridge_core::transaction::Transaction;
use poynt_bridge_core::types::Address;
use serde::{Deserialize, Serialize};

// =============================================================================
// Orders
// =============================================================================

/// How an order item reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentInstruction {
    PickupInstore,
    ShipTo,
}

/// One item row in an order-creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub quantity: u32,
    /// Per-unit price in minor units. Zero when the line has no quantity
    /// to divide by.
    pub unit_price: i64,
    pub tax: i64,
    pub fulfillment_instruction: FulfillmentInstruction,
}

/// Aggregate amounts block, all in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAmounts {
    pub currency: String,
    pub sub_total: i64,
    /// Magnitude of discounts and negative fees.
    pub discount_total: i64,
    /// Positive fees plus shipping.
    pub fee_total: i64,
    pub tax_total: i64,
    pub net_total: i64,
}

/// Customer block on an order-creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Shipping destination block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Full order-creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub order_number: String,
    pub items: Vec<OrderItemPayload>,
    pub amounts: OrderAmounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerPayload>,
    /// Present only for local-delivery orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_to: Option<AddressPayload>,
}

impl OrderPayload {
    /// Build an order-creation payload.
    ///
    /// `local_delivery_method` is the single shipping-method identifier
    /// treated as local delivery; orders using any other method (or none)
    /// are pickup fulfillment and carry no shipping address.
    #[must_use]
    pub fn from_order(order: &Order, local_delivery_method: &str) -> Self {
        let local_delivery = order
            .shipping_method
            .as_deref()
            .is_some_and(|method| method == local_delivery_method);
        let instruction = if local_delivery {
            FulfillmentInstruction::ShipTo
        } else {
            FulfillmentInstruction::PickupInstore
        };

        let items = order
            .line_items
            .iter()
            .map(|item| OrderItemPayload {
                name: item.label.clone(),
                sku: item.sku.clone(),
                quantity: item.quantity,
                unit_price: item
                    .unit_price()
                    .map_or(0, |price| price.to_minor_units()),
                tax: item.tax.to_minor_units(),
                fulfillment_instruction: instruction,
            })
            .collect();

        // Fees split by sign: discounts accumulate as a positive magnitude,
        // real fees and shipping land in the fee bucket.
        let mut fee_total = order.shipping_amount.to_minor_units();
        let mut discount_total = 0;
        for fee in &order.fee_items {
            let minor = fee.total.to_minor_units();
            if minor < 0 {
                discount_total -= minor;
            } else {
                fee_total += minor;
            }
        }

        let customer = build_customer(&order.billing_address);
        let ship_to = local_delivery.then(|| address_payload(&order.shipping_address));

        Self {
            order_number: order.number.clone(),
            items,
            amounts: OrderAmounts {
                currency: order.currency_code.as_str().to_string(),
                sub_total: order.line_amount.to_minor_units(),
                discount_total,
                fee_total,
                tax_total: order.tax_amount.to_minor_units(),
                net_total: order.total_amount.to_minor_units(),
            },
            customer,
            ship_to,
        }
    }
}

fn build_customer(billing: &Address) -> Option<CustomerPayload> {
    if billing.first_name.is_none() && billing.last_name.is_none() && billing.email.is_none() {
        return None;
    }
    Some(CustomerPayload {
        first_name: billing.first_name.clone(),
        last_name: billing.last_name.clone(),
        email: billing.email.clone(),
    })
}

fn address_payload(address: &Address) -> AddressPayload {
    AddressPayload {
        line1: address.address1.clone(),
        line2: address.address2.clone(),
        city: address.city.clone(),
        territory: address.province_code.clone(),
        country_code: address.country_code.clone(),
        postal_code: address.postal_code.clone(),
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// What the transaction push asks the processor to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionAction {
    Sale,
    Authorize,
    Capture,
}

/// Amounts block for a transaction push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAmounts {
    pub currency: String,
    pub transaction_amount: i64,
    pub order_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingSource {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorResponse {
    pub transaction_id: String,
    pub status: String,
}

/// Transaction payload, sent as a PUT keyed by a fresh client-side UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub action: TransactionAction,
    pub amounts: TransactionAmounts,
    pub funding_source: FundingSource,
    pub processor_response: ProcessorResponse,
    /// Remote order this transaction belongs to.
    pub order_id: String,
    /// Remote id of the payment a capture settles. Absent for sale and
    /// authorize.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl TransactionPayload {
    /// Build a transaction payload.
    ///
    /// The processor response carries the existing host transaction id for
    /// sale and authorize; a capture instead carries the freshly generated
    /// push id and links `parent_id` to the stored payment remote id.
    #[must_use]
    pub fn from_transaction(
        transaction: &Transaction,
        action: TransactionAction,
        remote_order_id: &str,
        push_id: &str,
        parent_remote_id: Option<&str>,
    ) -> Self {
        let processor_transaction_id = match action {
            TransactionAction::Capture => push_id.to_string(),
            TransactionAction::Sale | TransactionAction::Authorize => transaction
                .id
                .clone()
                .unwrap_or_else(|| push_id.to_string()),
        };

        Self {
            action,
            amounts: TransactionAmounts {
                currency: transaction.total.currency_code.as_str().to_string(),
                transaction_amount: transaction.total.to_minor_units(),
                order_amount: transaction.total.to_minor_units(),
            },
            funding_source: FundingSource {
                kind: "CUSTOM".to_string(),
            },
            processor_response: ProcessorResponse {
                transaction_id: processor_transaction_id,
                status: transaction.status.as_str().to_string(),
            },
            order_id: remote_order_id.to_string(),
            parent_id: parent_remote_id.map(ToString::to_string),
        }
    }
}

// =============================================================================
// Webhook registration
// =============================================================================

/// Webhook-registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookRegistration {
    pub business_id: String,
    pub application_id: String,
    pub event_types: Vec<String>,
    pub delivery_url: String,
    pub secret: String,
}
