//! Poynt Bridge Core - Vendor-neutral commerce domain model.
//!
//! This crate provides the domain entities shared by every Poynt Bridge
//! component:
//!
//! - `sync` - Adapter, data-store, and push-producer service
//! - `integration-tests` - Cross-crate behavioral tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. Entities here are the neutral middle ground between the host
//! commerce platform's records and the remote payments service's payloads;
//! both sides are mapped onto these types by the `sync` crate.
//!
//! # Modules
//!
//! - [`types`] - Money, type-safe IDs, addresses, and status enums
//! - [`order`] - Order aggregate with line/fee/shipping/tax items
//! - [`transaction`] - Payment/capture/refund/void transactions
//! - [`payment_method`] - Stored card and bank-account representations
//! - [`customer`] - Customer profile
//! - [`job`] - Background sync-job record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod customer;
pub mod job;
pub mod order;
pub mod payment_method;
pub mod transaction;
pub mod types;

pub use customer::Customer;
pub use job::{SyncJob, SyncJobStatus};
pub use order::{FeeItem, LineItem, Order, ShippingItem, TaxItem};
pub use payment_method::PaymentMethod;
pub use transaction::{Transaction, TransactionKind};
pub use types::*;
