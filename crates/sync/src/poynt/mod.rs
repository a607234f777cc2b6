//! Poynt remote API client.
//!
//! [`client`] owns the HTTP surface and route construction, [`token`]
//! grants a fresh bearer token before every send, and [`payloads`] holds
//! the wire shapes built from domain entities. Transport failures are
//! errors; HTTP error statuses come back as normal [`ApiResponse`]s for
//! the producers to inspect.

use thiserror::Error;

use crate::host::HostError;

pub mod client;
pub mod payloads;
pub mod token;

pub use client::{ApiResponse, PaymentsApi, PoyntClient};
pub use payloads::{
    AddressPayload, CustomerPayload, FulfillmentInstruction, HookRegistration, OrderAmounts,
    OrderItemPayload, OrderPayload, TransactionAction, TransactionAmounts, TransactionPayload,
};
pub use token::TokenGateway;

/// Errors from the remote API client and token gateway.
#[derive(Debug, Error)]
pub enum PoyntError {
    /// Transport-level failure talking to the remote service.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token grant failed or the signing key was unusable.
    #[error("token grant failed: {0}")]
    Token(String),

    /// The remote response body could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Persisting the granted token to host storage failed.
    #[error(transparent)]
    Storage(#[from] HostError),
}
