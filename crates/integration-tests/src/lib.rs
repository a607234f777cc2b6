//! Integration tests for Poynt Bridge.
//!
//! The tests under `tests/` run the sync pipeline end to end against the
//! in-memory host platform and a stub remote API: onboarding via the
//! webhook route, then order and transaction pushes through the job
//! dispatcher.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p poynt-bridge-integration-tests
//! ```
//!
//! No external services are required; the remote API is stubbed with
//! canned responses and the host platform is [`poynt_bridge_sync::host::MemoryHost`].

use std::sync::Arc;

use async_trait::async_trait;
use poynt_bridge_sync::poynt::{
    ApiResponse, HookRegistration, OrderPayload, PaymentsApi, PoyntError, TransactionPayload,
};
use reqwest::StatusCode;
use serde_json::json;
use tokio::sync::Mutex;

/// A canned remote API that records every call.
///
/// Returns 201 with a fixed remote id for order creation, 201 for
/// transaction and hook pushes, unless a failure status is configured.
pub struct RecordingApi {
    pub order_status: StatusCode,
    pub transaction_status: StatusCode,
    pub orders: Mutex<Vec<OrderPayload>>,
    pub transactions: Mutex<Vec<(String, TransactionPayload)>>,
    pub hooks: Mutex<Vec<HookRegistration>>,
}

impl RecordingApi {
    #[must_use]
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            order_status: StatusCode::CREATED,
            transaction_status: StatusCode::CREATED,
            orders: Mutex::new(Vec::new()),
            transactions: Mutex::new(Vec::new()),
            hooks: Mutex::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn with_order_status(status: StatusCode) -> Arc<Self> {
        Arc::new(Self {
            order_status: status,
            transaction_status: StatusCode::CREATED,
            orders: Mutex::new(Vec::new()),
            transactions: Mutex::new(Vec::new()),
            hooks: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl PaymentsApi for RecordingApi {
    async fn create_order(&self, payload: &OrderPayload) -> Result<ApiResponse, PoyntError> {
        self.orders.lock().await.push(payload.clone());
        Ok(ApiResponse {
            status: self.order_status,
            body: json!({ "id": "remote-order-1" }),
        })
    }

    async fn upsert_transaction(
        &self,
        transaction_id: &str,
        payload: &TransactionPayload,
    ) -> Result<ApiResponse, PoyntError> {
        self.transactions
            .lock()
            .await
            .push((transaction_id.to_string(), payload.clone()));
        Ok(ApiResponse {
            status: self.transaction_status,
            body: json!({}),
        })
    }

    async fn register_hook(&self, payload: &HookRegistration) -> Result<ApiResponse, PoyntError> {
        self.hooks.lock().await.push(payload.clone());
        Ok(ApiResponse {
            status: StatusCode::CREATED,
            body: json!({}),
        })
    }

    async fn processing_accounts(&self) -> Result<ApiResponse, PoyntError> {
        Ok(ApiResponse {
            status: StatusCode::OK,
            body: json!([]),
        })
    }
}
