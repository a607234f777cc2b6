//! HTTP client for the remote payments API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::PoyntConfig;
use crate::host::SettingsStore;

use super::payloads::{HookRegistration, OrderPayload, TransactionPayload};
use super::token::TokenGateway;
use super::PoyntError;

const API_VERSION: &str = "1.2";
const AGENT: &str = concat!("poynt-bridge/", env!("CARGO_PKG_VERSION"));

/// A decoded remote response. HTTP error statuses are carried here, not
/// raised as errors; only transport failures become [`PoyntError`].
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// True for any non-2xx status.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !self.status.is_success()
    }

    /// The remote entity id, when the body carries one.
    #[must_use]
    pub fn remote_id(&self) -> Option<&str> {
        self.body.get("id").and_then(Value::as_str)
    }

    /// A human-readable failure description for job error lists.
    #[must_use]
    pub fn error_message(&self) -> String {
        let detail = self
            .body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no detail");
        format!("remote returned {}: {detail}", self.status)
    }
}

/// The remote operations the job producers depend on.
///
/// A trait so producers can run against a stub in tests.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// `POST businesses/{id}/orders`.
    async fn create_order(&self, payload: &OrderPayload) -> Result<ApiResponse, PoyntError>;

    /// `PUT businesses/{id}/transactions/{transaction_id}`.
    async fn upsert_transaction(
        &self,
        transaction_id: &str,
        payload: &TransactionPayload,
    ) -> Result<ApiResponse, PoyntError>;

    /// `POST businesses/{id}/hooks`.
    async fn register_hook(&self, payload: &HookRegistration) -> Result<ApiResponse, PoyntError>;

    /// `GET services/processing-accounts`.
    async fn processing_accounts(&self) -> Result<ApiResponse, PoyntError>;
}

/// Client for the Poynt service API.
///
/// Every send applies the fixed headers (API version, JSON content types,
/// a fresh request id, user agent) and a freshly granted bearer token.
pub struct PoyntClient {
    http: reqwest::Client,
    base_url: String,
    business_id: String,
    tokens: TokenGateway,
}

impl PoyntClient {
    /// Build a client from the service configuration.
    #[must_use]
    pub fn new(config: &PoyntConfig, settings: Arc<dyn SettingsStore>) -> Self {
        let http = reqwest::Client::new();
        Self {
            http: http.clone(),
            base_url: config.base_url.clone(),
            business_id: config.business_id.clone(),
            tokens: TokenGateway::new(http, config, settings),
        }
    }

    fn business_route(&self, suffix: &str) -> String {
        format!("{}/businesses/{}/{suffix}", self.base_url, self.business_id)
    }

    #[instrument(skip(self, body, url), fields(method = %method))]
    async fn send<T: Serialize + Sync>(
        &self,
        method: Method,
        url: String,
        body: Option<&T>,
    ) -> Result<ApiResponse, PoyntError> {
        let token = self.tokens.grant().await?;

        let mut request = self
            .http
            .request(method, url)
            .header("Api-Version", API_VERSION)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header("Poynt-Request-Id", Uuid::new_v4().to_string())
            .header(USER_AGENT, AGENT)
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        // Error bodies are sometimes not JSON; carry what we got.
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        debug!(%status, "remote call finished");

        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl PaymentsApi for PoyntClient {
    async fn create_order(&self, payload: &OrderPayload) -> Result<ApiResponse, PoyntError> {
        self.send(Method::POST, self.business_route("orders"), Some(payload))
            .await
    }

    async fn upsert_transaction(
        &self,
        transaction_id: &str,
        payload: &TransactionPayload,
    ) -> Result<ApiResponse, PoyntError> {
        self.send(
            Method::PUT,
            self.business_route(&format!("transactions/{transaction_id}")),
            Some(payload),
        )
        .await
    }

    async fn register_hook(&self, payload: &HookRegistration) -> Result<ApiResponse, PoyntError> {
        self.send(Method::POST, self.business_route("hooks"), Some(payload))
            .await
    }

    async fn processing_accounts(&self) -> Result<ApiResponse, PoyntError> {
        self.send::<Value>(
            Method::GET,
            format!("{}/services/processing-accounts", self.base_url),
            None,
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn response(status: StatusCode, body: Value) -> ApiResponse {
        ApiResponse { status, body }
    }

    #[test]
    fn test_is_error() {
        assert!(!response(StatusCode::CREATED, Value::Null).is_error());
        assert!(response(StatusCode::BAD_GATEWAY, Value::Null).is_error());
    }

    #[test]
    fn test_remote_id() {
        let body = serde_json::json!({ "id": "abc123" });
        assert_eq!(response(StatusCode::CREATED, body).remote_id(), Some("abc123"));
        assert!(response(StatusCode::CREATED, Value::Null).remote_id().is_none());
    }

    #[test]
    fn test_error_message_includes_detail() {
        let body = serde_json::json!({ "message": "business not found" });
        let message = response(StatusCode::NOT_FOUND, body).error_message();
        assert!(message.contains("404"));
        assert!(message.contains("business not found"));
    }
}
