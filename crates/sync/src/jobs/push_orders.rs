//! Push Orders producer.
//!
//! Best-effort push of host orders to the remote service. Each order in the
//! batch is loaded, adapted, and posted independently; failures are recorded
//! on the job's error list and the remaining orders still go out. A job with
//! recorded errors resolves `CompletedWithErrors`, never `Failed`.

use std::sync::Arc;

use async_trait::async_trait;
use poynt_bridge_core::job::{SyncJob, SyncJobStatus};
use poynt_bridge_core::types::{CurrencyCode, OrderId};
use reqwest::StatusCode;
use tracing::{info, instrument, warn};

use crate::adapters::OrderAdapter;
use crate::datastore::{keys, resolve_provider};
use crate::error::Result;
use crate::host::OrderRecords;
use crate::poynt::{OrderPayload, PaymentsApi};

pub const OWNER: &str = "push-orders";
pub const OBJECT_TYPE: &str = "order";

/// Pushes host orders to the remote order endpoint.
pub struct PushOrdersProducer {
    orders: Arc<dyn OrderRecords>,
    api: Arc<dyn PaymentsApi>,
    adapter: OrderAdapter,
    local_delivery_method: String,
}

impl PushOrdersProducer {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderRecords>,
        api: Arc<dyn PaymentsApi>,
        default_currency: CurrencyCode,
        local_delivery_method: impl Into<String>,
    ) -> Self {
        Self {
            orders,
            api,
            adapter: OrderAdapter::new(default_currency),
            local_delivery_method: local_delivery_method.into(),
        }
    }

    /// Push one order; errors are returned as messages for the job's
    /// error list.
    async fn push_order(&self, id: OrderId) -> std::result::Result<(), String> {
        let mut record = self
            .orders
            .get(id)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("order {id} not found"))?;

        let provider = resolve_provider(None, &record).map_err(|e| e.to_string())?;
        let order = self
            .adapter
            .convert_from_source(&record)
            .map_err(|e| e.to_string())?;

        let payload = OrderPayload::from_order(&order, &self.local_delivery_method);
        let response = self
            .api
            .create_order(&payload)
            .await
            .map_err(|e| e.to_string())?;

        if response.status != StatusCode::CREATED {
            return Err(response.error_message());
        }
        let remote_id = response
            .remote_id()
            .ok_or_else(|| "created order response carried no id".to_string())?;

        record.update_meta(keys::order_remote_id(&provider), remote_id);
        self.orders
            .persist(&record)
            .await
            .map_err(|e| e.to_string())?;
        info!(order = %id, remote_id, "order pushed");
        Ok(())
    }
}

#[async_trait]
impl super::JobProducer for PushOrdersProducer {
    fn owner(&self) -> &'static str {
        OWNER
    }

    fn object_type(&self) -> &'static str {
        OBJECT_TYPE
    }

    #[instrument(skip(self, job), fields(job = %job.id))]
    async fn handle(&self, mut job: SyncJob) -> Result<SyncJob> {
        for id in job.object_ids.clone() {
            if let Err(message) = self.push_order(OrderId::new(id)).await {
                warn!(order = id, %message, "order push failed");
                job.record_error(format!("order {id}: {message}"));
            }
        }

        job.status = if job.errors.is_empty() {
            SyncJobStatus::Complete
        } else {
            SyncJobStatus::CompletedWithErrors
        };
        Ok(job)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::{HostItemKind, HostOrder, HostOrderItem, MemoryHost};
    use crate::jobs::JobProducer;
    use crate::poynt::{ApiResponse, HookRegistration, PoyntError, TransactionPayload};
    use serde_json::json;
    use tokio::sync::Mutex;

    /// Canned remote API that records order payloads it receives.
    struct StubApi {
        create_status: StatusCode,
        seen: Mutex<Vec<OrderPayload>>,
    }

    impl StubApi {
        fn created() -> Self {
            Self {
                create_status: StatusCode::CREATED,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: StatusCode) -> Self {
            Self {
                create_status: status,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PaymentsApi for StubApi {
        async fn create_order(&self, payload: &OrderPayload) -> std::result::Result<ApiResponse, PoyntError> {
            self.seen.lock().await.push(payload.clone());
            Ok(ApiResponse {
                status: self.create_status,
                body: json!({ "id": "abc123" }),
            })
        }

        async fn upsert_transaction(
            &self,
            _transaction_id: &str,
            _payload: &TransactionPayload,
        ) -> std::result::Result<ApiResponse, PoyntError> {
            unimplemented!("not exercised")
        }

        async fn register_hook(
            &self,
            _payload: &HookRegistration,
        ) -> std::result::Result<ApiResponse, PoyntError> {
            unimplemented!("not exercised")
        }

        async fn processing_accounts(&self) -> std::result::Result<ApiResponse, PoyntError> {
            unimplemented!("not exercised")
        }
    }

    fn host_order(id: i64) -> HostOrder {
        let mut order = HostOrder::empty(id);
        order.payment_method = Some("poynt".to_string());
        order.total = "18.00".to_string();
        order.items.push(HostOrderItem {
            id: 1,
            kind: HostItemKind::Line,
            label: "Widget".to_string(),
            quantity: Some(3),
            product_id: None,
            sku: None,
            subtotal: Some("15.00".to_string()),
            total: "15.00".to_string(),
            tax: "0".to_string(),
            method: None,
            rate_name: None,
            rate_percent: None,
        });
        order
    }

    fn producer(host: &Arc<MemoryHost>, api: Arc<StubApi>) -> PushOrdersProducer {
        PushOrdersProducer::new(
            host.clone(),
            api,
            CurrencyCode::USD,
            "mwc_local_delivery",
        )
    }

    #[tokio::test]
    async fn test_success_stores_remote_id() {
        let host = Arc::new(MemoryHost::new());
        host.insert_order(host_order(42)).await;
        let api = Arc::new(StubApi::created());

        let job = producer(&host, api.clone())
            .handle(SyncJob::new(OWNER, OBJECT_TYPE, vec![42]))
            .await
            .unwrap();

        assert_eq!(job.status, SyncJobStatus::Complete);
        let stored = OrderRecords::get(&*host, OrderId::new(42)).await.unwrap().unwrap();
        assert_eq!(stored.get_meta("_poynt_order_remoteId"), Some("abc123"));
        assert_eq!(api.seen.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_completes_with_errors() {
        let host = Arc::new(MemoryHost::new());
        host.insert_order(host_order(42)).await;
        let api = Arc::new(StubApi::failing(StatusCode::BAD_GATEWAY));

        let job = producer(&host, api)
            .handle(SyncJob::new(OWNER, OBJECT_TYPE, vec![42]))
            .await
            .unwrap();

        assert_eq!(job.status, SyncJobStatus::CompletedWithErrors);
        assert_eq!(job.errors.len(), 1);
        let stored = OrderRecords::get(&*host, OrderId::new(42)).await.unwrap().unwrap();
        assert!(stored.get_meta("_poynt_order_remoteId").is_none());
    }

    #[tokio::test]
    async fn test_missing_order_is_recorded_and_batch_continues() {
        let host = Arc::new(MemoryHost::new());
        host.insert_order(host_order(2)).await;
        let api = Arc::new(StubApi::created());

        let job = producer(&host, api.clone())
            .handle(SyncJob::new(OWNER, OBJECT_TYPE, vec![1, 2]))
            .await
            .unwrap();

        assert_eq!(job.status, SyncJobStatus::CompletedWithErrors);
        assert_eq!(job.errors.len(), 1);
        // the order that does exist still went out
        assert_eq!(api.seen.lock().await.len(), 1);
    }
}
