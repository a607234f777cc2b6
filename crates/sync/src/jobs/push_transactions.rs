//! Push Transactions producer.
//!
//! Depends on the order push having completed: without a remote order id
//! there is nothing to attach the transaction to, so the job reschedules
//! itself as a brand-new job for the same order. Reschedules are bounded;
//! past the cap the job fails instead of queueing again.

use std::sync::Arc;

use async_trait::async_trait;
use poynt_bridge_core::job::{SyncJob, SyncJobStatus};
use poynt_bridge_core::transaction::TransactionKind;
use poynt_bridge_core::types::{CurrencyCode, OrderId};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::datastore::{keys, resolve_provider, OrderTransactionDataStore};
use crate::error::Result;
use crate::host::{HostOrder, JobStore, OrderRecords};
use crate::poynt::{PaymentsApi, TransactionAction, TransactionPayload};

pub const OWNER: &str = "push-transactions";
pub const OBJECT_TYPE: &str = "order";

/// Most reschedules one work item may accumulate before failing outright.
pub const MAX_RESCHEDULES: u32 = 5;

/// Decides which remote action an order's payment state calls for.
///
/// Supplied from outside the producer so gateway-specific capture rules
/// can replace the default without touching the push logic.
pub trait TransactionFlow: Send + Sync {
    fn action_for(&self, order: &HostOrder, provider: &str) -> TransactionAction;
}

/// Default flow derived from stored payment state: a payment that already
/// has a remote id is being captured; a captured payment is a sale; the
/// rest are authorizations.
pub struct StatusTransactionFlow;

impl TransactionFlow for StatusTransactionFlow {
    fn action_for(&self, order: &HostOrder, provider: &str) -> TransactionAction {
        if order
            .get_meta(&keys::property_key(provider, "payment", "remoteId"))
            .is_some()
        {
            TransactionAction::Capture
        } else if order.get_meta(keys::IS_CAPTURED) == Some("yes") {
            TransactionAction::Sale
        } else {
            TransactionAction::Authorize
        }
    }
}

/// Pushes payment transactions to the remote transaction endpoint.
pub struct PushTransactionsProducer {
    orders: Arc<dyn OrderRecords>,
    jobs: Arc<dyn JobStore>,
    api: Arc<dyn PaymentsApi>,
    transactions: OrderTransactionDataStore,
    flow: Arc<dyn TransactionFlow>,
}

impl PushTransactionsProducer {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderRecords>,
        jobs: Arc<dyn JobStore>,
        api: Arc<dyn PaymentsApi>,
        default_currency: CurrencyCode,
        flow: Arc<dyn TransactionFlow>,
    ) -> Self {
        Self {
            orders: orders.clone(),
            jobs,
            api,
            transactions: OrderTransactionDataStore::new(orders, default_currency),
            flow,
        }
    }

    async fn push_transaction(&self, id: OrderId) -> std::result::Result<Outcome, String> {
        let mut record = self
            .orders
            .get(id)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("order {id} not found"))?;
        let provider = resolve_provider(None, &record).map_err(|e| e.to_string())?;

        // No remote order yet means the order push has not completed.
        let Some(remote_order_id) = record
            .get_meta(&keys::order_remote_id(&provider))
            .map(ToString::to_string)
        else {
            return Ok(Outcome::OrderNotPushed);
        };

        // A stored capture id means the payment already ran to completion
        // remotely; a re-delivered job must not push it again.
        if record
            .get_meta(&keys::property_key(&provider, "capture", "remoteId"))
            .is_some()
        {
            return Ok(Outcome::AlreadyPushed);
        }

        let action = self.flow.action_for(&record, &provider);
        let kind = match action {
            TransactionAction::Capture => TransactionKind::Capture,
            TransactionAction::Sale | TransactionAction::Authorize => TransactionKind::Payment,
        };
        let transaction = self
            .transactions
            .read(id, TransactionKind::Payment)
            .await
            .map_err(|e| e.to_string())?;

        let push_id = Uuid::new_v4().to_string();
        let parent_remote_id = (action == TransactionAction::Capture)
            .then(|| {
                record
                    .get_meta(&keys::property_key(&provider, "payment", "remoteId"))
                    .map(ToString::to_string)
            })
            .flatten();

        let payload = TransactionPayload::from_transaction(
            &transaction,
            action,
            &remote_order_id,
            &push_id,
            parent_remote_id.as_deref(),
        );
        let response = self
            .api
            .upsert_transaction(&push_id, &payload)
            .await
            .map_err(|e| e.to_string())?;
        if response.is_error() {
            return Err(response.error_message());
        }

        record.update_meta(
            keys::property_key(&provider, kind.as_str(), "remoteId"),
            push_id.clone(),
        );
        self.orders
            .persist(&record)
            .await
            .map_err(|e| e.to_string())?;
        info!(order = %id, action = ?action, push_id, "transaction pushed");
        Ok(Outcome::Pushed)
    }
}

enum Outcome {
    Pushed,
    /// A capture remote id is already stored; nothing left to push.
    AlreadyPushed,
    /// The order push has not stored a remote id yet.
    OrderNotPushed,
}

#[async_trait]
impl super::JobProducer for PushTransactionsProducer {
    fn owner(&self) -> &'static str {
        OWNER
    }

    fn object_type(&self) -> &'static str {
        OBJECT_TYPE
    }

    #[instrument(skip(self, job), fields(job = %job.id, attempt = job.attempt))]
    async fn handle(&self, mut job: SyncJob) -> Result<SyncJob> {
        for id in job.object_ids.clone() {
            match self.push_transaction(OrderId::new(id)).await {
                Ok(Outcome::Pushed | Outcome::AlreadyPushed) => {}
                Ok(Outcome::OrderNotPushed) => {
                    if job.attempt >= MAX_RESCHEDULES {
                        warn!(order = id, attempts = job.attempt, "giving up on transaction push");
                        job.record_error(format!(
                            "order {id} was never pushed after {} attempts",
                            job.attempt + 1
                        ));
                        job.status = SyncJobStatus::Failed;
                        return Ok(job);
                    }
                    info!(order = id, attempt = job.attempt, "order not pushed yet, rescheduling");
                    self.jobs.create(job.reschedule()).await?;
                    job.status = SyncJobStatus::Complete;
                    return Ok(job);
                }
                Err(message) => {
                    warn!(order = id, %message, "transaction push failed");
                    job.record_error(format!("order {id}: {message}"));
                    job.status = SyncJobStatus::Failed;
                    return Ok(job);
                }
            }
        }

        job.status = SyncJobStatus::Complete;
        Ok(job)
    }
}
