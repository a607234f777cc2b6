//! Register Webhooks producer.
//!
//! One-shot registration of the delivery endpoint with the remote service.
//! Strict success contract: HTTP 201 resolves the job complete, anything
//! else fails it with the error recorded.

use async_trait::async_trait;
use poynt_bridge_core::job::{SyncJob, SyncJobStatus};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::{AppConfig, PoyntConfig};
use crate::error::Result;
use crate::poynt::{HookRegistration, PaymentsApi};

pub const OWNER: &str = "register-webhooks";
pub const OBJECT_TYPE: &str = "webhooks";

/// Event topics the delivery endpoint subscribes to.
const EVENT_TYPES: &[&str] = &["ORDER_UPDATED", "TRANSACTION_UPDATED"];

/// Registers the inbound webhook endpoint with the remote service.
pub struct RegisterWebhooksProducer {
    api: Arc<dyn PaymentsApi>,
    business_id: String,
    application_id: String,
    delivery_url: String,
    secret: SecretString,
}

impl RegisterWebhooksProducer {
    #[must_use]
    pub fn new(api: Arc<dyn PaymentsApi>, config: &AppConfig) -> Self {
        Self::from_parts(api, &config.poynt, config.webhook_secret.clone())
    }

    #[must_use]
    pub fn from_parts(api: Arc<dyn PaymentsApi>, poynt: &PoyntConfig, secret: SecretString) -> Self {
        Self {
            api,
            business_id: poynt.business_id.clone(),
            application_id: poynt.application_id.clone(),
            delivery_url: poynt.delivery_url.clone(),
            secret,
        }
    }
}

#[async_trait]
impl super::JobProducer for RegisterWebhooksProducer {
    fn owner(&self) -> &'static str {
        OWNER
    }

    fn object_type(&self) -> &'static str {
        OBJECT_TYPE
    }

    #[instrument(skip(self, job), fields(job = %job.id))]
    async fn handle(&self, mut job: SyncJob) -> Result<SyncJob> {
        let payload = HookRegistration {
            business_id: self.business_id.clone(),
            application_id: self.application_id.clone(),
            event_types: EVENT_TYPES.iter().map(ToString::to_string).collect(),
            delivery_url: self.delivery_url.clone(),
            secret: self.secret.expose_secret().to_string(),
        };

        match self.api.register_hook(&payload).await {
            Ok(response) if response.status == StatusCode::CREATED => {
                info!("webhook endpoint registered");
                job.status = SyncJobStatus::Complete;
            }
            Ok(response) => {
                warn!(status = %response.status, "webhook registration rejected");
                job.record_error(response.error_message());
                job.status = SyncJobStatus::Failed;
            }
            Err(error) => {
                warn!(%error, "webhook registration failed");
                job.record_error(error.to_string());
                job.status = SyncJobStatus::Failed;
            }
        }
        Ok(job)
    }
}
