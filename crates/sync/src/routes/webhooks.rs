//! Onboarding webhook receiver.
//!
//! The remote service delivers merchant credentials with a signed POST.
//! Verification happens over the raw body before any parsing: a missing or
//! mismatched `MWC-Webhook-Signature` is a 401 with no state mutation. A
//! verified payload must carry every required field (400 otherwise) and
//! must agree with any previously stored application/business ids (409
//! otherwise) before the credentials are persisted.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha512;
use tracing::{info, instrument};

use crate::config::secret_bytes;
use crate::error::{AppError, Result};
use crate::host::settings_keys;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA512 of the raw request body.
pub const SIGNATURE_HEADER: &str = "MWC-Webhook-Signature";

const REQUIRED_FIELDS: [&str; 6] = [
    "serviceType",
    "serviceId",
    "applicationId",
    "businessId",
    "appId",
    "privateKey",
];

/// Handle an inbound onboarding webhook.
#[instrument(skip(state, headers, body))]
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    verify_signature(&state, &headers, &body)?;

    let payload: Value =
        serde_json::from_slice(&body).map_err(|_| AppError::MissingField("body"))?;
    let field = |name: &'static str| -> Result<&str> {
        payload
            .get(name)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .ok_or(AppError::MissingField(name))
    };
    for name in REQUIRED_FIELDS {
        field(name)?;
    }

    check_stored(
        &state,
        settings_keys::APPLICATION_ID,
        field("applicationId")?,
        "applicationId",
    )
    .await?;
    check_stored(
        &state,
        settings_keys::BUSINESS_ID,
        field("businessId")?,
        "businessId",
    )
    .await?;

    state
        .settings
        .put(settings_keys::APPLICATION_ID, field("applicationId")?)
        .await?;
    state
        .settings
        .put(settings_keys::BUSINESS_ID, field("businessId")?)
        .await?;
    state
        .settings
        .put(settings_keys::SERVICE_ID, field("serviceId")?)
        .await?;
    state
        .settings
        .put(settings_keys::PRIVATE_KEY, field("privateKey")?)
        .await?;
    state
        .settings
        .put(settings_keys::COMMERCE_ACTIVE, "yes")
        .await?;

    info!("onboarding credentials stored");
    Ok(StatusCode::OK)
}

/// Verify the HMAC-SHA512 signature over the raw body.
fn verify_signature(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<()> {
    let provided = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::InvalidSignature)?;
    let provided = hex::decode(provided).map_err(|_| AppError::InvalidSignature)?;

    let mut mac = Hmac::<Sha512>::new_from_slice(secret_bytes(&state.webhook_secret))
        .map_err(|_| AppError::InvalidSignature)?;
    mac.update(body);
    // Constant-time comparison
    mac.verify_slice(&provided)
        .map_err(|_| AppError::InvalidSignature)
}

/// Reject payloads that disagree with a previously stored credential.
async fn check_stored(
    state: &AppState,
    key: &str,
    incoming: &str,
    field: &'static str,
) -> Result<()> {
    if let Some(stored) = state.settings.get(key).await? {
        if stored != incoming {
            return Err(AppError::CredentialMismatch(field));
        }
    }
    Ok(())
}
