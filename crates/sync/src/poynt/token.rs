//! Bearer token grants for the remote API.
//!
//! The gateway trades a signed assertion for a short-lived access token.
//! Callers request a fresh token before every send; the granted token is
//! also written to host settings storage so the merchant dashboard can
//! inspect connectivity, but it is never read back as a cache.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::{PoyntConfig, secret_bytes};
use crate::host::{SettingsStore, settings_keys};

use super::PoyntError;

/// Assertion lifetime in seconds.
const ASSERTION_TTL_SECS: i64 = 300;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Serialize)]
struct AssertionHeader {
    alg: &'static str,
    typ: &'static str,
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    jti: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
}

/// Grants fresh access tokens against the remote token endpoint.
pub struct TokenGateway {
    http: reqwest::Client,
    base_url: String,
    application_id: String,
    private_key: SecretString,
    settings: Arc<dyn SettingsStore>,
}

impl TokenGateway {
    /// Build a gateway from the service configuration.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        config: &PoyntConfig,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            application_id: config.application_id.clone(),
            private_key: config.private_key.clone(),
            settings,
        }
    }

    /// Grant a fresh access token and persist it to host settings.
    ///
    /// # Errors
    ///
    /// Returns [`PoyntError::Token`] when the grant is rejected or the
    /// signing key is unusable, [`PoyntError::Http`] on transport failure.
    #[instrument(skip(self))]
    pub async fn grant(&self) -> Result<String, PoyntError> {
        let assertion = self.build_assertion()?;

        let response = self
            .http
            .post(format!("{}/token", self.base_url))
            .form(&[
                ("grantType", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PoyntError::Token(format!(
                "token endpoint returned {status}"
            )));
        }

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        self.settings
            .put(settings_keys::ACCESS_TOKEN, &token.access_token)
            .await?;
        debug!("granted fresh access token");

        Ok(token.access_token)
    }

    /// Build the signed grant assertion: base64url header and claims,
    /// HMAC-SHA256 signature over both.
    fn build_assertion(&self) -> Result<String, PoyntError> {
        let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&AssertionHeader {
            alg: "HS256",
            typ: "JWT",
        })?);
        let now = Utc::now().timestamp();
        let claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&AssertionClaims {
            iss: &self.application_id,
            sub: &self.application_id,
            aud: &self.base_url,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
            jti: Uuid::new_v4(),
        })?);

        let signing_input = format!("{header}.{claims}");
        let mut mac = Hmac::<Sha256>::new_from_slice(secret_bytes(&self.private_key))
            .map_err(|_| PoyntError::Token("signing key has invalid length".to_string()))?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    fn gateway() -> TokenGateway {
        let config = PoyntConfig {
            base_url: "https://services.poynt.net".to_string(),
            business_id: "biz-1".to_string(),
            application_id: "urn:aid:app-1".to_string(),
            private_key: SecretString::from("0123456789abcdef0123456789abcdef"),
            delivery_url: "https://shop.test/webhooks/poynt".to_string(),
        };
        TokenGateway::new(reqwest::Client::new(), &config, Arc::new(MemoryHost::new()))
    }

    #[test]
    fn test_assertion_has_three_segments() {
        let assertion = gateway().build_assertion().unwrap();
        let segments: Vec<&str> = assertion.split('.').collect();
        assert_eq!(segments.len(), 3);
        for segment in &segments {
            assert!(URL_SAFE_NO_PAD.decode(segment).is_ok());
        }
    }

    #[test]
    fn test_assertion_claims_identify_the_application() {
        let assertion = gateway().build_assertion().unwrap();
        let claims_segment = assertion.split('.').nth(1).unwrap();
        let claims: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(claims_segment).unwrap()).unwrap();
        assert_eq!(claims["iss"], "urn:aid:app-1");
        assert_eq!(claims["aud"], "https://services.poynt.net");
        assert!(claims["exp"].as_i64().unwrap() > claims["iat"].as_i64().unwrap());
    }
}
