//! Shared state for the webhook server.

use std::sync::Arc;

use secrecy::SecretString;

use crate::config::AppConfig;
use crate::host::SettingsStore;

/// State handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// Host settings storage for onboarding credentials.
    pub settings: Arc<dyn SettingsStore>,
    /// Shared secret inbound webhook signatures are verified against.
    pub webhook_secret: SecretString,
}

impl AppState {
    /// Assemble state from the loaded configuration and host storage.
    #[must_use]
    pub fn new(config: &AppConfig, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            webhook_secret: config.webhook_secret.clone(),
        }
    }
}
