//! Application state for the forms console

use std::sync::Arc;

use anyhow::Result;
use console_auth::{AuthClient, AuthConfig, SessionProvider};
use forms_core::FormStore;
use parking_lot::RwLock;

pub struct AppState {
    /// Single in-memory store; each call is one transition under the lock
    pub store: RwLock<FormStore>,
    pub auth: Arc<dyn SessionProvider>,
    pub config: AuthConfig,
}

impl AppState {
    pub fn new(config: AuthConfig) -> Result<Self> {
        tracing::info!("Auth service: {}", config.service_url);
        tracing::info!("Auth app: {} ({})", config.app_url, config.environment());

        let client = AuthClient::new(config.clone())?;
        Ok(Self::with_provider(config, Arc::new(client), FormStore::new()))
    }

    pub fn with_provider(
        config: AuthConfig,
        auth: Arc<dyn SessionProvider>,
        store: FormStore,
    ) -> Self {
        Self {
            store: RwLock::new(store),
            auth,
            config,
        }
    }
}
