//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use copperleaf_core::api::{ApiClient, ApiError, Sequencer};

use crate::cart::TierStores;
use crate::config::StorefrontConfig;

/// How long an idle per-client sequencer sticks around.
const SEQUENCER_IDLE: Duration = Duration::from_secs(30 * 60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// commerce API client, the storage tiers, and per-client request
/// sequencers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    stores: TierStores,
    sequencers: Cache<String, Arc<Sequencer>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured API base URL does not parse.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api_base_url)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                stores: TierStores::in_memory(),
                sequencers: Cache::builder()
                    .max_capacity(100_000)
                    .time_to_idle(SEQUENCER_IDLE)
                    .build(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the storage tiers.
    #[must_use]
    pub fn stores(&self) -> &TierStores {
        &self.inner.stores
    }

    /// The request sequencer for one client's view of one section.
    ///
    /// Sequencers are scoped per client so one visitor's rapid pagination
    /// never discards another visitor's renders.
    #[must_use]
    pub fn sequencer(&self, client_key: &str, section: &str) -> Arc<Sequencer> {
        self.inner
            .sequencers
            .get_with(format!("{client_key}:{section}"), || {
                Arc::new(Sequencer::new())
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            api_base_url: "https://api.example.com/v1".to_string(),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn sequencers_are_scoped_per_client_and_section() {
        let state = AppState::new(test_config()).unwrap();

        let a = state.sequencer("c1", "products");
        let tag = a.issue();
        assert!(state.sequencer("c1", "products").is_current(tag));

        // A different client or section has its own sequence.
        assert!(!state.sequencer("c2", "products").is_current(tag));
        assert!(!state.sequencer("c1", "orders").is_current(tag));
    }
}
