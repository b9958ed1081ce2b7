//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use copperleaf_core::api::{ApiClient, ApiError, Sequencer};

use crate::config::AdminConfig;

/// How long an idle per-session sequencer sticks around.
const SEQUENCER_IDLE: Duration = Duration::from_secs(30 * 60);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
    sequencers: Cache<String, Arc<Sequencer>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured API base URL does not parse.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api_base_url)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                sequencers: Cache::builder()
                    .max_capacity(100_000)
                    .time_to_idle(SEQUENCER_IDLE)
                    .build(),
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// The request sequencer for one session's view of one section.
    ///
    /// Table fragment handlers use this to discard out-of-order responses;
    /// scoping per session keeps one merchant's rapid paging from discarding
    /// another's renders.
    #[must_use]
    pub fn sequencer(&self, session_id: &str, section: &str) -> Arc<Sequencer> {
        self.inner
            .sequencers
            .get_with(format!("{session_id}:{section}"), || {
                Arc::new(Sequencer::new())
            })
    }
}
