//! Integration tests for Copperleaf Market.
//!
//! The tests run against live binaries and are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the binaries (each reads .env)
//! cargo run -p copperleaf-storefront &
//! cargo run -p copperleaf-admin &
//!
//! # Run integration tests
//! cargo test -p copperleaf-integration-tests -- --ignored
//! ```
//!
//! Both binaries need `COMMERCE_API_BASE_URL` pointing at a reachable
//! commerce API; the tests only assert on what the pages render.

use reqwest::Client;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin console (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client with a cookie store, so sessions survive across requests.
///
/// # Panics
///
/// Panics if the TLS backend fails to initialize.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
