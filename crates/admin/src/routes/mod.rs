//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Dashboard (stats cards + recent orders)
//! GET  /health                   - Health check
//! GET  /login                    - Login page
//! POST /login                    - Login action (requires a merchant role)
//! POST /logout                   - Logout action
//! GET  /profile                  - Merchant profile
//! GET  /sections/{slug}          - Data section page (paged table)
//! GET  /sections/{slug}/table    - Table fragment (HTMX, sequenced)
//! ```
//!
//! Every data section is one instance of the generic paged table; the slug
//! selects its [`crate::components::SectionConfig`].

pub mod auth;
pub mod dashboard;
pub mod profile;
pub mod sections;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/profile", get(profile::show))
        .route("/sections/{slug}", get(sections::page))
        .route("/sections/{slug}/table", get(sections::table))
}
