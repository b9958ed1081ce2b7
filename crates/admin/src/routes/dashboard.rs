//! Merchant dashboard: summary cards plus the recent-orders table.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use copperleaf_core::api::types::{DashboardStats, Paged};

use crate::components::{TableState, TableView, paged_table};
use crate::error::Result;
use crate::filters;
use crate::middleware::Merchant;
use crate::routes::sections::ErrorPanelTemplate;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub active: &'static str,
    pub stats: DashboardStats,
    /// Set when the token carries no store id claim; the dashboard renders
    /// a configuration warning instead of guessing a store.
    pub store_warning: bool,
    pub table: TableView,
}

/// Display the dashboard.
pub async fn dashboard(State(state): State<AppState>, merchant: Merchant) -> Result<Response> {
    let token = merchant.0.token.as_str();

    let (stats, store_warning) = match merchant.0.store_id.as_deref() {
        Some(store_id) => {
            let path = format!("merchant/dashboard/{store_id}");
            match state.api().get_json::<DashboardStats>(&path, Some(token)).await {
                Ok(stats) => (stats, false),
                Err(e) => {
                    if e.is_unauthorized() {
                        return Err(e.into());
                    }
                    tracing::warn!(error = %e, "dashboard stats fetch failed");
                    return Ok(ErrorPanelTemplate {
                        message: "We couldn't load the dashboard.".to_string(),
                        retry_href: "/".to_string(),
                    }
                    .into_response());
                }
            }
        }
        None => {
            tracing::warn!(user_id = %merchant.0.user_id, "token carries no store id claim");
            (DashboardStats::default(), true)
        }
    };

    // Recent orders reuse the orders section config, first page only.
    let orders_config = paged_table::section("orders")
        .ok_or_else(|| crate::error::AppError::Internal("orders section missing".to_string()))?;
    let table_state = TableState {
        page: Some(1),
        page_size: Some(10),
        search: None,
    };
    let recent = state
        .api()
        .get_paged::<serde_json::Value>(orders_config.endpoint, 1, 10, None, Some(token))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "recent orders fetch failed");
            Paged::default()
        });

    Ok(DashboardTemplate {
        active: "dashboard",
        stats,
        store_warning,
        table: TableView::build(orders_config, &table_state, &recent),
    }
    .into_response())
}
