//! Generic data section pages.
//!
//! One handler pair serves all eight data sections; the slug picks the
//! section's configuration and everything else is the shared paged table.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use copperleaf_core::api::types::Paged;

use crate::components::{SectionConfig, TableState, TableView, paged_table};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{Merchant, SessionKey};
use crate::state::AppState;

/// Section page template. Carries the same `table` field as
/// [`TableTemplate`] because the page includes the table partial.
#[derive(Template, WebTemplate)]
#[template(path = "section.html")]
pub struct SectionTemplate {
    pub active: &'static str,
    pub table: TableView,
}

/// Table fragment template (HTMX swap target).
#[derive(Template, WebTemplate)]
#[template(path = "partials/table.html")]
pub struct TableTemplate {
    pub table: TableView,
}

/// Inline error panel with a user-initiated retry link. Used as both a page
/// body and an HTMX fragment; nothing retries automatically.
#[derive(Template, WebTemplate)]
#[template(path = "partials/error_panel.html")]
pub struct ErrorPanelTemplate {
    pub message: String,
    pub retry_href: String,
}

async fn fetch(
    state: &AppState,
    config: &'static SectionConfig,
    table_state: &TableState,
    token: &str,
) -> std::result::Result<TableView, copperleaf_core::api::ApiError> {
    let page: Paged<Value> = state
        .api()
        .get_paged(
            config.endpoint,
            table_state.page(),
            table_state.page_size(),
            table_state.search(),
            Some(token),
        )
        .await?;
    Ok(TableView::build(config, table_state, &page))
}

fn resolve(slug: &str) -> Result<&'static SectionConfig> {
    paged_table::section(slug).ok_or_else(|| AppError::NotFound(format!("section {slug}")))
}

/// Display a data section page.
pub async fn page(
    State(state): State<AppState>,
    merchant: Merchant,
    Path(slug): Path<String>,
    Query(table_state): Query<TableState>,
) -> Result<Response> {
    let config = resolve(&slug)?;

    match fetch(&state, config, &table_state, &merchant.0.token).await {
        Ok(table) => Ok(SectionTemplate {
            active: config.slug,
            table,
        }
        .into_response()),
        Err(e) => {
            if e.is_unauthorized() {
                return Err(e.into());
            }
            tracing::warn!(error = %e, section = config.slug, "section fetch failed");
            Ok(ErrorPanelTemplate {
                message: format!("We couldn't load {}.", config.title),
                retry_href: format!("/sections/{}", config.slug),
            }
            .into_response())
        }
    }
}

/// Serve the table fragment for HTMX pagination and search.
///
/// A sequence tag is issued before the fetch; if a newer request for this
/// section has been issued by the time the API answers, the response is
/// dropped with a 204 so a slow page can never overwrite a newer one.
pub async fn table(
    State(state): State<AppState>,
    merchant: Merchant,
    SessionKey(session_key): SessionKey,
    Path(slug): Path<String>,
    Query(table_state): Query<TableState>,
) -> Result<Response> {
    let config = resolve(&slug)?;

    let sequencer = state.sequencer(&session_key, config.slug);
    let tag = sequencer.issue();

    let result = fetch(&state, config, &table_state, &merchant.0.token).await;

    if !sequencer.is_current(tag) {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    match result {
        Ok(table) => Ok(TableTemplate { table }.into_response()),
        Err(e) => {
            if e.is_unauthorized() {
                return Err(e.into());
            }
            tracing::warn!(error = %e, section = config.slug, "table fragment fetch failed");
            Ok(ErrorPanelTemplate {
                message: format!("We couldn't load {}.", config.title),
                retry_href: format!("/sections/{}", config.slug),
            }
            .into_response())
        }
    }
}
