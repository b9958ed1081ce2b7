//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use copperleaf_core::api::types::{Category, Paged};

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::routes::ErrorPageTemplate;
use crate::routes::catalog::CategoryView;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub categories: Vec<CategoryView>,
    pub signed_in: bool,
}

/// Display the home page with a category overview.
///
/// A failed catalog fetch degrades to the error panel; the page is never
/// blank and never retries on its own.
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<Response> {
    let page: Paged<Category> = match state.api().get_paged("Category", 1, 8, None, None).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(error = %e, "home category fetch failed");
            return Ok(ErrorPageTemplate {
                message: "We couldn't load the catalog.".to_string(),
                retry_href: "/".to_string(),
            }
            .into_response());
        }
    };

    Ok(HomeTemplate {
        categories: page.items.iter().map(CategoryView::from_wire).collect(),
        signed_in: user.is_some(),
    }
    .into_response())
}
