//! Merchant profile page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use copperleaf_core::api::types::Profile;

use crate::error::Result;
use crate::filters;
use crate::middleware::Merchant;
use crate::routes::sections::ErrorPanelTemplate;
use crate::state::AppState;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub active: &'static str,
    pub profile: Profile,
    pub store_id: Option<String>,
}

/// Display the merchant's profile record.
pub async fn show(State(state): State<AppState>, merchant: Merchant) -> Result<Response> {
    match state
        .api()
        .get_json::<Profile>("Profile", Some(&merchant.0.token))
        .await
    {
        Ok(profile) => Ok(ProfileTemplate {
            active: "profile",
            profile,
            store_id: merchant.0.store_id,
        }
        .into_response()),
        Err(e) => {
            if e.is_unauthorized() {
                return Err(e.into());
            }
            tracing::warn!(error = %e, "merchant profile fetch failed");
            Ok(ErrorPanelTemplate {
                message: "We couldn't load your profile.".to_string(),
                retry_href: "/profile".to_string(),
            }
            .into_response())
        }
    }
}
