//! Customer profile route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::json;

use copperleaf_core::api::types::Profile;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireUser;
use crate::routes::ErrorPageTemplate;
use crate::state::AppState;

/// Profile page query parameters.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub notice: Option<String>,
}

/// Profile edit form payload.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub profile: Profile,
    pub notice: Option<String>,
}

/// Display the customer profile.
pub async fn show(
    State(state): State<AppState>,
    user: RequireUser,
    Query(query): Query<ProfileQuery>,
) -> Result<Response> {
    match state
        .api()
        .get_json::<Profile>("Profile", Some(&user.0.token))
        .await
    {
        Ok(profile) => Ok(ProfileTemplate {
            profile,
            notice: query
                .notice
                .filter(|n| n == "saved")
                .map(|_| "Profile saved.".to_string()),
        }
        .into_response()),
        Err(e) => {
            if e.is_unauthorized() {
                return Err(e.into());
            }
            tracing::warn!(error = %e, "profile fetch failed");
            Ok(ErrorPageTemplate {
                message: "We couldn't load your profile.".to_string(),
                retry_href: "/account".to_string(),
            }
            .into_response())
        }
    }
}

/// Save profile edits back to the API.
pub async fn update(
    State(state): State<AppState>,
    user: RequireUser,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let payload = json!({
        "fullName": form.full_name.trim(),
        "email": form.email.trim(),
        "phoneNumber": form.phone.trim(),
        "address": form.address.trim(),
        "city": form.city.trim(),
        "country": form.country.trim(),
    });

    state.api().put("Profile", payload, Some(&user.0.token)).await?;
    Ok(Redirect::to("/account?notice=saved").into_response())
}
