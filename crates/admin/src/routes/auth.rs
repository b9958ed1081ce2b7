//! Admin login and logout.
//!
//! Login forwards credentials to the API and keeps the returned bearer token
//! in the tower-session, but only for accounts whose claims carry a
//! merchant (or admin) role; customer tokens are rejected here rather than
//! letting the console render empty sections.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use copperleaf_core::token::decode_claims;

use crate::error::{AppError, Result};
use crate::middleware::auth::TOKEN_SESSION_KEY;
use crate::state::AppState;

/// Login page query parameters.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub notice: Option<String>,
}

/// Login form payload.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// The API's login response. Only the token matters here.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "Token", alias = "accessToken", alias = "AccessToken")]
    token: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub notice: Option<String>,
    pub error: Option<String>,
    pub email: String,
}

fn notice_text(notice: &str) -> Option<String> {
    match notice {
        "session-expired" => Some("Your session has expired. Please sign in again.".to_string()),
        "sign-in-required" => Some("Please sign in to continue.".to_string()),
        "signed-out" => Some("You have been signed out.".to_string()),
        _ => None,
    }
}

/// Display the login page.
pub async fn login_page(Query(query): Query<LoginQuery>) -> LoginTemplate {
    LoginTemplate {
        notice: query.notice.as_deref().and_then(notice_text),
        error: None,
        email: String::new(),
    }
}

fn rejected(email: String, message: &str) -> Response {
    LoginTemplate {
        notice: None,
        error: Some(message.to_string()),
        email,
    }
    .into_response()
}

/// Forward credentials to the API; keep the token only for merchants.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let payload = json!({
        "email": form.email.trim(),
        "password": form.password,
    });

    let response = match state
        .api()
        .post_json::<LoginResponse>("Auth/login", payload, None)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(error = %e, "admin login rejected by API");
            return Ok(rejected(
                form.email,
                "Sign-in failed. Check your email and password.",
            ));
        }
    };

    let claims = match decode_claims(&response.token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(error = %e, "API returned an undecodable token");
            return Ok(rejected(form.email, "Sign-in failed. Please try again."));
        }
    };

    if !claims.roles.has_merchant_access() {
        return Ok(rejected(
            form.email,
            "This account does not have merchant access.",
        ));
    }

    session
        .insert(TOKEN_SESSION_KEY, response.token)
        .await
        .map_err(AppError::Session)?;
    tracing::info!(user_id = %claims.user_id, "merchant signed in");

    Ok(Redirect::to("/").into_response())
}

/// Drop the session token and return to the login page.
pub async fn logout(session: Session) -> Result<Response> {
    session
        .remove::<String>(TOKEN_SESSION_KEY)
        .await
        .map_err(AppError::Session)?;
    Ok(Redirect::to("/login?notice=signed-out").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_notices_have_text() {
        assert!(notice_text("session-expired").is_some());
        assert!(notice_text("signed-out").is_some());
        assert!(notice_text("whatever").is_none());
    }
}
