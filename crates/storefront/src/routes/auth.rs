//! Login and logout route handlers.
//!
//! Authentication is the remote API's job. Login forwards the credentials,
//! stores the returned token in the tier selected by "remember me", and
//! clears the other tier. Logout clears both tiers; the cart key stays, so
//! the cart is waiting on the next login.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth;
use crate::error::Result;
use crate::filters;
use crate::middleware::ClientKey;
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
    /// Checkbox; absent when unchecked.
    #[serde(default)]
    pub remember: Option<String>,
}

/// The API's login response. Only the token matters here.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "Token", alias = "accessToken", alias = "AccessToken")]
    token: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
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

/// Forward credentials to the API and store the returned token.
pub async fn login(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let payload = json!({
        "email": form.email.trim(),
        "password": form.password,
    });

    match state
        .api()
        .post_json::<LoginResponse>("Auth/login", payload, None)
        .await
    {
        Ok(response) => {
            let remember = form.remember.is_some();
            auth::store_auth(state.stores(), &client_key, &response.token, remember);
            tracing::info!(remember, "login succeeded");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::debug!(error = %e, "login rejected");
            Ok(LoginTemplate {
                notice: None,
                error: Some("Sign-in failed. Check your email and password.".to_string()),
                email: form.email,
            }
            .into_response())
        }
    }
}

/// Clear the auth blob from both tiers and return home.
pub async fn logout(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
) -> Result<Response> {
    auth::clear_auth(state.stores(), &client_key);
    Ok(Redirect::to("/auth/login?notice=signed-out").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_notices_have_text() {
        assert!(notice_text("session-expired").is_some());
        assert!(notice_text("sign-in-required").is_some());
        assert!(notice_text("signed-out").is_some());
    }

    #[test]
    fn unknown_notice_renders_nothing() {
        assert!(notice_text("whatever").is_none());
    }
}
