//! Session middleware configuration.
//!
//! The merchant's bearer token lives in the tower-session, so an admin
//! sign-in lasts as long as the session cookie. Restarting the process signs
//! every merchant out; the remote API keeps all durable state.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

use crate::config::AdminConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cl_admin_session";

/// Session expiry time in seconds (8 hours).
const SESSION_EXPIRY_SECONDS: i64 = 8 * 60 * 60;

/// Session key holding the per-session sequencer namespace.
const SESSION_KEY: &str = "session_key";

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Extractor yielding a stable random key for this browser session, used to
/// scope request sequencers. Created on first use.
pub struct SessionKey(pub String);

/// Rejection when the session layer is missing or unwritable.
pub struct SessionKeyRejection;

impl IntoResponse for SessionKeyRejection {
    fn into_response(self) -> Response {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl<S> FromRequestParts<S> for SessionKey
where
    S: Send + Sync,
{
    type Rejection = SessionKeyRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(SessionKeyRejection)?;

        if let Ok(Some(key)) = session.get::<String>(SESSION_KEY).await {
            return Ok(Self(key));
        }

        let key = Uuid::new_v4().to_string();
        session
            .insert(SESSION_KEY, key.clone())
            .await
            .map_err(|_| SessionKeyRejection)?;
        Ok(Self(key))
    }
}
