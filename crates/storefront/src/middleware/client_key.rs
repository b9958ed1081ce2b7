//! Per-client storage namespace key.
//!
//! The two storage tiers are keyed per visitor. Each browser session gets a
//! stable random key, carried in the tower-session, and every tier key is
//! prefixed with it. This is the server-side analogue of browser storage
//! being per-browser.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

/// Session key holding the client namespace key.
const CLIENT_KEY: &str = "client_key";

/// Extractor yielding the visitor's storage namespace key, creating one on
/// first use.
pub struct ClientKey(pub String);

/// Rejection when the session layer is missing or unwritable.
pub struct ClientKeyRejection;

impl IntoResponse for ClientKeyRejection {
    fn into_response(self) -> Response {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl<S> FromRequestParts<S> for ClientKey
where
    S: Send + Sync,
{
    type Rejection = ClientKeyRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(ClientKeyRejection)?;

        if let Ok(Some(key)) = session.get::<String>(CLIENT_KEY).await {
            return Ok(Self(key));
        }

        let key = Uuid::new_v4().to_string();
        session
            .insert(CLIENT_KEY, key.clone())
            .await
            .map_err(|_| ClientKeyRejection)?;
        Ok(Self(key))
    }
}
