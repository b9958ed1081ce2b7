//! Authentication extractors.
//!
//! Provides extractors resolving the visitor's auth session from the
//! storage tiers. Enforcement stays with the remote API; these only decide
//! whether a page can address the visitor by id.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{self, AuthSession};
use crate::error::AppError;
use crate::middleware::client_key::ClientKey;
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// Rejects with [`AppError::MissingIdentity`], which redirects to the login
/// page with a notice.
///
/// # Example
///
/// ```rust,ignore
/// async fn orders(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("orders for {}", user.user_id)
/// }
/// ```
pub struct RequireUser(pub AuthSession);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ClientKey(client_key) = ClientKey::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Internal("session layer missing".to_string()))?;

        auth::resolve(state.stores(), &client_key)
            .map(Self)
            .map_err(|e| AppError::MissingIdentity(e.to_string()))
    }
}

/// Extractor that optionally resolves the current user.
///
/// Unlike [`RequireUser`], this never rejects; anonymous visitors get
/// `None`.
pub struct OptionalUser(pub Option<AuthSession>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match ClientKey::from_request_parts(parts, state).await {
            Ok(ClientKey(client_key)) => auth::resolve(state.stores(), &client_key).ok(),
            Err(_) => None,
        };
        Ok(Self(user))
    }
}
