//! Merchant authentication extractor.
//!
//! The console stores the API's bearer token in the tower-session at login.
//! Every protected handler extracts [`Merchant`], which re-decodes the
//! claims and requires a merchant (or admin) role. Enforcement of what the
//! token may actually do stays with the remote API.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use copperleaf_core::UserId;
use copperleaf_core::token::decode_claims;

use crate::error::AppError;

/// Session key holding the merchant's bearer token.
pub const TOKEN_SESSION_KEY: &str = "admin_token";

/// The signed-in merchant.
#[derive(Debug, Clone)]
pub struct MerchantSession {
    /// The opaque bearer token, forwarded verbatim to the API.
    pub token: String,
    pub user_id: UserId,
    /// Store id from the token's claims. Absent claims render a
    /// configuration warning on the dashboard rather than guessing a store.
    pub store_id: Option<String>,
}

/// Extractor that requires a signed-in merchant.
///
/// Rejects with [`AppError::MissingIdentity`], which redirects to the admin
/// login page with a notice.
pub struct Merchant(pub MerchantSession);

impl<S> FromRequestParts<S> for Merchant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let token: String = session
            .get(TOKEN_SESSION_KEY)
            .await?
            .ok_or_else(|| AppError::MissingIdentity("no token in session".to_string()))?;

        let claims =
            decode_claims(&token).map_err(|e| AppError::MissingIdentity(e.to_string()))?;

        if !claims.roles.has_merchant_access() {
            return Err(AppError::MissingIdentity(
                "account has no merchant role".to_string(),
            ));
        }

        Ok(Self(MerchantSession {
            token,
            user_id: claims.user_id,
            store_id: claims.store_id,
        }))
    }
}
