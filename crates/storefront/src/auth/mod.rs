//! Auth session accessor.
//!
//! Authentication itself is the remote API's job: the client receives an
//! opaque bearer token at login, stores it in one of the two storage tiers
//! ("remember me" selects the durable one), and forwards it on every
//! request that needs identity. Claims decoding lives in
//! `copperleaf_core::token`; this module only decides which tier holds the
//! blob.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use copperleaf_core::token::{self, TokenError};
use copperleaf_core::{RoleSet, UserId};

use crate::cart::{Tier, TierStores};

/// Storage key for the auth blob within a client namespace.
#[must_use]
pub fn auth_key(client_key: &str) -> String {
    format!("{client_key}:auth")
}

/// Errors resolving the auth session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No auth blob in either tier.
    #[error("not signed in")]
    NotSignedIn,

    /// The stored token could not be decoded.
    #[error("unusable token: {0}")]
    Token(#[from] TokenError),

    /// The stored blob is not valid JSON.
    #[error("malformed auth blob: {0}")]
    Malformed(String),
}

/// The stored auth blob. The token inside is opaque to this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthBlob {
    #[serde(alias = "token", alias = "Token")]
    pub jwt: String,
}

/// The resolved auth session for the current visitor.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The opaque bearer token, forwarded verbatim to the API.
    pub token: String,
    pub user_id: UserId,
    pub roles: RoleSet,
    /// Merchant store id, when the token carries one.
    pub store_id: Option<String>,
}

/// Decode a token into a session.
///
/// # Errors
///
/// Propagates [`TokenError`] for tokens with no decodable claims or no
/// subject.
pub fn decode_session(token: &str) -> Result<AuthSession, AuthError> {
    let claims = token::decode_claims(token)?;
    Ok(AuthSession {
        token: token.to_string(),
        user_id: claims.user_id,
        roles: claims.roles,
        store_id: claims.store_id,
    })
}

/// Store the auth blob in the tier selected by "remember me", clearing the
/// other tier so exactly one copy exists.
pub fn store_auth(stores: &TierStores, client_key: &str, jwt: &str, remember: bool) {
    let tier = if remember { Tier::Durable } else { Tier::Session };
    let key = auth_key(client_key);
    let blob = AuthBlob {
        jwt: jwt.to_string(),
    };
    match serde_json::to_string(&blob) {
        Ok(raw) => {
            if let Err(e) = stores.put(tier, &key, raw) {
                tracing::warn!(error = %e, "auth blob save rejected");
            }
            stores.remove(tier.other(), &key);
        }
        Err(e) => tracing::error!(error = %e, "auth blob serialization failed"),
    }
}

/// Remove the auth blob from both tiers (logout).
pub fn clear_auth(stores: &TierStores, client_key: &str) {
    let key = auth_key(client_key);
    stores.remove(Tier::Durable, &key);
    stores.remove(Tier::Session, &key);
}

/// Resolve the current auth session: durable tier first, then session tier.
///
/// # Errors
///
/// Returns [`AuthError::NotSignedIn`] when no blob exists, or a decode
/// error when the stored token is unusable.
pub fn resolve(stores: &TierStores, client_key: &str) -> Result<AuthSession, AuthError> {
    let key = auth_key(client_key);
    let raw = stores
        .get(Tier::Durable, &key)
        .or_else(|| stores.get(Tier::Session, &key))
        .ok_or(AuthError::NotSignedIn)?;

    let blob: AuthBlob =
        serde_json::from_str(&raw).map_err(|e| AuthError::Malformed(e.to_string()))?;
    decode_session(&blob.jwt)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    /// Build an unsigned test token with the given JSON claims.
    fn token_with(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn remember_me_selects_durable_tier() {
        let stores = TierStores::in_memory();
        let token = token_with(&serde_json::json!({"sub": "u-1"}));

        store_auth(&stores, "c1", &token, false);
        assert!(stores.get(Tier::Session, &auth_key("c1")).is_some());
        assert!(stores.get(Tier::Durable, &auth_key("c1")).is_none());

        // Re-login with remember me moves the blob; only one copy exists.
        store_auth(&stores, "c1", &token, true);
        assert!(stores.get(Tier::Durable, &auth_key("c1")).is_some());
        assert!(stores.get(Tier::Session, &auth_key("c1")).is_none());

        let session = resolve(&stores, "c1").unwrap();
        assert_eq!(session.user_id.as_str(), "u-1");
    }

    #[test]
    fn logout_clears_both_tiers() {
        let stores = TierStores::in_memory();
        let token = token_with(&serde_json::json!({"sub": "u-1"}));
        store_auth(&stores, "c1", &token, true);

        clear_auth(&stores, "c1");
        assert!(matches!(
            resolve(&stores, "c1"),
            Err(AuthError::NotSignedIn)
        ));
    }

    #[test]
    fn pascal_case_blob_field_is_accepted() {
        let stores = TierStores::in_memory();
        let token = token_with(&serde_json::json!({"sub": "u-2"}));
        let raw = serde_json::json!({"Token": token}).to_string();
        stores.put(Tier::Session, &auth_key("c1"), raw).unwrap();

        let session = resolve(&stores, "c1").unwrap();
        assert_eq!(session.user_id.as_str(), "u-2");
    }

    #[test]
    fn garbage_blob_is_malformed() {
        let stores = TierStores::in_memory();
        stores
            .put(Tier::Session, &auth_key("c1"), "not json".to_string())
            .unwrap();
        assert!(matches!(
            resolve(&stores, "c1"),
            Err(AuthError::Malformed(_))
        ));
    }
}
