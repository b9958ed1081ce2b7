//! Bearer token claims decoding.
//!
//! The remote API issues JWTs at login. This system treats the token itself
//! as opaque and forwards it verbatim; only the claims payload is decoded
//! here, for the user id, role list, and merchant store id. Signature
//! verification stays with the API, which answers tampered tokens with 401.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{RoleSet, UserId, WireId};

/// Errors decoding a token's claims.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is not a three-segment JWT or its payload is not
    /// base64url JSON.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token decoded but carries no usable subject claim.
    #[error("token has no subject")]
    NoSubject,
}

/// Claims this system reads out of the token payload.
#[derive(Debug, Clone)]
pub struct Claims {
    pub user_id: UserId,
    pub roles: RoleSet,
    /// Merchant store id, when the token carries one.
    pub store_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClaimsWire {
    #[serde(default, alias = "nameid", alias = "userId", alias = "UserId")]
    sub: Option<String>,
    #[serde(default, alias = "roles", alias = "Role", alias = "Roles")]
    role: Option<RoleClaim>,
    #[serde(default, alias = "StoreId", alias = "storeId")]
    store_id: Option<WireId>,
}

/// The role claim arrives as a single string or an array of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RoleClaim {
    One(String),
    Many(Vec<String>),
}

impl RoleClaim {
    fn into_role_set(self) -> RoleSet {
        match self {
            Self::One(role) => RoleSet::from_claims([role]),
            Self::Many(roles) => RoleSet::from_claims(roles),
        }
    }
}

/// Decode the claims segment of a JWT without verifying the signature.
///
/// # Errors
///
/// Returns [`TokenError::Malformed`] when the token does not have three
/// segments or the payload is not base64url JSON, and
/// [`TokenError::NoSubject`] when no subject claim is present.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| TokenError::Malformed("not a JWT".to_string()))?;

    // Some issuers pad the segment; base64url in JWTs is unpadded.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Malformed(e.to_string()))?;
    let claims: ClaimsWire =
        serde_json::from_slice(&bytes).map_err(|e| TokenError::Malformed(e.to_string()))?;

    let subject = claims
        .sub
        .filter(|s| !s.is_empty())
        .ok_or(TokenError::NoSubject)?;

    Ok(Claims {
        user_id: UserId::new(subject),
        roles: claims.role.map(RoleClaim::into_role_set).unwrap_or_default(),
        store_id: claims.store_id.map(|id| id.to_key()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Role;

    /// Build an unsigned test token with the given JSON claims.
    fn token_with(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn decodes_subject_and_roles() {
        let token = token_with(&serde_json::json!({
            "sub": "u-17",
            "role": ["customer", "merchant"],
        }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.user_id.as_str(), "u-17");
        assert!(claims.roles.has_merchant_access());
    }

    #[test]
    fn accepts_single_string_role() {
        let token = token_with(&serde_json::json!({"nameid": "u-1", "role": "customer"}));
        let claims = decode_claims(&token).unwrap();
        assert!(claims.roles.contains(&Role::Customer));
        assert!(!claims.roles.has_merchant_access());
    }

    #[test]
    fn reads_store_id_claim() {
        let token = token_with(&serde_json::json!({"sub": "m-1", "storeId": 4}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.store_id.as_deref(), Some("4"));
    }

    #[test]
    fn missing_subject_is_rejected() {
        let token = token_with(&serde_json::json!({"role": "customer"}));
        assert!(matches!(decode_claims(&token), Err(TokenError::NoSubject)));
    }

    #[test]
    fn garbage_token_is_malformed() {
        assert!(matches!(
            decode_claims("nonsense"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            decode_claims("a.!!!.c"),
            Err(TokenError::Malformed(_))
        ));
    }
}
