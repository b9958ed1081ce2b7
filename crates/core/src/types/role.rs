//! User roles carried in the auth token claims.
//!
//! Roles are asserted by the remote API inside the token; this system only
//! reads them to decide which console a user may see. Enforcement happens
//! server-side at the API.

use serde::{Deserialize, Serialize};

/// A single role claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Merchant,
    Admin,
    /// Any role string this client does not recognize.
    #[serde(untagged)]
    Other(String),
}

impl Role {
    /// Parse a role from its claim string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "customer" => Self::Customer,
            "merchant" | "seller" => Self::Merchant,
            "admin" => Self::Admin,
            _ => Self::Other(s.to_string()),
        }
    }
}

/// The set of roles decoded from a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    /// Build a role set from claim strings, deduplicating.
    #[must_use]
    pub fn from_claims<I, S>(claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roles = Vec::new();
        for claim in claims {
            let role = Role::parse(claim.as_ref());
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        Self(roles)
    }

    /// Whether the set contains the given role.
    #[must_use]
    pub fn contains(&self, role: &Role) -> bool {
        self.0.contains(role)
    }

    /// Whether this user may access the merchant console.
    #[must_use]
    pub fn has_merchant_access(&self) -> bool {
        self.contains(&Role::Merchant) || self.contains(&Role::Admin)
    }

    /// Iterate over the roles.
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Role::parse("Merchant"), Role::Merchant);
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("seller"), Role::Merchant);
    }

    #[test]
    fn unknown_roles_are_preserved() {
        assert_eq!(
            Role::parse("warehouse"),
            Role::Other("warehouse".to_string())
        );
    }

    #[test]
    fn merchant_access() {
        let merchant = RoleSet::from_claims(["customer", "merchant"]);
        assert!(merchant.has_merchant_access());

        let customer = RoleSet::from_claims(["customer"]);
        assert!(!customer.has_merchant_access());
    }

    #[test]
    fn from_claims_deduplicates() {
        let roles = RoleSet::from_claims(["admin", "Admin", "ADMIN"]);
        assert_eq!(roles.iter().count(), 1);
    }
}
