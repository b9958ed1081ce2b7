//! Newtype IDs for type-safe entity references.
//!
//! The remote commerce API owns every entity, and its identifiers arrive as
//! opaque strings or numbers depending on endpoint. IDs are therefore stored
//! as strings and wrapped per entity so a `UserId` can never be passed where
//! a `ProductId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper around an opaque remote identifier.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use copperleaf_core::define_id;
/// define_id!(UserId);
/// define_id!(ProductId);
///
/// let user_id = UserId::new("u-17");
/// let product_id = ProductId::new("42");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = product_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);
define_id!(CategoryId);
define_id!(OrderId);

/// A numeric identifier arriving as either a JSON number or string.
///
/// Some endpoints serialize ids as numbers, others as strings; this absorbs
/// both during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Num(i64),
    Str(String),
}

impl WireId {
    /// Render the id as a plain string regardless of wire shape.
    #[must_use]
    pub fn to_key(&self) -> String {
        match self {
            Self::Num(n) => n.to_string(),
            Self::Str(s) => s.clone(),
        }
    }
}

impl Default for WireId {
    fn default() -> Self {
        Self::Str(String::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let user = UserId::new("u-1");
        assert_eq!(user.as_str(), "u-1");
        assert_eq!(user.to_string(), "u-1");
    }

    #[test]
    fn wire_id_accepts_both_shapes() {
        let num: WireId = serde_json::from_str("42").unwrap();
        let text: WireId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(num.to_key(), "42");
        assert_eq!(text.to_key(), "42");
    }
}
