//! Two-tier key-value storage behind one interface.
//!
//! The original client kept per-user state in two browser stores: a durable
//! one that survives restarts ("remember me") and a session-scoped one that
//! does not. Server-side the same model holds: two named tiers behind one
//! trait, with an explicit [`TierStores::migrate`] operation instead of ad
//! hoc tier guessing scattered per feature.
//!
//! Values are serialized JSON strings; the tiers themselves know nothing
//! about carts or auth blobs.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use thiserror::Error;

/// Durable-tier retention (models "remember me" survival across visits).
const DURABLE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Session-tier idle expiry (models the end of a browser session).
const SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Per-tier entry capacity.
const TIER_CAPACITY: u64 = 100_000;

/// The two storage tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Survives across visits; selected by "remember me".
    Durable,
    /// Scoped to the current browser session.
    Session,
}

impl Tier {
    /// The other tier.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Durable => Self::Session,
            Self::Session => Self::Durable,
        }
    }
}

/// A storage write was rejected.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store refused the write for capacity reasons. The caller
    /// must keep its in-memory state authoritative and warn the user.
    #[error("storage write rejected for key {0}")]
    Capacity(String),
}

/// A single key-value storage tier.
pub trait TierStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Capacity`] when the store rejects the write.
    fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete a value.
    fn remove(&self, key: &str);
}

/// Production tier backed by a `moka` sync cache.
pub struct CacheTierStore {
    cache: Cache<String, String>,
}

impl CacheTierStore {
    fn durable() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(TIER_CAPACITY)
                .time_to_live(DURABLE_TTL)
                .build(),
        }
    }

    fn session() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(TIER_CAPACITY)
                .time_to_idle(SESSION_IDLE)
                .build(),
        }
    }
}

impl TierStore for CacheTierStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key)
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        // moka evicts instead of rejecting, so this write always lands.
        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.cache.invalidate(key);
    }
}

/// Both tiers, addressed by [`Tier`].
#[derive(Clone)]
pub struct TierStores {
    durable: Arc<dyn TierStore>,
    session: Arc<dyn TierStore>,
}

impl TierStores {
    /// Build from explicit tier implementations (tests inject fakes here).
    #[must_use]
    pub fn new(durable: Arc<dyn TierStore>, session: Arc<dyn TierStore>) -> Self {
        Self { durable, session }
    }

    /// Production in-memory tiers with the standard expiry policy.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(CacheTierStore::durable()),
            Arc::new(CacheTierStore::session()),
        )
    }

    /// The store for the given tier.
    #[must_use]
    pub fn store(&self, tier: Tier) -> &dyn TierStore {
        match tier {
            Tier::Durable => self.durable.as_ref(),
            Tier::Session => self.session.as_ref(),
        }
    }

    /// Read from a tier.
    #[must_use]
    pub fn get(&self, tier: Tier, key: &str) -> Option<String> {
        self.store(tier).get(key)
    }

    /// Write to a tier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Capacity`] when the write is rejected.
    pub fn put(&self, tier: Tier, key: &str, value: String) -> Result<(), StoreError> {
        self.store(tier).put(key, value)
    }

    /// Delete from a tier.
    pub fn remove(&self, tier: Tier, key: &str) {
        self.store(tier).remove(key);
    }

    /// Move a value between tiers: write to `to`, then delete from `from`.
    ///
    /// Returns the moved value, or `None` when the source key was absent.
    /// If the destination write is rejected, the source is left untouched
    /// so the value is never lost.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Capacity`] when the destination rejects the
    /// write.
    pub fn migrate(&self, from: Tier, to: Tier, key: &str) -> Result<Option<String>, StoreError> {
        let Some(value) = self.store(from).get(key) else {
            return Ok(None);
        };
        self.store(to).put(key, value.clone())?;
        self.store(from).remove(key);
        Ok(Some(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn migrate_moves_not_copies() {
        let stores = TierStores::in_memory();
        stores
            .put(Tier::Session, "cart_u1", "[]".to_string())
            .unwrap();

        let moved = stores.migrate(Tier::Session, Tier::Durable, "cart_u1").unwrap();
        assert_eq!(moved.as_deref(), Some("[]"));
        assert_eq!(stores.get(Tier::Durable, "cart_u1").as_deref(), Some("[]"));
        assert!(stores.get(Tier::Session, "cart_u1").is_none());
    }

    #[test]
    fn migrate_missing_key_is_noop() {
        let stores = TierStores::in_memory();
        let moved = stores.migrate(Tier::Session, Tier::Durable, "nope").unwrap();
        assert!(moved.is_none());
    }

    #[test]
    fn tier_other_flips() {
        assert_eq!(Tier::Durable.other(), Tier::Session);
        assert_eq!(Tier::Session.other(), Tier::Durable);
    }
}
