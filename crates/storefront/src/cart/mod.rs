//! The per-user shopping cart.
//!
//! Cart lines are owned by this store and persisted as JSON under a
//! user-scoped key in one of two storage tiers; the durable tier wins when
//! the user asked to be remembered (see [`store`]). Totals are display-only
//! projections; the remote API computes the authoritative charge at
//! checkout.

pub mod store;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use copperleaf_core::UserId;

pub use store::{StoreError, Tier, TierStore, TierStores};

use crate::auth;

/// Flat shipping fee applied to any non-empty cart.
fn shipping_fee() -> Decimal {
    Decimal::new(999, 2) // 9.99
}

/// Tax rate applied to the subtotal.
fn tax_rate() -> Decimal {
    Decimal::new(10, 2) // 0.10
}

/// Storage key for a user's cart within a client namespace.
#[must_use]
pub fn cart_key(client_key: &str, user_id: &UserId) -> String {
    format!("{client_key}:cart_{user_id}")
}

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image_url: Option<String>,
}

impl CartLine {
    /// Line total (unit price × quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Display totals for the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// A user's cart, loaded from its storage tier.
///
/// Every mutation re-saves. Saves fail soft: when the backing store rejects
/// a write, [`Cart::save_warning`] is set and the in-memory list stays
/// authoritative for the rest of the session.
#[derive(Debug)]
pub struct Cart {
    lines: Vec<CartLine>,
    tier: Tier,
    key: String,
    /// Set when the last save was rejected by the storage tier.
    pub save_warning: bool,
}

/// Returns the tier the cart (and auth blob) should live in: durable if a
/// durable auth blob exists, else session. Pure function of auth state.
#[must_use]
pub fn resolve_storage_tier(stores: &TierStores, client_key: &str) -> Tier {
    if stores
        .get(Tier::Durable, &auth::auth_key(client_key))
        .is_some()
    {
        Tier::Durable
    } else {
        Tier::Session
    }
}

impl Cart {
    /// Load the user's cart from the resolved tier.
    ///
    /// If the cart is absent there but present in the other tier, it is
    /// moved over once (the user flipped "remember me" between visits).
    /// Absent in both tiers yields an empty cart. Loading is idempotent: a
    /// second open after the migration neither duplicates nor loses lines.
    #[must_use]
    pub fn open(stores: &TierStores, client_key: &str, user_id: &UserId) -> Self {
        let tier = resolve_storage_tier(stores, client_key);
        let key = cart_key(client_key, user_id);

        let raw = match stores.get(tier, &key) {
            Some(raw) => Some(raw),
            None => match stores.migrate(tier.other(), tier, &key) {
                Ok(moved) => moved,
                Err(e) => {
                    // Migration write rejected: read from the old tier and
                    // carry on; the next successful save will land in the
                    // resolved tier.
                    tracing::warn!(error = %e, "cart migration failed");
                    stores.get(tier.other(), &key)
                }
            },
        };

        let lines = raw
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();

        Self {
            lines,
            tier,
            key,
            save_warning: false,
        }
    }

    /// The cart lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total item count across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Add a line. If a line with the same id exists, its quantity is
    /// incremented by the new line's quantity instead of appending a
    /// duplicate. Quantities below 1 are treated as 1.
    pub fn add_line(&mut self, stores: &TierStores, mut line: CartLine) {
        line.quantity = line.quantity.max(1);
        if let Some(existing) = self.lines.iter_mut().find(|l| l.id == line.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
        self.save(stores);
    }

    /// Adjust a line's quantity by a signed delta, clamped to a minimum
    /// of 1. Removal is never implicit; use [`Self::remove_line`].
    pub fn update_quantity(&mut self, stores: &TierStores, id: &str, delta: i64) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            let current = i64::from(line.quantity);
            let next = current.saturating_add(delta).max(1);
            line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
            self.save(stores);
        }
    }

    /// Set a line's quantity to an absolute value, clamped to a minimum of 1.
    pub fn set_quantity(&mut self, stores: &TierStores, id: &str, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            line.quantity = quantity.max(1);
            self.save(stores);
        }
    }

    /// Remove a line entirely.
    pub fn remove_line(&mut self, stores: &TierStores, id: &str) {
        self.lines.retain(|l| l.id != id);
        self.save(stores);
    }

    /// Empty the cart (checkout success).
    pub fn clear(&mut self, stores: &TierStores) {
        self.lines.clear();
        self.save(stores);
    }

    /// Serialize the list to the resolved tier. A rejected write keeps the
    /// in-memory list authoritative and raises [`Self::save_warning`].
    fn save(&mut self, stores: &TierStores) {
        let raw = match serde_json::to_string(&self.lines) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "cart serialization failed");
                self.save_warning = true;
                return;
            }
        };
        match stores.put(self.tier, &self.key, raw) {
            Ok(()) => self.save_warning = false,
            Err(e) => {
                tracing::warn!(error = %e, "cart save rejected, keeping in-memory list");
                self.save_warning = true;
            }
        }
    }

    /// Compute display totals.
    ///
    /// subtotal = Σ(price × qty); shipping = flat fee iff non-empty;
    /// tax = 10% of subtotal; total = subtotal + shipping + tax.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal: Decimal = self.lines.iter().map(CartLine::line_total).sum();
        let shipping = if self.lines.is_empty() {
            Decimal::ZERO
        } else {
            shipping_fee()
        };
        let tax = (subtotal * tax_rate()).round_dp(2);
        CartTotals {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn line(id: &str, price: Decimal, quantity: u32) -> CartLine {
        CartLine {
            id: id.to_string(),
            name: format!("Item {id}"),
            unit_price: price,
            quantity,
            image_url: None,
        }
    }

    fn user() -> UserId {
        UserId::new("u-1")
    }

    #[test]
    fn totals_match_the_worked_example() {
        // Two lines ($10×2, $5×1) → subtotal 25, shipping 9.99, tax 2.50,
        // total 37.49.
        let stores = TierStores::in_memory();
        let mut cart = Cart::open(&stores, "c1", &user());
        cart.add_line(&stores, line("a", Decimal::new(10, 0), 2));
        cart.add_line(&stores, line("b", Decimal::new(5, 0), 1));

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Decimal::new(25, 0));
        assert_eq!(totals.shipping, Decimal::new(999, 2));
        assert_eq!(totals.tax, Decimal::new(250, 2));
        assert_eq!(totals.total, Decimal::new(3749, 2));
    }

    #[test]
    fn empty_cart_has_no_shipping() {
        let stores = TierStores::in_memory();
        let cart = Cart::open(&stores, "c1", &user());
        let totals = cart.totals();
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn adding_same_id_increments_quantity() {
        let stores = TierStores::in_memory();
        let mut cart = Cart::open(&stores, "c1", &user());
        cart.add_line(&stores, line("a", Decimal::new(10, 0), 1));
        cart.add_line(&stores, line("a", Decimal::new(10, 0), 2));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn quantity_never_drops_below_one() {
        let stores = TierStores::in_memory();
        let mut cart = Cart::open(&stores, "c1", &user());
        cart.add_line(&stores, line("a", Decimal::new(10, 0), 3));

        cart.update_quantity(&stores, "a", -100);
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.set_quantity(&stores, "a", 0);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn removal_is_explicit() {
        let stores = TierStores::in_memory();
        let mut cart = Cart::open(&stores, "c1", &user());
        cart.add_line(&stores, line("a", Decimal::new(10, 0), 1));
        cart.remove_line(&stores, "a");
        assert!(cart.is_empty());
    }

    #[test]
    fn cart_persists_across_opens() {
        let stores = TierStores::in_memory();
        let mut cart = Cart::open(&stores, "c1", &user());
        cart.add_line(&stores, line("a", Decimal::new(10, 0), 2));

        let reloaded = Cart::open(&stores, "c1", &user());
        assert_eq!(reloaded.lines(), cart.lines());
    }

    #[test]
    fn cart_migrates_when_tier_switches() {
        let stores = TierStores::in_memory();
        // Cart saved while signed in without "remember me" (session tier).
        let mut cart = Cart::open(&stores, "c1", &user());
        cart.add_line(&stores, line("a", Decimal::new(10, 0), 2));
        assert!(stores.get(Tier::Session, &cart_key("c1", &user())).is_some());

        // User signs in with "remember me": durable auth blob appears.
        stores
            .put(Tier::Durable, &crate::auth::auth_key("c1"), "{}".to_string())
            .unwrap();

        // Next open migrates the cart to the durable tier.
        let migrated = Cart::open(&stores, "c1", &user());
        assert_eq!(migrated.lines().len(), 1);
        assert!(stores.get(Tier::Durable, &cart_key("c1", &user())).is_some());
        assert!(stores.get(Tier::Session, &cart_key("c1", &user())).is_none());

        // Idempotent: a second load neither duplicates nor loses lines.
        let again = Cart::open(&stores, "c1", &user());
        assert_eq!(again.lines(), migrated.lines());
        assert_eq!(again.lines()[0].quantity, 2);
    }

    #[test]
    fn carts_are_scoped_per_user() {
        let stores = TierStores::in_memory();
        let mut cart = Cart::open(&stores, "c1", &user());
        cart.add_line(&stores, line("a", Decimal::new(10, 0), 1));

        let other = Cart::open(&stores, "c1", &UserId::new("u-2"));
        assert!(other.is_empty());
    }

    /// A tier that rejects every write, for exercising the fail-soft path.
    struct RejectingStore;

    impl TierStore for RejectingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn put(&self, key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Capacity(key.to_string()))
        }
        fn remove(&self, _key: &str) {}
    }

    #[test]
    fn rejected_save_keeps_in_memory_list() {
        let stores = TierStores::new(Arc::new(RejectingStore), Arc::new(RejectingStore));
        let mut cart = Cart::open(&stores, "c1", &user());
        cart.add_line(&stores, line("a", Decimal::new(10, 0), 1));

        assert!(cart.save_warning);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.totals().subtotal, Decimal::new(10, 0));
    }
}
