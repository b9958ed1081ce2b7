//! Wishlist route handlers.
//!
//! The wishlist is a demonstration feature: a plain list in the session
//! storage tier, scoped to the browser session but not to a user, and gone
//! when the session expires.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use serde::{Deserialize, Serialize};

use crate::cart::{Tier, TierStores};
use crate::error::Result;
use crate::filters;
use crate::middleware::ClientKey;
use crate::state::AppState;

/// One saved wishlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: String,
    pub name: String,
}

fn wishlist_key(client_key: &str) -> String {
    format!("{client_key}:wishlist")
}

fn load(stores: &TierStores, client_key: &str) -> Vec<WishlistEntry> {
    stores
        .get(Tier::Session, &wishlist_key(client_key))
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

fn save(stores: &TierStores, client_key: &str, entries: &[WishlistEntry]) {
    match serde_json::to_string(entries) {
        Ok(raw) => {
            if let Err(e) = stores.put(Tier::Session, &wishlist_key(client_key), raw) {
                tracing::warn!(error = %e, "wishlist save rejected");
            }
        }
        Err(e) => tracing::error!(error = %e, "wishlist serialization failed"),
    }
}

/// Toggle an entry: present → removed, absent → appended.
fn toggle_entry(entries: &mut Vec<WishlistEntry>, entry: WishlistEntry) -> bool {
    if entries.iter().any(|e| e.id == entry.id) {
        entries.retain(|e| e.id != entry.id);
        false
    } else {
        entries.push(entry);
        true
    }
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/index.html")]
pub struct WishlistTemplate {
    pub entries: Vec<WishlistEntry>,
}

/// Wishlist toggle button fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_button.html")]
pub struct WishlistButtonTemplate {
    pub id: String,
    pub name: String,
    pub saved: bool,
}

/// Toggle form payload.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub id: String,
    pub name: String,
}

/// Display the wishlist page.
pub async fn index(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
) -> Result<Response> {
    Ok(WishlistTemplate {
        entries: load(state.stores(), &client_key),
    }
    .into_response())
}

/// Toggle a product in the wishlist. Returns the button fragment.
pub async fn toggle(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    let mut entries = load(state.stores(), &client_key);
    let saved = toggle_entry(
        &mut entries,
        WishlistEntry {
            id: form.id.clone(),
            name: form.name.clone(),
        },
    );
    save(state.stores(), &client_key, &entries);

    Ok(WishlistButtonTemplate {
        id: form.id,
        name: form.name,
        saved,
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> WishlistEntry {
        WishlistEntry {
            id: id.to_string(),
            name: format!("Item {id}"),
        }
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut entries = Vec::new();
        assert!(toggle_entry(&mut entries, entry("a")));
        assert_eq!(entries.len(), 1);
        assert!(!toggle_entry(&mut entries, entry("a")));
        assert!(entries.is_empty());
    }

    #[test]
    fn wishlist_lives_in_the_session_tier_only() {
        let stores = TierStores::in_memory();
        save(&stores, "c1", &[entry("a")]);

        assert_eq!(load(&stores, "c1").len(), 1);
        assert!(stores.get(Tier::Durable, &wishlist_key("c1")).is_none());
    }
}
