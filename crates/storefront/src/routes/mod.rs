//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (category overview)
//! GET  /health                  - Health check
//!
//! # Catalog
//! GET  /categories              - Category listing
//! GET  /categories/{id}/subcategories - Subcategories of a category
//! GET  /products                - Product grid (filterable, paginated)
//! GET  /products/grid           - Product grid fragment (HTMX, sequenced)
//! GET  /products/{id}           - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add line (returns cart count fragment)
//! POST /cart/update             - Set line quantity (returns cart items fragment)
//! POST /cart/adjust             - Adjust line quantity by delta
//! POST /cart/remove             - Remove line
//! GET  /cart/count              - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                - Checkout form
//! POST /checkout                - Submit order
//!
//! # Orders (requires sign-in)
//! GET  /orders                  - Order tracking list
//! GET  /orders/{id}             - Order detail
//! POST /orders/{id}/cancel      - Cancel an order
//!
//! # Account (requires sign-in)
//! GET  /account                 - Profile
//! POST /account                 - Update profile
//!
//! # Wishlist
//! GET  /wishlist                - Wishlist page
//! POST /wishlist/toggle         - Add/remove a product
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action (stores the API's token)
//! POST /auth/logout             - Logout action (clears both tiers)
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;
pub mod wishlist;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    routing::{get, post},
};

use crate::filters;
use crate::state::AppState;

/// Full-page error panel with a user-initiated retry link.
///
/// Every view degrades to this instead of a blank page; nothing retries
/// automatically.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorPageTemplate {
    pub message: String,
    pub retry_href: String,
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(catalog::categories))
        .route(
            "/categories/{id}/subcategories",
            get(catalog::subcategories),
        )
        .route("/products", get(products::index))
        .route("/products/grid", get(products::grid))
        .route("/products/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/adjust", post(cart::adjust))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the order tracking routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/cancel", post(orders::cancel))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .nest("/orders", order_routes())
        .route("/account", get(account::show).post(account::update))
        .route("/wishlist", get(wishlist::index))
        .route("/wishlist/toggle", post(wishlist::toggle))
        .nest("/auth", auth_routes())
}
