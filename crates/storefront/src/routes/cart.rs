//! Cart route handlers.
//!
//! The cart page swaps its line table via HTMX fragments; every mutation
//! re-renders the fragment from the freshly saved cart, so the markup never
//! drifts from the stored list.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::cart::{Cart, CartLine, CartTotals};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{ClientKey, RequireUser};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
    pub image_url: Option<String>,
}

impl CartLineView {
    fn from_line(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total: line.line_total(),
            image_url: line.image_url.clone(),
        }
    }
}

/// Cart page template. Carries the same fields as [`CartItemsTemplate`]
/// because the page includes the line table partial.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartPageTemplate {
    pub lines: Vec<CartLineView>,
    pub totals: CartTotals,
    pub save_warning: bool,
}

/// Cart line table fragment (HTMX swap target).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub lines: Vec<CartLineView>,
    pub totals: CartTotals,
    pub save_warning: bool,
}

impl CartItemsTemplate {
    fn from_cart(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from_line).collect(),
            totals: cart.totals(),
            save_warning: cart.save_warning,
        }
    }
}

/// Cart count badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add-to-cart form payload. The product card carries the display fields so
/// adding never needs another API round trip.
#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: Option<u32>,
    pub image_url: Option<String>,
}

/// Absolute quantity form payload.
#[derive(Debug, Deserialize)]
pub struct SetQuantityForm {
    pub id: String,
    pub quantity: u32,
}

/// Relative quantity form payload.
#[derive(Debug, Deserialize)]
pub struct AdjustForm {
    pub id: String,
    pub delta: i64,
}

/// Line removal form payload.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub id: String,
}

fn open_cart(state: &AppState, client_key: &str, user: &RequireUser) -> Cart {
    Cart::open(state.stores(), client_key, &user.0.user_id)
}

/// Display the cart page.
pub async fn show(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    user: RequireUser,
) -> Result<Response> {
    let cart = open_cart(&state, &client_key, &user);
    let items = CartItemsTemplate::from_cart(&cart);
    Ok(CartPageTemplate {
        lines: items.lines,
        totals: items.totals,
        save_warning: items.save_warning,
    }
    .into_response())
}

/// Add a line to the cart. Returns the cart count badge fragment.
pub async fn add(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    user: RequireUser,
    Form(form): Form<AddForm>,
) -> Result<Response> {
    let unit_price: Decimal = form
        .price
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("invalid price".to_string()))?;

    let mut cart = open_cart(&state, &client_key, &user);
    cart.add_line(
        state.stores(),
        CartLine {
            id: form.id,
            name: form.name,
            unit_price,
            quantity: form.quantity.unwrap_or(1),
            image_url: form.image_url,
        },
    );

    Ok(CartCountTemplate {
        count: cart.item_count(),
    }
    .into_response())
}

/// Set a line's quantity. Returns the cart line table fragment.
pub async fn update(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    user: RequireUser,
    Form(form): Form<SetQuantityForm>,
) -> Result<Response> {
    let mut cart = open_cart(&state, &client_key, &user);
    cart.set_quantity(state.stores(), &form.id, form.quantity);
    Ok(CartItemsTemplate::from_cart(&cart).into_response())
}

/// Adjust a line's quantity by a delta. Returns the cart line table fragment.
pub async fn adjust(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    user: RequireUser,
    Form(form): Form<AdjustForm>,
) -> Result<Response> {
    let mut cart = open_cart(&state, &client_key, &user);
    cart.update_quantity(state.stores(), &form.id, form.delta);
    Ok(CartItemsTemplate::from_cart(&cart).into_response())
}

/// Remove a line. Returns the cart line table fragment.
pub async fn remove(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    user: RequireUser,
    Form(form): Form<RemoveForm>,
) -> Result<Response> {
    let mut cart = open_cart(&state, &client_key, &user);
    cart.remove_line(state.stores(), &form.id);
    Ok(CartItemsTemplate::from_cart(&cart).into_response())
}

/// Serve the cart count badge. Anonymous visitors get a zero badge.
pub async fn count(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    crate::middleware::OptionalUser(user): crate::middleware::OptionalUser,
) -> Result<Response> {
    let count = user
        .map(|session| Cart::open(state.stores(), &client_key, &session.user_id).item_count())
        .unwrap_or(0);
    Ok(CartCountTemplate { count }.into_response())
}
