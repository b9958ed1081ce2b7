//! Checkout route handlers.
//!
//! The flow has two states: Editing (form shown, submit enabled) and
//! Submitting (in flight, the template disables the button via HTMX). All
//! validation runs before any network call; an empty cart is rejected with
//! zero API calls. The API computes the authoritative charge.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::json;

use copperleaf_core::api::types::CheckoutReceipt;

use crate::cart::{Cart, CartTotals};
use crate::error::Result;
use crate::filters;
use crate::middleware::{ClientKey, RequireUser};
use crate::routes::cart::CartLineView;
use crate::state::AppState;

/// Checkout form fields. Every field is required.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// Validate the shipping form. Returns the first human-readable problem.
fn validate(form: &CheckoutForm) -> std::result::Result<(), String> {
    let required = [
        (&form.full_name, "full name"),
        (&form.email, "email"),
        (&form.phone, "phone number"),
        (&form.address, "address"),
        (&form.city, "city"),
        (&form.country, "country"),
    ];
    for (value, label) in required {
        if value.trim().is_empty() {
            return Err(format!("Please enter your {label}."));
        }
    }
    Ok(())
}

/// Everything that must pass before the order request goes out. Runs with
/// zero API calls; form problems are reported before the cart problem.
fn precheck(form: &CheckoutForm, cart_is_empty: bool) -> std::result::Result<(), String> {
    validate(form)?;
    if cart_is_empty {
        return Err("Your cart is empty.".to_string());
    }
    Ok(())
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub lines: Vec<CartLineView>,
    pub totals: CartTotals,
    pub form: CheckoutForm,
    pub error: Option<String>,
}

fn render(cart: &Cart, form: CheckoutForm, error: Option<String>) -> Response {
    CheckoutTemplate {
        lines: cart
            .lines()
            .iter()
            .map(|line| CartLineView {
                id: line.id.clone(),
                name: line.name.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                line_total: line.line_total(),
                image_url: line.image_url.clone(),
            })
            .collect(),
        totals: cart.totals(),
        form,
        error,
    }
    .into_response()
}

/// Display the checkout form.
pub async fn show(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    user: RequireUser,
) -> Result<Response> {
    let cart = Cart::open(state.stores(), &client_key, &user.0.user_id);
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }
    Ok(render(&cart, CheckoutForm::default(), None))
}

/// Submit the order.
///
/// Validation failures and API failures both land back in the Editing state
/// with a visible message. Success clears the cart and redirects to order
/// tracking with a flash notice.
pub async fn submit(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    user: RequireUser,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = Cart::open(state.stores(), &client_key, &user.0.user_id);

    if let Err(message) = precheck(&form, cart.is_empty()) {
        return Ok(render(&cart, form, Some(message)));
    }

    let payload = json!({
        "fullName": form.full_name.trim(),
        "email": form.email.trim(),
        "phoneNumber": form.phone.trim(),
        "address": form.address.trim(),
        "city": form.city.trim(),
        "country": form.country.trim(),
        "items": cart
            .lines()
            .iter()
            .map(|line| json!({
                "productId": line.id,
                "quantity": line.quantity,
                "unitPrice": line.unit_price,
            }))
            .collect::<Vec<_>>(),
    });

    match state
        .api()
        .post_json::<CheckoutReceipt>("Checkout", payload, Some(&user.0.token))
        .await
    {
        Ok(receipt) => {
            cart.clear(state.stores());
            tracing::info!(order_id = %receipt.order_id.to_key(), "order placed");
            Ok(Redirect::to("/orders?notice=order-placed").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "checkout submission failed");
            Ok(render(&cart, form, Some(e.to_string())))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete_form() -> CheckoutForm {
        CheckoutForm {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Analytical Way".to_string(),
            city: "London".to_string(),
            country: "UK".to_string(),
        }
    }

    #[test]
    fn complete_form_validates() {
        assert!(validate(&complete_form()).is_ok());
    }

    #[test]
    fn each_missing_field_is_named() {
        let mut form = complete_form();
        form.email = String::new();
        assert_eq!(
            validate(&form).unwrap_err(),
            "Please enter your email."
        );

        let mut form = complete_form();
        form.country = "   ".to_string();
        assert_eq!(
            validate(&form).unwrap_err(),
            "Please enter your country."
        );
    }

    #[test]
    fn blank_form_fails_on_the_first_field() {
        assert_eq!(
            validate(&CheckoutForm::default()).unwrap_err(),
            "Please enter your full name."
        );
    }

    #[test]
    fn empty_cart_is_rejected_before_submission() {
        assert_eq!(
            precheck(&complete_form(), true).unwrap_err(),
            "Your cart is empty."
        );
        assert!(precheck(&complete_form(), false).is_ok());
    }

    #[test]
    fn form_problems_outrank_the_empty_cart() {
        assert_eq!(
            precheck(&CheckoutForm::default(), true).unwrap_err(),
            "Please enter your full name."
        );
    }
}
