//! Order tracking route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use copperleaf_core::api::types::{OrderDetail, OrderSummary, Paged};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireUser;
use crate::routes::ErrorPageTemplate;
use crate::state::AppState;

const ORDER_PAGE_SIZE: u32 = 10;

/// Order display data for the tracking list.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub status_label: String,
    pub badge_class: String,
    pub cancellable: bool,
    pub total: Decimal,
    pub created_at: String,
}

impl OrderView {
    fn from_wire(order: &OrderSummary) -> Self {
        let status = order.status();
        Self {
            id: order.id.to_key(),
            status_label: status.label().to_string(),
            badge_class: status.badge_class().to_string(),
            cancellable: status.is_cancellable(),
            total: order.total,
            created_at: order.created_at.clone(),
        }
    }
}

/// Order line display data for the detail view.
#[derive(Clone)]
pub struct OrderLineView {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Query parameters for the tracking list.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub page: Option<u32>,
    pub notice: Option<String>,
}

/// Order tracking list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub notice: Option<String>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: OrderView,
    pub items: Vec<OrderLineView>,
    pub shipping_address: String,
}

/// Display the user's order tracking list.
pub async fn index(
    State(state): State<AppState>,
    user: RequireUser,
    Query(query): Query<OrdersQuery>,
) -> Result<Response> {
    let current_page = query.page.unwrap_or(1).max(1);

    let page: Paged<OrderSummary> = match state
        .api()
        .get_paged(
            "Orderstracking",
            current_page,
            ORDER_PAGE_SIZE,
            None,
            Some(&user.0.token),
        )
        .await
    {
        Ok(page) => page,
        Err(e) => {
            if e.is_unauthorized() {
                return Err(e.into());
            }
            tracing::warn!(error = %e, "order list fetch failed");
            return Ok(ErrorPageTemplate {
                message: "We couldn't load your orders.".to_string(),
                retry_href: "/orders".to_string(),
            }
            .into_response());
        }
    };

    let notice = query.notice.as_deref().and_then(|n| match n {
        "order-placed" => Some("Order placed. Thank you!".to_string()),
        "order-cancelled" => Some("Order cancelled.".to_string()),
        _ => None,
    });

    Ok(OrdersIndexTemplate {
        orders: page.items.iter().map(OrderView::from_wire).collect(),
        current_page,
        total_pages: page.total_pages(ORDER_PAGE_SIZE),
        notice,
    }
    .into_response())
}

/// Display one order with its line items.
pub async fn show(
    State(state): State<AppState>,
    user: RequireUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let path = format!("Orders/{id}");
    match state
        .api()
        .get_json::<OrderDetail>(&path, Some(&user.0.token))
        .await
    {
        Ok(detail) => Ok(OrderShowTemplate {
            order: OrderView::from_wire(&detail.summary),
            items: detail
                .items
                .iter()
                .map(|line| OrderLineView {
                    product_name: line.product_name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.unit_price * Decimal::from(line.quantity),
                })
                .collect(),
            shipping_address: detail.shipping_address,
        }
        .into_response()),
        Err(e) => {
            if e.is_unauthorized() {
                return Err(e.into());
            }
            tracing::warn!(error = %e, order_id = %id, "order detail fetch failed");
            Ok(ErrorPageTemplate {
                message: "We couldn't load this order.".to_string(),
                retry_href: format!("/orders/{id}"),
            }
            .into_response())
        }
    }
}

/// Cancel a cancellable order and return to the tracking list.
pub async fn cancel(
    State(state): State<AppState>,
    user: RequireUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let path = format!("Orders/{id}/cancel");
    state
        .api()
        .post(&path, serde_json::json!({}), Some(&user.0.token))
        .await?;

    Ok(Redirect::to("/orders?notice=order-cancelled").into_response())
}
