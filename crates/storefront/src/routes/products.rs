//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use copperleaf_core::api::types::{Paged, Product};
use copperleaf_core::{CurrencyCode, Price};

use crate::error::Result;
use crate::filters;
use crate::middleware::ClientKey;
use crate::routes::ErrorPageTemplate;
use crate::state::AppState;

const PRODUCT_PAGE_SIZE: u32 = 12;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub raw_price: String,
    pub description: String,
    pub image_url: Option<String>,
    pub in_stock: bool,
}

impl ProductView {
    pub fn from_wire(product: &Product) -> Self {
        Self {
            id: product.id.to_key(),
            name: product.display_name().to_string(),
            price: Price::new(product.price, CurrencyCode::USD).display(),
            raw_price: product.price.to_string(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            in_stock: product.in_stock(),
        }
    }
}

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub subcategory: Option<String>,
    pub search: Option<String>,
}

impl ProductQuery {
    fn path(&self) -> String {
        match self.subcategory.as_deref().filter(|s| !s.is_empty()) {
            Some(subcategory) => format!("Product/subcategory/{subcategory}"),
            None => "Product".to_string(),
        }
    }

    /// Extra query parameters carried on pager links, URL-encoded. Either
    /// empty or `&`-prefixed so it can be appended after `page=N`.
    fn query_suffix(&self) -> String {
        let mut pairs = url::form_urlencoded::Serializer::new(String::new());
        if let Some(subcategory) = self.subcategory.as_deref().filter(|s| !s.is_empty()) {
            pairs.append_pair("subcategory", subcategory);
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.append_pair("search", search);
        }
        let encoded = pairs.finish();
        if encoded.is_empty() {
            encoded
        } else {
            format!("&{encoded}")
        }
    }
}

/// Product listing page template. Carries the same fields as
/// [`ProductGridTemplate`] because the page includes the grid partial.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub query_suffix: String,
    pub search: String,
}

/// Product grid fragment template (HTMX swap target).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub query_suffix: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
}

async fn fetch_grid(
    state: &AppState,
    query: &ProductQuery,
) -> std::result::Result<ProductGridTemplate, copperleaf_core::api::ApiError> {
    let current_page = query.page.unwrap_or(1).max(1);
    let page: Paged<Product> = state
        .api()
        .get_paged(
            &query.path(),
            current_page,
            PRODUCT_PAGE_SIZE,
            query.search.as_deref(),
            None,
        )
        .await?;

    Ok(ProductGridTemplate {
        total_pages: page.total_pages(PRODUCT_PAGE_SIZE),
        products: page.items.iter().map(ProductView::from_wire).collect(),
        current_page,
        query_suffix: query.query_suffix(),
    })
}

/// Display the product listing page.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Response> {
    match fetch_grid(&state, &query).await {
        Ok(grid) => Ok(ProductsIndexTemplate {
            products: grid.products,
            current_page: grid.current_page,
            total_pages: grid.total_pages,
            query_suffix: grid.query_suffix,
            search: query.search.unwrap_or_default(),
        }
        .into_response()),
        Err(e) => {
            tracing::warn!(error = %e, "product fetch failed");
            Ok(ErrorPageTemplate {
                message: "We couldn't load the products.".to_string(),
                retry_href: "/products".to_string(),
            }
            .into_response())
        }
    }
}

/// Serve the product grid fragment for HTMX pagination.
///
/// A sequence tag is issued before the fetch; if a newer grid request has
/// been issued by the time the API answers, this response is dropped with a
/// 204 so it can never overwrite a newer render.
pub async fn grid(
    State(state): State<AppState>,
    ClientKey(client_key): ClientKey,
    Query(query): Query<ProductQuery>,
) -> Result<Response> {
    let sequencer = state.sequencer(&client_key, "products");
    let tag = sequencer.issue();

    let result = fetch_grid(&state, &query).await;

    if !sequencer.is_current(tag) {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    match result {
        Ok(grid) => Ok(grid.into_response()),
        Err(e) => {
            tracing::warn!(error = %e, "product grid fetch failed");
            Ok(ErrorPageTemplate {
                message: "We couldn't load this page of products.".to_string(),
                retry_href: "/products".to_string(),
            }
            .into_response())
        }
    }
}

/// Display the product detail page.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let path = format!("Product/{id}");
    match state.api().get_json::<Product>(&path, None).await {
        Ok(product) => Ok(ProductShowTemplate {
            product: ProductView::from_wire(&product),
        }
        .into_response()),
        Err(e) => {
            tracing::warn!(error = %e, product_id = %id, "product detail fetch failed");
            Ok(ErrorPageTemplate {
                message: "We couldn't load this product.".to_string(),
                retry_href: format!("/products/{id}"),
            }
            .into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn query(subcategory: Option<&str>, search: Option<&str>) -> ProductQuery {
        ProductQuery {
            page: None,
            subcategory: subcategory.map(str::to_string),
            search: search.map(str::to_string),
        }
    }

    #[test]
    fn query_suffix_is_url_encoded() {
        // Reserved characters in the search text must not mangle the pager
        // link's own parameters.
        let q = query(None, Some("mugs & bowls=2"));
        assert_eq!(q.query_suffix(), "&search=mugs+%26+bowls%3D2");
    }

    #[test]
    fn query_suffix_carries_both_parameters() {
        let q = query(Some("12"), Some("kettle"));
        assert_eq!(q.query_suffix(), "&subcategory=12&search=kettle");
    }

    #[test]
    fn query_suffix_is_empty_without_filters() {
        assert_eq!(query(None, None).query_suffix(), "");
        assert_eq!(query(Some(""), Some("")).query_suffix(), "");
    }

    #[test]
    fn product_view_renders_the_price() {
        let product = Product {
            id: copperleaf_core::WireId::Num(5),
            name: "Kettle".to_string(),
            price: Decimal::new(5, 0),
            description: String::new(),
            image_url: None,
            category_id: copperleaf_core::WireId::Num(1),
            stock: Some(3),
        };
        let view = ProductView::from_wire(&product);
        assert_eq!(view.price, "$5.00");
        assert!(view.in_stock);
    }
}
