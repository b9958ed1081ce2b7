//! Category and subcategory route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use copperleaf_core::api::types::{Category, Paged, Subcategory};

use crate::error::Result;
use crate::filters;
use crate::routes::ErrorPageTemplate;
use crate::state::AppState;

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl CategoryView {
    pub fn from_wire(category: &Category) -> Self {
        Self {
            id: category.id.to_key(),
            name: category.display_name().to_string(),
            description: category.description.clone(),
            image_url: category.image_url.clone(),
        }
    }
}

/// Subcategory display data for templates.
#[derive(Clone)]
pub struct SubcategoryView {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
}

impl SubcategoryView {
    pub fn from_wire(subcategory: &Subcategory) -> Self {
        Self {
            id: subcategory.id.to_key(),
            name: subcategory.display_name().to_string(),
            image_url: subcategory.image_url.clone(),
        }
    }
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/categories.html")]
pub struct CategoriesTemplate {
    pub categories: Vec<CategoryView>,
    pub current_page: u32,
    pub total_pages: u32,
}

/// Subcategory listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/subcategories.html")]
pub struct SubcategoriesTemplate {
    pub category_id: String,
    pub subcategories: Vec<SubcategoryView>,
}

const CATEGORY_PAGE_SIZE: u32 = 12;

/// Display the category listing.
pub async fn categories(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Response> {
    let current_page = query.page.unwrap_or(1).max(1);

    let page: Paged<Category> = match state
        .api()
        .get_paged("Category", current_page, CATEGORY_PAGE_SIZE, None, None)
        .await
    {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(error = %e, "category fetch failed");
            return Ok(ErrorPageTemplate {
                message: "We couldn't load the categories.".to_string(),
                retry_href: "/categories".to_string(),
            }
            .into_response());
        }
    };

    let total_pages = page.total_pages(CATEGORY_PAGE_SIZE);
    Ok(CategoriesTemplate {
        categories: page.items.iter().map(CategoryView::from_wire).collect(),
        current_page,
        total_pages,
    }
    .into_response())
}

/// Display the subcategories of one category.
pub async fn subcategories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let path = format!("Category/{id}/subcategory");
    let page: Paged<Subcategory> = match state.api().get_json(&path, None).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(error = %e, category_id = %id, "subcategory fetch failed");
            return Ok(ErrorPageTemplate {
                message: "We couldn't load this category.".to_string(),
                retry_href: format!("/categories/{id}/subcategories"),
            }
            .into_response());
        }
    };

    Ok(SubcategoriesTemplate {
        category_id: id,
        subcategories: page
            .items
            .iter()
            .map(SubcategoryView::from_wire)
            .collect(),
    }
    .into_response())
}
