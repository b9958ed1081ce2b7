//! Canonical wire DTOs for the commerce API.
//!
//! The API is inconsistent about field casing: depending on the endpoint a
//! category name arrives as `categoryName` or `CategoryName`, a total as
//! `total`, `totalCount`, or `TotalCount`. Every fallback chain is declared
//! exactly once, here, as serde aliases; the rest of the codebase only ever
//! sees the canonical snake_case shape. Missing fields fall back to
//! defaults, and the `display_*` accessors substitute a placeholder so
//! renderers never show an empty card title.
//!
//! List endpoints are equally inconsistent about envelopes: some return a
//! bare array, some `{"items": [...]}`, some `{"Items": [...]}`. [`Paged`]
//! absorbs all three.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderStatus, WireId};

/// Placeholder shown when the API provides no usable display name.
pub const NAME_PLACEHOLDER: &str = "Untitled";

/// Deserialize a decimal that may arrive as a JSON number or string.
mod decimal_wire {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Num(f64),
            Str(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Num(f) => Decimal::try_from(f).map_err(serde::de::Error::custom),
            Wire::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }
}

// =============================================================================
// Pagination envelope
// =============================================================================

/// One page of a list resource.
///
/// `total` is the server-reported row count when the endpoint provides one.
/// When it is absent, page counts are derived from the returned slice
/// length, which undercounts whenever a full page comes back; the footer is
/// only exact for endpoints that report a total.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PagedWire<T> {
    Envelope {
        #[serde(alias = "Items")]
        items: Vec<T>,
        #[serde(
            default,
            alias = "totalCount",
            alias = "TotalCount",
            alias = "Total"
        )]
        total: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Paged<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match PagedWire::<T>::deserialize(deserializer)? {
            PagedWire::Envelope { items, total } => Self { items, total },
            PagedWire::Bare(items) => Self { items, total: None },
        })
    }
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: None,
        }
    }
}

impl<T> Paged<T> {
    /// Total page count for the given page size.
    ///
    /// Uses the server-reported total when present, else the slice length.
    /// Never less than 1.
    #[must_use]
    pub fn total_pages(&self, page_size: u32) -> u32 {
        let size = u64::from(page_size.max(1));
        let rows = self
            .total
            .unwrap_or_else(|| self.items.len() as u64);
        u32::try_from(rows.div_ceil(size).max(1)).unwrap_or(u32::MAX)
    }

    /// The row count shown in table footers: the server total when present,
    /// else the visible slice length.
    #[must_use]
    pub fn total_rows(&self) -> u64 {
        self.total.unwrap_or_else(|| self.items.len() as u64)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A top-level catalog category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Category {
    #[serde(default, alias = "categoryId", alias = "CategoryId", alias = "Id")]
    pub id: WireId,
    #[serde(default, alias = "categoryName", alias = "CategoryName", alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Description")]
    pub description: String,
    #[serde(default, alias = "imageUrl", alias = "ImageUrl", alias = "Image")]
    pub image_url: Option<String>,
}

impl Category {
    /// Display name, substituting the placeholder when the API sent none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            NAME_PLACEHOLDER
        } else {
            &self.name
        }
    }
}

/// A subcategory within a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subcategory {
    #[serde(
        default,
        alias = "subcategoryId",
        alias = "SubcategoryId",
        alias = "SubCategoryId",
        alias = "Id"
    )]
    pub id: WireId,
    #[serde(default, alias = "categoryId", alias = "CategoryId")]
    pub category_id: WireId,
    #[serde(
        default,
        alias = "subcategoryName",
        alias = "SubcategoryName",
        alias = "SubCategoryName",
        alias = "Name"
    )]
    pub name: String,
    #[serde(default, alias = "imageUrl", alias = "ImageUrl")]
    pub image_url: Option<String>,
}

impl Subcategory {
    /// Display name, substituting the placeholder when the API sent none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            NAME_PLACEHOLDER
        } else {
            &self.name
        }
    }
}

/// A product as it appears in list views.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(default, alias = "productId", alias = "ProductId", alias = "Id")]
    pub id: WireId,
    #[serde(default, alias = "productName", alias = "ProductName", alias = "Name")]
    pub name: String,
    #[serde(
        default,
        with = "decimal_wire",
        alias = "Price",
        alias = "unitPrice",
        alias = "UnitPrice"
    )]
    pub price: Decimal,
    #[serde(default, alias = "Description")]
    pub description: String,
    #[serde(default, alias = "imageUrl", alias = "ImageUrl", alias = "Image")]
    pub image_url: Option<String>,
    #[serde(default, alias = "categoryId", alias = "CategoryId")]
    pub category_id: WireId,
    #[serde(
        default,
        alias = "stockQuantity",
        alias = "StockQuantity",
        alias = "Stock"
    )]
    pub stock: Option<i64>,
}

impl Product {
    /// Display name, substituting the placeholder when the API sent none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            NAME_PLACEHOLDER
        } else {
            &self.name
        }
    }

    /// Whether the product can currently be added to a cart.
    ///
    /// Endpoints that omit stock are treated as in stock; the API enforces
    /// the real inventory at checkout.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock.is_none_or(|s| s > 0)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order as it appears in the tracking list.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSummary {
    #[serde(default, alias = "orderId", alias = "OrderId", alias = "Id")]
    pub id: WireId,
    #[serde(
        default,
        alias = "orderStatus",
        alias = "OrderStatus",
        alias = "Status",
        alias = "status"
    )]
    pub status_code: i64,
    #[serde(
        default,
        with = "decimal_wire",
        alias = "totalAmount",
        alias = "TotalAmount",
        alias = "Total"
    )]
    pub total: Decimal,
    #[serde(
        default,
        alias = "orderDate",
        alias = "OrderDate",
        alias = "createdAt",
        alias = "CreatedAt"
    )]
    pub created_at: String,
}

impl OrderSummary {
    /// The order's status, mapped totally (unknown codes become Pending).
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        OrderStatus::from_code(self.status_code)
    }
}

/// A line item within an order detail view.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    #[serde(default, alias = "productName", alias = "ProductName", alias = "Name")]
    pub product_name: String,
    #[serde(default, alias = "Quantity")]
    pub quantity: u32,
    #[serde(
        default,
        with = "decimal_wire",
        alias = "unitPrice",
        alias = "UnitPrice",
        alias = "Price"
    )]
    pub unit_price: Decimal,
}

/// Full order detail.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub summary: OrderSummary,
    #[serde(default, alias = "Items", alias = "orderItems", alias = "OrderItems")]
    pub items: Vec<OrderLine>,
    #[serde(
        default,
        alias = "shippingAddress",
        alias = "ShippingAddress",
        alias = "Address"
    )]
    pub shipping_address: String,
}

// =============================================================================
// Profile
// =============================================================================

/// The customer profile record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default, alias = "fullName", alias = "FullName", alias = "Name")]
    pub full_name: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "phoneNumber", alias = "PhoneNumber", alias = "Phone")]
    pub phone: String,
    #[serde(default, alias = "Address")]
    pub address: String,
    #[serde(default, alias = "City")]
    pub city: String,
    #[serde(default, alias = "Country")]
    pub country: String,
}

// =============================================================================
// Merchant dashboard
// =============================================================================

/// Aggregate counts for the admin dashboard cards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(
        default,
        alias = "totalProducts",
        alias = "TotalProducts",
        alias = "products"
    )]
    pub product_count: u64,
    #[serde(default, alias = "totalOrders", alias = "TotalOrders", alias = "orders")]
    pub order_count: u64,
    #[serde(
        default,
        alias = "totalCustomers",
        alias = "TotalCustomers",
        alias = "customers"
    )]
    pub customer_count: u64,
    #[serde(
        default,
        with = "decimal_wire",
        alias = "totalRevenue",
        alias = "TotalRevenue",
        alias = "revenue"
    )]
    pub revenue: Decimal,
}

/// Checkout submission acknowledged by the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutReceipt {
    #[serde(default, alias = "orderId", alias = "OrderId", alias = "Id")]
    pub order_id: WireId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_accepts_lower_camel() {
        let cat: Category =
            serde_json::from_str(r#"{"categoryId": 3, "categoryName": "Shoes"}"#).unwrap();
        assert_eq!(cat.id.to_key(), "3");
        assert_eq!(cat.display_name(), "Shoes");
    }

    #[test]
    fn category_falls_back_to_pascal_case() {
        // A record carrying only the PascalCase field must render its value,
        // not the placeholder.
        let cat: Category =
            serde_json::from_str(r#"{"CategoryId": "7", "CategoryName": "Books"}"#).unwrap();
        assert_eq!(cat.id.to_key(), "7");
        assert_eq!(cat.display_name(), "Books");
    }

    #[test]
    fn category_without_name_renders_placeholder() {
        let cat: Category = serde_json::from_str(r#"{"categoryId": 1}"#).unwrap();
        assert_eq!(cat.display_name(), NAME_PLACEHOLDER);
    }

    #[test]
    fn product_price_accepts_number_and_string() {
        let by_num: Product =
            serde_json::from_str(r#"{"productId": 1, "price": 19.99}"#).unwrap();
        let by_str: Product =
            serde_json::from_str(r#"{"ProductId": 1, "Price": "19.99"}"#).unwrap();
        assert_eq!(by_num.price.to_string(), "19.99");
        assert_eq!(by_str.price, by_num.price);
    }

    #[test]
    fn paged_accepts_bare_array() {
        let page: Paged<Category> = serde_json::from_str(r#"[{"categoryName":"A"}]"#).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, None);
    }

    #[test]
    fn paged_accepts_lower_envelope() {
        let page: Paged<Category> =
            serde_json::from_str(r#"{"items": [{"categoryName":"A"}], "totalCount": 41}"#)
                .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, Some(41));
    }

    #[test]
    fn paged_accepts_pascal_envelope() {
        let page: Paged<Category> =
            serde_json::from_str(r#"{"Items": [{"CategoryName":"A"}, {"CategoryName":"B"}]}"#)
                .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, None);
    }

    #[test]
    fn total_pages_from_server_total() {
        let page = Paged::<Category> {
            items: vec![Category::default()],
            total: Some(61),
        };
        assert_eq!(page.total_pages(10), 7);
        assert_eq!(page.total_rows(), 61);
    }

    #[test]
    fn total_pages_falls_back_to_slice_length() {
        let page = Paged::<Category> {
            items: vec![Category::default(); 4],
            total: None,
        };
        assert_eq!(page.total_pages(10), 1);
        assert_eq!(page.total_rows(), 4);
    }

    #[test]
    fn empty_page_still_has_one_page() {
        let page = Paged::<Category>::default();
        assert_eq!(page.total_pages(10), 1);
    }

    #[test]
    fn order_status_mapping_is_total() {
        let order: OrderSummary =
            serde_json::from_str(r#"{"orderId": 5, "orderStatus": 99}"#).unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.status().badge_class(), "badge-neutral");
    }
}
