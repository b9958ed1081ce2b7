//! The generic paginated table behind every data section.
//!
//! Each section supplies a [`SectionConfig`] (title, API endpoint, columns);
//! everything else is shared: the pagination state, the fetch, the cell
//! rendering out of loosely-typed rows, and the footer. The footer line is a
//! contract other tooling scrapes: `Page X of Y (Total: Z)`.
//!
//! Rows stay as `serde_json::Value` because every section has a different
//! shape; only the configured columns are read, with the same
//! lowerCamel-then-PascalCase fallback the typed DTOs use.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use copperleaf_core::api::types::Paged;
use copperleaf_core::{CurrencyCode, OrderStatus, Price};

/// Page size options offered by every section.
pub const PAGE_SIZES: [u32; 3] = [10, 25, 50];

const DEFAULT_PAGE_SIZE: u32 = 10;

/// How a cell value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Raw text.
    Text,
    /// Decimal amount rendered as `$12.34`.
    Money,
    /// Numeric order-status code rendered as a labelled badge.
    Status,
    /// Date string rendered as-is.
    Date,
}

/// Column definition for a section table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Field key in the row object (lowerCamel form).
    pub key: &'static str,
    /// Display label for the column header.
    pub label: &'static str,
    /// Rendering rule for the cell.
    pub kind: CellKind,
}

impl TableColumn {
    /// Create a text column.
    #[must_use]
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: CellKind::Text,
        }
    }

    /// Create a money column.
    #[must_use]
    pub const fn money(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: CellKind::Money,
        }
    }

    /// Create an order-status column.
    #[must_use]
    pub const fn status(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: CellKind::Status,
        }
    }

    /// Create a date column.
    #[must_use]
    pub const fn date(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: CellKind::Date,
        }
    }
}

/// Static configuration for one data section.
#[derive(Debug, Clone)]
pub struct SectionConfig {
    /// URL slug, also used as the sequencer scope.
    pub slug: &'static str,
    /// Page heading and nav label.
    pub title: &'static str,
    /// Relative API path the rows come from.
    pub endpoint: &'static str,
    /// Columns to render.
    pub columns: &'static [TableColumn],
    /// Whether the section offers a search box.
    pub searchable: bool,
}

/// The data sections, in nav order. The dashboard reuses the orders
/// configuration for its recent-orders table.
pub static SECTIONS: &[SectionConfig] = &[
    SectionConfig {
        slug: "products",
        title: "Products",
        endpoint: "merchant/products",
        columns: &[
            TableColumn::text("productName", "Product"),
            TableColumn::money("price", "Price"),
            TableColumn::text("stockQuantity", "Stock"),
            TableColumn::text("subcategoryName", "Subcategory"),
        ],
        searchable: true,
    },
    SectionConfig {
        slug: "orders",
        title: "Orders",
        endpoint: "merchant/orders",
        columns: &[
            TableColumn::text("orderId", "Order"),
            TableColumn::date("orderDate", "Placed"),
            TableColumn::status("orderStatus", "Status"),
            TableColumn::money("totalAmount", "Total"),
        ],
        searchable: true,
    },
    SectionConfig {
        slug: "inventory",
        title: "Inventory",
        endpoint: "merchant/inventory",
        columns: &[
            TableColumn::text("productName", "Product"),
            TableColumn::text("stockQuantity", "In stock"),
            TableColumn::text("reservedQuantity", "Reserved"),
        ],
        searchable: true,
    },
    SectionConfig {
        slug: "customers",
        title: "Customers",
        endpoint: "merchant/customers",
        columns: &[
            TableColumn::text("fullName", "Customer"),
            TableColumn::text("email", "Email"),
            TableColumn::text("city", "City"),
            TableColumn::text("orderCount", "Orders"),
        ],
        searchable: true,
    },
    SectionConfig {
        slug: "transactions",
        title: "Transactions",
        endpoint: "merchant/transactions",
        columns: &[
            TableColumn::text("transactionId", "Transaction"),
            TableColumn::date("transactionDate", "Date"),
            TableColumn::money("amount", "Amount"),
            TableColumn::text("paymentMethod", "Method"),
        ],
        searchable: false,
    },
    SectionConfig {
        slug: "promotions",
        title: "Promotions",
        endpoint: "Promotions",
        columns: &[
            TableColumn::text("promotionName", "Promotion"),
            TableColumn::text("discountPercent", "Discount %"),
            TableColumn::date("startDate", "Starts"),
            TableColumn::date("endDate", "Ends"),
        ],
        searchable: false,
    },
    SectionConfig {
        slug: "categories",
        title: "Categories",
        endpoint: "Category",
        columns: &[
            TableColumn::text("categoryName", "Category"),
            TableColumn::text("description", "Description"),
        ],
        searchable: true,
    },
    SectionConfig {
        slug: "subcategories",
        title: "Subcategories",
        endpoint: "Category/subcategory",
        columns: &[
            TableColumn::text("subcategoryName", "Subcategory"),
            TableColumn::text("categoryName", "Category"),
        ],
        searchable: true,
    },
];

/// Look up a section by slug.
#[must_use]
pub fn section(slug: &str) -> Option<&'static SectionConfig> {
    SECTIONS.iter().find(|s| s.slug == slug)
}

/// Shared pagination state parsed from the query string.
#[derive(Debug, Clone, Deserialize)]
pub struct TableState {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
}

impl TableState {
    /// Current page, at least 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, snapped to the offered options.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
            .filter(|size| PAGE_SIZES.contains(size))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Trimmed search text, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// The exact footer line rendered under every table.
#[must_use]
pub fn footer(page: u32, total_pages: u32, total_rows: u64) -> String {
    format!("Page {page} of {total_pages} (Total: {total_rows})")
}

/// Read a field from a row, preferring the lowerCamel key and falling back
/// to its PascalCase form.
#[must_use]
pub fn field<'a>(row: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(value) = row.get(key) {
        return Some(value);
    }
    let pascal = pascal_case(key);
    row.get(pascal.as_str())
}

fn pascal_case(key: &str) -> String {
    let mut chars = key.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

/// Render one cell to display text plus an optional badge class.
#[must_use]
pub fn render_cell(row: &Value, column: &TableColumn) -> (String, Option<&'static str>) {
    let value = field(row, column.key);
    match column.kind {
        CellKind::Text | CellKind::Date => (display_text(value), None),
        CellKind::Money => {
            let amount = value.and_then(as_decimal).unwrap_or_default();
            (Price::new(amount, CurrencyCode::USD).display(), None)
        }
        CellKind::Status => {
            let code = value.and_then(Value::as_i64).unwrap_or_default();
            let status = OrderStatus::from_code(code);
            (status.label().to_string(), Some(status.badge_class()))
        }
    }
}

fn display_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => "—".to_string(),
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(|f| Decimal::try_from(f).ok())
            .or_else(|| n.as_i64().map(Decimal::from)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// One rendered cell.
#[derive(Debug, Clone)]
pub struct CellView {
    pub text: String,
    pub badge_class: Option<&'static str>,
}

/// A fully rendered table, ready for the template.
#[derive(Debug, Clone)]
pub struct TableView {
    pub slug: &'static str,
    pub title: &'static str,
    pub searchable: bool,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<CellView>>,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub search: String,
    /// The `Page X of Y (Total: Z)` line.
    pub footer: String,
}

impl TableView {
    /// Project one fetched page through a section's column config.
    #[must_use]
    pub fn build(config: &'static SectionConfig, state: &TableState, page: &Paged<Value>) -> Self {
        let current = state.page();
        let size = state.page_size();
        let total_pages = page.total_pages(size);

        Self {
            slug: config.slug,
            title: config.title,
            searchable: config.searchable,
            headers: config.columns.iter().map(|c| c.label).collect(),
            rows: page
                .items
                .iter()
                .map(|row| {
                    config
                        .columns
                        .iter()
                        .map(|column| {
                            let (text, badge_class) = render_cell(row, column);
                            CellView { text, badge_class }
                        })
                        .collect()
                })
                .collect(),
            page: current,
            page_size: size,
            total_pages,
            search: state.search().unwrap_or_default().to_string(),
            footer: footer(current, total_pages, page.total_rows()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn footer_matches_the_contract() {
        assert_eq!(footer(2, 7, 61), "Page 2 of 7 (Total: 61)");
    }

    #[test]
    fn field_falls_back_to_pascal_case() {
        let row = json!({"ProductName": "Kettle"});
        assert_eq!(
            field(&row, "productName").and_then(Value::as_str),
            Some("Kettle")
        );

        // The lowerCamel key wins when both are present.
        let both = json!({"productName": "a", "ProductName": "b"});
        assert_eq!(field(&both, "productName").and_then(Value::as_str), Some("a"));
    }

    #[test]
    fn missing_field_renders_a_dash() {
        let row = json!({});
        let (text, badge) = render_cell(&row, &TableColumn::text("productName", "Product"));
        assert_eq!(text, "—");
        assert!(badge.is_none());
    }

    #[test]
    fn money_cell_accepts_number_and_string() {
        let by_num = json!({"price": 19.99});
        let by_str = json!({"Price": "19.99"});
        let column = TableColumn::money("price", "Price");
        assert_eq!(render_cell(&by_num, &column).0, "$19.99");
        assert_eq!(render_cell(&by_str, &column).0, "$19.99");
    }

    #[test]
    fn status_cell_is_total() {
        let row = json!({"orderStatus": 99});
        let (text, badge) = render_cell(&row, &TableColumn::status("orderStatus", "Status"));
        assert_eq!(text, "Pending");
        assert_eq!(badge, Some("badge-neutral"));
    }

    #[test]
    fn page_size_snaps_to_the_offered_options() {
        let state = TableState {
            page: None,
            page_size: Some(37),
            search: None,
        };
        assert_eq!(state.page_size(), 10);

        let valid = TableState {
            page: None,
            page_size: Some(50),
            search: None,
        };
        assert_eq!(valid.page_size(), 50);
    }

    #[test]
    fn every_slug_resolves() {
        for config in SECTIONS {
            assert!(section(config.slug).is_some());
        }
        assert!(section("nonsense").is_none());
    }

    #[test]
    fn table_view_projects_rows_through_columns() {
        let config = section("orders").unwrap();
        let state = TableState {
            page: Some(2),
            page_size: Some(10),
            search: None,
        };
        let page = Paged {
            items: vec![json!({
                "OrderId": 17,
                "OrderDate": "2026-08-01",
                "OrderStatus": 4,
                "TotalAmount": "45.50",
            })],
            total: Some(61),
        };

        let view = TableView::build(config, &state, &page);
        assert_eq!(view.footer, "Page 2 of 7 (Total: 61)");
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0][0].text, "17");
        assert_eq!(view.rows[0][2].text, "Shipped");
        assert_eq!(view.rows[0][3].text, "$45.50");
    }
}
