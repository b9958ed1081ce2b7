//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::borrow::Borrow;
use std::fmt::Display;

use rust_decimal::Decimal;

use copperleaf_core::{CurrencyCode, Price};

/// Format a decimal amount as a price with two decimal places.
///
/// Usage in templates: `{{ stats.revenue|money }}`
#[askama::filter_fn]
pub fn money(value: impl Borrow<Decimal>, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(Price::new(*value.borrow(), CurrencyCode::USD).display())
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}
