//! Order status codes and their display mapping.
//!
//! The commerce API represents order status as a numeric code (1..=6). The
//! mapping to display labels and badge classes is TOTAL: an unrecognized
//! code renders as the neutral "Pending" badge rather than breaking the
//! order list. Renderers must never need a fallback of their own.

use serde::{Deserialize, Serialize};

/// Order status as reported by the commerce API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Fallback for any unrecognized wire code.
    #[default]
    Pending,
    Placed,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Map a numeric wire code to a status. Total: unknown codes map to
    /// [`Self::Pending`].
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Placed,
            2 => Self::Confirmed,
            3 => Self::Processing,
            4 => Self::Shipped,
            5 => Self::Delivered,
            6 => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    /// Human-readable label for the status badge.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Placed => "Placed",
            Self::Confirmed => "Confirmed",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// CSS badge class for the status.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Pending => "badge-neutral",
            Self::Placed | Self::Confirmed => "badge-info",
            Self::Processing => "badge-warning",
            Self::Shipped => "badge-primary",
            Self::Delivered => "badge-success",
            Self::Cancelled => "badge-danger",
        }
    }

    /// Whether the customer may still cancel an order in this status.
    ///
    /// Orders stop being cancellable once they ship.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Placed | Self::Confirmed | Self::Processing)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map() {
        assert_eq!(OrderStatus::from_code(1), OrderStatus::Placed);
        assert_eq!(OrderStatus::from_code(4), OrderStatus::Shipped);
        assert_eq!(OrderStatus::from_code(6), OrderStatus::Cancelled);
    }

    #[test]
    fn unknown_code_falls_back_to_pending() {
        assert_eq!(OrderStatus::from_code(99), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_code(0), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_code(-3), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_code(99).badge_class(), "badge-neutral");
        assert_eq!(OrderStatus::from_code(99).label(), "Pending");
    }

    #[test]
    fn cancellable_window_closes_at_shipping() {
        assert!(OrderStatus::Placed.is_cancellable());
        assert!(OrderStatus::Processing.is_cancellable());
        assert!(!OrderStatus::Shipped.is_cancellable());
        assert!(!OrderStatus::Delivered.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
    }
}
