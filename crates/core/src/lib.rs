//! Copperleaf Core - Shared types and commerce API client.
//!
//! This crate provides the pieces shared by both Copperleaf binaries:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Merchant administration console
//!
//! # Architecture
//!
//! The remote commerce API owns all business logic (inventory, orders,
//! payments, authentication). This crate holds the canonical client for that
//! API plus the domain types both binaries render. Field-name normalization
//! happens once here, at the client boundary: the API emits a mix of
//! lowerCamel and PascalCase field names, and the DTOs in [`api::types`]
//! absorb both so route handlers never deal with raw casing fallbacks.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, order statuses, and roles
//! - [`api`] - REST client wrapper, wire DTOs, and request sequencing
//! - [`token`] - Bearer token claims decoding (signature stays opaque)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod token;
pub mod types;

pub use types::*;
