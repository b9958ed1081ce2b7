//! Reusable view components for the admin console.

pub mod paged_table;

pub use paged_table::{CellKind, SectionConfig, TableColumn, TableState, TableView};
