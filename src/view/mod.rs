//! Derivation of display-ready sequences from fetched records.
//!
//! Everything here is a pure function of its inputs: records are never
//! mutated, and derived values are recomputed on every call.

pub mod category;
pub mod order;
pub mod product;

pub use category::{
    find_parent, has_dangling_parent, parent_options, resolve_display_name, sort_by_display_order,
};
pub use order::{OrderViewSpec, derive_order_view};
pub use product::{PriceRange, StockFilter, ViewSpec, derive_view};
