use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::{Product, StockStatus};

/// Stock constraint selected in the product list.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockFilter {
    #[default]
    Any,
    /// Strictly above the reorder threshold.
    InStock,
    /// Between one unit and the reorder threshold, inclusive.
    LowStock,
    /// Nothing on hand.
    OutOfStock,
}

/// Raised when a stock filter name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown stock filter `{0}`")]
pub struct UnknownStockFilter(pub String);

impl StockFilter {
    pub fn matches(self, product: &Product) -> bool {
        let status = product.stock_status();
        match self {
            StockFilter::Any => true,
            StockFilter::InStock => status == StockStatus::Ok,
            StockFilter::LowStock => status == StockStatus::Low,
            StockFilter::OutOfStock => status == StockStatus::Out,
        }
    }
}

impl FromStr for StockFilter {
    type Err = UnknownStockFilter;

    /// An empty selection means "any".
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "any" => Ok(StockFilter::Any),
            "in_stock" => Ok(StockFilter::InStock),
            "low_stock" => Ok(StockFilter::LowStock),
            "out_of_stock" => Ok(StockFilter::OutOfStock),
            other => Err(UnknownStockFilter(other.to_string())),
        }
    }
}

/// Inclusive bounds on the effective price.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

impl PriceRange {
    /// Build a range, defaulting the lower bound to zero and the upper bound
    /// to unbounded.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        let default = Self::default();
        Self {
            min: min.unwrap_or(default.min),
            max: max.unwrap_or(default.max),
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Filter options for the product list. All set options must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSpec {
    /// Case-insensitive substring matched against the product name.
    pub search_term: String,
    /// Exact category name; empty or `None` disables the filter.
    pub category: Option<String>,
    pub stock_filter: StockFilter,
    pub price_range: Option<PriceRange>,
}

impl ViewSpec {
    /// A spec that keeps every record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn stock(mut self, filter: StockFilter) -> Self {
        self.stock_filter = filter;
        self
    }

    pub fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    /// Whether any option narrows the result.
    pub fn is_filtering(&self) -> bool {
        !self.search_term.is_empty()
            || self.category.as_deref().is_some_and(|value| !value.is_empty())
            || self.stock_filter != StockFilter::Any
            || self.price_range.is_some()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && self.matches_category(product)
            && self.stock_filter.matches(product)
            && self.matches_price(product)
    }

    fn matches_search(&self, product: &Product) -> bool {
        self.search_term.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&self.search_term.to_lowercase())
    }

    fn matches_category(&self, product: &Product) -> bool {
        match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => product.category.as_deref() == Some(category),
        }
    }

    fn matches_price(&self, product: &Product) -> bool {
        self.price_range
            .is_none_or(|range| range.contains(product.effective_price()))
    }
}

/// Apply `spec` to `records`, keeping the input order of the survivors.
pub fn derive_view(records: &[Product], spec: &ViewSpec) -> Vec<Product> {
    records
        .iter()
        .filter(|product| spec.matches(product))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, stock: i64, min_stock: i64, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            stock: Some(stock),
            min_stock: Some(min_stock),
            price,
            discount: Some(0.0),
            ..Product::default()
        }
    }

    fn catalogue() -> Vec<Product> {
        let mut juice = product("p2", "Orange Juice", 20, 5, 15.0);
        juice.category = Some("Drinks".to_string());
        juice.discount = Some(20.0);

        let mut chips = product("p1", "Chips", 3, 5, 10.0);
        chips.category = Some("Snacks".to_string());

        let mut crackers = product("p3", "Crackers", 0, 5, 8.0);
        crackers.category = Some("Snacks".to_string());

        vec![chips, juice, crackers]
    }

    fn ids(view: &[Product]) -> Vec<&str> {
        view.iter().map(|product| product.id.as_str()).collect()
    }

    #[test]
    fn low_stock_scenario() {
        let records = vec![product("p1", "Chips", 3, 5, 10.0)];

        let low = derive_view(&records, &ViewSpec::new().stock(StockFilter::LowStock));
        assert_eq!(low, records);

        let in_stock = derive_view(&records, &ViewSpec::new().stock(StockFilter::InStock));
        assert!(in_stock.is_empty());
    }

    #[test]
    fn out_of_stock_matches_exactly_zero() {
        for stock in [0, 1, 5, 6] {
            let records = vec![product("p", "Item", stock, 5, 1.0)];
            let view = derive_view(&records, &ViewSpec::new().stock(StockFilter::OutOfStock));
            assert_eq!(view.len() == 1, stock == 0, "stock {stock}");
        }
    }

    #[test]
    fn zero_price_range_excludes_priced_products() {
        let records = catalogue();
        let spec = ViewSpec::new().price_range(PriceRange::new(Some(0.0), Some(0.0)));
        assert!(derive_view(&records, &spec).is_empty());
    }

    #[test]
    fn price_range_uses_effective_price() {
        let records = catalogue();
        // Orange juice lists at 15 but sells at 12 after its discount.
        let spec = ViewSpec::new().price_range(PriceRange::new(Some(11.0), Some(12.5)));
        assert_eq!(ids(&derive_view(&records, &spec)), vec!["p2"]);

        let unbounded = ViewSpec::new().price_range(PriceRange::new(Some(9.0), None));
        assert_eq!(ids(&derive_view(&records, &unbounded)), vec!["p1", "p2"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = catalogue();
        let spec = ViewSpec::new().search("JUICE");
        assert_eq!(ids(&derive_view(&records, &spec)), vec!["p2"]);

        let partial = ViewSpec::new().search("c");
        assert_eq!(ids(&derive_view(&records, &partial)), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn category_is_exact_and_empty_disables() {
        let records = catalogue();
        let spec = ViewSpec::new().category("Snacks");
        assert_eq!(ids(&derive_view(&records, &spec)), vec!["p1", "p3"]);

        let partial = ViewSpec::new().category("Snack");
        assert!(derive_view(&records, &partial).is_empty());

        let empty = ViewSpec::new().category("");
        assert_eq!(derive_view(&records, &empty).len(), 3);
        assert!(!empty.is_filtering());
    }

    #[test]
    fn predicates_are_combined() {
        let records = catalogue();
        let spec = ViewSpec::new()
            .category("Snacks")
            .stock(StockFilter::LowStock)
            .search("chi");
        assert_eq!(ids(&derive_view(&records, &spec)), vec!["p1"]);
    }

    #[test]
    fn filtering_is_idempotent_and_stable() {
        let records = catalogue();
        let specs = [
            ViewSpec::new(),
            ViewSpec::new().search("c"),
            ViewSpec::new().stock(StockFilter::InStock),
            ViewSpec::new().category("Snacks").price_range(PriceRange::default()),
        ];

        for spec in specs {
            let once = derive_view(&records, &spec);
            let twice = derive_view(&once, &spec);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn stock_filter_parses_select_values() {
        assert_eq!("".parse::<StockFilter>(), Ok(StockFilter::Any));
        assert_eq!("low_stock".parse::<StockFilter>(), Ok(StockFilter::LowStock));
        assert!("plenty".parse::<StockFilter>().is_err());
    }
}
