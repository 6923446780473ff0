use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::lenient;

/// Reorder threshold assumed when a product does not define one.
pub const DEFAULT_MIN_STOCK: i64 = 5;

/// Suffix appended to the name of a duplicated product.
pub const DUPLICATE_SUFFIX: &str = " (نسخة)";

/// Product document as stored by the catalogue.
///
/// Optional fields mirror what the store may omit; the accessor methods
/// resolve them to their defaults so callers never have to.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// Name of the category the product is filed under.
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub description: Option<String>,
    /// List price.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub price: f64,
    /// Purchase price paid to the supplier.
    #[serde(default, deserialize_with = "lenient::optional_amount")]
    pub cost_price: Option<f64>,
    /// Discount percentage applied to the list price.
    #[serde(default, deserialize_with = "lenient::optional_amount")]
    pub discount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub discount_end_date: Option<String>,
    /// Discounted price captured at the last write. Views never read it.
    #[serde(
        rename = "discounted_price",
        default,
        deserialize_with = "lenient::optional_amount"
    )]
    pub persisted_discounted_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_count")]
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_count")]
    pub min_stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_count")]
    pub total_sold: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_count")]
    pub views: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_flag")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient::optional_flag")]
    pub is_featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub main_image: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Stock level bucket of a product relative to its reorder threshold.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Nothing left.
    Out,
    /// At or below the reorder threshold.
    Low,
    /// Above the reorder threshold.
    Ok,
}

impl StockStatus {
    pub fn classify(stock: i64, min_stock: i64) -> Self {
        if stock <= 0 {
            StockStatus::Out
        } else if stock <= min_stock {
            StockStatus::Low
        } else {
            StockStatus::Ok
        }
    }
}

impl Product {
    /// Units on hand; missing or negative counts resolve to zero.
    pub fn stock(&self) -> i64 {
        self.stock.unwrap_or(0).max(0)
    }

    pub fn min_stock(&self) -> i64 {
        self.min_stock.unwrap_or(DEFAULT_MIN_STOCK).max(0)
    }

    pub fn cost_price(&self) -> f64 {
        self.cost_price.unwrap_or(0.0)
    }

    /// Discount percentage clamped to `0..=100`.
    pub fn discount_percent(&self) -> f64 {
        self.discount.unwrap_or(0.0).clamp(0.0, 100.0)
    }

    pub fn has_discount(&self) -> bool {
        self.discount_percent() > 0.0
    }

    pub fn discounted_price(&self) -> f64 {
        self.price * (1.0 - self.discount_percent() / 100.0)
    }

    /// Price the customer pays: discounted when a discount is set.
    pub fn effective_price(&self) -> f64 {
        if self.has_discount() {
            self.discounted_price()
        } else {
            self.price
        }
    }

    pub fn profit(&self) -> f64 {
        self.discounted_price() - self.cost_price()
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.stock(), self.min_stock())
    }

    pub fn total_sold(&self) -> i64 {
        self.total_sold.unwrap_or(0)
    }

    /// Products are active unless explicitly switched off.
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    pub fn is_featured(&self) -> bool {
        self.is_featured.unwrap_or(false)
    }

    /// Image shown in listings.
    pub fn cover_image(&self) -> Option<&str> {
        self.main_image
            .as_deref()
            .or_else(|| self.images.first().map(String::as_str))
    }
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: f64,
    pub cost_price: f64,
    pub discount: f64,
    pub discount_end_date: Option<String>,
    pub stock: i64,
    pub min_stock: i64,
    pub is_active: bool,
    pub is_featured: bool,
    pub images: Vec<String>,
    /// Timestamp captured when the payload was built.
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    /// Build a payload with the supplied name and price and default stock settings.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            category: None,
            description: None,
            price,
            cost_price: 0.0,
            discount: 0.0,
            discount_end_date: None,
            stock: 0,
            min_stock: DEFAULT_MIN_STOCK,
            is_active: true,
            is_featured: false,
            images: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Copy an existing product under a new name with its counters reset.
    pub fn duplicate_of(product: &Product) -> Self {
        Self {
            name: format!("{}{DUPLICATE_SUFFIX}", product.name),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.price,
            cost_price: product.cost_price(),
            discount: product.discount_percent(),
            discount_end_date: product.discount_end_date.clone(),
            stock: product.stock(),
            min_stock: product.min_stock(),
            is_active: product.is_active(),
            is_featured: product.is_featured(),
            images: product.images.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_cost_price(mut self, cost_price: f64) -> Self {
        self.cost_price = cost_price;
        self
    }

    pub fn with_discount(mut self, discount: f64, end_date: Option<String>) -> Self {
        self.discount = discount;
        self.discount_end_date = end_date;
        self
    }

    pub fn with_stock(mut self, stock: i64, min_stock: i64) -> Self {
        self.stock = stock;
        self.min_stock = min_stock;
        self
    }

    pub fn with_flags(mut self, is_active: bool, is_featured: bool) -> Self {
        self.is_active = is_active;
        self.is_featured = is_featured;
        self
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// Materialise the stored document under `id`, persisting the discounted
    /// price and starting the sales and view counters at zero.
    pub fn into_product(self, id: impl Into<String>) -> Product {
        let main_image = self.images.first().cloned();
        let mut product = Product {
            id: id.into(),
            name: self.name,
            category: self.category,
            description: self.description,
            price: self.price,
            cost_price: Some(self.cost_price),
            discount: Some(self.discount),
            discount_end_date: self.discount_end_date,
            persisted_discounted_price: None,
            stock: Some(self.stock),
            min_stock: Some(self.min_stock),
            total_sold: Some(0),
            views: Some(0),
            is_active: Some(self.is_active),
            is_featured: Some(self.is_featured),
            images: self.images,
            main_image,
            created_at: Some(self.created_at),
            updated_at: Some(self.created_at),
        };
        product.persisted_discounted_price = Some(product.discounted_price());
        product
    }
}

/// Patch data applied when updating an existing product.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub name: Option<String>,
    /// `Some(None)` clears the category.
    pub category: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub cost_price: Option<f64>,
    pub discount: Option<f64>,
    pub discount_end_date: Option<Option<String>>,
    pub stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    /// Replacement image list; `None` keeps the current images.
    pub images: Option<Vec<String>>,
    /// Timestamp captured when the patch was created.
    pub updated_at: DateTime<Utc>,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self {
            name: None,
            category: None,
            description: None,
            price: None,
            cost_price: None,
            discount: None,
            discount_end_date: None,
            stock: None,
            min_stock: None,
            is_active: None,
            is_featured: None,
            images: None,
            updated_at: Utc::now(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = Some(category.map(|value| value.into()));
        self
    }

    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|value| value.into()));
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn cost_price(mut self, cost_price: f64) -> Self {
        self.cost_price = Some(cost_price);
        self
    }

    pub fn discount(mut self, discount: f64, end_date: Option<String>) -> Self {
        self.discount = Some(discount);
        self.discount_end_date = Some(end_date);
        self
    }

    pub fn stock(mut self, stock: i64, min_stock: i64) -> Self {
        self.stock = Some(stock);
        self.min_stock = Some(min_stock);
        self
    }

    pub fn flags(mut self, is_active: bool, is_featured: bool) -> Self {
        self.is_active = Some(is_active);
        self.is_featured = Some(is_featured);
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = Some(images);
        self
    }

    /// Apply the patch to a stored document, refreshing the persisted
    /// discounted price.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(cost_price) = self.cost_price {
            product.cost_price = Some(cost_price);
        }
        if let Some(discount) = self.discount {
            product.discount = Some(discount);
        }
        if let Some(end_date) = &self.discount_end_date {
            product.discount_end_date = end_date.clone();
        }
        if let Some(stock) = self.stock {
            product.stock = Some(stock);
        }
        if let Some(min_stock) = self.min_stock {
            product.min_stock = Some(min_stock);
        }
        if let Some(is_active) = self.is_active {
            product.is_active = Some(is_active);
        }
        if let Some(is_featured) = self.is_featured {
            product.is_featured = Some(is_featured);
        }
        if let Some(images) = self.images.as_ref().filter(|images| !images.is_empty()) {
            product.images = images.clone();
            product.main_image = images.first().cloned();
        }
        product.persisted_discounted_price = Some(product.discounted_price());
        product.updated_at = Some(self.updated_at);
    }
}
