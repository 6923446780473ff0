use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{DEFAULT_MIN_STOCK, NewProduct, UpdateProduct};
use crate::forms::{non_empty, sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = 4096;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// New products need at least one image.
    #[error("choose at least one product image")]
    MissingImage,
    #[error("invalid discount end date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
}

fn default_true() -> bool {
    true
}

fn parse_end_date(value: Option<String>) -> ProductFormResult<Option<String>> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Ok(Some(date.format("%Y-%m-%d").to_string())),
            Err(_) => Err(ProductFormError::InvalidDate(raw)),
        },
    }
}

fn clean_images(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

/// Payload submitted by the "Add product" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub cost_price: Option<f64>,
    /// Percentage between 0 and 100.
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub discount_end_date: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: Option<i64>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    /// Image URLs already uploaded to the media store.
    #[serde(default)]
    pub images: Vec<String>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let images = clean_images(self.images);
        if images.is_empty() {
            return Err(ProductFormError::MissingImage);
        }

        let end_date = parse_end_date(self.discount_end_date)?;

        let mut new_product = NewProduct::new(name, self.price)
            .with_cost_price(self.cost_price.unwrap_or(0.0))
            .with_discount(self.discount.unwrap_or(0.0), end_date)
            .with_stock(
                self.stock.unwrap_or(0),
                self.min_stock.unwrap_or(DEFAULT_MIN_STOCK),
            )
            .with_flags(self.is_active, self.is_featured)
            .with_images(images);

        if let Some(category) = non_empty(self.category) {
            new_product = new_product.with_category(category);
        }
        if let Some(description) = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            new_product = new_product.with_description(description);
        }

        Ok(new_product)
    }
}

/// Payload submitted by the "Edit product" form. Every field is replaced;
/// an empty image list keeps the stored images.
#[derive(Debug, Deserialize, Validate)]
pub struct EditProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub cost_price: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub discount_end_date: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: Option<i64>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub images: Vec<String>,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let end_date = parse_end_date(self.discount_end_date)?;
        let description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());

        let mut update = UpdateProduct::new()
            .name(name)
            .category(non_empty(self.category))
            .description(description)
            .price(self.price)
            .cost_price(self.cost_price.unwrap_or(0.0))
            .discount(self.discount.unwrap_or(0.0), end_date)
            .stock(
                self.stock.unwrap_or(0),
                self.min_stock.unwrap_or(DEFAULT_MIN_STOCK),
            )
            .flags(self.is_active, self.is_featured);

        let images = clean_images(self.images);
        if !images.is_empty() {
            update = update.images(images);
        }

        Ok(update)
    }
}
