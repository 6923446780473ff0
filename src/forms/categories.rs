use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::CategoryDraft;
use crate::forms::{non_empty, sanitize_inline_text};

/// Maximum length allowed for a category name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

const ICON_MAX_LEN_VALIDATOR: u64 = 64;

/// Result type returned by the category form helpers.
pub type CategoryFormResult<T> = Result<T, CategoryFormError>;

/// Errors that can occur while processing category forms.
#[derive(Debug, Error)]
pub enum CategoryFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("category name cannot be empty")]
    EmptyName,
}

fn default_true() -> bool {
    true
}

/// Payload submitted when adding or editing a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Parent category id; blank means top level.
    #[serde(default)]
    pub parent_id: Option<String>,
    #[validate(length(max = ICON_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub icon: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CategoryForm {
    /// Validates and sanitizes the payload into a `CategoryDraft`.
    ///
    /// A missing or zero display order places the category first.
    pub fn into_draft(self) -> CategoryFormResult<CategoryDraft> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(CategoryFormError::EmptyName);
        }

        let mut draft = CategoryDraft::new(name).active(self.is_active);
        if let Some(display_order) = self.display_order.filter(|order| *order > 0) {
            draft = draft.with_display_order(display_order);
        }
        if let Some(parent_id) = non_empty(self.parent_id) {
            draft = draft.with_parent_id(parent_id);
        }
        if let Some(icon) = non_empty(self.icon) {
            draft = draft.with_icon(icon);
        }

        Ok(draft)
    }
}
