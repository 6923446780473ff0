use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::lenient;

/// Product category; may point at a parent to form a shallow hierarchy.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// Identifier of the parent category, if this is a sub-category.
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub parent_id: Option<String>,
    /// Icon class shown next to the category.
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub icon: Option<String>,
    /// Position in listings; lower values come first.
    #[serde(default, deserialize_with = "lenient::count")]
    pub display_order: i64,
    #[serde(default, deserialize_with = "lenient::optional_flag")]
    pub is_active: Option<bool>,
    /// Number of products filed under the category, as counted by the store.
    #[serde(default, deserialize_with = "lenient::optional_count")]
    pub products_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Categories are active unless explicitly switched off.
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    /// Parent identifier, treating an empty string as "no parent".
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn products_count(&self) -> i64 {
        self.products_count.unwrap_or(0)
    }
}

/// Fields written when creating or replacing a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub parent_id: Option<String>,
    pub icon: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
    /// Timestamp captured when the payload was built.
    pub updated_at: DateTime<Utc>,
}

impl CategoryDraft {
    /// Build a top-level, active category placed first in listings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: None,
            icon: None,
            display_order: 1,
            is_active: true,
            updated_at: Utc::now(),
        }
    }

    pub fn with_parent_id(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_display_order(mut self, display_order: i64) -> Self {
        self.display_order = display_order;
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Materialise the stored document under `id`, keeping the product count
    /// of a replaced record.
    pub fn into_category(self, id: impl Into<String>, products_count: Option<i64>) -> Category {
        Category {
            id: id.into(),
            name: self.name,
            parent_id: self.parent_id,
            icon: self.icon,
            display_order: self.display_order,
            is_active: Some(self.is_active),
            products_count,
            updated_at: Some(self.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_store_rows_leniently() {
        let raw = json!({
            "id": 7,
            "name": "Snacks",
            "parent_id": "",
            "display_order": "3",
            "is_active": false
        });
        let category: Category = match serde_json::from_value(raw) {
            Ok(category) => category,
            Err(err) => panic!("decode failed: {err}"),
        };

        assert_eq!(category.id, "7");
        assert_eq!(category.parent_id(), None);
        assert_eq!(category.display_order, 3);
        assert!(!category.is_active());
        assert_eq!(category.products_count(), 0);
    }

    #[test]
    fn draft_keeps_product_count() {
        let stored = CategoryDraft::new("Drinks")
            .with_parent_id("c1")
            .with_display_order(4)
            .into_category("c2", Some(12));

        assert_eq!(stored.parent_id(), Some("c1"));
        assert_eq!(stored.display_order, 4);
        assert_eq!(stored.products_count(), 12);
        assert!(stored.is_active());
    }
}
