//! Collaborator traits over the external document store.
//!
//! Every call is scoped to a store id. Readers hand back owned snapshots;
//! the caller never observes a partially applied write.

use crate::domain::activity::{ActivityEntry, NewActivity};
use crate::domain::category::{Category, CategoryDraft};
use crate::domain::order::{Order, OrderComment, OrderStatus};
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::settings::{NotificationSettings, ShippingConfig, ThemeSettings};

pub mod errors;
pub mod memory;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};
pub use memory::{InMemoryRepository, StoreData};

/// Read-only operations over product records.
pub trait ProductReader {
    fn list_products(&self, store_id: &str) -> RepositoryResult<Vec<Product>>;
    fn get_product_by_id(&self, store_id: &str, product_id: &str)
    -> RepositoryResult<Option<Product>>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, store_id: &str, new_product: &NewProduct)
    -> RepositoryResult<Product>;
    fn update_product(
        &self,
        store_id: &str,
        product_id: &str,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, store_id: &str, product_id: &str) -> RepositoryResult<()>;
}

pub trait CategoryReader {
    fn list_categories(&self, store_id: &str) -> RepositoryResult<Vec<Category>>;
    fn get_category_by_id(
        &self,
        store_id: &str,
        category_id: &str,
    ) -> RepositoryResult<Option<Category>>;
}

pub trait CategoryWriter {
    fn create_category(&self, store_id: &str, draft: &CategoryDraft) -> RepositoryResult<Category>;
    /// Overwrite the editable fields of a category, keeping its product count.
    fn update_category(
        &self,
        store_id: &str,
        category_id: &str,
        draft: &CategoryDraft,
    ) -> RepositoryResult<Category>;
    fn delete_category(&self, store_id: &str, category_id: &str) -> RepositoryResult<()>;
}

pub trait OrderReader {
    fn list_orders(&self, store_id: &str) -> RepositoryResult<Vec<Order>>;
    fn get_order_by_id(&self, store_id: &str, order_id: &str) -> RepositoryResult<Option<Order>>;
}

pub trait OrderWriter {
    fn update_order_status(
        &self,
        store_id: &str,
        order_id: &str,
        status: OrderStatus,
    ) -> RepositoryResult<Order>;
    fn add_order_comment(
        &self,
        store_id: &str,
        order_id: &str,
        comment: &OrderComment,
    ) -> RepositoryResult<Order>;
    fn delete_order(&self, store_id: &str, order_id: &str) -> RepositoryResult<()>;
}

/// Store-level settings documents. `None` means the document was never saved.
pub trait SettingsReader {
    fn get_theme(&self, store_id: &str) -> RepositoryResult<Option<ThemeSettings>>;
    fn get_shipping_config(&self, store_id: &str) -> RepositoryResult<Option<ShippingConfig>>;
    fn get_notification_settings(
        &self,
        store_id: &str,
    ) -> RepositoryResult<Option<NotificationSettings>>;
}

pub trait SettingsWriter {
    fn save_theme(&self, store_id: &str, theme: &ThemeSettings) -> RepositoryResult<()>;
    fn save_shipping_config(&self, store_id: &str, config: &ShippingConfig)
    -> RepositoryResult<()>;
    fn save_notification_settings(
        &self,
        store_id: &str,
        settings: &NotificationSettings,
    ) -> RepositoryResult<()>;
}

pub trait ActivityReader {
    /// Most recent entries first, at most `limit` of them.
    fn list_activity(&self, store_id: &str, limit: usize) -> RepositoryResult<Vec<ActivityEntry>>;
}

pub trait ActivityWriter {
    fn record_activity(&self, store_id: &str, activity: &NewActivity) -> RepositoryResult<()>;
}
