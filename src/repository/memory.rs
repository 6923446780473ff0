use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::domain::activity::{ActivityEntry, NewActivity};
use crate::domain::category::{Category, CategoryDraft};
use crate::domain::order::{Order, OrderComment, OrderStatus};
use crate::domain::product::{NewProduct, Product, UpdateProduct};
use crate::domain::settings::{NotificationSettings, ShippingConfig, ThemeSettings};
use crate::repository::{
    ActivityReader, ActivityWriter, CategoryReader, CategoryWriter, OrderReader, OrderWriter,
    ProductReader, ProductWriter, RepositoryError, RepositoryResult, SettingsReader,
    SettingsWriter,
};

/// Documents held for a single store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreData {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub orders: Vec<Order>,
    pub theme: Option<ThemeSettings>,
    pub shipping: Option<ShippingConfig>,
    pub notifications: Option<NotificationSettings>,
    /// Oldest entry first.
    pub activity: Vec<ActivityEntry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Snapshot {
    stores: HashMap<String, StoreData>,
    next_id: u64,
}

/// Process-local stand-in for the document store, seeded from a JSON snapshot.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<RwLock<Snapshot>>,
}

impl InMemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot of the form `{"stores": {"<store id>": {...}}}`.
    pub fn from_json_str(raw: &str) -> RepositoryResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(raw)
            .map_err(|err| RepositoryError::Unexpected(format!("malformed snapshot: {err}")))?;
        Ok(Self {
            state: Arc::new(RwLock::new(snapshot)),
        })
    }

    pub fn from_json_file(path: &Path) -> RepositoryResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            RepositoryError::Unexpected(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// Replace everything held for `store_id`.
    pub fn seed_store(&self, store_id: &str, data: StoreData) -> RepositoryResult<()> {
        self.write()?.stores.insert(store_id.to_string(), data);
        Ok(())
    }

    /// Copy of everything held for `store_id`.
    pub fn store_data(&self, store_id: &str) -> RepositoryResult<StoreData> {
        Ok(self
            .read()?
            .stores
            .get(store_id)
            .cloned()
            .unwrap_or_default())
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Snapshot>> {
        self.state
            .read()
            .map_err(|_| RepositoryError::Unexpected("snapshot lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Snapshot>> {
        self.state
            .write()
            .map_err(|_| RepositoryError::Unexpected("snapshot lock poisoned".to_string()))
    }

    fn with_store<T>(&self, store_id: &str, f: impl FnOnce(&StoreData) -> T) -> RepositoryResult<T> {
        let snapshot = self.read()?;
        Ok(match snapshot.stores.get(store_id) {
            Some(store) => f(store),
            None => f(&StoreData::default()),
        })
    }

    fn with_store_mut<T>(
        &self,
        store_id: &str,
        f: impl FnOnce(&mut StoreData, &mut IdSequence<'_>) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let mut snapshot = self.write()?;
        let Snapshot { stores, next_id } = &mut *snapshot;
        let store = stores.entry(store_id.to_string()).or_default();
        f(store, &mut IdSequence(next_id))
    }
}

struct IdSequence<'a>(&'a mut u64);

impl IdSequence<'_> {
    /// Next id with `prefix` that `taken` does not already report as used.
    fn issue(&mut self, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
        loop {
            *self.0 += 1;
            let id = format!("{prefix}-{}", self.0);
            if !taken(&id) {
                return id;
            }
        }
    }
}

fn position_of<T>(items: &[T], id: &str, key: impl Fn(&T) -> &str) -> RepositoryResult<usize> {
    items
        .iter()
        .position(|item| key(item) == id)
        .ok_or(RepositoryError::NotFound)
}

/// Parent references must point at another category of the same store.
fn ensure_parent(
    categories: &[Category],
    category_id: Option<&str>,
    draft: &CategoryDraft,
) -> RepositoryResult<()> {
    let Some(parent_id) = draft.parent_id.as_deref().filter(|id| !id.is_empty()) else {
        return Ok(());
    };
    if Some(parent_id) == category_id {
        return Err(RepositoryError::Conflict(format!(
            "category {parent_id} cannot be its own parent"
        )));
    }
    if categories.iter().any(|category| category.id == parent_id) {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}

impl ProductReader for InMemoryRepository {
    fn list_products(&self, store_id: &str) -> RepositoryResult<Vec<Product>> {
        self.with_store(store_id, |store| store.products.clone())
    }

    fn get_product_by_id(
        &self,
        store_id: &str,
        product_id: &str,
    ) -> RepositoryResult<Option<Product>> {
        self.with_store(store_id, |store| {
            store
                .products
                .iter()
                .find(|product| product.id == product_id)
                .cloned()
        })
    }
}

impl ProductWriter for InMemoryRepository {
    fn create_product(
        &self,
        store_id: &str,
        new_product: &NewProduct,
    ) -> RepositoryResult<Product> {
        self.with_store_mut(store_id, |store, ids| {
            let id = ids.issue("prd", |id| store.products.iter().any(|p| p.id == id));
            let product = new_product.clone().into_product(id);
            store.products.push(product.clone());
            Ok(product)
        })
    }

    fn update_product(
        &self,
        store_id: &str,
        product_id: &str,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product> {
        self.with_store_mut(store_id, |store, _| {
            let index = position_of(&store.products, product_id, |p| p.id.as_str())?;
            let product = &mut store.products[index];
            updates.apply_to(product);
            Ok(product.clone())
        })
    }

    fn delete_product(&self, store_id: &str, product_id: &str) -> RepositoryResult<()> {
        self.with_store_mut(store_id, |store, _| {
            let index = position_of(&store.products, product_id, |p| p.id.as_str())?;
            store.products.remove(index);
            Ok(())
        })
    }
}

impl CategoryReader for InMemoryRepository {
    fn list_categories(&self, store_id: &str) -> RepositoryResult<Vec<Category>> {
        self.with_store(store_id, |store| store.categories.clone())
    }

    fn get_category_by_id(
        &self,
        store_id: &str,
        category_id: &str,
    ) -> RepositoryResult<Option<Category>> {
        self.with_store(store_id, |store| {
            store
                .categories
                .iter()
                .find(|category| category.id == category_id)
                .cloned()
        })
    }
}

impl CategoryWriter for InMemoryRepository {
    fn create_category(&self, store_id: &str, draft: &CategoryDraft) -> RepositoryResult<Category> {
        self.with_store_mut(store_id, |store, ids| {
            ensure_parent(&store.categories, None, draft)?;
            let id = ids.issue("cat", |id| store.categories.iter().any(|c| c.id == id));
            let category = draft.clone().into_category(id, Some(0));
            store.categories.push(category.clone());
            Ok(category)
        })
    }

    fn update_category(
        &self,
        store_id: &str,
        category_id: &str,
        draft: &CategoryDraft,
    ) -> RepositoryResult<Category> {
        self.with_store_mut(store_id, |store, _| {
            let index = position_of(&store.categories, category_id, |c| c.id.as_str())?;
            ensure_parent(&store.categories, Some(category_id), draft)?;
            let products_count = store.categories[index].products_count;
            let category = draft.clone().into_category(category_id, products_count);
            store.categories[index] = category.clone();
            Ok(category)
        })
    }

    fn delete_category(&self, store_id: &str, category_id: &str) -> RepositoryResult<()> {
        self.with_store_mut(store_id, |store, _| {
            let index = position_of(&store.categories, category_id, |c| c.id.as_str())?;
            store.categories.remove(index);
            Ok(())
        })
    }
}

impl OrderReader for InMemoryRepository {
    fn list_orders(&self, store_id: &str) -> RepositoryResult<Vec<Order>> {
        self.with_store(store_id, |store| store.orders.clone())
    }

    fn get_order_by_id(&self, store_id: &str, order_id: &str) -> RepositoryResult<Option<Order>> {
        self.with_store(store_id, |store| {
            store.orders.iter().find(|order| order.id == order_id).cloned()
        })
    }
}

impl OrderWriter for InMemoryRepository {
    fn update_order_status(
        &self,
        store_id: &str,
        order_id: &str,
        status: OrderStatus,
    ) -> RepositoryResult<Order> {
        self.with_store_mut(store_id, |store, _| {
            let index = position_of(&store.orders, order_id, |o| o.id.as_str())?;
            let order = &mut store.orders[index];
            order.status = status;
            Ok(order.clone())
        })
    }

    fn add_order_comment(
        &self,
        store_id: &str,
        order_id: &str,
        comment: &OrderComment,
    ) -> RepositoryResult<Order> {
        self.with_store_mut(store_id, |store, _| {
            let index = position_of(&store.orders, order_id, |o| o.id.as_str())?;
            let order = &mut store.orders[index];
            order.comments.push(comment.clone());
            Ok(order.clone())
        })
    }

    fn delete_order(&self, store_id: &str, order_id: &str) -> RepositoryResult<()> {
        self.with_store_mut(store_id, |store, _| {
            let index = position_of(&store.orders, order_id, |o| o.id.as_str())?;
            store.orders.remove(index);
            Ok(())
        })
    }
}

impl SettingsReader for InMemoryRepository {
    fn get_theme(&self, store_id: &str) -> RepositoryResult<Option<ThemeSettings>> {
        self.with_store(store_id, |store| store.theme.clone())
    }

    fn get_shipping_config(&self, store_id: &str) -> RepositoryResult<Option<ShippingConfig>> {
        self.with_store(store_id, |store| store.shipping)
    }

    fn get_notification_settings(
        &self,
        store_id: &str,
    ) -> RepositoryResult<Option<NotificationSettings>> {
        self.with_store(store_id, |store| store.notifications.clone())
    }
}

impl SettingsWriter for InMemoryRepository {
    fn save_theme(&self, store_id: &str, theme: &ThemeSettings) -> RepositoryResult<()> {
        self.with_store_mut(store_id, |store, _| {
            store.theme = Some(theme.clone());
            Ok(())
        })
    }

    fn save_shipping_config(
        &self,
        store_id: &str,
        config: &ShippingConfig,
    ) -> RepositoryResult<()> {
        self.with_store_mut(store_id, |store, _| {
            store.shipping = Some(*config);
            Ok(())
        })
    }

    fn save_notification_settings(
        &self,
        store_id: &str,
        settings: &NotificationSettings,
    ) -> RepositoryResult<()> {
        self.with_store_mut(store_id, |store, _| {
            store.notifications = Some(settings.clone());
            Ok(())
        })
    }
}

impl ActivityReader for InMemoryRepository {
    fn list_activity(&self, store_id: &str, limit: usize) -> RepositoryResult<Vec<ActivityEntry>> {
        self.with_store(store_id, |store| {
            store.activity.iter().rev().take(limit).cloned().collect()
        })
    }
}

impl ActivityWriter for InMemoryRepository {
    fn record_activity(&self, store_id: &str, activity: &NewActivity) -> RepositoryResult<()> {
        self.with_store_mut(store_id, |store, ids| {
            let id = ids.issue("log", |id| store.activity.iter().any(|e| e.id == id));
            store.activity.push(activity.clone().into_entry(id));
            Ok(())
        })
    }
}
