use mockall::mock;

use super::{
    ActivityReader, ActivityWriter, CategoryReader, CategoryWriter, OrderReader, OrderWriter,
    ProductReader, ProductWriter, RepositoryResult, SettingsReader, SettingsWriter,
};
use crate::domain::{
    activity::{ActivityEntry, NewActivity},
    category::{Category, CategoryDraft},
    order::{Order, OrderComment, OrderStatus},
    product::{NewProduct, Product, UpdateProduct},
    settings::{NotificationSettings, ShippingConfig, ThemeSettings},
};

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn list_products(&self, store_id: &str) -> RepositoryResult<Vec<Product>>;
        fn get_product_by_id(&self, store_id: &str, product_id: &str) -> RepositoryResult<Option<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, store_id: &str, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, store_id: &str, product_id: &str, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, store_id: &str, product_id: &str) -> RepositoryResult<()>;
    }
}

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn list_categories(&self, store_id: &str) -> RepositoryResult<Vec<Category>>;
        fn get_category_by_id(&self, store_id: &str, category_id: &str) -> RepositoryResult<Option<Category>>;
    }
}

mock! {
    pub CategoryWriter {}

    impl CategoryWriter for CategoryWriter {
        fn create_category(&self, store_id: &str, draft: &CategoryDraft) -> RepositoryResult<Category>;
        fn update_category(&self, store_id: &str, category_id: &str, draft: &CategoryDraft) -> RepositoryResult<Category>;
        fn delete_category(&self, store_id: &str, category_id: &str) -> RepositoryResult<()>;
    }
}

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn list_orders(&self, store_id: &str) -> RepositoryResult<Vec<Order>>;
        fn get_order_by_id(&self, store_id: &str, order_id: &str) -> RepositoryResult<Option<Order>>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn update_order_status(&self, store_id: &str, order_id: &str, status: OrderStatus) -> RepositoryResult<Order>;
        fn add_order_comment(&self, store_id: &str, order_id: &str, comment: &OrderComment) -> RepositoryResult<Order>;
        fn delete_order(&self, store_id: &str, order_id: &str) -> RepositoryResult<()>;
    }
}

mock! {
    pub SettingsReader {}

    impl SettingsReader for SettingsReader {
        fn get_theme(&self, store_id: &str) -> RepositoryResult<Option<ThemeSettings>>;
        fn get_shipping_config(&self, store_id: &str) -> RepositoryResult<Option<ShippingConfig>>;
        fn get_notification_settings(&self, store_id: &str) -> RepositoryResult<Option<NotificationSettings>>;
    }
}

mock! {
    pub SettingsWriter {}

    impl SettingsWriter for SettingsWriter {
        fn save_theme(&self, store_id: &str, theme: &ThemeSettings) -> RepositoryResult<()>;
        fn save_shipping_config(&self, store_id: &str, config: &ShippingConfig) -> RepositoryResult<()>;
        fn save_notification_settings(&self, store_id: &str, settings: &NotificationSettings) -> RepositoryResult<()>;
    }
}

mock! {
    pub ActivityReader {}

    impl ActivityReader for ActivityReader {
        fn list_activity(&self, store_id: &str, limit: usize) -> RepositoryResult<Vec<ActivityEntry>>;
    }
}

mock! {
    pub ActivityWriter {}

    impl ActivityWriter for ActivityWriter {
        fn record_activity(&self, store_id: &str, activity: &NewActivity) -> RepositoryResult<()>;
    }
}
