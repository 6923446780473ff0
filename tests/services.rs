use storefront_admin::domain::context::AdminContext;
use storefront_admin::domain::product::StockStatus;
use storefront_admin::domain::role::Role;
use storefront_admin::forms::categories::CategoryForm;
use storefront_admin::forms::products::AddProductForm;
use storefront_admin::forms::settings::ShippingForm;
use storefront_admin::repository::{CategoryReader, ProductReader};
use storefront_admin::services::ServiceError;
use storefront_admin::services::activity::load_activity;
use storefront_admin::services::categories::{create_category, load_categories_page};
use storefront_admin::services::orders::{OrdersQuery, load_orders_page};
use storefront_admin::services::products::{
    ProductsQuery, create_product, delete_product, duplicate_product, export_products,
    load_products_page,
};
use storefront_admin::services::settings::{load_shipping_config, save_shipping_config};

mod common;

use common::{STORE, TestStore};

fn ctx(role: Role) -> AdminContext {
    AdminContext::new("user-1", STORE, Some(role)).with_email("sara@example.com")
}

fn add_form(name: &str) -> AddProductForm {
    AddProductForm {
        name: name.to_string(),
        category: Some("Food".to_string()),
        description: None,
        price: 12.0,
        cost_price: Some(8.0),
        discount: None,
        discount_end_date: None,
        stock: Some(10),
        min_stock: None,
        is_active: true,
        is_featured: false,
        images: vec!["https://cdn.example.com/tea.png".to_string()],
    }
}

#[test]
fn products_page_filters_the_snapshot() {
    let store = TestStore::new();
    let repo = store.repo();

    let query = ProductsQuery {
        stock: Some("low_stock".to_string()),
        ..ProductsQuery::default()
    };
    let page = load_products_page(&repo, &ctx(Role::ReadOnly), &query).expect("page should load");

    assert_eq!(page.total, 3);
    assert_eq!(page.products.len(), 1);
    let chips = &page.products[0];
    assert_eq!(chips.id, "p1");
    assert_eq!(chips.stock_status, StockStatus::Low);
    assert!(chips.has_discount);
    assert!((chips.effective_price - 18.0).abs() < 1e-9);
    assert!((chips.profit - 6.0).abs() < 1e-9);
    assert_eq!(page.categories, vec!["Food", "Snacks", "Candy"]);
    assert_eq!(page.capabilities.get("add_product"), Some(&false));
}

#[test]
fn manager_creates_and_duplicates_but_cannot_delete() {
    let store = TestStore::new();
    let repo = store.repo();
    let manager = ctx(Role::Manager);

    let created = create_product(&repo, &manager, add_form("Tea")).expect("create product");
    let copy = duplicate_product(&repo, &manager, &created.id).expect("duplicate product");

    assert_ne!(created.id, copy.id);
    assert!(copy.name.starts_with("Tea"));
    assert_eq!(copy.total_sold(), 0);

    let result = delete_product(&repo, &manager, &created.id);
    assert!(matches!(result, Err(ServiceError::Unauthorized)));

    let products = repo.list_products(STORE).expect("list products");
    assert_eq!(products.len(), 5);
}

#[test]
fn admin_deletes_product() {
    let store = TestStore::new();
    let repo = store.repo();

    delete_product(&repo, &ctx(Role::Admin), "p2").expect("delete product");

    assert!(
        repo.get_product_by_id(STORE, "p2")
            .expect("read product")
            .is_none()
    );
    assert!(matches!(
        delete_product(&repo, &ctx(Role::Admin), "p2"),
        Err(ServiceError::NotFound)
    ));
}

#[test]
fn export_contains_every_product() {
    let store = TestStore::new();
    let repo = store.repo();

    let export = export_products(&repo, &ctx(Role::Staff)).expect("export products");
    let text = String::from_utf8(export.bytes).expect("csv is utf-8");

    assert!(export.file_name.starts_with("products_"));
    assert!(export.file_name.ends_with(".csv"));
    assert!(text.starts_with('\u{feff}'));
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("Chips"));
}

#[test]
fn categories_are_named_through_their_parent() {
    let store = TestStore::new();
    let repo = store.repo();

    let page = load_categories_page(&repo, &ctx(Role::Staff)).expect("page should load");
    let names: Vec<&str> = page
        .categories
        .iter()
        .map(|category| category.display_name.as_str())
        .collect();

    assert_eq!(names, vec!["Food", "Food > Snacks", "Candy"]);
}

#[test]
fn new_category_is_logged() {
    let store = TestStore::new();
    let repo = store.repo();
    let manager = ctx(Role::Manager);

    let form = CategoryForm {
        name: "Drinks".to_string(),
        parent_id: Some("c1".to_string()),
        icon: None,
        display_order: None,
        is_active: true,
    };
    let category = create_category(&repo, &manager, form).expect("create category");
    assert_eq!(category.display_order, 1);
    assert!(
        repo.get_category_by_id(STORE, &category.id)
            .expect("read category")
            .is_some()
    );

    let activity = load_activity(&repo, &manager, None).expect("load activity");
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].user_name, "sara");
    assert_eq!(activity[0].details["name"], "Drinks");
}

#[test]
fn orders_page_searches_customers() {
    let store = TestStore::new();
    let repo = store.repo();

    let query = OrdersQuery {
        status: None,
        search: Some("omar".to_string()),
    };
    let page = load_orders_page(&repo, &ctx(Role::Staff), &query).expect("page should load");

    assert_eq!(page.total, 2);
    assert_eq!(page.orders.len(), 1);
    assert_eq!(page.orders[0].order.id, "o2");

    assert!(matches!(
        load_orders_page(&repo, &ctx(Role::ReadOnly), &query),
        Err(ServiceError::Unauthorized)
    ));
}

#[test]
fn shipping_defaults_until_saved() {
    let store = TestStore::new();
    let repo = store.repo();

    let config = load_shipping_config(&repo, &ctx(Role::Staff)).expect("load shipping");
    assert!(!config.enabled);

    let form = ShippingForm {
        price: 25.0,
        enabled: true,
    };
    assert!(matches!(
        save_shipping_config(&repo, &ctx(Role::Manager), form),
        Err(ServiceError::Unauthorized)
    ));

    let form = ShippingForm {
        price: 25.0,
        enabled: true,
    };
    save_shipping_config(&repo, &ctx(Role::Admin), form).expect("save shipping");
    let config = load_shipping_config(&repo, &ctx(Role::Staff)).expect("load shipping");
    assert!(config.enabled);
    assert_eq!(config.price, 25.0);
}
