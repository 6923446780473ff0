use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::context::AdminContext;
use crate::domain::permission::{Capabilities, Permission};
use crate::domain::product::{NewProduct, Product, StockStatus};
use crate::export::{products_csv, products_export_file_name};
use crate::forms::products::{AddProductForm, EditProductForm};
use crate::repository::{CategoryReader, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult, ensure};
use crate::view::{PriceRange, StockFilter, ViewSpec, derive_view, sort_by_display_order};

/// Permissions the product page needs to gate its affordances.
pub const PRODUCT_PAGE_PERMISSIONS: [Permission; 4] = [
    Permission::ViewProducts,
    Permission::AddProduct,
    Permission::EditProduct,
    Permission::DeleteProduct,
];

/// Query parameters accepted by the product list.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub stock: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

fn parse_bound(field: &str, raw: Option<&str>) -> ServiceResult<Option<f64>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|bound| bound.is_finite())
            .map(Some)
            .ok_or_else(|| ServiceError::Form(format!("invalid {field} `{value}`"))),
    }
}

impl ProductsQuery {
    /// Translate the raw query into a view spec.
    pub fn to_view_spec(&self) -> ServiceResult<ViewSpec> {
        let mut spec = ViewSpec::new().search(self.search.as_deref().unwrap_or_default().trim());

        if let Some(category) = self.category.as_deref().filter(|value| !value.is_empty()) {
            spec = spec.category(category);
        }

        let stock = self
            .stock
            .as_deref()
            .unwrap_or_default()
            .parse::<StockFilter>()
            .map_err(|err| ServiceError::Form(err.to_string()))?;
        spec = spec.stock(stock);

        let min = parse_bound("min_price", self.min_price.as_deref())?;
        let max = parse_bound("max_price", self.max_price.as_deref())?;
        if min.is_some() || max.is_some() {
            spec = spec.price_range(PriceRange::new(min, max));
        }

        Ok(spec)
    }
}

/// Product row with every derived field resolved.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub price: f64,
    pub discount: f64,
    pub has_discount: bool,
    pub discounted_price: f64,
    pub effective_price: f64,
    pub cost_price: f64,
    pub profit: f64,
    pub stock: i64,
    pub min_stock: i64,
    pub stock_status: StockStatus,
    pub total_sold: i64,
    pub is_active: bool,
    pub is_featured: bool,
    pub image: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            discount: product.discount_percent(),
            has_discount: product.has_discount(),
            discounted_price: product.discounted_price(),
            effective_price: product.effective_price(),
            cost_price: product.cost_price(),
            profit: product.profit(),
            stock: product.stock(),
            min_stock: product.min_stock(),
            stock_status: product.stock_status(),
            total_sold: product.total_sold(),
            is_active: product.is_active(),
            is_featured: product.is_featured(),
            image: product.cover_image().map(str::to_string),
        }
    }
}

/// Data required to render the products page.
#[derive(Debug, Serialize)]
pub struct ProductsPageData {
    pub products: Vec<ProductView>,
    /// Number of products before filtering.
    pub total: usize,
    /// Category names offered by the category filter.
    pub categories: Vec<String>,
    pub capabilities: Capabilities,
}

/// Loads the products page filtered by `query`.
pub fn load_products_page<R>(
    repo: &R,
    ctx: &AdminContext,
    query: &ProductsQuery,
) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    ensure(ctx, Permission::ViewProducts)?;

    let spec = query.to_view_spec()?;
    let products = repo
        .list_products(&ctx.store_id)
        .map_err(ServiceError::from)?;
    let mut categories = repo
        .list_categories(&ctx.store_id)
        .map_err(ServiceError::from)?;
    sort_by_display_order(&mut categories);

    let visible = derive_view(&products, &spec);

    Ok(ProductsPageData {
        products: visible.iter().map(ProductView::from).collect(),
        total: products.len(),
        categories: categories.into_iter().map(|category| category.name).collect(),
        capabilities: ctx.capabilities(&PRODUCT_PAGE_PERMISSIONS),
    })
}

pub fn create_product<R>(
    repo: &R,
    ctx: &AdminContext,
    form: AddProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    ensure(ctx, Permission::AddProduct)?;

    let new_product = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_product(&ctx.store_id, &new_product)
        .map_err(ServiceError::from)
}

pub fn update_product<R>(
    repo: &R,
    ctx: &AdminContext,
    product_id: &str,
    form: EditProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    ensure(ctx, Permission::EditProduct)?;

    let update = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_product(&ctx.store_id, product_id, &update)
        .map_err(ServiceError::from)
}

/// Copies a product under a suffixed name with sales and views reset.
pub fn duplicate_product<R>(
    repo: &R,
    ctx: &AdminContext,
    product_id: &str,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    ensure(ctx, Permission::AddProduct)?;

    let original = repo
        .get_product_by_id(&ctx.store_id, product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    repo.create_product(&ctx.store_id, &NewProduct::duplicate_of(&original))
        .map_err(ServiceError::from)
}

pub fn delete_product<R>(repo: &R, ctx: &AdminContext, product_id: &str) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    ensure(ctx, Permission::DeleteProduct)?;

    repo.delete_product(&ctx.store_id, product_id)
        .map_err(ServiceError::from)
}

/// Spreadsheet download of the whole catalogue.
#[derive(Debug)]
pub struct ProductExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn export_products<R>(repo: &R, ctx: &AdminContext) -> ServiceResult<ProductExport>
where
    R: ProductReader + ?Sized,
{
    export_products_on(repo, ctx, Utc::now().date_naive())
}

fn export_products_on<R>(repo: &R, ctx: &AdminContext, date: NaiveDate) -> ServiceResult<ProductExport>
where
    R: ProductReader + ?Sized,
{
    ensure(ctx, Permission::ViewProducts)?;

    let products = repo
        .list_products(&ctx.store_id)
        .map_err(ServiceError::from)?;
    let bytes = products_csv(&products).map_err(|err| ServiceError::Internal(err.to_string()))?;

    Ok(ProductExport {
        file_name: products_export_file_name(date),
        bytes,
    })
}
