use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::context::AdminContext;
use crate::forms::products::{AddProductForm, EditProductForm};
use crate::notify::MessageComposer;
use crate::repository::InMemoryRepository;
use crate::routes::error_response;
use crate::services::products::{
    ProductsQuery, create_product, delete_product, duplicate_product, export_products,
    load_products_page, update_product,
};
use crate::services::settings::compose_low_stock_alerts;

#[get("/v1/products")]
/// Filtered product list with derived prices, stock status and capabilities.
pub async fn api_v1_products(
    params: web::Query<ProductsQuery>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match load_products_page(repo.get_ref(), &ctx, &params) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list products"),
    }
}

#[post("/v1/products")]
pub async fn api_v1_add_product(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    form: web::Json<AddProductForm>,
) -> impl Responder {
    match create_product(repo.get_ref(), &ctx, form.into_inner()) {
        Ok(product) => HttpResponse::Created().json(product),
        Err(err) => error_response(err, "create product"),
    }
}

#[put("/v1/products/{product_id}")]
pub async fn api_v1_edit_product(
    product_id: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    form: web::Json<EditProductForm>,
) -> impl Responder {
    match update_product(repo.get_ref(), &ctx, &product_id, form.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, "update product"),
    }
}

#[post("/v1/products/{product_id}/duplicate")]
pub async fn api_v1_duplicate_product(
    product_id: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match duplicate_product(repo.get_ref(), &ctx, &product_id) {
        Ok(product) => HttpResponse::Created().json(product),
        Err(err) => error_response(err, "duplicate product"),
    }
}

#[delete("/v1/products/{product_id}")]
pub async fn api_v1_delete_product(
    product_id: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match delete_product(repo.get_ref(), &ctx, &product_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "delete product"),
    }
}

#[get("/v1/products/export")]
/// CSV download of the catalogue.
pub async fn api_v1_products_export(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match export_products(repo.get_ref(), &ctx) {
        Ok(export) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(export.file_name)],
            })
            .body(export.bytes),
        Err(err) => error_response(err, "export products"),
    }
}

#[get("/v1/products/low-stock-alerts")]
/// Alert messages for products at or below their reorder threshold.
pub async fn api_v1_low_stock_alerts(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    composer: web::Data<MessageComposer>,
) -> impl Responder {
    match compose_low_stock_alerts(repo.get_ref(), &ctx, composer.get_ref()) {
        Ok(messages) => HttpResponse::Ok().json(messages),
        Err(err) => error_response(err, "compose low-stock alerts"),
    }
}
