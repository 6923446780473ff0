use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::context::AdminContext;
use crate::forms::categories::CategoryForm;
use crate::repository::InMemoryRepository;
use crate::routes::error_response;
use crate::services::categories::{
    create_category, delete_category, load_categories_page, update_category,
};

#[get("/v1/categories")]
/// Categories in display order with hierarchy labels and parent choices.
pub async fn api_v1_categories(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match load_categories_page(repo.get_ref(), &ctx) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list categories"),
    }
}

#[post("/v1/categories")]
pub async fn api_v1_add_category(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    form: web::Json<CategoryForm>,
) -> impl Responder {
    match create_category(repo.get_ref(), &ctx, form.into_inner()) {
        Ok(category) => HttpResponse::Created().json(category),
        Err(err) => error_response(err, "create category"),
    }
}

#[put("/v1/categories/{category_id}")]
pub async fn api_v1_edit_category(
    category_id: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    form: web::Json<CategoryForm>,
) -> impl Responder {
    match update_category(repo.get_ref(), &ctx, &category_id, form.into_inner()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(err, "update category"),
    }
}

#[delete("/v1/categories/{category_id}")]
pub async fn api_v1_delete_category(
    category_id: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match delete_category(repo.get_ref(), &ctx, &category_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "delete category"),
    }
}
