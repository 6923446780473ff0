use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::domain::context::AdminContext;
use crate::forms::orders::{OrderCommentForm, OrderStatusForm};
use crate::notify::MessageComposer;
use crate::repository::InMemoryRepository;
use crate::routes::error_response;
use crate::services::orders::{
    OrdersQuery, add_order_comment, change_order_status, delete_order, load_orders_page,
};
use crate::services::settings::compose_order_confirmation;

#[get("/v1/orders")]
pub async fn api_v1_orders(
    params: web::Query<OrdersQuery>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match load_orders_page(repo.get_ref(), &ctx, &params) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "list orders"),
    }
}

#[post("/v1/orders/{order_id}/status")]
pub async fn api_v1_order_status(
    order_id: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    form: web::Json<OrderStatusForm>,
) -> impl Responder {
    match change_order_status(repo.get_ref(), &ctx, &order_id, form.into_inner()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err, "change order status"),
    }
}

#[post("/v1/orders/{order_id}/comments")]
pub async fn api_v1_order_comment(
    order_id: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    form: web::Json<OrderCommentForm>,
) -> impl Responder {
    match add_order_comment(repo.get_ref(), &ctx, &order_id, form.into_inner()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response(err, "comment on order"),
    }
}

#[get("/v1/orders/{order_id}/confirmation")]
/// Confirmation message for the order; `null` when auto-sending is off.
pub async fn api_v1_order_confirmation(
    order_id: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    composer: web::Data<MessageComposer>,
) -> impl Responder {
    match compose_order_confirmation(repo.get_ref(), &ctx, composer.get_ref(), &order_id) {
        Ok(message) => HttpResponse::Ok().json(message),
        Err(err) => error_response(err, "compose order confirmation"),
    }
}

#[delete("/v1/orders/{order_id}")]
pub async fn api_v1_delete_order(
    order_id: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match delete_order(repo.get_ref(), &ctx, &order_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, "delete order"),
    }
}
