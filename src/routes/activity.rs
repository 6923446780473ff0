use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::domain::context::AdminContext;
use crate::repository::InMemoryRepository;
use crate::routes::error_response;
use crate::services::activity::load_activity;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
}

#[get("/v1/activity")]
pub async fn api_v1_activity(
    params: web::Query<ActivityQuery>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match load_activity(repo.get_ref(), &ctx, params.limit) {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(err) => error_response(err, "list activity"),
    }
}
