use actix_web::{HttpResponse, Responder, get};

use crate::domain::context::AdminContext;
use crate::services::main::load_index_page;

#[get("/v1/me/capabilities")]
/// Identity of the caller and their capability map.
pub async fn api_v1_capabilities(ctx: AdminContext) -> impl Responder {
    HttpResponse::Ok().json(load_index_page(&ctx))
}
