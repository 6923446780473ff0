//! JSON endpoints under `/api/v1`.

use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::services::ServiceError;

pub mod activity;
pub mod categories;
pub mod identity;
pub mod main;
pub mod orders;
pub mod products;
pub mod settings;

/// Translate a service failure into a response, logging unexpected ones.
pub(crate) fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            HttpResponse::Forbidden().json(json!({ "error": "insufficient permissions" }))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        ServiceError::Form(message) => {
            HttpResponse::UnprocessableEntity().json(json!({ "error": message }))
        }
        err => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Register every endpoint. Expects `InMemoryRepository`, `MessageComposer`
/// and optionally `PermissionTable` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(main::api_v1_capabilities)
            .service(products::api_v1_products_export)
            .service(products::api_v1_low_stock_alerts)
            .service(products::api_v1_products)
            .service(products::api_v1_add_product)
            .service(products::api_v1_edit_product)
            .service(products::api_v1_duplicate_product)
            .service(products::api_v1_delete_product)
            .service(categories::api_v1_categories)
            .service(categories::api_v1_add_category)
            .service(categories::api_v1_edit_category)
            .service(categories::api_v1_delete_category)
            .service(orders::api_v1_orders)
            .service(orders::api_v1_order_status)
            .service(orders::api_v1_order_comment)
            .service(orders::api_v1_order_confirmation)
            .service(orders::api_v1_delete_order)
            .service(settings::api_v1_theme)
            .service(settings::api_v1_custom_theme)
            .service(settings::api_v1_theme_preset)
            .service(settings::api_v1_shipping)
            .service(settings::api_v1_save_shipping)
            .service(settings::api_v1_notifications)
            .service(settings::api_v1_notification_credentials)
            .service(settings::api_v1_auto_send)
            .service(settings::api_v1_save_template)
            .service(settings::api_v1_preview_template)
            .service(activity::api_v1_activity),
    );
}
