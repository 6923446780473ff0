use actix_web::{HttpResponse, Responder, get, post, web};

use crate::domain::context::AdminContext;
use crate::domain::settings::{AutoSendFlags, TemplateKind};
use crate::forms::settings::{
    CustomThemeForm, NotificationCredentialsForm, ShippingForm, TemplateForm,
};
use crate::notify::MessageComposer;
use crate::repository::InMemoryRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::settings::{
    apply_theme_preset, load_notification_settings, load_shipping_config, load_theme,
    preview_template, save_auto_send, save_custom_theme, save_notification_credentials,
    save_shipping_config, save_template,
};

fn template_kind(raw: &str) -> Result<TemplateKind, ServiceError> {
    raw.parse::<TemplateKind>().map_err(|_| ServiceError::NotFound)
}

#[get("/v1/settings/theme")]
pub async fn api_v1_theme(ctx: AdminContext, repo: web::Data<InMemoryRepository>) -> impl Responder {
    match load_theme(repo.get_ref(), &ctx) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "load theme"),
    }
}

#[post("/v1/settings/theme")]
pub async fn api_v1_custom_theme(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    form: web::Json<CustomThemeForm>,
) -> impl Responder {
    match save_custom_theme(repo.get_ref(), &ctx, form.into_inner()) {
        Ok(theme) => HttpResponse::Ok().json(theme),
        Err(err) => error_response(err, "save theme"),
    }
}

#[post("/v1/settings/theme/presets/{name}")]
pub async fn api_v1_theme_preset(
    name: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match apply_theme_preset(repo.get_ref(), &ctx, &name) {
        Ok(theme) => HttpResponse::Ok().json(theme),
        Err(err) => error_response(err, "apply theme preset"),
    }
}

#[get("/v1/settings/shipping")]
pub async fn api_v1_shipping(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match load_shipping_config(repo.get_ref(), &ctx) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(err) => error_response(err, "load shipping settings"),
    }
}

#[post("/v1/settings/shipping")]
pub async fn api_v1_save_shipping(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    form: web::Json<ShippingForm>,
) -> impl Responder {
    match save_shipping_config(repo.get_ref(), &ctx, form.into_inner()) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(err) => error_response(err, "save shipping settings"),
    }
}

#[get("/v1/settings/notifications")]
pub async fn api_v1_notifications(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
) -> impl Responder {
    match load_notification_settings(repo.get_ref(), &ctx) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "load notification settings"),
    }
}

#[post("/v1/settings/notifications")]
pub async fn api_v1_notification_credentials(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    form: web::Json<NotificationCredentialsForm>,
) -> impl Responder {
    match save_notification_credentials(repo.get_ref(), &ctx, form.into_inner()) {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(err) => error_response(err, "save notification credentials"),
    }
}

#[post("/v1/settings/notifications/auto-send")]
pub async fn api_v1_auto_send(
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    flags: web::Json<AutoSendFlags>,
) -> impl Responder {
    match save_auto_send(repo.get_ref(), &ctx, flags.into_inner()) {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(err) => error_response(err, "save auto-send flags"),
    }
}

#[post("/v1/settings/notifications/templates/{kind}")]
pub async fn api_v1_save_template(
    kind: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    composer: web::Data<MessageComposer>,
    form: web::Json<TemplateForm>,
) -> impl Responder {
    let result = template_kind(&kind).and_then(|kind| {
        save_template(
            repo.get_ref(),
            &ctx,
            composer.get_ref(),
            kind,
            form.into_inner(),
        )
    });
    match result {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(err) => error_response(err, "save template"),
    }
}

#[post("/v1/settings/notifications/templates/{kind}/preview")]
/// Renders the submitted wording, or the saved one when the body is empty.
pub async fn api_v1_preview_template(
    kind: web::Path<String>,
    ctx: AdminContext,
    repo: web::Data<InMemoryRepository>,
    composer: web::Data<MessageComposer>,
    form: Option<web::Json<TemplateForm>>,
) -> impl Responder {
    let form = form.map(web::Json::into_inner);
    let result = template_kind(&kind).and_then(|kind| {
        preview_template(repo.get_ref(), &ctx, composer.get_ref(), kind, form)
    });
    match result {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(err) => error_response(err, "preview template"),
    }
}
