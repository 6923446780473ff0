use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::domain::context::AdminContext;
use crate::domain::permission::Permission;
use crate::domain::settings::{
    AutoSendFlags, NotificationSettings, ShippingConfig, TemplateKind, ThemeSettings,
};
use crate::forms::settings::{
    CustomThemeForm, NotificationCredentialsForm, ShippingForm, TemplateForm,
};
use crate::notify::{MessageComposer, OutgoingMessage};
use crate::repository::{
    ActivityWriter, OrderReader, ProductReader, SettingsReader, SettingsWriter,
};
use crate::services::{ServiceError, ServiceResult, ensure, record_activity};

const ACTION_THEME: &str = "تغيير المظهر";
const ACTION_SHIPPING: &str = "تعديل إعدادات الشحن";
const ACTION_NOTIFICATIONS: &str = "تعديل إعدادات الإشعارات";

#[derive(Debug, Serialize)]
pub struct ThemePageData {
    pub theme: ThemeSettings,
    pub presets: Vec<&'static str>,
    pub can_edit: bool,
}

/// Current theme; any signed-in role may read it to style the dashboard.
pub fn load_theme<R>(repo: &R, ctx: &AdminContext) -> ServiceResult<ThemePageData>
where
    R: SettingsReader + ?Sized,
{
    let theme = repo
        .get_theme(&ctx.store_id)
        .map_err(ServiceError::from)?
        .unwrap_or_default();

    Ok(ThemePageData {
        theme,
        presets: ThemeSettings::preset_names(),
        can_edit: ctx.can(Permission::ManageSettings),
    })
}

pub fn apply_theme_preset<R>(
    repo: &R,
    ctx: &AdminContext,
    name: &str,
) -> ServiceResult<ThemeSettings>
where
    R: SettingsWriter + ActivityWriter + ?Sized,
{
    ensure(ctx, Permission::ManageSettings)?;

    let theme = ThemeSettings::preset(name).ok_or(ServiceError::NotFound)?;
    repo.save_theme(&ctx.store_id, &theme)
        .map_err(ServiceError::from)?;

    record_activity(repo, ctx, ACTION_THEME, json!({ "theme": theme.name }));
    Ok(theme)
}

pub fn save_custom_theme<R>(
    repo: &R,
    ctx: &AdminContext,
    form: CustomThemeForm,
) -> ServiceResult<ThemeSettings>
where
    R: SettingsWriter + ActivityWriter + ?Sized,
{
    ensure(ctx, Permission::ManageSettings)?;

    let theme = form
        .into_theme()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    repo.save_theme(&ctx.store_id, &theme)
        .map_err(ServiceError::from)?;

    record_activity(repo, ctx, ACTION_THEME, json!({ "theme": theme.name }));
    Ok(theme)
}

/// Shipping configuration, defaulting to free and disabled.
pub fn load_shipping_config<R>(repo: &R, ctx: &AdminContext) -> ServiceResult<ShippingConfig>
where
    R: SettingsReader + ?Sized,
{
    Ok(repo
        .get_shipping_config(&ctx.store_id)
        .map_err(ServiceError::from)?
        .unwrap_or_default())
}

pub fn save_shipping_config<R>(
    repo: &R,
    ctx: &AdminContext,
    form: ShippingForm,
) -> ServiceResult<ShippingConfig>
where
    R: SettingsWriter + ActivityWriter + ?Sized,
{
    ensure(ctx, Permission::ManageSettings)?;

    let config = form
        .into_config()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    repo.save_shipping_config(&ctx.store_id, &config)
        .map_err(ServiceError::from)?;

    record_activity(
        repo,
        ctx,
        ACTION_SHIPPING,
        json!({ "price": config.price, "enabled": config.enabled }),
    );
    Ok(config)
}

#[derive(Debug, Serialize)]
pub struct NotificationsPageData {
    pub settings: NotificationSettings,
    pub connected: bool,
    /// Effective wording per kind, saved or built-in.
    pub templates: BTreeMap<TemplateKind, String>,
}

fn current_notifications<R>(repo: &R, ctx: &AdminContext) -> ServiceResult<NotificationSettings>
where
    R: SettingsReader + ?Sized,
{
    Ok(repo
        .get_notification_settings(&ctx.store_id)
        .map_err(ServiceError::from)?
        .unwrap_or_default())
}

pub fn load_notification_settings<R>(
    repo: &R,
    ctx: &AdminContext,
) -> ServiceResult<NotificationsPageData>
where
    R: SettingsReader + ?Sized,
{
    ensure(ctx, Permission::ManageSettings)?;

    let settings = current_notifications(repo, ctx)?;
    let templates = TemplateKind::ALL
        .into_iter()
        .map(|kind| (kind, settings.template(kind).to_string()))
        .collect();

    Ok(NotificationsPageData {
        connected: settings.is_connected(),
        templates,
        settings,
    })
}

fn store_notifications<R>(
    repo: &R,
    ctx: &AdminContext,
    settings: NotificationSettings,
    details: serde_json::Value,
) -> ServiceResult<NotificationSettings>
where
    R: SettingsWriter + ActivityWriter + ?Sized,
{
    repo.save_notification_settings(&ctx.store_id, &settings)
        .map_err(ServiceError::from)?;
    record_activity(repo, ctx, ACTION_NOTIFICATIONS, details);
    Ok(settings)
}

pub fn save_notification_credentials<R>(
    repo: &R,
    ctx: &AdminContext,
    form: NotificationCredentialsForm,
) -> ServiceResult<NotificationSettings>
where
    R: SettingsReader + SettingsWriter + ActivityWriter + ?Sized,
{
    ensure(ctx, Permission::ManageSettings)?;

    let (phone, api_token, provider) = form
        .into_credentials()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let mut settings = current_notifications(repo, ctx)?;
    settings.phone = phone;
    settings.api_token = api_token;
    settings.provider = provider;

    store_notifications(repo, ctx, settings, json!({ "section": "credentials" }))
}

pub fn save_auto_send<R>(
    repo: &R,
    ctx: &AdminContext,
    flags: AutoSendFlags,
) -> ServiceResult<NotificationSettings>
where
    R: SettingsReader + SettingsWriter + ActivityWriter + ?Sized,
{
    ensure(ctx, Permission::ManageSettings)?;

    let mut settings = current_notifications(repo, ctx)?;
    settings.auto_send = flags;

    store_notifications(repo, ctx, settings, json!({ "section": "auto_send" }))
}

/// Saves the wording for `kind` once it renders against the sample values.
pub fn save_template<R>(
    repo: &R,
    ctx: &AdminContext,
    composer: &MessageComposer,
    kind: TemplateKind,
    form: TemplateForm,
) -> ServiceResult<NotificationSettings>
where
    R: SettingsReader + SettingsWriter + ActivityWriter + ?Sized,
{
    ensure(ctx, Permission::ManageSettings)?;

    let body = form
        .into_body()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    composer
        .preview(&body)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let mut settings = current_notifications(repo, ctx)?;
    settings.templates.insert(kind, body);

    store_notifications(repo, ctx, settings, json!({ "template": kind.as_str() }))
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TemplatePreview {
    pub kind: TemplateKind,
    pub template: String,
    pub rendered: String,
}

/// Renders the saved (or submitted) wording for `kind` against sample values.
pub fn preview_template<R>(
    repo: &R,
    ctx: &AdminContext,
    composer: &MessageComposer,
    kind: TemplateKind,
    form: Option<TemplateForm>,
) -> ServiceResult<TemplatePreview>
where
    R: SettingsReader + ?Sized,
{
    ensure(ctx, Permission::ManageSettings)?;

    let template = match form {
        Some(form) => form
            .into_body()
            .map_err(|err| ServiceError::Form(err.to_string()))?,
        None => current_notifications(repo, ctx)?.template(kind).to_string(),
    };
    let rendered = composer
        .preview(&template)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(TemplatePreview {
        kind,
        template,
        rendered,
    })
}

/// Order confirmation that would be sent for `order_id`, if auto-sending is on.
pub fn compose_order_confirmation<R>(
    repo: &R,
    ctx: &AdminContext,
    composer: &MessageComposer,
    order_id: &str,
) -> ServiceResult<Option<OutgoingMessage>>
where
    R: SettingsReader + OrderReader + ?Sized,
{
    ensure(ctx, Permission::UpdateOrderStatus)?;

    let order = repo
        .get_order_by_id(&ctx.store_id, order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    let settings = current_notifications(repo, ctx)?;

    composer
        .order_confirmation(&settings, &order)
        .map_err(|err| ServiceError::Internal(err.to_string()))
}

/// Low-stock alerts for the current catalogue.
pub fn compose_low_stock_alerts<R>(
    repo: &R,
    ctx: &AdminContext,
    composer: &MessageComposer,
) -> ServiceResult<Vec<OutgoingMessage>>
where
    R: SettingsReader + ProductReader + ?Sized,
{
    ensure(ctx, Permission::ViewProducts)?;

    let products = repo
        .list_products(&ctx.store_id)
        .map_err(ServiceError::from)?;
    let settings = current_notifications(repo, ctx)?;

    composer
        .low_stock_alerts(&settings, &products)
        .map_err(|err| ServiceError::Internal(err.to_string()))
}
