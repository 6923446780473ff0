//! Composition of customer and operator messages from saved templates.
//!
//! Templates use `{{variable}}` placeholders and are rendered with Tera.
//! Only bare placeholders naming one of [`TEMPLATE_VARIABLES`] are allowed;
//! tags, comments, filters and function calls are rejected before rendering.
//! Delivery belongs to the messaging provider; this module stops at the
//! rendered text.

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::domain::order::Order;
use crate::domain::product::{Product, StockStatus};
use crate::domain::settings::{NotificationSettings, TemplateKind};

/// Placeholders every template may reference.
pub const TEMPLATE_VARIABLES: [&str; 10] = [
    "customer_name",
    "order_id",
    "total_price",
    "store_name",
    "tracking_number",
    "tracking_link",
    "review_link",
    "product_name",
    "stock",
    "dashboard_link",
];

/// Errors raised while rendering a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,
    #[error("unsupported template markup `{0}`")]
    Unsupported(String),
    #[error("template cannot be rendered: {0}")]
    Render(#[from] tera::Error),
}

/// Rendered message ready to hand to a messaging provider.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub kind: TemplateKind,
    /// Phone number the message is addressed to, when known.
    pub recipient: Option<String>,
    pub body: String,
}

/// Renders templates with store-wide values filled in.
#[derive(Debug, Clone)]
pub struct MessageComposer {
    store_name: String,
    dashboard_link: String,
}

impl MessageComposer {
    pub fn new(store_name: impl Into<String>, dashboard_link: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            dashboard_link: dashboard_link.into(),
        }
    }

    /// Context with every known variable set to an empty string except the
    /// store-wide ones.
    fn base_context(&self) -> Context {
        let mut context = Context::new();
        for variable in TEMPLATE_VARIABLES {
            context.insert(variable, "");
        }
        context.insert("store_name", &self.store_name);
        context.insert("dashboard_link", &self.dashboard_link);
        context
    }

    fn sample_context(&self) -> Context {
        let mut context = self.base_context();
        context.insert("customer_name", "أحمد محمد");
        context.insert("order_id", "12345");
        context.insert("total_price", "250.00");
        context.insert("tracking_number", "TRK123456");
        context.insert("tracking_link", "https://track.example.com/123456");
        context.insert("review_link", "https://store.example.com/review");
        context.insert("product_name", "شيبسي ليز");
        context.insert("stock", "5");
        context
    }

    fn render(template: &str, context: &Context) -> Result<String, TemplateError> {
        if template.trim().is_empty() {
            return Err(TemplateError::Empty);
        }
        check_placeholders(template)?;
        Ok(Tera::one_off(template, context, false)?)
    }

    /// Render `template` against sample values, as shown before saving.
    ///
    /// A template that previews successfully only references known variables
    /// and therefore renders for any order or product.
    pub fn preview(&self, template: &str) -> Result<String, TemplateError> {
        Self::render(template, &self.sample_context())
    }

    /// Order confirmation for `order`, or `None` when auto-sending is off.
    pub fn order_confirmation(
        &self,
        settings: &NotificationSettings,
        order: &Order,
    ) -> Result<Option<OutgoingMessage>, TemplateError> {
        let kind = TemplateKind::OrderConfirmation;
        if !settings.auto_send.is_enabled(kind) {
            return Ok(None);
        }

        let mut context = self.base_context();
        context.insert(
            "customer_name",
            order.customer_name.as_deref().unwrap_or_default(),
        );
        context.insert("order_id", &order.id);
        context.insert("total_price", &format!("{:.2}", order.total_price));

        let body = Self::render(settings.template(kind), &context)?;
        Ok(Some(OutgoingMessage {
            kind,
            recipient: order.customer_phone.clone(),
            body,
        }))
    }

    /// Operator alerts for every product at or below its reorder threshold.
    /// Empty when low-stock alerts are switched off.
    pub fn low_stock_alerts(
        &self,
        settings: &NotificationSettings,
        products: &[Product],
    ) -> Result<Vec<OutgoingMessage>, TemplateError> {
        let kind = TemplateKind::LowStockAlert;
        if !settings.auto_send.is_enabled(kind) {
            return Ok(Vec::new());
        }

        let template = settings.template(kind);
        products
            .iter()
            .filter(|product| product.stock_status() != StockStatus::Ok)
            .map(|product| {
                let mut context = self.base_context();
                context.insert("product_name", &product.name);
                context.insert("stock", &product.stock().to_string());
                Self::render(template, &context).map(|body| OutgoingMessage {
                    kind,
                    recipient: settings.phone.clone(),
                    body,
                })
            })
            .collect()
    }
}

/// Accept only `{{ name }}` blocks where `name` is a known variable.
fn check_placeholders(template: &str) -> Result<(), TemplateError> {
    for marker in ["{%", "{#"] {
        if template.contains(marker) {
            return Err(TemplateError::Unsupported(marker.to_string()));
        }
    }

    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            return Err(TemplateError::Unsupported(rest[start..].to_string()));
        };
        let name = after[..end].trim();
        if !TEMPLATE_VARIABLES.contains(&name) {
            return Err(TemplateError::Unsupported(format!("{{{{{}}}}}", &after[..end])));
        }
        rest = &after[end + 2..];
    }
    Ok(())
}
