use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::lenient;

/// Visual theme applied to the dashboard.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    /// Preset name, or `custom` for a hand-tuned theme.
    pub name: String,
    pub primary: String,
    pub success: String,
    pub warning: String,
    pub danger: String,
    /// CSS length, e.g. `8px`.
    pub border_radius: String,
    /// CSS percentage, e.g. `20%`.
    pub background_opacity: String,
    pub font_family: String,
}

/// Name stored for themes built from individual values.
pub const CUSTOM_THEME_NAME: &str = "custom";

fn preset(
    name: &str,
    colors: [&str; 4],
    border_radius: &str,
    background_opacity: &str,
    font_family: &str,
) -> ThemeSettings {
    let [primary, success, warning, danger] = colors;
    ThemeSettings {
        name: name.to_string(),
        primary: primary.to_string(),
        success: success.to_string(),
        warning: warning.to_string(),
        danger: danger.to_string(),
        border_radius: border_radius.to_string(),
        background_opacity: background_opacity.to_string(),
        font_family: font_family.to_string(),
    }
}

lazy_static! {
    static ref THEME_PRESETS: BTreeMap<&'static str, ThemeSettings> = {
        let mut presets = BTreeMap::new();
        presets.insert(
            "modern",
            preset(
                "modern",
                ["#6366f1", "#10b981", "#f59e0b", "#ef4444"],
                "8px",
                "20%",
                "'Inter', sans-serif",
            ),
        );
        presets.insert(
            "classic",
            preset(
                "classic",
                ["#1f2937", "#10b981", "#f59e0b", "#dc2626"],
                "4px",
                "30%",
                "'Cairo', sans-serif",
            ),
        );
        presets.insert(
            "minimal",
            preset(
                "minimal",
                ["#000000", "#10b981", "#f59e0b", "#ef4444"],
                "0px",
                "10%",
                "'Roboto', sans-serif",
            ),
        );
        presets.insert(
            "ocean",
            preset(
                "ocean",
                ["#0ea5e9", "#06b6d4", "#f59e0b", "#ef4444"],
                "12px",
                "25%",
                "'Inter', sans-serif",
            ),
        );
        presets
    };
}

impl ThemeSettings {
    /// Look up one of the shipped presets by name.
    pub fn preset(name: &str) -> Option<ThemeSettings> {
        THEME_PRESETS.get(name).cloned()
    }

    /// Names of all shipped presets.
    pub fn preset_names() -> Vec<&'static str> {
        THEME_PRESETS.keys().copied().collect()
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        preset(
            "modern",
            ["#6366f1", "#10b981", "#f59e0b", "#ef4444"],
            "8px",
            "20%",
            "'Inter', sans-serif",
        )
    }
}

/// Flat-rate shipping configuration.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct ShippingConfig {
    #[serde(default, deserialize_with = "lenient::amount")]
    pub price: f64,
    #[serde(default)]
    pub enabled: bool,
}

/// Kinds of customer and operator messages that can be templated.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    OrderConfirmation,
    ShippingUpdate,
    DeliveryConfirmation,
    LowStockAlert,
}

/// Raised when a template kind name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown template kind `{0}`")]
pub struct UnknownTemplateKind(pub String);

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::OrderConfirmation,
        TemplateKind::ShippingUpdate,
        TemplateKind::DeliveryConfirmation,
        TemplateKind::LowStockAlert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::OrderConfirmation => "order_confirmation",
            TemplateKind::ShippingUpdate => "shipping_update",
            TemplateKind::DeliveryConfirmation => "delivery_confirmation",
            TemplateKind::LowStockAlert => "low_stock_alert",
        }
    }

    /// Message used until the store saves its own wording.
    pub fn default_template(self) -> &'static str {
        match self {
            TemplateKind::OrderConfirmation => "تم استلام طلبك #{{order_id}}",
            TemplateKind::ShippingUpdate => {
                "مرحباً {{customer_name}}، تم شحن طلبك #{{order_id}}. رقم التتبع: {{tracking_number}} {{tracking_link}}"
            }
            TemplateKind::DeliveryConfirmation => {
                "تم توصيل طلبك #{{order_id}} من {{store_name}}. شاركنا رأيك: {{review_link}}"
            }
            TemplateKind::LowStockAlert => {
                "تنبيه: المنتج {{product_name}} أوشك على النفاد (المتبقي {{stock}}). {{dashboard_link}}"
            }
        }
    }
}

impl FromStr for TemplateKind {
    type Err = UnknownTemplateKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TemplateKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownTemplateKind(value.to_string()))
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn enabled_by_default() -> bool {
    true
}

/// Which messages are sent automatically.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AutoSendFlags {
    #[serde(default = "enabled_by_default")]
    pub auto_order_confirmation: bool,
    #[serde(default = "enabled_by_default")]
    pub auto_shipping_update: bool,
    #[serde(default = "enabled_by_default")]
    pub auto_delivery_confirmation: bool,
    #[serde(default)]
    pub auto_low_stock_alert: bool,
}

impl Default for AutoSendFlags {
    fn default() -> Self {
        Self {
            auto_order_confirmation: true,
            auto_shipping_update: true,
            auto_delivery_confirmation: true,
            auto_low_stock_alert: false,
        }
    }
}

impl AutoSendFlags {
    pub fn is_enabled(&self, kind: TemplateKind) -> bool {
        match kind {
            TemplateKind::OrderConfirmation => self.auto_order_confirmation,
            TemplateKind::ShippingUpdate => self.auto_shipping_update,
            TemplateKind::DeliveryConfirmation => self.auto_delivery_confirmation,
            TemplateKind::LowStockAlert => self.auto_low_stock_alert,
        }
    }
}

/// Messaging provider credentials, auto-send preferences and templates.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(flatten)]
    pub auto_send: AutoSendFlags,
    #[serde(default)]
    pub templates: BTreeMap<TemplateKind, String>,
}

impl NotificationSettings {
    /// Credentials are complete enough to attempt delivery.
    pub fn is_connected(&self) -> bool {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
        };
        present(&self.phone) && present(&self.api_token)
    }

    /// Saved template for `kind`, or the built-in wording.
    pub fn template(&self, kind: TemplateKind) -> &str {
        self.templates
            .get(&kind)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| kind.default_template())
    }
}
