use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::settings::{CUSTOM_THEME_NAME, ShippingConfig, ThemeSettings};
use crate::forms::{non_empty, sanitize_inline_text};

const FONT_MAX_LEN_VALIDATOR: u64 = 128;
const TEMPLATE_MAX_LEN_VALIDATOR: u64 = 1000;

/// Result type returned by the settings form helpers.
pub type SettingsFormResult<T> = Result<T, SettingsFormError>;

#[derive(Debug, Error)]
pub enum SettingsFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{field} must be a hex colour like #1a2b3c, got `{value}`")]
    InvalidColor { field: &'static str, value: String },
    #[error("font family cannot be empty")]
    EmptyFont,
    #[error("template cannot be empty")]
    EmptyTemplate,
}

fn normalize_hex(field: &'static str, raw: &str) -> SettingsFormResult<String> {
    let value = raw.trim();
    let digits = value.strip_prefix('#').unwrap_or_default();
    let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|ch| ch.is_ascii_hexdigit());
    if valid {
        Ok(value.to_ascii_lowercase())
    } else {
        Err(SettingsFormError::InvalidColor {
            field,
            value: value.to_string(),
        })
    }
}

/// Hand-tuned theme submitted from the appearance page.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomThemeForm {
    pub primary: String,
    pub success: String,
    pub warning: String,
    pub danger: String,
    /// Corner radius in pixels.
    #[validate(range(max = 50))]
    pub border_radius: u32,
    /// Background opacity as a percentage.
    #[validate(range(max = 100))]
    pub background_opacity: u32,
    #[validate(length(min = 1, max = FONT_MAX_LEN_VALIDATOR))]
    pub font_family: String,
}

impl CustomThemeForm {
    pub fn into_theme(self) -> SettingsFormResult<ThemeSettings> {
        self.validate()?;

        let font_family = sanitize_inline_text(&self.font_family);
        if font_family.is_empty() {
            return Err(SettingsFormError::EmptyFont);
        }

        Ok(ThemeSettings {
            name: CUSTOM_THEME_NAME.to_string(),
            primary: normalize_hex("primary", &self.primary)?,
            success: normalize_hex("success", &self.success)?,
            warning: normalize_hex("warning", &self.warning)?,
            danger: normalize_hex("danger", &self.danger)?,
            border_radius: format!("{}px", self.border_radius),
            background_opacity: format!("{}%", self.background_opacity),
            font_family,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ShippingForm {
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    pub enabled: bool,
}

impl ShippingForm {
    pub fn into_config(self) -> SettingsFormResult<ShippingConfig> {
        self.validate()?;
        Ok(ShippingConfig {
            price: self.price,
            enabled: self.enabled,
        })
    }
}

/// Messaging provider credentials. Blank values clear the stored ones.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCredentialsForm {
    #[validate(length(max = 32))]
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(length(max = 512))]
    #[serde(default)]
    pub api_token: Option<String>,
    #[validate(length(max = 64))]
    #[serde(default)]
    pub provider: Option<String>,
}

/// Cleaned credential values: phone, token, provider.
pub type NotificationCredentials = (Option<String>, Option<String>, Option<String>);

impl NotificationCredentialsForm {
    pub fn into_credentials(self) -> SettingsFormResult<NotificationCredentials> {
        self.validate()?;
        let phone = non_empty(self.phone).map(|phone| phone.replace(' ', ""));
        Ok((phone, non_empty(self.api_token), non_empty(self.provider)))
    }
}

/// Replacement wording for one message kind.
#[derive(Debug, Deserialize, Validate)]
pub struct TemplateForm {
    #[validate(length(min = 1, max = TEMPLATE_MAX_LEN_VALIDATOR))]
    pub body: String,
}

impl TemplateForm {
    pub fn into_body(self) -> SettingsFormResult<String> {
        self.validate()?;
        let body = self.body.trim().to_string();
        if body.is_empty() {
            return Err(SettingsFormError::EmptyTemplate);
        }
        Ok(body)
    }
}
