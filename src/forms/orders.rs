use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::{OrderStatus, UnknownOrderStatus};
use crate::forms::sanitize_multiline_text;

const COMMENT_MAX_LEN_VALIDATOR: u64 = 2000;

#[derive(Debug, Error)]
pub enum OrderFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Status(#[from] UnknownOrderStatus),
    #[error("comment cannot be empty")]
    EmptyComment,
}

/// Status change requested from the order list.
#[derive(Debug, Deserialize)]
pub struct OrderStatusForm {
    pub status: String,
}

impl OrderStatusForm {
    pub fn into_status(self) -> Result<OrderStatus, OrderFormError> {
        Ok(self.status.parse::<OrderStatus>()?)
    }
}

/// Note added to an order.
#[derive(Debug, Deserialize, Validate)]
pub struct OrderCommentForm {
    #[validate(length(min = 1, max = COMMENT_MAX_LEN_VALIDATOR))]
    pub text: String,
}

impl OrderCommentForm {
    pub fn into_text(self) -> Result<String, OrderFormError> {
        self.validate()?;
        let text = sanitize_multiline_text(&self.text);
        if text.is_empty() {
            return Err(OrderFormError::EmptyComment);
        }
        Ok(text)
    }
}
