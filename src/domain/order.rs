use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::lenient;

/// Possible lifecycle states of a storefront order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed and awaits handling.
    #[default]
    Pending,
    /// Order has been delivered.
    Completed,
    /// Order has been cancelled and should not be processed further.
    Cancelled,
}

/// Raised when a status name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status `{0}`")]
pub struct UnknownOrderStatus(pub String);

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored statuses outside the known set are read as pending so the order
/// still surfaces for handling.
fn lenient_status<'de, D>(deserializer: D) -> Result<OrderStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => raw.parse().unwrap_or_default(),
        _ => OrderStatus::default(),
    })
}

/// Product line captured on an order at checkout.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OrderLine {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub qty: i64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub price: f64,
}

impl OrderLine {
    pub fn subtotal(&self) -> f64 {
        self.qty as f64 * self.price
    }
}

/// Note left on an order by a dashboard user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OrderComment {
    #[serde(default, deserialize_with = "lenient::text")]
    pub user: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::optional_timestamp")]
    pub date: Option<DateTime<Utc>>,
}

impl OrderComment {
    /// Build a comment stamped with the current time.
    pub fn new(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            text: text.into(),
            date: Some(Utc::now()),
        }
    }
}

/// Order document as stored by the storefront.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Order {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_price: f64,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub products: Vec<OrderLine>,
    #[serde(default)]
    pub comments: Vec<OrderComment>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total number of units across all lines.
    pub fn item_count(&self) -> i64 {
        self.products.iter().map(|line| line.qty.max(0)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_status_reads_as_pending() {
        let raw = json!({"id": "o1", "status": "shipped", "total_price": "99.5"});
        let order: Order = match serde_json::from_value(raw) {
            Ok(order) => order,
            Err(err) => panic!("decode failed: {err}"),
        };
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_price, 99.5);
    }

    #[test]
    fn lines_and_comments_keep_their_order() {
        let raw = json!({
            "id": "o2",
            "status": "completed",
            "products": [
                {"name": "Chips", "qty": 2, "price": 10},
                {"name": "Juice", "qty": "1", "price": "7.5"}
            ],
            "comments": [
                {"user": "sara", "text": "called customer"},
                {"user": "omar", "text": "shipped"}
            ]
        });
        let order: Order = match serde_json::from_value(raw) {
            Ok(order) => order,
            Err(err) => panic!("decode failed: {err}"),
        };

        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.products[1].subtotal(), 7.5);
        assert_eq!(order.comments[0].user, "sara");
        assert_eq!(order.comments[1].text, "shipped");
    }

    #[test]
    fn status_parsing_rejects_unknown_names() {
        assert_eq!("cancelled".parse::<OrderStatus>(), Ok(OrderStatus::Cancelled));
        assert!("refunded".parse::<OrderStatus>().is_err());
    }
}
