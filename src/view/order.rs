use crate::domain::order::{Order, OrderStatus};

/// Filter options for the order list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderViewSpec {
    pub status: Option<OrderStatus>,
    /// Case-insensitive substring matched against the order id and customer name.
    pub search_term: String,
}

impl OrderViewSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        let status_matches = self.status.is_none_or(|status| order.status == status);
        if !status_matches {
            return false;
        }
        if self.search_term.is_empty() {
            return true;
        }

        let needle = self.search_term.to_lowercase();
        order.id.to_lowercase().contains(&needle)
            || order
                .customer_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
    }
}

/// Apply `spec` to `orders`, keeping the input order of the survivors.
pub fn derive_order_view(orders: &[Order], spec: &OrderViewSpec) -> Vec<Order> {
    orders
        .iter()
        .filter(|order| spec.matches(order))
        .cloned()
        .collect()
}
