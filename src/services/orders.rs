use serde::{Deserialize, Serialize};

use crate::domain::context::AdminContext;
use crate::domain::order::{Order, OrderComment, OrderStatus};
use crate::domain::permission::{Capabilities, Permission};
use crate::forms::orders::{OrderCommentForm, OrderStatusForm};
use crate::repository::{OrderReader, OrderWriter};
use crate::services::{ServiceError, ServiceResult, ensure};
use crate::view::{OrderViewSpec, derive_order_view};

pub const ORDER_PAGE_PERMISSIONS: [Permission; 3] = [
    Permission::ViewOrders,
    Permission::UpdateOrderStatus,
    Permission::DeleteOrder,
];

#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

impl OrdersQuery {
    pub fn to_view_spec(&self) -> ServiceResult<OrderViewSpec> {
        let mut spec = OrderViewSpec::new().search(self.search.as_deref().unwrap_or_default().trim());
        if let Some(status) = self.status.as_deref().filter(|value| !value.trim().is_empty()) {
            let status = status
                .parse::<OrderStatus>()
                .map_err(|err| ServiceError::Form(err.to_string()))?;
            spec = spec.status(status);
        }
        Ok(spec)
    }
}

#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub item_count: i64,
}

#[derive(Debug, Serialize)]
pub struct OrdersPageData {
    pub orders: Vec<OrderView>,
    pub total: usize,
    pub capabilities: Capabilities,
}

pub fn load_orders_page<R>(
    repo: &R,
    ctx: &AdminContext,
    query: &OrdersQuery,
) -> ServiceResult<OrdersPageData>
where
    R: OrderReader + ?Sized,
{
    ensure(ctx, Permission::ViewOrders)?;

    let spec = query.to_view_spec()?;
    let orders = repo.list_orders(&ctx.store_id).map_err(ServiceError::from)?;
    let total = orders.len();

    let orders = derive_order_view(&orders, &spec)
        .into_iter()
        .map(|order| OrderView {
            item_count: order.item_count(),
            order,
        })
        .collect();

    Ok(OrdersPageData {
        orders,
        total,
        capabilities: ctx.capabilities(&ORDER_PAGE_PERMISSIONS),
    })
}

pub fn change_order_status<R>(
    repo: &R,
    ctx: &AdminContext,
    order_id: &str,
    form: OrderStatusForm,
) -> ServiceResult<Order>
where
    R: OrderWriter + ?Sized,
{
    ensure(ctx, Permission::UpdateOrderStatus)?;

    let status = form
        .into_status()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_order_status(&ctx.store_id, order_id, status)
        .map_err(ServiceError::from)
}

/// Appends a note signed with the caller's display name.
pub fn add_order_comment<R>(
    repo: &R,
    ctx: &AdminContext,
    order_id: &str,
    form: OrderCommentForm,
) -> ServiceResult<Order>
where
    R: OrderWriter + ?Sized,
{
    ensure(ctx, Permission::UpdateOrderStatus)?;

    let text = form
        .into_text()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let comment = OrderComment::new(ctx.display_name(), text);

    repo.add_order_comment(&ctx.store_id, order_id, &comment)
        .map_err(ServiceError::from)
}

pub fn delete_order<R>(repo: &R, ctx: &AdminContext, order_id: &str) -> ServiceResult<()>
where
    R: OrderWriter + ?Sized,
{
    ensure(ctx, Permission::DeleteOrder)?;

    repo.delete_order(&ctx.store_id, order_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderLine;
    use crate::domain::role::Role;
    use crate::repository::mock::{MockOrderReader, MockOrderWriter};
    use crate::services::test_support::{STORE, ctx};

    fn orders() -> Vec<Order> {
        vec![
            Order {
                id: "o1".to_string(),
                customer_name: Some("Mona".to_string()),
                products: vec![
                    OrderLine {
                        name: "Chips".to_string(),
                        qty: 2,
                        price: 10.0,
                    },
                    OrderLine {
                        name: "Juice".to_string(),
                        qty: 1,
                        price: 7.0,
                    },
                ],
                ..Order::default()
            },
            Order {
                id: "o2".to_string(),
                status: OrderStatus::Completed,
                ..Order::default()
            },
        ]
    }

    #[test]
    fn read_only_cannot_view_orders() {
        let repo = MockOrderReader::new();
        let result = load_orders_page(&repo, &ctx(Some(Role::ReadOnly)), &OrdersQuery::default());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn page_filters_by_status() {
        let mut repo = MockOrderReader::new();
        repo.expect_list_orders()
            .times(1)
            .withf(|store_id| store_id == STORE)
            .returning(|_| Ok(orders()));

        let query = OrdersQuery {
            status: Some("pending".to_string()),
            search: None,
        };
        let page = load_orders_page(&repo, &ctx(Some(Role::Staff)), &query).expect("page should load");

        assert_eq!(page.total, 2);
        assert_eq!(page.orders.len(), 1);
        assert_eq!(page.orders[0].order.id, "o1");
        assert_eq!(page.orders[0].item_count, 3);
        assert_eq!(page.capabilities.get("delete_order"), Some(&false));
    }

    #[test]
    fn unknown_status_filter_is_rejected() {
        let query = OrdersQuery {
            status: Some("lost".to_string()),
            search: None,
        };
        assert!(matches!(query.to_view_spec(), Err(ServiceError::Form(_))));
    }

    #[test]
    fn staff_can_change_status() {
        let mut repo = MockOrderWriter::new();
        repo.expect_update_order_status()
            .times(1)
            .withf(|_, order_id, status| order_id == "o1" && *status == OrderStatus::Cancelled)
            .returning(|_, order_id, status| {
                Ok(Order {
                    id: order_id.to_string(),
                    status,
                    ..Order::default()
                })
            });

        let form = OrderStatusForm {
            status: "cancelled".to_string(),
        };
        let order = change_order_status(&repo, &ctx(Some(Role::Staff)), "o1", form)
            .expect("status change should succeed");
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[test]
    fn comment_is_signed_with_display_name() {
        let mut repo = MockOrderWriter::new();
        repo.expect_add_order_comment()
            .times(1)
            .withf(|_, _, comment| comment.user == "mona" && comment.text == "Call first")
            .returning(|_, _, comment| {
                Ok(Order {
                    comments: vec![comment.clone()],
                    ..Order::default()
                })
            });

        let form = OrderCommentForm {
            text: "  Call   first ".to_string(),
        };
        let order = add_order_comment(&repo, &ctx(Some(Role::Manager)), "o1", form)
            .expect("comment should be saved");
        assert_eq!(order.comments.len(), 1);
    }

    #[test]
    fn delete_order_is_admin_only() {
        let mut repo = MockOrderWriter::new();
        repo.expect_delete_order().times(0);
        assert!(matches!(
            delete_order(&repo, &ctx(Some(Role::Staff)), "o1"),
            Err(ServiceError::Unauthorized)
        ));
    }
}
