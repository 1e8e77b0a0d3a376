use thiserror::Error;

use crate::{
    db_types::{Order, OrderId},
    order_objects::{GlobalStats, OrderQueryFilter},
};

#[derive(Debug, Clone, Error)]
pub enum OrderQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User error constructing query: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for OrderQueryError {
    fn from(e: sqlx::Error) -> Self {
        OrderQueryError::DatabaseError(e.to_string())
    }
}

/// The `OrderManagement` trait defines the read-only behaviour of an order store.
///
/// Everything here is a pure projection over the persisted orders. Nothing is cached or denormalised, so the
/// results can never drift from the underlying records. The mutating counterpart is
/// [`DonationGatewayDatabase`](crate::traits::DonationGatewayDatabase).
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Fetches the order with the given id. If no such order exists, `None` is returned.
    async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderQueryError>;

    /// Fetches the order that was created with the given gateway reference, if any.
    async fn fetch_order_by_gateway_ref(&self, gateway_order_ref: &str) -> Result<Option<Order>, OrderQueryError>;

    /// Fetches every order the given customer has created, most recent first.
    async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderQueryError>;

    /// Fetches orders according to the criteria in the `OrderQueryFilter`, most recent first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderQueryError>;

    /// Computes the global donation statistics over all orders.
    async fn fetch_global_stats(&self) -> Result<GlobalStats, OrderQueryError>;
}
