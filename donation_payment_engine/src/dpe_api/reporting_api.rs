//! Unified read-only API over the order store.

use std::fmt::Debug;

use log::trace;

use crate::{
    db_types::{Order, OrderId},
    order_objects::{GlobalStats, OrderQueryFilter},
    traits::{OrderManagement, OrderQueryError},
};

/// The `ReportingApi` serves the projections behind the user and admin dashboards. It never mutates anything.
pub struct ReportingApi<B> {
    db: B,
}

impl<B: Debug> Debug for ReportingApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReportingApi ({:?})", self.db)
    }
}

impl<B> ReportingApi<B>
where B: OrderManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches a single order by id. If no such order exists, `None` is returned.
    pub async fn order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderQueryError> {
        self.db.fetch_order_by_id(order_id).await
    }

    /// Correlates a gateway callback to an order via the reference we handed the gateway at creation time.
    pub async fn order_by_gateway_ref(&self, gateway_order_ref: &str) -> Result<Option<Order>, OrderQueryError> {
        self.db.fetch_order_by_gateway_ref(gateway_order_ref).await
    }

    /// The donation history for one customer: every order they created, all statuses, most recent first.
    pub async fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderQueryError> {
        let orders = self.db.fetch_orders_for_customer(customer_id).await?;
        trace!("Fetched {} orders for customer {customer_id}", orders.len());
        Ok(orders)
    }

    /// Admin search across all orders.
    pub async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderQueryError> {
        self.db.search_orders(query).await
    }

    /// The global aggregates for the admin dashboard, recomputed from the order records on every call.
    pub async fn global_stats(&self) -> Result<GlobalStats, OrderQueryError> {
        self.db.fetch_global_stats().await
    }
}
