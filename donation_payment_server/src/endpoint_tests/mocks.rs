use donation_payment_engine::{
    db_types::{Order, OrderId},
    order_objects::{GlobalStats, OrderQueryFilter},
    traits::{OrderManagement, OrderQueryError},
};
use mockall::mock;

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderQueryError>;
        async fn fetch_order_by_gateway_ref(&self, gateway_order_ref: &str) -> Result<Option<Order>, OrderQueryError>;
        async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderQueryError>;
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderQueryError>;
        async fn fetch_global_stats(&self) -> Result<GlobalStats, OrderQueryError>;
    }
}
