//! `SqliteDatabase` is a concrete implementation of a donation payment engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{db_url, new_pool, orders};
use crate::{
    db_types::{DonationStatus, NewOrder, Order, OrderId},
    order_objects::{GlobalStats, OrderQueryFilter},
    traits::{DonationGatewayDatabase, DonationGatewayError, OrderManagement, OrderQueryError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl DonationGatewayDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, DonationGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::insert_order(order, &mut conn).await?;
        debug!("🗃️ Order [{}] has been saved in the DB with id {}", order.order_id, order.id);
        Ok(order)
    }

    async fn settle_order(
        &self,
        order_id: &OrderId,
        new_status: DonationStatus,
        payment_ref: Option<&str>,
    ) -> Result<Option<Order>, DonationGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let updated = orders::settle_order(order_id, new_status, payment_ref, &mut conn).await?;
        match &updated {
            Some(order) => debug!("🗃️ Order [{}] settled as {}", order.order_id, order.status),
            None => trace!("🗃️ Order [{order_id}] was not pending. Nothing was changed."),
        }
        Ok(updated)
    }

    async fn close(&mut self) -> Result<(), DonationGatewayError> {
        self.pool.close().await;
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderQueryError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_gateway_ref(&self, reference: &str) -> Result<Option<Order>, OrderQueryError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_gateway_ref(reference, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderQueryError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_customer(customer_id, &mut conn).await?;
        Ok(orders)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderQueryError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders(query, &mut conn).await?;
        Ok(orders)
    }

    async fn fetch_global_stats(&self) -> Result<GlobalStats, OrderQueryError> {
        let mut conn = self.pool.acquire().await?;
        let stats = orders::fetch_global_stats(&mut conn).await?;
        Ok(stats)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the url from `DPG_DATABASE_URL`, or the default store location.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies any outstanding schema migrations.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete");
        Ok(())
    }
}
