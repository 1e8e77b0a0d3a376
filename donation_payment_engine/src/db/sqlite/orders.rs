use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{DonationStatus, NewOrder, Order, OrderId},
    order_objects::{GlobalStats, OrderQueryFilter},
    traits::DonationGatewayError,
};

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
///
/// Fails with [`DonationGatewayError::OrderAlreadyExists`] if an order with the same `order_id` is already stored.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, DonationGatewayError> {
    if let Some(existing) = fetch_order_by_order_id(&order.order_id, &mut *conn).await? {
        debug!("🗃️ Order [{}] already exists with id {}", existing.order_id, existing.id);
        return Err(DonationGatewayError::OrderAlreadyExists(existing.order_id));
    }
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_id,
                customer_id,
                amount,
                currency,
                gateway_order_ref,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.customer_id)
    .bind(order.amount.value())
    .bind(order.currency)
    .bind(order.gateway_order_ref)
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

/// Returns the entry in the orders table for the corresponding `order_id`
pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Returns the order that carries the given gateway reference, if any.
pub async fn fetch_order_by_gateway_ref(
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE gateway_order_ref = $1")
        .bind(reference)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Returns every order placed by the given customer, newest first.
pub async fn fetch_orders_for_customer(
    customer_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(customer_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`
///
/// Resulting orders are returned newest first.
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT * FROM orders
    "#,
    );
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(order_id) = query.order_id {
        where_clause.push("order_id = ");
        where_clause.push_bind_unseparated(order_id.as_str().to_string());
    }
    if let Some(cid) = query.customer_id {
        where_clause.push("customer_id = ");
        where_clause.push_bind_unseparated(cid);
    }
    if let Some(reference) = query.gateway_order_ref {
        where_clause.push("gateway_order_ref = ");
        where_clause.push_bind_unseparated(reference);
    }
    if query.status.as_ref().map(|s| !s.is_empty()).unwrap_or(false) {
        let mut statuses = vec![];
        query.status.as_ref().unwrap().iter().for_each(|s| {
            statuses.push(format!("'{s}'"));
        });
        let status_clause = statuses.join(",");
        where_clause.push(format!("status IN ({status_clause})"));
    }
    if let Some(since) = query.since {
        where_clause.push("created_at >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("created_at <= ");
        where_clause.push_bind_unseparated(until);
    }
    builder.push(" ORDER BY created_at DESC, id DESC");

    trace!("🗃️ Executing query: {}", builder.sql());
    let query = builder.build_query_as::<Order>();
    let orders = query.fetch_all(conn).await?;
    trace!("🗃️ Result of search_orders: {:?}", orders.len());
    Ok(orders)
}

/// Applies the single lifecycle transition an order can make: `pending` to one of the terminal states.
///
/// The update is conditional on the order still being `pending`, so two concurrent settlement attempts can never
/// both succeed. The winner receives the updated order; a loser receives `None` and should re-read the order to see
/// what it lost to. The payment reference, when given, is recorded in the same statement.
pub(crate) async fn settle_order(
    order_id: &OrderId,
    new_status: DonationStatus,
    payment_ref: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, DonationGatewayError> {
    if !new_status.is_terminal() {
        return Err(DonationGatewayError::InvalidStatusChange);
    }
    let updated = sqlx::query_as(
        r#"
            UPDATE orders
            SET status = $1, payment_ref = COALESCE($2, payment_ref), updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $3 AND status = 'pending'
            RETURNING *;
        "#,
    )
    .bind(new_status.to_string())
    .bind(payment_ref)
    .bind(order_id.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(updated)
}

/// Collects the donation roll-up counters in a single query.
pub async fn fetch_global_stats(conn: &mut SqliteConnection) -> Result<GlobalStats, sqlx::Error> {
    let stats = sqlx::query_as(
        r#"
            SELECT
                COUNT(DISTINCT customer_id) AS user_count,
                COALESCE(SUM(CASE WHEN status = 'success' THEN amount ELSE 0 END), 0) AS total_success_amount,
                COUNT(*) AS transaction_count
            FROM orders;
        "#,
    )
    .fetch_one(conn)
    .await?;
    Ok(stats)
}
