use std::fmt::Display;

use chrono::{DateTime, Utc};
use dpg_common::Paise;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    db_types::{DonationStatus, OrderId},
    traits::OrderQueryError,
};

/// Filter criteria for searching orders. An empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryFilter {
    pub order_id: Option<OrderId>,
    pub customer_id: Option<String>,
    pub gateway_order_ref: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub status: Option<Vec<DonationStatus>>,
}

impl OrderQueryFilter {
    pub fn with_order_id(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_customer_id(mut self, customer_id: String) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_gateway_order_ref(mut self, gateway_order_ref: String) -> Self {
        self.gateway_order_ref = Some(gateway_order_ref);
        self
    }

    pub fn with_status(mut self, status: DonationStatus) -> Self {
        self.status.get_or_insert_with(Vec::new).push(status);
        self
    }

    pub fn since<T>(mut self, since: T) -> Result<Self, OrderQueryError>
    where
        T: TryInto<DateTime<Utc>>,
        T::Error: Display,
    {
        let dt = since.try_into().map_err(|e| OrderQueryError::QueryError(e.to_string()))?;
        self.since = Some(dt);
        Ok(self)
    }

    pub fn until<T>(mut self, until: T) -> Result<Self, OrderQueryError>
    where
        T: TryInto<DateTime<Utc>>,
        T::Error: Display,
    {
        let dt = until.try_into().map_err(|e| OrderQueryError::QueryError(e.to_string()))?;
        self.until = Some(dt);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.order_id.is_none() &&
            self.customer_id.is_none() &&
            self.gateway_order_ref.is_none() &&
            self.status.is_none() &&
            self.since.is_none() &&
            self.until.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(order_id) = &self.order_id {
            write!(f, "order_id: {order_id}. ")?;
        }
        if let Some(customer_id) = &self.customer_id {
            write!(f, "customer_id: {customer_id}. ")?;
        }
        if let Some(gateway_order_ref) = &self.gateway_order_ref {
            write!(f, "gateway_order_ref: {gateway_order_ref}. ")?;
        }
        if let Some(statuses) = &self.status {
            let statuses = statuses.iter().map(|s| s.to_string()).collect::<Vec<String>>().join(", ");
            write!(f, "status in [{statuses}]. ")?;
        }
        if let Some(since) = &self.since {
            write!(f, "since: {since}. ")?;
        }
        if let Some(until) = &self.until {
            write!(f, "until: {until}. ")?;
        }
        Ok(())
    }
}

/// The admin dashboard's aggregate view over every order in the store.
///
/// `total_success_amount` counts successful donations only; pending and failed orders never contribute to it.
/// `transaction_count` counts all orders regardless of status, and `user_count` is the number of distinct donors.
/// The stats are recomputed from the order records on demand, so they cannot drift from the underlying data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub user_count: i64,
    pub total_success_amount: Paise,
    pub transaction_count: i64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn filters_know_when_they_are_empty() {
        assert!(OrderQueryFilter::default().is_empty());
        let q = OrderQueryFilter::default().with_customer_id("alice".into());
        assert!(!q.is_empty());
    }

    #[test]
    fn with_status_accumulates() {
        let q = OrderQueryFilter::default()
            .with_status(DonationStatus::Pending)
            .with_status(DonationStatus::Success);
        assert_eq!(q.status.as_deref(), Some([DonationStatus::Pending, DonationStatus::Success].as_slice()));
    }

    #[test]
    fn global_stats_serialize_in_dashboard_casing() {
        let stats =
            GlobalStats { user_count: 3, total_success_amount: Paise::from(50_000), transaction_count: 7 };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["userCount"], 3);
        assert_eq!(json["totalSuccessAmount"], 50_000);
        assert_eq!(json["transactionCount"], 7);
    }
}
