use thiserror::Error;

use crate::{
    db_types::{DonationStatus, NewOrder, Order, OrderId},
    traits::{OrderManagement, OrderQueryError},
};

/// This trait defines the highest level of behaviour for backends supporting the donation payment gateway.
///
/// This behaviour includes:
/// * Persisting newly created donation orders.
/// * Applying the one guarded state transition an order may ever make: `pending` to a terminal status.
///
/// The read-side projections live in the [`OrderManagement`] supertrait.
#[allow(async_fn_in_trait)]
pub trait DonationGatewayDatabase: Clone + OrderManagement {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Stores a brand-new order in a single atomic transaction.
    ///
    /// The order must not exist yet; attempting to insert an order whose id is already present returns
    /// [`DonationGatewayError::OrderAlreadyExists`]. Returns the persisted record.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, DonationGatewayError>;

    /// Applies the `pending` → terminal transition for the given order, if and only if the order is still pending.
    ///
    /// The update is conditional on the current status, so two settlements racing on the same order have exactly
    /// one winner. Returns the updated record if this call won the transition, or `None` if the order was no longer
    /// pending (including the case where it never existed — callers distinguish the two by fetching the order).
    ///
    /// `new_status` must be terminal; `payment_ref` is recorded only when provided (the success path).
    async fn settle_order(
        &self,
        order_id: &OrderId,
        new_status: DonationStatus,
        payment_ref: Option<&str>,
    ) -> Result<Option<Order>, DonationGatewayError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), DonationGatewayError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum DonationGatewayError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("Donation amounts must be a positive number of paise")]
    InvalidAmount,
    #[error("Cannot insert order, since it already exists with id {0}")]
    OrderAlreadyExists(OrderId),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Only the customer who created an order may cancel it")]
    Forbidden,
    #[error("The gateway confirmation for order {0} could not be verified")]
    VerificationFailed(OrderId),
    #[error("Orders can only move from pending to a terminal status")]
    InvalidStatusChange,
    #[error("{0}")]
    QueryError(#[from] OrderQueryError),
}

impl From<sqlx::Error> for DonationGatewayError {
    fn from(e: sqlx::Error) -> Self {
        DonationGatewayError::DatabaseError(e.to_string())
    }
}
