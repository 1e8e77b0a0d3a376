use serde::{Deserialize, Serialize};

use crate::db_types::{DonationStatus, Order};

/// Fired after a new order has been persisted in the `pending` state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub order: Order,
}

impl OrderCreatedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Fired exactly once per order, when a verified gateway confirmation settles it as `success`.
///
/// Because the settlement itself is guarded against replays and races, subscribers may treat one event as one
/// counted donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationReceivedEvent {
    pub order: Order,
}

impl DonationReceivedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Fired when a pending order is settled as `failed` (owner cancellation or gateway dismissal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAnnulledEvent {
    pub order: Order,
    pub status: DonationStatus,
}

impl OrderAnnulledEvent {
    pub fn new(order: Order) -> Self {
        let status = order.status;
        Self { order, status }
    }
}
