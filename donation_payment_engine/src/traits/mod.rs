//! The behaviour contracts a storage backend must satisfy to drive the donation gateway.
//!
//! [`OrderManagement`] covers the read-only projections (history, search, stats), while
//! [`DonationGatewayDatabase`] adds the guarded writes of the order lifecycle. All status changes go through
//! [`DonationGatewayDatabase::settle_order`]; no other code path may touch the `status` field.

mod donation_gateway_database;
mod order_management;

pub use donation_gateway_database::{DonationGatewayDatabase, DonationGatewayError};
pub use order_management::{OrderManagement, OrderQueryError};
