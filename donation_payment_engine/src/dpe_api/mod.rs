//! The public-facing API of the donation payment engine.
//!
//! [`order_flow_api::DonationFlowApi`] drives the order lifecycle (create, confirm, cancel) and is the only way to
//! change an order's state. [`reporting_api::ReportingApi`] serves the read-only projections that back the user and
//! admin dashboards. Both are generic over the storage traits so that servers and tests can choose their backend.

pub mod order_flow_api;
pub mod order_objects;
pub mod reporting_api;
