//! Donation Payment Engine
//!
//! The donation payment engine carries a donation order through its full lifecycle: created as `pending`, then
//! settled exactly once as `success` (a verified gateway confirmation) or `failed` (a cancellation). This library
//! contains the core logic; it knows nothing about HTTP.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@db`]). SQLite is the only supported backend at present. You should
//!    never need to access the database directly. Instead, use the public API provided by the engine. The exception
//!    is the data types used in the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@dpe_api`]). [`DonationFlowApi`] drives the order lifecycle and holds the only
//!    code path that can move an order out of `pending`. [`ReportingApi`] provides the read-only views. Specific
//!    backends need to implement the traits in the [`traits`] module in order to act as a backend for the donation
//!    payment server.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted when certain actions
//! occur within the engine. For example, when a donation is confirmed, a `DonationReceivedEvent` is emitted. A
//! simple channel framework in [`events`] lets you hook into these events and perform custom actions.
mod db;
mod dpe_api;

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{create_database_if_missing, SqliteDatabase};
pub use dpe_api::{order_flow_api::DonationFlowApi, order_objects, reporting_api::ReportingApi};
