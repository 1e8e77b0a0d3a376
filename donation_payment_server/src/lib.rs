//! # Donation payment server
//! This crate hosts the HTTP adapter for the donation payment gateway. It is responsible for:
//! * Reading the trusted identity headers injected by the upstream auth proxy and enforcing role checks.
//! * Translating the JSON wire format of the donation client into engine calls.
//! * Relaying gateway payment confirmations into the order lifecycle, where their signatures are verified.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/donations/*`: Creating, verifying and abandoning donation orders, plus the caller's donation history.
//! * `/api/admin/stats`: Aggregate totals for the admin dashboard.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
