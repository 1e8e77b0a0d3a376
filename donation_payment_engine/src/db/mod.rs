//! Database backends for the donation payment engine.

#[cfg(feature = "sqlite")]
pub mod sqlite;
