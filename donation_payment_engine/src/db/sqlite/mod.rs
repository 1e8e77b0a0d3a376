//! # SQLite persistence for donation orders
//!
//! The "low-level" database interactions live in [`orders`]. They are plain functions that accept a
//! `&mut SqliteConnection`, so callers can run them against a pooled connection, or open a transaction and pass
//! `&mut *tx` when several writes must land atomically.
//!
//! [`SqliteDatabase`] wraps a connection pool and implements the engine's backend traits on top of those functions.
use std::env;

use log::info;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Error as SqlxError, Sqlite, SqlitePool};

pub mod orders;
mod sqlite_impl;

pub use sqlite_impl::SqliteDatabase;

const SQLITE_DB_URL: &str = "sqlite://data/dpg_store.db";

pub fn db_url() -> String {
    let result = env::var("DPG_DATABASE_URL").unwrap_or_else(|_| {
        info!("DPG_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}

/// Creates the database file if it does not exist yet. A no-op otherwise.
pub async fn create_database_if_missing(url: &str) -> Result<(), SqlxError> {
    if !Sqlite::database_exists(url).await.unwrap_or(false) {
        info!("Database {url} does not exist yet. Creating it now.");
        Sqlite::create_database(url).await?;
    }
    Ok(())
}
