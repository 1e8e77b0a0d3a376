#![allow(dead_code)]
//! Shared scaffolding for the engine's integration tests. Each test gets its own throwaway SQLite database.

use donation_payment_engine::{
    create_database_if_missing,
    db_types::Order,
    events::EventProducers,
    helpers::{ConfirmationVerifier, GatewayConfirmation},
    traits::DonationGatewayDatabase,
    DonationFlowApi,
    ReportingApi,
    SqliteDatabase,
};
use dpg_common::Secret;
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub const TEST_WEBHOOK_SECRET: &str = "dpg-test-webhook-secret";

pub fn random_db_path() -> String {
    let path = std::env::temp_dir().join(format!("dpg_test_store_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
    create_database_if_missing(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

pub fn test_verifier() -> ConfirmationVerifier {
    ConfirmationVerifier::new(Secret::new(TEST_WEBHOOK_SECRET.to_string())).expect("webhook secret should be usable")
}

/// A confirmation as the gateway would have issued it for this order.
pub fn signed_confirmation(order: &Order, payment_ref: &str) -> GatewayConfirmation {
    test_verifier().confirmation(&order.gateway_order_ref, payment_ref).expect("Error signing confirmation")
}

pub async fn new_database(url: &str) -> SqliteDatabase {
    prepare_test_env(url).await;
    let db = SqliteDatabase::new_with_url(url, 25).await.expect("Error creating database");
    db.run_migrations().await.expect("Error running DB migrations");
    db
}

pub async fn setup() -> (DonationFlowApi<SqliteDatabase>, ReportingApi<SqliteDatabase>) {
    let url = random_db_path();
    let db = new_database(&url).await;
    let api = DonationFlowApi::new(db.clone(), test_verifier(), EventProducers::default());
    let reports = ReportingApi::new(db);
    (api, reports)
}

pub async fn tear_down(mut api: DonationFlowApi<SqliteDatabase>) {
    let url = api.db().url().to_string();
    if let Err(e) = api.db_mut().close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    Sqlite::drop_database(&url).await.unwrap();
}
