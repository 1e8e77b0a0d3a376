use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use donation_payment_engine::{
    create_database_if_missing,
    events::{EventHandlers, EventHooks, EventProducers, EVENT_BUFFER_SIZE},
    helpers::ConfirmationVerifier,
    DonationFlowApi,
    ReportingApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::{GatewayInfo, ServerConfig},
    errors::ServerError,
    routes::{
        health,
        AllDonationsRoute,
        CreateOrderRoute,
        DonationStatsRoute,
        FailDonationRoute,
        GatewayKeyRoute,
        MyDonationsRoute,
        VerifyDonationRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    create_database_if_missing(&config.database_url)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let verifier = ConfirmationVerifier::new(config.gateway.webhook_secret.clone())
        .map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    let producers = if config.emit_receipts { start_event_handlers() } else { EventProducers::default() };
    let gateway_info = GatewayInfo::from_config(&config);
    let srv = HttpServer::new(move || {
        let flow_api = DonationFlowApi::new(db.clone(), verifier.clone(), producers.clone());
        let reports_api = ReportingApi::new(db.clone());
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            debug!("💻️ Could not deserialize payload. {err}");
            ServerError::CouldNotDeserializePayload.into()
        });
        let query_config = web::QueryConfig::default().error_handler(|err, _req| {
            debug!("💻️ Could not parse query string. {err}");
            ServerError::InvalidRequestPath(err.to_string()).into()
        });
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("dps::access_log"))
            .app_data(json_config)
            .app_data(query_config)
            .app_data(web::Data::new(flow_api))
            .app_data(web::Data::new(reports_api))
            .app_data(web::Data::new(gateway_info.clone()));
        let api_scope = web::scope("/api")
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(VerifyDonationRoute::<SqliteDatabase>::new())
            .service(FailDonationRoute::<SqliteDatabase>::new())
            .service(MyDonationsRoute::<SqliteDatabase>::new())
            .service(AllDonationsRoute::<SqliteDatabase>::new())
            .service(DonationStatsRoute::<SqliteDatabase>::new())
            .service(GatewayKeyRoute::new());
        app.service(health).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Attaches the deployment's default lifecycle hooks: a receipt line in the log for every settled donation.
fn start_event_handlers() -> EventProducers {
    let hooks = EventHooks::default()
        .on_donation_received(|ev| {
            info!(
                "📬️ Donation received. {} gave {} (payment ref {}).",
                ev.order.customer_id,
                ev.order.amount,
                ev.order.payment_ref.as_deref().unwrap_or("-")
            );
            Box::pin(async {})
        })
        .on_order_annulled(|ev| {
            info!("📬️ Order {} was annulled before payment.", ev.order.order_id);
            Box::pin(async {})
        });
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, hooks);
    let producers = handlers.producers();
    handlers.start_handlers();
    producers
}
