//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use actix_web::{get, web, HttpResponse, Responder};
use donation_payment_engine::{
    db_types::{DonationStatus, Role},
    order_objects::OrderQueryFilter,
    traits::{DonationGatewayDatabase, OrderManagement},
    DonationFlowApi,
    ReportingApi,
};
use log::*;
use serde_json::json;

use crate::{
    auth::AuthClaims,
    config::GatewayInfo,
    data_objects::{
        AnnulDonationRequest,
        DonationSearchParams,
        NewDonationRequest,
        NewDonationResponse,
        SettlementResponse,
        VerifyDonationRequest,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires [$($roles:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $bounds:path where requires [$($roles:expr),+])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bounds + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/donations/create-order" impl DonationGatewayDatabase where requires [Role::User]);
/// Route handler for creating a new donation order.
///
/// The authenticated caller pledges `amount` paise. A new pending order is stored and the response carries the
/// gateway order reference the client needs to open the checkout widget, along with our own donation id that the
/// subsequent verify or fail call must echo back.
pub async fn create_order<B: DonationGatewayDatabase>(
    claims: AuthClaims,
    api: web::Data<DonationFlowApi<B>>,
    body: web::Json<NewDonationRequest>,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    debug!("💻️ POST create_order for {} ({})", claims.user_id, params.amount);
    let order = api.create_order(&claims.user_id, params.amount).await?;
    Ok(HttpResponse::Created().json(NewDonationResponse::from(order)))
}

route!(verify_donation => Post "/donations/verify" impl DonationGatewayDatabase where requires [Role::User]);
/// Route handler for the gateway confirmation relay.
///
/// The client forwards the gateway's signed outcome verbatim. A confirmation that verifies settles the order as
/// `success`; a tampered or replayed one is rejected with a 403 and the order stays pending. Duplicate
/// confirmations of an already-successful order are no-ops that report `success: true` again.
pub async fn verify_donation<B: DonationGatewayDatabase>(
    api: web::Data<DonationFlowApi<B>>,
    body: web::Json<VerifyDonationRequest>,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    debug!("💻️ POST verify_donation for order {}", params.donation_id);
    let confirmation = params.confirmation();
    let order = api.confirm_order(&params.donation_id, &confirmation).await?;
    Ok(HttpResponse::Ok().json(SettlementResponse::from_order(&order, DonationStatus::Success)))
}

route!(fail_donation => Post "/donations/fail" impl DonationGatewayDatabase where requires [Role::User]);
/// Route handler for abandoning a donation (the user dismissed the checkout, or the gateway reported a failure).
///
/// Only the order's owner may fail it. Failing an order that already reached a terminal state is a no-op that
/// reports the existing state, so dismissing the checkout after the payment went through cannot undo a donation.
pub async fn fail_donation<B: DonationGatewayDatabase>(
    claims: AuthClaims,
    api: web::Data<DonationFlowApi<B>>,
    body: web::Json<AnnulDonationRequest>,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    debug!("💻️ POST fail_donation for order {} by {}", params.donation_id, claims.user_id);
    let order = api.cancel_order(&params.donation_id, &claims.user_id).await?;
    Ok(HttpResponse::Ok().json(SettlementResponse::from_order(&order, DonationStatus::Failed)))
}

//----------------------------------------------   Reporting  ----------------------------------------------------
route!(my_donations => Get "/donations/my" impl OrderManagement where requires [Role::User]);
pub async fn my_donations<B: OrderManagement>(
    claims: AuthClaims,
    api: web::Data<ReportingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_donations for {}", claims.user_id);
    let orders = api.orders_for_customer(&claims.user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(all_donations => Get "/donations/all" impl OrderManagement where requires [Role::Admin]);
pub async fn all_donations<B: OrderManagement>(
    query: web::Query<DonationSearchParams>,
    api: web::Data<ReportingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let filter = OrderQueryFilter::from(query.into_inner());
    debug!("💻️ GET all_donations. {filter}");
    let orders = api.search_orders(filter).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(donation_stats => Get "/admin/stats" impl OrderManagement where requires [Role::Admin]);
pub async fn donation_stats<B: OrderManagement>(api: web::Data<ReportingApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET donation_stats");
    let stats = api.global_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

//----------------------------------------------   Gateway  ----------------------------------------------------
route!(gateway_key => Get "/donations/gateway-key" requires [Role::User]);
/// Serves the public gateway key id that checkout clients need to initialise the payment widget.
pub async fn gateway_key(info: web::Data<GatewayInfo>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET gateway_key");
    Ok(HttpResponse::Ok().json(json!({ "key_id": info.key_id })))
}
