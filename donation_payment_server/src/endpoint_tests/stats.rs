use actix_web::{http::StatusCode, web, web::ServiceConfig};
use donation_payment_engine::{order_objects::GlobalStats, ReportingApi};
use dpg_common::Paise;

use super::helpers::get_request;
use crate::{endpoint_tests::mocks::MockOrderManager, routes::DonationStatsRoute};

#[actix_web::test]
async fn fetch_stats_as_admin() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(Some(("carol", "admin")), "/admin/stats", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"userCount":3,"totalSuccessAmount":1250000,"transactionCount":7}"#);
}

#[actix_web::test]
async fn fetch_stats_as_normal_user() {
    let _ = env_logger::try_init().ok();
    let err = get_request(Some(("alice", "user")), "/admin/stats", configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn fetch_stats_without_identity() {
    let _ = env_logger::try_init().ok();
    let err = get_request(None, "/admin/stats", configure).await.expect_err("Expected error");
    assert_eq!(err, "No user identity was supplied with the request.");
}

fn configure(cfg: &mut ServiceConfig) {
    let mut order_manager = MockOrderManager::new();
    order_manager.expect_fetch_global_stats().returning(|| {
        Ok(GlobalStats { user_count: 3, total_success_amount: Paise::from(1_250_000), transaction_count: 7 })
    });
    let reports_api = ReportingApi::new(order_manager);
    cfg.service(DonationStatsRoute::<MockOrderManager>::new()).app_data(web::Data::new(reports_api));
}
