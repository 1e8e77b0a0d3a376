use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use donation_payment_engine::{
    db_types::{DonationStatus, Order, OrderId},
    ReportingApi,
};
use dpg_common::Paise;
use log::debug;

use super::helpers::get_request;
use crate::{
    endpoint_tests::mocks::MockOrderManager,
    routes::{AllDonationsRoute, MyDonationsRoute},
};

#[actix_web::test]
async fn fetch_my_donations_without_identity() {
    let _ = env_logger::try_init().ok();
    let err = get_request(None, "/donations/my", configure).await.expect_err("Expected error");
    assert_eq!(err, "No user identity was supplied with the request.");
}

#[actix_web::test]
async fn fetch_my_donations() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(Some(("alice", "user")), "/donations/my", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ORDERS_JSON);
}

#[actix_web::test]
async fn fetch_my_donations_with_garbled_roles() {
    let _ = env_logger::try_init().ok();
    debug!("Calling /donations/my with an unknown role");
    let err = get_request(Some(("alice", "user,superuser")), "/donations/my", configure)
        .await
        .expect_err("Expected error");
    assert_eq!(err, "The identity headers are not in the correct format. Invalid conversion: Invalid role: superuser");
}

#[actix_web::test]
async fn fetch_all_donations_as_admin() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request(Some(("carol", "user,admin")), "/donations/all", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ORDERS_JSON);
}

#[actix_web::test]
async fn fetch_all_donations_as_normal_user() {
    let _ = env_logger::try_init().ok();
    let err = get_request(Some(("alice", "user")), "/donations/all", configure).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn unknown_search_parameters_are_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, _body) = get_request(Some(("carol", "user,admin")), "/donations/all?flavour=mango", configure)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn configure(cfg: &mut ServiceConfig) {
    let mut order_manager = MockOrderManager::new();
    order_manager.expect_fetch_orders_for_customer().returning(move |_| Ok(orders_response()));
    order_manager.expect_search_orders().returning(move |_| Ok(orders_response()));
    let reports_api = ReportingApi::new(order_manager);
    cfg.service(MyDonationsRoute::<MockOrderManager>::new())
        .service(AllDonationsRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(reports_api));
}

// Mock response to the `fetch_orders_for_customer` and `search_orders` calls
fn orders_response() -> Vec<Order> {
    vec![
        Order {
            id: 2,
            order_id: OrderId("don_0000002".into()),
            customer_id: "alice".to_string(),
            amount: Paise::from(10_000),
            currency: "INR".to_string(),
            gateway_order_ref: "order_def456".to_string(),
            payment_ref: None,
            status: DonationStatus::Failed,
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 9, 15, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 2, 9, 16, 30).unwrap(),
        },
        Order {
            id: 1,
            order_id: OrderId("don_0000001".into()),
            customer_id: "alice".to_string(),
            amount: Paise::from(50_000),
            currency: "INR".to_string(),
            gateway_order_ref: "order_abc123".to_string(),
            payment_ref: Some("pay_424242".to_string()),
            status: DonationStatus::Success,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap(),
        },
    ]
}

const ORDERS_JSON: &str = r#"[{"id":2,"order_id":"don_0000002","customer_id":"alice","amount":10000,"currency":"INR","gateway_order_ref":"order_def456","payment_ref":null,"status":"failed","created_at":"2024-05-02T09:15:00Z","updated_at":"2024-05-02T09:16:30Z"},{"id":1,"order_id":"don_0000001","customer_id":"alice","amount":50000,"currency":"INR","gateway_order_ref":"order_abc123","payment_ref":"pay_424242","status":"success","created_at":"2024-05-01T12:00:00Z","updated_at":"2024-05-01T12:05:00Z"}]"#;
