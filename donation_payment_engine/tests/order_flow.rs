//! End-to-end tests for the donation order lifecycle against a real SQLite store.
use std::sync::Arc;

use donation_payment_engine::{
    db_types::{DonationStatus, OrderId},
    helpers::GatewayConfirmation,
    traits::DonationGatewayError,
};
use dpg_common::Paise;
use log::*;
use tokio::runtime::Runtime;

mod common;

#[test]
fn new_orders_start_pending() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, _reports) = common::setup().await;
        let order = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        assert_eq!(order.status, DonationStatus::Pending);
        assert_eq!(order.customer_id, "alice");
        assert_eq!(order.amount, Paise::from(50_000));
        assert_eq!(order.currency, "INR");
        assert_eq!(order.payment_ref, None);
        assert!(order.gateway_order_ref.starts_with("order_"));
        let second = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        assert_ne!(order.order_id, second.order_id);
        assert_ne!(order.gateway_order_ref, second.gateway_order_ref);
        common::tear_down(api).await;
    });
    info!("🪝️ test complete");
}

#[test]
fn non_positive_amounts_are_rejected() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, reports) = common::setup().await;
        for amount in [0i64, -500] {
            let err = api.create_order("alice", Paise::from(amount)).await.unwrap_err();
            assert!(matches!(err, DonationGatewayError::InvalidAmount), "got {err} for {amount}");
        }
        let stats = reports.global_stats().await.expect("Error fetching stats");
        assert_eq!(stats.transaction_count, 0);
        common::tear_down(api).await;
    });
}

#[test]
fn verified_confirmation_completes_the_donation() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, reports) = common::setup().await;
        let order = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        let confirmation = common::signed_confirmation(&order, "pay_424242");
        let settled = api.confirm_order(&order.order_id, &confirmation).await.expect("Error confirming order");
        assert_eq!(settled.status, DonationStatus::Success);
        assert_eq!(settled.payment_ref.as_deref(), Some("pay_424242"));
        assert_eq!(settled.amount, Paise::from(50_000));
        let stats = reports.global_stats().await.expect("Error fetching stats");
        assert_eq!(stats.total_success_amount, Paise::from(50_000));
        assert_eq!(stats.transaction_count, 1);
        assert_eq!(stats.user_count, 1);
        common::tear_down(api).await;
    });
}

#[test]
fn duplicate_confirmations_count_once() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, reports) = common::setup().await;
        let order = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        let confirmation = common::signed_confirmation(&order, "pay_424242");
        let first = api.confirm_order(&order.order_id, &confirmation).await.expect("Error confirming order");
        let replay = api.confirm_order(&order.order_id, &confirmation).await.expect("Error confirming order");
        assert_eq!(first, replay);
        assert_eq!(replay.status, DonationStatus::Success);
        let stats = reports.global_stats().await.expect("Error fetching stats");
        assert_eq!(stats.total_success_amount, Paise::from(50_000));
        assert_eq!(stats.transaction_count, 1);
        common::tear_down(api).await;
    });
}

#[test]
fn failed_verification_leaves_the_order_pending() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, reports) = common::setup().await;
        let order = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        let mut forged = common::signed_confirmation(&order, "pay_424242");
        forged.signature = "deadbeef".repeat(8);
        let err = api.confirm_order(&order.order_id, &forged).await.unwrap_err();
        assert!(matches!(err, DonationGatewayError::VerificationFailed(_)), "got {err}");
        let order = reports.order_by_id(&order.order_id).await.unwrap().expect("order should still exist");
        assert_eq!(order.status, DonationStatus::Pending);
        // A bad confirmation is not a cancellation. A good retry still completes the donation.
        let confirmation = common::signed_confirmation(&order, "pay_424242");
        let settled = api.confirm_order(&order.order_id, &confirmation).await.expect("Error confirming order");
        assert_eq!(settled.status, DonationStatus::Success);
        common::tear_down(api).await;
    });
}

#[test]
fn confirmations_cannot_be_replayed_across_orders() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, reports) = common::setup().await;
        let big = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        let small = api.create_order("alice", Paise::from(100)).await.expect("Error creating order");
        // A validly signed confirmation for the small order must not settle the big one.
        let confirmation = common::signed_confirmation(&small, "pay_424242");
        let err = api.confirm_order(&big.order_id, &confirmation).await.unwrap_err();
        assert!(matches!(err, DonationGatewayError::VerificationFailed(_)), "got {err}");
        let big = reports.order_by_id(&big.order_id).await.unwrap().unwrap();
        assert_eq!(big.status, DonationStatus::Pending);
        let stats = reports.global_stats().await.expect("Error fetching stats");
        assert_eq!(stats.total_success_amount, Paise::from(0));
        common::tear_down(api).await;
    });
}

#[test]
fn owners_can_cancel_pending_orders() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, reports) = common::setup().await;
        let order = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        let cancelled = api.cancel_order(&order.order_id, "alice").await.expect("Error cancelling order");
        assert_eq!(cancelled.status, DonationStatus::Failed);
        assert_eq!(cancelled.payment_ref, None);
        let stats = reports.global_stats().await.expect("Error fetching stats");
        assert_eq!(stats.total_success_amount, Paise::from(0));
        assert_eq!(stats.transaction_count, 1);
        common::tear_down(api).await;
    });
}

#[test]
fn only_the_owner_can_cancel() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, reports) = common::setup().await;
        let order = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        let err = api.cancel_order(&order.order_id, "mallory").await.unwrap_err();
        assert!(matches!(err, DonationGatewayError::Forbidden), "got {err}");
        let order = reports.order_by_id(&order.order_id).await.unwrap().unwrap();
        assert_eq!(order.status, DonationStatus::Pending);
        common::tear_down(api).await;
    });
}

#[test]
fn terminal_orders_are_immutable() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, reports) = common::setup().await;
        // A cancellation arriving after the payment went through does not undo the donation.
        let order = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        let confirmation = common::signed_confirmation(&order, "pay_424242");
        api.confirm_order(&order.order_id, &confirmation).await.expect("Error confirming order");
        let after_cancel = api.cancel_order(&order.order_id, "alice").await.expect("Error cancelling order");
        assert_eq!(after_cancel.status, DonationStatus::Success);
        assert_eq!(after_cancel.payment_ref.as_deref(), Some("pay_424242"));

        // And a cancelled order stays cancelled, even when a valid confirmation shows up later.
        let order = api.create_order("bob", Paise::from(10_000)).await.expect("Error creating order");
        api.cancel_order(&order.order_id, "bob").await.expect("Error cancelling order");
        let confirmation = common::signed_confirmation(&order, "pay_171717");
        let after_confirm = api.confirm_order(&order.order_id, &confirmation).await.expect("Error confirming order");
        assert_eq!(after_confirm.status, DonationStatus::Failed);
        assert_eq!(after_confirm.payment_ref, None);

        let stats = reports.global_stats().await.expect("Error fetching stats");
        assert_eq!(stats.total_success_amount, Paise::from(50_000));
        assert_eq!(stats.transaction_count, 2);
        common::tear_down(api).await;
    });
}

#[test]
fn unknown_orders_are_reported_as_missing() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, _reports) = common::setup().await;
        let ghost = OrderId::from("don_missing".to_string());
        let confirmation = GatewayConfirmation {
            gateway_order_ref: "order_nothere".to_string(),
            payment_ref: "pay_424242".to_string(),
            signature: "00".repeat(32),
        };
        let err = api.confirm_order(&ghost, &confirmation).await.unwrap_err();
        assert!(matches!(err, DonationGatewayError::OrderNotFound(_)), "got {err}");
        let err = api.cancel_order(&ghost, "alice").await.unwrap_err();
        assert!(matches!(err, DonationGatewayError::OrderNotFound(_)), "got {err}");
        common::tear_down(api).await;
    });
}

#[test]
fn racing_confirm_and_cancel_has_exactly_one_winner() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, reports) = common::setup().await;
        let order = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        let confirmation = common::signed_confirmation(&order, "pay_424242");
        let (confirmed, cancelled) =
            tokio::join!(api.confirm_order(&order.order_id, &confirmation), api.cancel_order(&order.order_id, "alice"));
        let confirmed = confirmed.expect("Error confirming order");
        let cancelled = cancelled.expect("Error cancelling order");
        // Whichever call lost the race reports the winner's terminal state.
        assert_eq!(confirmed.status, cancelled.status);
        assert!(confirmed.status.is_terminal());
        let stats = reports.global_stats().await.expect("Error fetching stats");
        match confirmed.status {
            DonationStatus::Success => assert_eq!(stats.total_success_amount, Paise::from(50_000)),
            DonationStatus::Failed => assert_eq!(stats.total_success_amount, Paise::from(0)),
            DonationStatus::Pending => panic!("the race must settle the order"),
        }
        assert_eq!(stats.transaction_count, 1);
        common::tear_down(api).await;
    });
}

#[test]
fn concurrent_duplicate_confirmations_count_once() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async move {
        let (api, reports) = common::setup().await;
        let order = api.create_order("alice", Paise::from(50_000)).await.expect("Error creating order");
        let confirmation = common::signed_confirmation(&order, "pay_424242");
        let api = Arc::new(api);
        let mut workers = vec![];
        for _ in 0..8 {
            let api = Arc::clone(&api);
            let order_id = order.order_id.clone();
            let confirmation = confirmation.clone();
            workers.push(tokio::spawn(async move { api.confirm_order(&order_id, &confirmation).await }));
        }
        for worker in workers {
            let settled = worker.await.unwrap().expect("Error confirming order");
            assert_eq!(settled.status, DonationStatus::Success);
            assert_eq!(settled.payment_ref.as_deref(), Some("pay_424242"));
        }
        let stats = reports.global_stats().await.expect("Error fetching stats");
        assert_eq!(stats.total_success_amount, Paise::from(50_000));
        assert_eq!(stats.transaction_count, 1);
        let api = Arc::try_unwrap(api).expect("all workers have finished");
        common::tear_down(api).await;
    });
}
