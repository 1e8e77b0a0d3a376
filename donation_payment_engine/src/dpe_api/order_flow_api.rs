use std::fmt::Debug;

use dpg_common::Paise;
use log::*;

use crate::{
    db_types::{DonationStatus, NewOrder, Order, OrderId},
    events::{DonationReceivedEvent, EventProducers, OrderAnnulledEvent, OrderCreatedEvent},
    helpers::{ConfirmationVerifier, GatewayConfirmation},
    traits::{DonationGatewayDatabase, DonationGatewayError},
};

/// `DonationFlowApi` is the primary API for driving donation orders through their lifecycle in response to user
/// requests and gateway callbacks.
///
/// The lifecycle is a three-state machine. Every order starts `pending` and makes exactly one transition:
///
/// | From \ To | pending | success | failed |
/// |-----------|---------|---------|--------|
/// | pending   |  n/a    | confirm | cancel |
/// | success   |  Never  | no-op   | no-op  |
/// | failed    |  Never  | no-op   | no-op  |
///
/// "no-op" means the call succeeds and reports the existing terminal record without re-verifying anything or
/// touching the store; duplicate gateway callbacks and client retries land here. The transition itself is a
/// conditional update keyed on the current status, so concurrent confirm/cancel calls on one order produce exactly
/// one winner and the loser falls through to the no-op path.
pub struct DonationFlowApi<B> {
    db: B,
    verifier: ConfirmationVerifier,
    producers: EventProducers,
}

impl<B> Debug for DonationFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DonationFlowApi")
    }
}

impl<B> DonationFlowApi<B> {
    pub fn new(db: B, verifier: ConfirmationVerifier, producers: EventProducers) -> Self {
        Self { db, verifier, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}

impl<B> DonationFlowApi<B>
where B: DonationGatewayDatabase
{
    /// Creates a new pending donation order for the given customer.
    ///
    /// The amount must be a positive number of paise; anything else fails with
    /// [`DonationGatewayError::InvalidAmount`] before touching the store. A fresh gateway reference is generated
    /// for the order, and the returned record carries everything the caller needs to hand over to the external
    /// gateway.
    pub async fn create_order(&self, customer_id: &str, amount: Paise) -> Result<Order, DonationGatewayError> {
        if !amount.is_positive() {
            debug!("🔄️📦️ Rejecting order for customer {customer_id}: {amount} is not a valid donation amount");
            return Err(DonationGatewayError::InvalidAmount);
        }
        let order = NewOrder::new(customer_id.to_string(), amount);
        let order = self.db.insert_order(order).await?;
        debug!(
            "🔄️📦️ Order [{}] created. Customer {} pledged {} under gateway ref {}",
            order.order_id, order.customer_id, order.amount, order.gateway_order_ref
        );
        self.call_order_created_hook(&order).await;
        Ok(order)
    }

    /// Applies a gateway confirmation to the order, transitioning it to `success` if the confirmation verifies.
    ///
    /// * If the order does not exist, fails with [`DonationGatewayError::OrderNotFound`].
    /// * If the order is already terminal, the existing record is returned as-is. Nothing is re-verified and the
    ///   totals are unaffected; this is the idempotency guard against duplicate callbacks and retried requests.
    /// * If the confirmation does not name this order's gateway reference, or its signature does not verify, fails
    ///   with [`DonationGatewayError::VerificationFailed`] and the order stays `pending`. The caller may retry with
    ///   a good confirmation or cancel explicitly; a bad confirmation is not a cancellation.
    /// * Otherwise the order is settled as `success` and the gateway's payment reference is recorded.
    pub async fn confirm_order(
        &self,
        order_id: &OrderId,
        confirmation: &GatewayConfirmation,
    ) -> Result<Order, DonationGatewayError> {
        let order = self
            .db
            .fetch_order_by_id(order_id)
            .await?
            .ok_or_else(|| DonationGatewayError::OrderNotFound(order_id.clone()))?;
        if order.status.is_terminal() {
            debug!("🔄️✅️ Order [{order_id}] is already {}. Ignoring the duplicate confirmation.", order.status);
            return Ok(order);
        }
        let authentic = confirmation.gateway_order_ref == order.gateway_order_ref &&
            self.verifier.verify(confirmation, order.amount);
        if !authentic {
            warn!("🔄️🚨️ Confirmation for order [{order_id}] failed verification. The order stays pending.");
            return Err(DonationGatewayError::VerificationFailed(order_id.clone()));
        }
        match self.db.settle_order(order_id, DonationStatus::Success, Some(&confirmation.payment_ref)).await? {
            Some(order) => {
                info!(
                    "🔄️✅️ Order [{order_id}] confirmed. Received {} from customer {} (payment {})",
                    order.amount, order.customer_id, confirmation.payment_ref
                );
                self.call_donation_received_hook(&order).await;
                Ok(order)
            },
            None => {
                // Lost the settlement race. Report whichever terminal state won it.
                let order = self
                    .db
                    .fetch_order_by_id(order_id)
                    .await?
                    .ok_or_else(|| DonationGatewayError::OrderNotFound(order_id.clone()))?;
                debug!("🔄️✅️ Order [{order_id}] was settled concurrently as {}.", order.status);
                Ok(order)
            },
        }
    }

    /// Cancels a pending order, transitioning it to `failed`.
    ///
    /// Only the customer who created the order may cancel it; anyone else gets
    /// [`DonationGatewayError::Forbidden`] and the order is untouched. Cancelling an order that has already
    /// reached a terminal state is a no-op that returns the existing record, so a user dismissing the gateway
    /// dialog after the payment went through cannot undo their donation.
    pub async fn cancel_order(&self, order_id: &OrderId, requester_id: &str) -> Result<Order, DonationGatewayError> {
        let order = self
            .db
            .fetch_order_by_id(order_id)
            .await?
            .ok_or_else(|| DonationGatewayError::OrderNotFound(order_id.clone()))?;
        if order.customer_id != requester_id {
            warn!("🔄️🚨️ {requester_id} tried to cancel order [{order_id}], which belongs to someone else.");
            return Err(DonationGatewayError::Forbidden);
        }
        if order.status.is_terminal() {
            debug!("🔄️❌️ Order [{order_id}] is already {}. Ignoring the cancellation.", order.status);
            return Ok(order);
        }
        match self.db.settle_order(order_id, DonationStatus::Failed, None).await? {
            Some(order) => {
                info!("🔄️❌️ Order [{order_id}] was cancelled by its owner, {requester_id}.");
                self.call_order_annulled_hook(&order).await;
                Ok(order)
            },
            None => {
                let order = self
                    .db
                    .fetch_order_by_id(order_id)
                    .await?
                    .ok_or_else(|| DonationGatewayError::OrderNotFound(order_id.clone()))?;
                debug!("🔄️❌️ Order [{order_id}] was settled concurrently as {}.", order.status);
                Ok(order)
            },
        }
    }

    async fn call_order_created_hook(&self, order: &Order) {
        for emitter in &self.producers.order_created_producer {
            trace!("🔄️📦️ Notifying order created hook subscribers");
            emitter.publish_event(OrderCreatedEvent::new(order.clone())).await;
        }
    }

    async fn call_donation_received_hook(&self, order: &Order) {
        for emitter in &self.producers.donation_received_producer {
            trace!("🔄️✅️ Notifying donation received hook subscribers");
            emitter.publish_event(DonationReceivedEvent::new(order.clone())).await;
        }
    }

    async fn call_order_annulled_hook(&self, order: &Order) {
        for emitter in &self.producers.order_annulled_producer {
            trace!("🔄️❌️ Notifying order annulled hook subscribers");
            emitter.publish_event(OrderAnnulledEvent::new(order.clone())).await;
        }
    }
}
