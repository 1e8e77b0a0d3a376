use chrono::{DateTime, Utc};
use donation_payment_engine::{
    db_types::{DonationStatus, Order, OrderId},
    helpers::GatewayConfirmation,
    order_objects::OrderQueryFilter,
};
use dpg_common::Paise;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/donations/create-order`. The amount is an integer number of paise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDonationRequest {
    pub amount: Paise,
}

/// Everything the client needs to open the gateway checkout for a freshly created order.
///
/// `id` is the *gateway's* order reference (the checkout widget wants it as its order id); `donationId` is our own
/// record id, which the client echoes back in the verify and fail calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDonationResponse {
    pub id: String,
    pub amount: Paise,
    pub currency: String,
    #[serde(rename = "donationId")]
    pub donation_id: OrderId,
}

impl From<Order> for NewDonationResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.gateway_order_ref,
            amount: order.amount,
            currency: order.currency,
            donation_id: order.order_id,
        }
    }
}

/// Body of `POST /api/donations/verify`: the signed outcome the client relays from the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyDonationRequest {
    pub gateway_order_ref: String,
    pub payment_ref: String,
    pub signature: String,
    pub donation_id: OrderId,
}

impl VerifyDonationRequest {
    pub fn confirmation(&self) -> GatewayConfirmation {
        GatewayConfirmation {
            gateway_order_ref: self.gateway_order_ref.clone(),
            payment_ref: self.payment_ref.clone(),
            signature: self.signature.clone(),
        }
    }
}

/// Body of `POST /api/donations/fail`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnulDonationRequest {
    pub donation_id: OrderId,
}

/// Response of the verify and fail endpoints: where the order ended up after the call.
///
/// `success` reports whether the order is in the state the call was trying to reach, so a verify call against an
/// order that was already cancelled comes back `success: false, status: failed` rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResponse {
    pub success: bool,
    pub status: DonationStatus,
    pub donation_id: OrderId,
}

impl SettlementResponse {
    pub fn from_order(order: &Order, desired: DonationStatus) -> Self {
        Self { success: order.status == desired, status: order.status, donation_id: order.order_id.clone() }
    }
}

/// Optional query parameters of `GET /api/donations/all`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonationSearchParams {
    pub customer_id: Option<String>,
    pub status: Option<DonationStatus>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl From<DonationSearchParams> for OrderQueryFilter {
    fn from(params: DonationSearchParams) -> Self {
        let mut filter = OrderQueryFilter::default();
        if let Some(customer_id) = params.customer_id {
            filter = filter.with_customer_id(customer_id);
        }
        if let Some(status) = params.status {
            filter = filter.with_status(status);
        }
        filter.since = params.since;
        filter.until = params.until;
        filter
    }
}
