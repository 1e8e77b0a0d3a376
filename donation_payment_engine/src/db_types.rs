use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use dpg_common::{Paise, INR_CURRENCY_CODE};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

use crate::helpers::{new_gateway_order_ref, new_order_id};

//--------------------------------------   DonationStatus    ---------------------------------------------------------
/// The lifecycle state of a donation order.
///
/// Every order starts out `Pending` and moves exactly once to one of the terminal states. Terminal orders are never
/// modified again; repeating a confirmation or cancellation against a terminal order is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum DonationStatus {
    /// The order has been created, but the gateway has not reported an outcome yet.
    Pending,
    /// A gateway confirmation for the order was verified. The money counts towards the totals.
    Success,
    /// The order was cancelled by its owner, or the gateway reported a dismissal.
    Failed,
}

impl DonationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DonationStatus::Success | DonationStatus::Failed)
    }
}

impl Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DonationStatus::Pending => write!(f, "pending"),
            DonationStatus::Success => write!(f, "success"),
            DonationStatus::Failed => write!(f, "failed"),
        }
    }
}

impl From<String> for DonationStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid donation status: {value}. But this conversion cannot fail. Defaulting to Pending");
            DonationStatus::Pending
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(pub String);

impl FromStr for DonationStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid donation status: {s}"))),
        }
    }
}

//--------------------------------------        Role         ---------------------------------------------------------
/// Access roles supplied by the upstream identity provider.
///
/// The engine itself only distinguishes owners of an order from everyone else; roles gate the server's
/// admin-only reporting surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------       OrderId       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
/// A donation order as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub customer_id: String,
    /// The donation amount in paise. Immutable once the order has been created.
    pub amount: Paise,
    pub currency: String,
    /// The reference handed to the external gateway at creation time. Unique across all orders.
    pub gateway_order_ref: String,
    /// The gateway's payment identifier. Only ever set on the transition to `Success`.
    pub payment_ref: Option<String>,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
/// A donation order that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// A fresh opaque identifier for the order.
    pub order_id: OrderId,
    /// The id of the user making the donation, as reported by the identity provider.
    pub customer_id: String,
    /// The donation amount in paise.
    pub amount: Paise,
    /// The currency of the order.
    pub currency: String,
    /// The reference under which the external gateway will know this order.
    pub gateway_order_ref: String,
    /// The time the order was created.
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(customer_id: String, amount: Paise) -> Self {
        Self {
            order_id: new_order_id(),
            customer_id,
            amount,
            currency: INR_CURRENCY_CODE.to_string(),
            gateway_order_ref: new_gateway_order_ref(),
            created_at: Utc::now(),
        }
    }

    pub fn is_equivalent(&self, order: &Order) -> bool {
        self.order_id == order.order_id
            && self.customer_id == order.customer_id
            && self.amount == order.amount
            && self.currency == order.currency
            && self.gateway_order_ref == order.gateway_order_ref
            && self.created_at == order.created_at
    }
}
