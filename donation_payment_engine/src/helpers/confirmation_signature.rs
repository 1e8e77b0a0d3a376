//! # Gateway confirmation signature format
//!
//! When the external payment gateway collects a payment, it reports the outcome with a signed confirmation so that
//! the server can tell a genuine gateway callback from a forged one. Without the signature check, anyone who knows an
//! order reference could mark their own donation as paid.
//!
//! The gateway's documented signing scheme is an HMAC-SHA256 keyed by the webhook secret shared between the gateway
//! and this server. The message is the concatenation of the gateway's order reference and its payment reference:
//!
//! ```text
//!    {gateway_order_ref}|{payment_ref}
//! ```
//!
//! and the signature is the lowercase hex encoding of the MAC. The order reference is generated by us at order
//! creation and is unique per order, so a valid signature can only ever confirm the one order (and therefore the one
//! amount) it was issued for.
//!
//! Verification must never give an attacker a timing oracle, so the comparison against the claimed signature is
//! constant-time. Malformed input (bad hex, empty references) simply fails verification; the only hard error in this
//! module is constructing a verifier without a usable secret, which is a deployment problem and is surfaced at
//! startup.

use dpg_common::{Paise, Secret};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Error)]
pub enum SignatureError {
    #[error("The gateway webhook secret is empty. Confirmations cannot be verified without it.")]
    EmptySecret,
    #[error("The gateway webhook secret cannot be used as an HMAC key.")]
    InvalidSecret,
}

/// The outcome report produced by the gateway (or the client proxying the gateway's response) for a single order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfirmation {
    pub gateway_order_ref: String,
    pub payment_ref: String,
    pub signature: String,
}

/// The message that the gateway signs for a confirmation.
pub fn signature_message(gateway_order_ref: &str, payment_ref: &str) -> String {
    format!("{gateway_order_ref}|{payment_ref}")
}

/// Verifies (and, for test doubles, produces) gateway confirmation signatures.
///
/// Construct one at startup from the shared webhook secret. Construction fails on an empty secret so that a
/// misconfigured deployment refuses to boot rather than silently rejecting every confirmation.
#[derive(Clone)]
pub struct ConfirmationVerifier {
    secret: Secret<String>,
}

impl ConfirmationVerifier {
    pub fn new(secret: Secret<String>) -> Result<Self, SignatureError> {
        if secret.reveal().trim().is_empty() {
            return Err(SignatureError::EmptySecret);
        }
        Ok(Self { secret })
    }

    /// Checks a claimed confirmation against the signature the gateway would have produced.
    ///
    /// Returns `false` on any mismatch or malformed input. `expected_amount` is the amount of the order being
    /// confirmed; non-positive values are rejected as malformed. This method never errors on attacker-controlled
    /// data.
    pub fn verify(&self, confirmation: &GatewayConfirmation, expected_amount: Paise) -> bool {
        if confirmation.gateway_order_ref.is_empty() || confirmation.payment_ref.is_empty() {
            return false;
        }
        if !expected_amount.is_positive() {
            return false;
        }
        let claimed = match hex::decode(&confirmation.signature) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let mut mac = match HmacSha256::new_from_slice(self.secret.reveal().as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(signature_message(&confirmation.gateway_order_ref, &confirmation.payment_ref).as_bytes());
        // verify_slice is constant-time, and also rejects truncated or padded signatures
        mac.verify_slice(&claimed).is_ok()
    }

    /// Produces the signature the gateway would emit for the given references.
    ///
    /// This is the gateway's half of the protocol. The server never signs anything in production; this exists so
    /// that tests and sandbox tooling can play the role of the gateway, emitting both valid and forged
    /// confirmations.
    pub fn sign(&self, gateway_order_ref: &str, payment_ref: &str) -> Result<String, SignatureError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.reveal().as_bytes())
            .map_err(|_| SignatureError::InvalidSecret)?;
        mac.update(signature_message(gateway_order_ref, payment_ref).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Convenience for test doubles: a fully-formed, validly-signed confirmation.
    pub fn confirmation(&self, gateway_order_ref: &str, payment_ref: &str) -> Result<GatewayConfirmation, SignatureError> {
        let signature = self.sign(gateway_order_ref, payment_ref)?;
        Ok(GatewayConfirmation {
            gateway_order_ref: gateway_order_ref.to_string(),
            payment_ref: payment_ref.to_string(),
            signature,
        })
    }
}
