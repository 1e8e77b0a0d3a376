mod confirmation_signature;

use rand::{distributions::Alphanumeric, Rng};

pub use confirmation_signature::{ConfirmationVerifier, GatewayConfirmation, SignatureError};

use crate::db_types::OrderId;

/// Generates a fresh opaque order id.
pub fn new_order_id() -> OrderId {
    OrderId(format!("don_{:016x}", rand::random::<u64>()))
}

/// Generates the reference under which the external gateway will know a new order.
///
/// The format follows the gateway's own order ids: the literal prefix `order_` followed by 14 alphanumeric
/// characters. Uniqueness is enforced by the order store; the keyspace makes a retry scenario vanishingly rare.
pub fn new_gateway_order_ref() -> String {
    let suffix: String = rand::thread_rng().sample_iter(&Alphanumeric).take(14).map(char::from).collect();
    format!("order_{suffix}")
}
