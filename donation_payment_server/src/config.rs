use std::env;

use dpg_common::{parse_boolean_flag, Secret};
use log::*;

use crate::errors::ServerError;

const DEFAULT_DPG_HOST: &str = "127.0.0.1";
const DEFAULT_DPG_PORT: u16 = 5000;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Whether to log a receipt line for every settled donation. On by default.
    pub emit_receipts: bool,
    /// Payment gateway configuration. The webhook secret must be set, or the server refuses to start.
    pub gateway: GatewayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DPG_HOST.to_string(),
            port: DEFAULT_DPG_PORT,
            database_url: String::default(),
            emit_receipts: true,
            gateway: GatewayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("DPG_HOST").ok().unwrap_or_else(|| DEFAULT_DPG_HOST.into());
        let port = env::var("DPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DPG_PORT. {e} Using the default, {DEFAULT_DPG_PORT}, instead."
                    );
                    DEFAULT_DPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DPG_PORT);
        let database_url = env::var("DPG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ DPG_DATABASE_URL is not set. Please set it to the URL for the donations database.");
            String::default()
        });
        let emit_receipts = parse_boolean_flag(env::var("DPG_EMIT_DONATION_RECEIPTS").ok(), true);
        let gateway = GatewayConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the payment gateway configuration from environment variables. {e}. Reverting to \
                 the default configuration. The server will not accept gateway confirmations in this state."
            );
            GatewayConfig::default()
        });
        Self { host, port, database_url, emit_receipts, gateway }
    }
}

//------------------------------------------------  GatewayConfig  ----------------------------------------------------
/// The material shared with the external payment gateway.
#[derive(Clone, Debug, Default)]
pub struct GatewayConfig {
    /// The public key id that checkout clients hand to the gateway widget. Not a secret.
    pub key_id: String,
    /// The secret the gateway uses to sign confirmation callbacks. Confirmations that do not carry a valid
    /// signature under this secret are rejected.
    pub webhook_secret: Secret<String>,
}

impl GatewayConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let webhook_secret = env::var("DPG_GATEWAY_WEBHOOK_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [DPG_GATEWAY_WEBHOOK_SECRET]")))?;
        let webhook_secret = Secret::new(webhook_secret);
        let key_id = env::var("DPG_GATEWAY_KEY_ID").ok().unwrap_or_else(|| {
            error!("🪛️ DPG_GATEWAY_KEY_ID is not set. Please set it to the key id issued by your payment gateway.");
            String::default()
        });
        Ok(Self { key_id, webhook_secret })
    }
}

//------------------------------------------------  GatewayInfo  ------------------------------------------------------
/// The subset of the gateway configuration that is safe to serve to clients. Keep secrets out of this struct; it
/// gets passed around the route handlers and serialized into responses.
#[derive(Clone, Debug)]
pub struct GatewayInfo {
    pub key_id: String,
}

impl GatewayInfo {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { key_id: config.gateway.key_id.clone() }
    }
}
