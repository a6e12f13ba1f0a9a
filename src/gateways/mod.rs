pub mod esewa;
pub mod stripe;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::payments::Gateway;

pub use esewa::EsewaClient;
pub use stripe::StripeClient;

/// Failures talking to an external payment gateway.
///
/// `Timeout` is split out so callers can distinguish "retry this" from
/// "the gateway answered something we don't understand".
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request timed out")]
    Timeout,

    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("unexpected gateway response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// Everything a gateway needs to start a transfer.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub amount: f64,
    pub transaction_id: String,
    pub contract_id: Uuid,
    pub client_id: Uuid,
}

/// What the client application needs to finish the payment flow.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Checkout {
    /// Redirect-style gateway: send the payer to `url`.
    Redirect {
        url: String,
        payload: serde_json::Value,
    },
    /// Hosted-intent gateway: hand `client_secret` to the client SDK.
    Intent {
        client_secret: String,
        intent_id: String,
        payload: serde_json::Value,
    },
}

impl Checkout {
    /// Hosted-intent gateways confirm at intent-creation time; redirect
    /// gateways need a later status poll.
    pub fn confirms_synchronously(&self) -> bool {
        matches!(self, Checkout::Intent { .. })
    }

    /// The gateway-assigned reference known at start time, if any.
    pub fn gateway_ref(&self) -> Option<String> {
        match self {
            Checkout::Redirect { .. } => None,
            Checkout::Intent { intent_id, .. } => Some(intent_id.clone()),
        }
    }

    /// The raw gateway response, kept verbatim on the payment row.
    pub fn payload(&self) -> &serde_json::Value {
        match self {
            Checkout::Redirect { payload, .. } => payload,
            Checkout::Intent { payload, .. } => payload,
        }
    }
}

/// Result of polling the gateway for a transfer's status.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub complete: bool,
    /// Gateway-side reference for a completed transfer (eSewa ref id,
    /// Stripe charge id).
    pub reference: Option<String>,
}

/// Uniform capability over the two payment gateways, so the settlement
/// coordinator never branches on gateway internals and new gateways slot in
/// without touching it.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn kind(&self) -> Gateway;

    /// Start a transfer; returns what the payer-side flow needs next.
    async fn start(&self, request: &PaymentRequest) -> Result<Checkout, GatewayError>;

    /// Poll the gateway for the transfer's outcome. Never mutates anything
    /// on our side; the coordinator owns persistence.
    async fn confirm(
        &self,
        transaction_id: &str,
        gateway_ref: Option<&str>,
        amount: f64,
    ) -> Result<Confirmation, GatewayError>;
}
