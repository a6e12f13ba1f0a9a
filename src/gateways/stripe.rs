use async_trait::async_trait;
use std::time::Duration;

use super::{Checkout, Confirmation, GatewayError, PaymentGateway, PaymentRequest};
use crate::models::payments::Gateway;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_API_BASE: &str = "https://api.stripe.com";
const CURRENCY: &str = "usd";

/// Stripe configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
}

impl StripeConfig {
    pub fn from_env() -> Self {
        Self {
            secret_key: std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set"),
            api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        }
    }
}

/// Hosted-intent gateway client.
///
/// Creating a payment intent returns a client secret the frontend SDK
/// finishes the charge with; `confirm` is the manual retrieval fallback for
/// when the webhook channel is unavailable.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    config: StripeConfig,
}

#[derive(Debug, serde::Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: Option<String>,
    status: String,
    latest_charge: Option<String>,
}

/// Stripe amounts are integers in the currency's smallest unit.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build Stripe HTTP client");

        Self { http, config }
    }

    pub fn from_env() -> Self {
        Self::new(StripeConfig::from_env())
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    fn kind(&self) -> Gateway {
        Gateway::Stripe
    }

    async fn start(&self, request: &PaymentRequest) -> Result<Checkout, GatewayError> {
        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.config.api_base))
            .bearer_auth(&self.config.secret_key)
            .form(&[
                ("amount", to_minor_units(request.amount).to_string()),
                ("currency", CURRENCY.to_string()),
                ("metadata[contract_id]", request.contract_id.to_string()),
                ("metadata[client_id]", request.client_id.to_string()),
                ("metadata[transaction_id]", request.transaction_id.clone()),
                ("automatic_payment_methods[enabled]", "true".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::InvalidResponse(format!(
                "payment intent creation returned HTTP {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let intent: IntentResponse = serde_json::from_value(payload.clone())
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            GatewayError::InvalidResponse("payment intent has no client secret".to_string())
        })?;

        Ok(Checkout::Intent {
            client_secret,
            intent_id: intent.id,
            payload,
        })
    }

    async fn confirm(
        &self,
        _transaction_id: &str,
        gateway_ref: Option<&str>,
        _amount: f64,
    ) -> Result<Confirmation, GatewayError> {
        let intent_id = gateway_ref.ok_or_else(|| {
            GatewayError::InvalidResponse("payment has no stored intent id".to_string())
        })?;

        let response = self
            .http
            .get(format!(
                "{}/v1/payment_intents/{intent_id}",
                self.config.api_base
            ))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::InvalidResponse(format!(
                "payment intent retrieval returned HTTP {}",
                response.status()
            )));
        }

        let intent: IntentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(Confirmation {
            complete: intent.status == "succeeded",
            reference: intent.latest_charge.or(Some(intent.id)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_convert_to_minor_units() {
        assert_eq!(to_minor_units(1234.56), 123456);
        assert_eq!(to_minor_units(500.0), 50000);
        assert_eq!(to_minor_units(0.1), 10);
    }

    #[test]
    fn minor_units_round_instead_of_truncating() {
        // 19.99 is not exactly representable in binary floating point.
        assert_eq!(to_minor_units(19.99), 1999);
        assert_eq!(to_minor_units(0.29), 29);
    }

    #[test]
    fn intent_response_parses_the_fields_we_use() {
        let intent: IntentResponse = serde_json::from_str(
            r#"{
                "id": "pi_3Nabc",
                "object": "payment_intent",
                "client_secret": "pi_3Nabc_secret_xyz",
                "status": "requires_payment_method",
                "latest_charge": null,
                "amount": 50000
            }"#,
        )
        .unwrap();

        assert_eq!(intent.id, "pi_3Nabc");
        assert_eq!(intent.client_secret.as_deref(), Some("pi_3Nabc_secret_xyz"));
        assert_eq!(intent.status, "requires_payment_method");
        assert!(intent.latest_charge.is_none());
    }
}
