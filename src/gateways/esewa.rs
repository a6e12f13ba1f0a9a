use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;

use super::{Checkout, Confirmation, GatewayError, PaymentGateway, PaymentRequest};
use crate::models::payments::Gateway;

type HmacSha256 = Hmac<Sha256>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The fields eSewa includes in the request signature, in signing order.
const SIGNED_FIELD_NAMES: &str = "total_amount,transaction_uuid,product_code";

/// eSewa merchant configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct EsewaConfig {
    pub payment_url: String,
    pub status_url: String,
    pub merchant_code: String,
    pub secret_key: String,
    pub success_url: String,
    pub failure_url: String,
}

impl EsewaConfig {
    pub fn from_env() -> Self {
        Self {
            payment_url: std::env::var("ESEWA_PAYMENT_URL").expect("ESEWA_PAYMENT_URL must be set"),
            status_url: std::env::var("ESEWA_STATUS_CHECK_URL")
                .expect("ESEWA_STATUS_CHECK_URL must be set"),
            merchant_code: std::env::var("ESEWA_MERCHANT_CODE")
                .expect("ESEWA_MERCHANT_CODE must be set"),
            secret_key: std::env::var("ESEWA_SECRET_KEY").expect("ESEWA_SECRET_KEY must be set"),
            success_url: std::env::var("ESEWA_SUCCESS_URL").expect("ESEWA_SUCCESS_URL must be set"),
            failure_url: std::env::var("ESEWA_FAILED_URL").expect("ESEWA_FAILED_URL must be set"),
        }
    }
}

/// Redirect/poll-style gateway client.
///
/// eSewa checkouts are a signed form POST that lands the payer on a hosted
/// page; completion is observed later through an explicit status poll.
#[derive(Clone)]
pub struct EsewaClient {
    http: reqwest::Client,
    config: EsewaConfig,
}

#[derive(Debug, serde::Deserialize)]
struct StatusResponse {
    status: String,
    ref_id: Option<String>,
}

impl EsewaClient {
    pub fn new(config: EsewaConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build eSewa HTTP client");

        Self { http, config }
    }

    pub fn from_env() -> Self {
        Self::new(EsewaConfig::from_env())
    }

    /// HMAC-SHA256 over the signed-field message, hex encoded.
    fn sign(&self, message: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.config.secret_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// The message eSewa expects under the signature:
    /// `total_amount=<a>,transaction_uuid=<t>,product_code=<c>`.
    fn signed_message(&self, amount: f64, transaction_id: &str) -> String {
        format!(
            "total_amount={amount},transaction_uuid={transaction_id},product_code={}",
            self.config.merchant_code
        )
    }
}

#[async_trait]
impl PaymentGateway for EsewaClient {
    fn kind(&self) -> Gateway {
        Gateway::Esewa
    }

    async fn start(&self, request: &PaymentRequest) -> Result<Checkout, GatewayError> {
        let amount = request.amount;
        let signature = self.sign(&self.signed_message(amount, &request.transaction_id));

        let payload = serde_json::json!({
            "amount": amount,
            "tax_amount": "0",
            "product_service_charge": "0",
            "product_delivery_charge": "0",
            "total_amount": amount,
            "transaction_uuid": request.transaction_id,
            "product_code": self.config.merchant_code,
            "success_url": self.config.success_url,
            "failure_url": self.config.failure_url,
            "signed_field_names": SIGNED_FIELD_NAMES,
            "signature": signature,
        });

        let response = self
            .http
            .post(&self.config.payment_url)
            .query(&[
                ("amount", amount.to_string()),
                ("tax_amount", "0".to_string()),
                ("product_service_charge", "0".to_string()),
                ("product_delivery_charge", "0".to_string()),
                ("total_amount", amount.to_string()),
                ("transaction_uuid", request.transaction_id.clone()),
                ("product_code", self.config.merchant_code.clone()),
                ("success_url", self.config.success_url.clone()),
                ("failure_url", self.config.failure_url.clone()),
                ("signed_field_names", SIGNED_FIELD_NAMES.to_string()),
                ("signature", signature),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::InvalidResponse(format!(
                "checkout returned HTTP {}",
                response.status()
            )));
        }

        // eSewa redirects to its hosted checkout page; the final URL is what
        // the payer must be sent to.
        let url = response.url().to_string();

        Ok(Checkout::Redirect { url, payload })
    }

    async fn confirm(
        &self,
        transaction_id: &str,
        _gateway_ref: Option<&str>,
        amount: f64,
    ) -> Result<Confirmation, GatewayError> {
        let response = self
            .http
            .get(&self.config.status_url)
            .query(&[
                ("total_amount", amount.to_string()),
                ("transaction_uuid", transaction_id.to_string()),
                ("product_code", self.config.merchant_code.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::InvalidResponse(format!(
                "status check returned HTTP {}",
                response.status()
            )));
        }

        let status: StatusResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(Confirmation {
            complete: status.status == "COMPLETE",
            reference: status.ref_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> EsewaClient {
        EsewaClient::new(EsewaConfig {
            payment_url: "https://rc-epay.esewa.com.np/api/epay/main/v2/form".to_string(),
            status_url: "https://rc.esewa.com.np/api/epay/transaction/status/".to_string(),
            merchant_code: "EPAYTEST".to_string(),
            secret_key: "8gBm/:&EnhH.1/q".to_string(),
            success_url: "https://example.com/payments/success".to_string(),
            failure_url: "https://example.com/payments/failure".to_string(),
        })
    }

    #[test]
    fn signed_message_lists_fields_in_signing_order() {
        let client = test_client();
        assert_eq!(
            client.signed_message(100.0, "TXN-1718000000000-42"),
            "total_amount=100,transaction_uuid=TXN-1718000000000-42,product_code=EPAYTEST"
        );
    }

    #[test]
    fn signature_is_deterministic_hex() {
        let client = test_client();
        let message = client.signed_message(100.0, "TXN-1718000000000-42");

        let first = client.sign(&message);
        let second = client.sign(&message);

        assert_eq!(first, second);
        assert_eq!(first.len(), 64); // SHA-256 digest, hex encoded
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_depends_on_the_message() {
        let client = test_client();
        let a = client.sign(&client.signed_message(100.0, "TXN-1"));
        let b = client.sign(&client.signed_message(100.0, "TXN-2"));
        assert_ne!(a, b);
    }
}
