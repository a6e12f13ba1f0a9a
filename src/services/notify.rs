use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What happened, from the recipient's point of view.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    QuoteRequested,
    QuoteSubmitted,
    ContractGenerated,
    PaymentReceived,
}

/// Client for the notification delivery service.
///
/// Delivery is fire-and-forget: every send runs on a spawned task, failures
/// are logged and dropped, and nothing here ever blocks or fails the
/// operation that triggered the notification.
#[derive(Clone)]
pub struct Notifier {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build notifier HTTP client");

        Self { http, webhook_url }
    }

    /// Reads `NOTIFY_WEBHOOK_URL`; unset means notifications are disabled.
    pub fn from_env() -> Self {
        Self::new(std::env::var("NOTIFY_WEBHOOK_URL").ok())
    }

    /// A notifier that never sends anything (tests, local runs).
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn notify(&self, user_id: Uuid, kind: NotificationKind, payload: serde_json::Value) {
        let Some(url) = self.webhook_url.clone() else {
            tracing::debug!(?kind, %user_id, "notification delivery disabled, dropping");
            return;
        };

        let http = self.http.clone();
        let body = serde_json::json!({
            "user_id": user_id,
            "kind": kind,
            "payload": payload,
        });

        tokio::spawn(async move {
            match http.post(&url).json(&body).send().await {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => {
                    tracing::warn!(status = %response.status(), "notification delivery rejected");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "notification delivery failed");
                }
            }
        });
    }

    // ── Convenience wrappers for the kinds this crate emits ──

    /// Tell a company's user that a client wants a quote from them.
    pub fn quote_requested(&self, company_user_id: Uuid, requirement_id: Uuid, client_name: &str) {
        self.notify(
            company_user_id,
            NotificationKind::QuoteRequested,
            serde_json::json!({
                "requirement_id": requirement_id,
                "client_name": client_name,
            }),
        );
    }

    /// Tell a client that a company quoted on their requirement.
    pub fn quote_submitted(&self, client_id: Uuid, quote_id: Uuid, company_name: &str) {
        self.notify(
            client_id,
            NotificationKind::QuoteSubmitted,
            serde_json::json!({
                "quote_id": quote_id,
                "company_name": company_name,
            }),
        );
    }

    /// Tell the company that the client signed and the contract went active.
    pub fn contract_generated(&self, company_user_id: Uuid, contract_id: Uuid) {
        self.notify(
            company_user_id,
            NotificationKind::ContractGenerated,
            serde_json::json!({ "contract_id": contract_id }),
        );
    }

    /// Tell the payer that their payment settled.
    pub fn payment_received(&self, client_id: Uuid, payment_id: Uuid, company_amount: f64) {
        self.notify(
            client_id,
            NotificationKind::PaymentReceived,
            serde_json::json!({
                "payment_id": payment_id,
                "amount": company_amount,
            }),
        );
    }
}
