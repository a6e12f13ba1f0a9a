//! Settlement coordinator tests over a mocked ledger store.
//!
//! These cover the read-side guarantees that need no live Postgres: duplicate
//! initiations reuse the first payment row without a second gateway call,
//! an incomplete gateway report mutates nothing, and a repeated confirm on a
//! settled payment short-circuits before the gateway is consulted.
//!
//! Run with: `cargo test --test settlement_test`

use async_trait::async_trait;
use sea_orm::{DatabaseBackend, MockDatabase};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use bidwork_backend::error::ApiError;
use bidwork_backend::gateways::{
    Checkout, Confirmation, GatewayError, PaymentGateway, PaymentRequest,
};
use bidwork_backend::models::contracts;
use bidwork_backend::models::payments::{self, Gateway};
use bidwork_backend::services::notify::Notifier;
use bidwork_backend::services::settlement;

/// Scripted stand-in for a gateway client. Counts calls so tests can assert
/// the coordinator never reached out when it should not have.
struct FakeGateway {
    kind: Gateway,
    confirm_complete: bool,
    start_calls: AtomicUsize,
    confirm_calls: AtomicUsize,
}

impl FakeGateway {
    fn new(kind: Gateway) -> Self {
        Self {
            kind,
            confirm_complete: true,
            start_calls: AtomicUsize::new(0),
            confirm_calls: AtomicUsize::new(0),
        }
    }

    fn reporting_incomplete(kind: Gateway) -> Self {
        Self {
            confirm_complete: false,
            ..Self::new(kind)
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    fn kind(&self) -> Gateway {
        self.kind
    }

    async fn start(&self, request: &PaymentRequest) -> Result<Checkout, GatewayError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Checkout::Redirect {
            url: format!("https://gateway.example/pay/{}", request.transaction_id),
            payload: serde_json::json!({"transaction_uuid": request.transaction_id}),
        })
    }

    async fn confirm(
        &self,
        _transaction_id: &str,
        _gateway_ref: Option<&str>,
        _amount: f64,
    ) -> Result<Confirmation, GatewayError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Confirmation {
            complete: self.confirm_complete,
            reference: self.confirm_complete.then(|| "REF-001".to_string()),
        })
    }
}

fn contract_fixture(id: Uuid) -> contracts::Model {
    contracts::Model {
        id,
        project_id: "PRJ-1758000000000-17".to_string(),
        company_id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        requirement_id: Uuid::new_v4(),
        amount: 500.0,
        advance_percent: 20,
        duration_days: 30,
        service_type: contracts::ServiceType::It,
        location: None,
        scope_summary: None,
        status: contracts::Status::Active,
        payment_status: contracts::PaymentStatus::Pending,
        contract_file: None,
        created_at: chrono::Utc::now(),
        updated_at: None,
    }
}

fn payment_fixture(
    contract: &contracts::Model,
    client_id: Uuid,
    gateway: Gateway,
    status: payments::Status,
) -> payments::Model {
    payments::Model {
        id: Uuid::new_v4(),
        contract_id: contract.id,
        client_id,
        company_id: contract.company_id,
        gateway,
        amount: 500.0,
        commission: 50.0,
        company_amount: 450.0,
        transaction_id: "TXN-1758000000000-4821".to_string(),
        gateway_ref_id: None,
        gateway_payload: serde_json::json!({}),
        status,
        created_at: chrono::Utc::now(),
        updated_at: None,
    }
}

#[tokio::test]
async fn duplicate_initiate_reuses_the_existing_payment_without_calling_the_gateway() {
    let contract = contract_fixture(Uuid::new_v4());
    let client_id = contract.client_id;
    let existing = payment_fixture(&contract, client_id, Gateway::Esewa, payments::Status::Pending);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![contract.clone()]])
        .append_query_results([vec![existing.clone()]])
        .into_connection();

    let gateway = FakeGateway::new(Gateway::Esewa);

    let outcome = settlement::initiate(
        &db,
        &gateway,
        &Notifier::disabled(),
        contract.id,
        client_id,
        500.0,
    )
    .await
    .unwrap();

    assert!(outcome.reused);
    assert!(outcome.checkout.is_none());
    assert_eq!(outcome.payment.id, existing.id);
    assert_eq!(gateway.start_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn initiate_rejects_a_non_positive_amount_before_any_lookup() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let gateway = FakeGateway::new(Gateway::Esewa);

    let result = settlement::initiate(
        &db,
        &gateway,
        &Notifier::disabled(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        0.0,
    )
    .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert_eq!(gateway.start_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn initiate_on_a_missing_contract_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<contracts::Model>::new()])
        .into_connection();
    let gateway = FakeGateway::new(Gateway::Esewa);

    let result = settlement::initiate(
        &db,
        &gateway,
        &Notifier::disabled(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        500.0,
    )
    .await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
    assert_eq!(gateway.start_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn incomplete_gateway_report_changes_nothing() {
    let contract = contract_fixture(Uuid::new_v4());
    let payment = payment_fixture(
        &contract,
        contract.client_id,
        Gateway::Esewa,
        payments::Status::Pending,
    );

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![payment.clone()]])
        .append_query_results([vec![contract.clone()]])
        .into_connection();

    let gateway = FakeGateway::reporting_incomplete(Gateway::Esewa);

    let result = settlement::confirm(&db, &gateway, &Notifier::disabled(), payment.id).await;

    assert!(matches!(result, Err(ApiError::PaymentNotCompleted)));
    assert_eq!(gateway.confirm_calls.load(Ordering::SeqCst), 1);

    // No UPDATE reached the store: the transaction log holds only the two
    // SELECTs above.
    let log = db.into_transaction_log();
    assert_eq!(log.len(), 2);
}

#[tokio::test]
async fn confirming_a_settled_payment_short_circuits() {
    let contract = contract_fixture(Uuid::new_v4());
    let payment = payment_fixture(
        &contract,
        contract.client_id,
        Gateway::Esewa,
        payments::Status::Success,
    );

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![payment.clone()]])
        .append_query_results([vec![contract.clone()]])
        .into_connection();

    let gateway = FakeGateway::new(Gateway::Esewa);

    let outcome = settlement::confirm(&db, &gateway, &Notifier::disabled(), payment.id)
        .await
        .unwrap();

    assert!(outcome.already_confirmed);
    assert_eq!(outcome.payment.id, payment.id);
    // The gateway was never consulted for a replay.
    assert_eq!(gateway.confirm_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn confirm_rejects_the_wrong_gateway() {
    let contract = contract_fixture(Uuid::new_v4());
    let payment = payment_fixture(
        &contract,
        contract.client_id,
        Gateway::Esewa,
        payments::Status::Pending,
    );

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![payment.clone()]])
        .into_connection();

    // The payment was initiated through eSewa; confirming through Stripe
    // must be refused before anything else happens.
    let gateway = FakeGateway::new(Gateway::Stripe);

    let result = settlement::confirm(&db, &gateway, &Notifier::disabled(), payment.id).await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert_eq!(gateway.confirm_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn confirm_on_a_missing_payment_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<payments::Model>::new()])
        .into_connection();
    let gateway = FakeGateway::new(Gateway::Esewa);

    let result =
        settlement::confirm(&db, &gateway, &Notifier::disabled(), Uuid::new_v4()).await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}
