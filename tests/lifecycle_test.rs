//! Contract lifecycle tests over a mocked ledger store.
//!
//! State-machine guards are all observable from the read side: terminal
//! states refuse transitions, re-declining is a no-op, and a requirement
//! can only ever carry one active contract.
//!
//! Run with: `cargo test --test lifecycle_test`

use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::Uuid;

use bidwork_backend::error::ApiError;
use bidwork_backend::models::contracts::{self, ContractTerms, PaymentStatus, ServiceType, Status};
use bidwork_backend::models::requirements;
use bidwork_backend::services::lifecycle;

fn requirement_fixture(id: Uuid, user_id: Uuid) -> requirements::Model {
    requirements::Model {
        id,
        user_id,
        title: "Office wiring overhaul".to_string(),
        description: "Rewire three floors".to_string(),
        category: requirements::Category::Mep,
        work_type: requirements::WorkType::Onsite,
        min_budget: 300.0,
        max_budget: 800.0,
        skills: None,
        created_at: chrono::Utc::now(),
    }
}

fn contract_fixture(status: Status) -> contracts::Model {
    contracts::Model {
        id: Uuid::new_v4(),
        project_id: "PRJ-1758000000000-17".to_string(),
        company_id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        requirement_id: Uuid::new_v4(),
        amount: 500.0,
        advance_percent: 20,
        duration_days: 30,
        service_type: ServiceType::It,
        location: None,
        scope_summary: None,
        status,
        payment_status: PaymentStatus::Pending,
        contract_file: None,
        created_at: chrono::Utc::now(),
        updated_at: None,
    }
}

fn terms(amount: f64, advance_percent: i32, duration_days: i32) -> ContractTerms {
    ContractTerms {
        client_id: Uuid::new_v4(),
        requirement_id: Uuid::new_v4(),
        amount,
        advance_percent,
        duration_days,
        service_type: ServiceType::It,
        location: None,
        scope_summary: None,
    }
}

#[tokio::test]
async fn declining_twice_is_a_noop() {
    let contract = contract_fixture(Status::Terminated);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![contract.clone()]])
        .into_connection();

    let result = lifecycle::decline_contract(&db, contract.id).await.unwrap();

    assert_eq!(result.status, Status::Terminated);

    // Only the lookup hit the store; nothing was re-written.
    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn declining_an_active_contract_is_a_state_error() {
    let contract = contract_fixture(Status::Active);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![contract.clone()]])
        .into_connection();

    let result = lifecycle::decline_contract(&db, contract.id).await;

    assert!(matches!(result, Err(ApiError::StateTransition(_))));
}

#[tokio::test]
async fn accepting_a_terminated_contract_is_a_state_error() {
    let contract = contract_fixture(Status::Terminated);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![contract.clone()]])
        .into_connection();

    let result = lifecycle::accept_contract(&db, contract.id).await;

    assert!(matches!(result, Err(ApiError::StateTransition(_))));
}

#[tokio::test]
async fn accepting_an_already_active_contract_is_a_noop() {
    let contract = contract_fixture(Status::Active);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![contract.clone()]])
        .into_connection();

    let result = lifecycle::accept_contract(&db, contract.id).await.unwrap();

    assert_eq!(result.id, contract.id);
    assert_eq!(result.status, Status::Active);
}

#[tokio::test]
async fn accepting_a_missing_contract_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<contracts::Model>::new()])
        .into_connection();

    let result = lifecycle::accept_contract(&db, Uuid::new_v4()).await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn a_requirement_carries_at_most_one_active_contract() {
    let pending = contract_fixture(Status::PendingSignature);
    let requirement = requirement_fixture(pending.requirement_id, pending.client_id);
    let mut rival = contract_fixture(Status::Active);
    rival.requirement_id = pending.requirement_id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending.clone()]])
        .append_query_results([vec![requirement]])
        .append_query_results([vec![rival]])
        .into_connection();

    let result = lifecycle::accept_contract(&db, pending.id).await;

    assert!(matches!(result, Err(ApiError::Conflict(_))));
}

#[tokio::test]
async fn contract_terms_are_validated_before_any_lookup() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    for bad in [
        terms(0.0, 20, 30),
        terms(-5.0, 20, 30),
        terms(500.0, 101, 30),
        terms(500.0, -1, 30),
        terms(500.0, 20, 0),
    ] {
        let result = lifecycle::create_contract(&db, Uuid::new_v4(), bad).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
