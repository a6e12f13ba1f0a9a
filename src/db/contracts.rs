use sea_orm::*;
use uuid::Uuid;

use crate::models::contracts::{self, ContractTerms, PaymentStatus, Status};

/// Insert a contract in `PendingSignature` with payment progress `Pending`.
pub async fn insert_contract(
    db: &DatabaseConnection,
    project_id: String,
    company_id: Uuid,
    terms: ContractTerms,
) -> Result<contracts::Model, DbErr> {
    let new_contract = contracts::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        company_id: Set(company_id),
        client_id: Set(terms.client_id),
        requirement_id: Set(terms.requirement_id),
        amount: Set(terms.amount),
        advance_percent: Set(terms.advance_percent),
        duration_days: Set(terms.duration_days),
        service_type: Set(terms.service_type),
        location: Set(terms.location),
        scope_summary: Set(terms.scope_summary),
        status: Set(Status::PendingSignature),
        payment_status: Set(PaymentStatus::Pending),
        contract_file: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_contract.insert(db).await
}

/// Fetch a single contract by ID.
pub async fn get_contract_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find_by_id(id).one(db).await
}

/// Fetch a contract inside a transaction with a row lock, so concurrent
/// activations serialize on the same row.
pub async fn get_contract_for_update<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await
}

/// Whether some other contract is already active for the requirement.
pub async fn other_active_contract_exists<C: ConnectionTrait>(
    conn: &C,
    requirement_id: Uuid,
    excluding: Uuid,
) -> Result<bool, DbErr> {
    let found = contracts::Entity::find()
        .filter(contracts::Column::RequirementId.eq(requirement_id))
        .filter(contracts::Column::Status.eq(Status::Active))
        .filter(contracts::Column::Id.ne(excluding))
        .one(conn)
        .await?;

    Ok(found.is_some())
}

/// Flip a contract's status.
pub async fn set_status<C: ConnectionTrait>(
    conn: &C,
    contract: contracts::Model,
    status: Status,
) -> Result<contracts::Model, DbErr> {
    let mut active: contracts::ActiveModel = contract.into();
    active.status = Set(status);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(conn).await
}

/// Advance the contract's payment progress one step; no-op once fully paid.
///
/// Called once per confirmed payment, inside the settlement transaction. The
/// row is locked first so two confirmations cannot both read the same step.
pub async fn advance_payment_status<C: ConnectionTrait>(
    conn: &C,
    contract_id: Uuid,
) -> Result<contracts::Model, DbErr> {
    let contract = contracts::Entity::find_by_id(contract_id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(DbErr::RecordNotFound("Contract not found".to_string()))?;

    let Some(next) = contract.payment_status.next() else {
        return Ok(contract);
    };

    let mut active: contracts::ActiveModel = contract.into();
    active.payment_status = Set(next);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(conn).await
}

/// Store the rendered contract document URL.
pub async fn set_contract_file(
    db: &DatabaseConnection,
    contract_id: Uuid,
    url: String,
) -> Result<contracts::Model, DbErr> {
    let contract = contracts::Entity::find_by_id(contract_id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Contract not found".to_string()))?;

    let mut active: contracts::ActiveModel = contract.into();
    active.contract_file = Set(Some(url));
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

// ── List queries ──

/// A company's contracts still awaiting the client's signature.
pub async fn get_pending_contracts_for_company(
    db: &DatabaseConnection,
    company_id: Uuid,
) -> Result<Vec<contracts::Model>, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::CompanyId.eq(company_id))
        .filter(contracts::Column::Status.eq(Status::PendingSignature))
        .order_by_desc(contracts::Column::CreatedAt)
        .all(db)
        .await
}

/// A company's running or finished projects (anything past signature).
pub async fn get_projects_for_company(
    db: &DatabaseConnection,
    company_id: Uuid,
) -> Result<Vec<contracts::Model>, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::CompanyId.eq(company_id))
        .filter(contracts::Column::Status.ne(Status::PendingSignature))
        .order_by_desc(contracts::Column::CreatedAt)
        .all(db)
        .await
}

/// Contracts waiting for this client's signature.
pub async fn get_pending_contracts_for_client(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> Result<Vec<contracts::Model>, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::ClientId.eq(client_id))
        .filter(contracts::Column::Status.eq(Status::PendingSignature))
        .order_by_desc(contracts::Column::CreatedAt)
        .all(db)
        .await
}

/// Contracts the client has accepted (active or completed).
pub async fn get_accepted_contracts_for_client(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> Result<Vec<contracts::Model>, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::ClientId.eq(client_id))
        .filter(contracts::Column::Status.is_in([Status::Active, Status::Completed]))
        .order_by_desc(contracts::Column::CreatedAt)
        .all(db)
        .await
}
