use sea_orm::*;
use uuid::Uuid;

use crate::models::payments::{self, Gateway, NewPayment};

/// The payment row for the initiation idempotency key, if one exists.
pub async fn find_by_initiation_key<C: ConnectionTrait>(
    conn: &C,
    contract_id: Uuid,
    client_id: Uuid,
    gateway: Gateway,
) -> Result<Option<payments::Model>, DbErr> {
    payments::Entity::find()
        .filter(payments::Column::ContractId.eq(contract_id))
        .filter(payments::Column::ClientId.eq(client_id))
        .filter(payments::Column::Gateway.eq(gateway))
        .one(conn)
        .await
}

/// Insert a payment row.
///
/// The `(contract_id, client_id, gateway)` unique index backs this up: if two
/// initiations race past the pre-check, one insert fails with a unique
/// violation and the caller re-reads the winning row.
pub async fn insert_payment<C: ConnectionTrait>(
    conn: &C,
    input: NewPayment,
) -> Result<payments::Model, DbErr> {
    let new_payment = payments::ActiveModel {
        id: Set(Uuid::new_v4()),
        contract_id: Set(input.contract_id),
        client_id: Set(input.client_id),
        company_id: Set(input.company_id),
        gateway: Set(input.gateway),
        amount: Set(input.amount),
        commission: Set(input.commission),
        company_amount: Set(input.company_amount),
        transaction_id: Set(input.transaction_id),
        gateway_ref_id: Set(input.gateway_ref_id),
        gateway_payload: Set(input.gateway_payload),
        status: Set(input.status),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_payment.insert(conn).await
}

/// Fetch a single payment by ID.
pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<payments::Model>, DbErr> {
    payments::Entity::find_by_id(id).one(db).await
}

/// Mark a payment as succeeded, recording the gateway's reference id.
pub async fn mark_success<C: ConnectionTrait>(
    conn: &C,
    payment: payments::Model,
    gateway_ref_id: Option<String>,
) -> Result<payments::Model, DbErr> {
    let mut active: payments::ActiveModel = payment.into();
    active.status = Set(payments::Status::Success);
    if gateway_ref_id.is_some() {
        active.gateway_ref_id = Set(gateway_ref_id);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(conn).await
}

/// All payments recorded against a contract, oldest first (audit view).
pub async fn get_payments_for_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
) -> Result<Vec<payments::Model>, DbErr> {
    payments::Entity::find()
        .filter(payments::Column::ContractId.eq(contract_id))
        .order_by_asc(payments::Column::CreatedAt)
        .all(db)
        .await
}
