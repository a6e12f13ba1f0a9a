use rand::Rng;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::models::contracts::{self, ContractTerms, Status};

/// Externally meaningful project identifier: `PRJ-<millis>-<4-digit random>`.
///
/// Uniqueness is backed by the unique column; a collision surfaces as a
/// conflict the caller can retry.
pub fn generate_project_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let salt = rand::thread_rng().gen_range(0..10_000);
    format!("PRJ-{millis}-{salt}")
}

/// Draft a contract from an accepted quote.
///
/// Resolves the submitting user's company, validates the terms, and inserts
/// the row in `PendingSignature` with payment progress `Pending`.
pub async fn create_contract(
    db: &DatabaseConnection,
    company_user_id: Uuid,
    terms: ContractTerms,
) -> Result<contracts::Model, ApiError> {
    if terms.amount <= 0.0 {
        return Err(ApiError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }
    if !(0..=100).contains(&terms.advance_percent) {
        return Err(ApiError::Validation(
            "advance_percent must be between 0 and 100".to_string(),
        ));
    }
    if terms.duration_days <= 0 {
        return Err(ApiError::Validation(
            "duration_days must be greater than zero".to_string(),
        ));
    }

    let company = db::companies::get_company_by_user(db, company_user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No company registered for this user".to_string()))?;

    db::requirements::get_requirement_by_id(db, terms.requirement_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Requirement {} not found", terms.requirement_id))
        })?;

    let project_id = generate_project_id();

    let contract = db::contracts::insert_contract(db, project_id, company.id, terms).await?;

    Ok(contract)
}

/// Activate a contract and foreclose the requirement's other quotes.
///
/// One transaction does both: the contract flips to `Active` and every bid
/// of the requirement that is not `Accepted` flips to `Declined`. Partial
/// application would corrupt the negotiation state, so neither effect is
/// visible unless both commit. The contract row is locked for the duration;
/// a concurrent accept of the same contract observes `Active` and no-ops.
pub async fn accept_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
) -> Result<contracts::Model, ApiError> {
    let txn = db.begin().await.map_err(ApiError::Database)?;

    let contract = db::contracts::get_contract_for_update(&txn, contract_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contract {contract_id} not found")))?;

    match contract.status {
        Status::PendingSignature => {}
        Status::Active => {
            // Already activated (possibly by a concurrent request).
            txn.commit().await.map_err(ApiError::Database)?;
            return Ok(contract);
        }
        Status::Terminated | Status::Completed => {
            return Err(ApiError::StateTransition(format!(
                "Contract {contract_id} is {:?} and cannot be accepted",
                contract.status
            )));
        }
    }

    // Serialize activations per requirement: the requirement row lock makes
    // the single-active-contract check below race-free.
    db::requirements::get_requirement_for_update(&txn, contract.requirement_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Requirement {} not found", contract.requirement_id))
        })?;

    // Only one contract may go active per requirement.
    if db::contracts::other_active_contract_exists(&txn, contract.requirement_id, contract.id)
        .await?
    {
        return Err(ApiError::Conflict(
            "Another contract is already active for this requirement".to_string(),
        ));
    }

    let requirement_id = contract.requirement_id;
    let activated = db::contracts::set_status(&txn, contract, Status::Active).await?;

    let declined = db::bids::decline_competing_bids(&txn, requirement_id).await?;

    txn.commit().await.map_err(ApiError::Database)?;

    tracing::info!(
        contract_id = %activated.id,
        project_id = %activated.project_id,
        declined_bids = declined,
        "contract activated"
    );

    Ok(activated)
}

/// Terminate a pending contract on the client's behalf.
///
/// Re-declining an already-terminated contract is a successful no-op.
pub async fn decline_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
) -> Result<contracts::Model, ApiError> {
    let contract = db::contracts::get_contract_by_id(db, contract_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contract {contract_id} not found")))?;

    match contract.status {
        Status::Terminated => Ok(contract),
        Status::PendingSignature => {
            let terminated = db::contracts::set_status(db, contract, Status::Terminated).await?;
            tracing::info!(contract_id = %terminated.id, "contract terminated");
            Ok(terminated)
        }
        Status::Active | Status::Completed => Err(ApiError::StateTransition(format!(
            "Contract {contract_id} is {:?} and cannot be declined",
            contract.status
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_ids_have_the_external_format() {
        let id = generate_project_id();
        let mut parts = id.splitn(3, '-');

        assert_eq!(parts.next(), Some("PRJ"));
        assert!(parts.next().unwrap().parse::<i64>().is_ok());
        let salt: u32 = parts.next().unwrap().parse().unwrap();
        assert!(salt < 10_000);
    }

    #[test]
    fn project_ids_differ_across_calls() {
        // Same-millisecond collisions are possible for any single pair, so
        // sample a batch and require variety.
        let ids: std::collections::HashSet<_> =
            (0..10).map(|_| generate_project_id()).collect();
        assert!(ids.len() > 1);
    }
}
