use rand::Rng;
use sea_orm::{DatabaseConnection, SqlErr, TransactionTrait};
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::gateways::{Checkout, PaymentGateway, PaymentRequest};
use crate::models::contracts;
use crate::models::payments::{self, NewPayment};
use crate::services::notify::Notifier;

/// Platform cut of every settled payment.
pub const COMMISSION_RATE: f64 = 0.10;

/// Split an amount into (commission, company_amount).
pub fn commission_split(amount: f64) -> (f64, f64) {
    let commission = amount * COMMISSION_RATE;
    (commission, amount - commission)
}

/// Caller-generated transfer id sent to the gateway: `TXN-<millis>-<random>`.
///
/// Unique per attempt; the unique column turns the astronomically rare
/// collision into a retryable conflict instead of a corrupt row.
pub fn new_transaction_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let salt = rand::thread_rng().gen_range(0..10_000);
    format!("TXN-{millis}-{salt}")
}

/// What `initiate` hands back to the payment handler.
#[derive(Debug)]
pub struct InitiateOutcome {
    pub payment: payments::Model,
    /// Present only when the gateway was actually called this time.
    pub checkout: Option<Checkout>,
    /// True when an existing payment row absorbed the duplicate initiation.
    pub reused: bool,
}

/// What `confirm` hands back to the payment handler.
#[derive(Debug)]
pub struct ConfirmOutcome {
    pub payment: payments::Model,
    pub contract: contracts::Model,
    /// True when the payment had already settled and nothing was re-applied.
    pub already_confirmed: bool,
}

/// Start a payment against a contract through the given gateway.
///
/// Initiation is idempotent on (contract, client, gateway): a repeat call
/// returns the existing row without calling the gateway again. The pre-check
/// races with concurrent initiations, so the unique index is the actual
/// guarantee — a losing insert rolls back and returns the winning row.
///
/// Hosted-intent gateways confirm at intent creation, so their payment row
/// is born `Success` and the contract's payment progress advances in the
/// same transaction as the insert.
pub async fn initiate(
    db: &DatabaseConnection,
    gateway: &dyn PaymentGateway,
    notifier: &Notifier,
    contract_id: Uuid,
    client_id: Uuid,
    amount: f64,
) -> Result<InitiateOutcome, ApiError> {
    if amount <= 0.0 {
        return Err(ApiError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }

    let contract = db::contracts::get_contract_by_id(db, contract_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contract {contract_id} not found")))?;

    if let Some(existing) =
        db::payments::find_by_initiation_key(db, contract_id, client_id, gateway.kind()).await?
    {
        tracing::info!(
            payment_id = %existing.id,
            contract_id = %contract_id,
            "duplicate initiation, returning existing payment"
        );
        return Ok(InitiateOutcome {
            payment: existing,
            checkout: None,
            reused: true,
        });
    }

    let (commission, company_amount) = commission_split(amount);
    let transaction_id = new_transaction_id();

    let checkout = gateway
        .start(&PaymentRequest {
            amount,
            transaction_id: transaction_id.clone(),
            contract_id,
            client_id,
        })
        .await?;

    let status = if checkout.confirms_synchronously() {
        payments::Status::Success
    } else {
        payments::Status::Pending
    };

    let new_payment = NewPayment {
        contract_id,
        client_id,
        company_id: contract.company_id,
        gateway: gateway.kind(),
        amount,
        commission,
        company_amount,
        transaction_id,
        gateway_ref_id: checkout.gateway_ref(),
        gateway_payload: checkout.payload().clone(),
        status,
    };

    let txn = db.begin().await.map_err(ApiError::Database)?;

    let payment = match db::payments::insert_payment(&txn, new_payment).await {
        Ok(payment) => payment,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            // Lost the initiation race; the winner's row is the payment.
            txn.rollback().await.map_err(ApiError::Database)?;

            let winner =
                db::payments::find_by_initiation_key(db, contract_id, client_id, gateway.kind())
                    .await?
                    .ok_or_else(|| {
                        ApiError::Conflict(
                            "payment initiation conflicted, retry the request".to_string(),
                        )
                    })?;

            return Ok(InitiateOutcome {
                payment: winner,
                checkout: None,
                reused: true,
            });
        }
        Err(e) => return Err(e.into()),
    };

    if payment.status == payments::Status::Success {
        db::contracts::advance_payment_status(&txn, payment.contract_id).await?;
    }

    txn.commit().await.map_err(ApiError::Database)?;

    if payment.status == payments::Status::Success {
        notifier.payment_received(payment.client_id, payment.id, payment.company_amount);
    }

    Ok(InitiateOutcome {
        payment,
        checkout: Some(checkout),
        reused: false,
    })
}

/// Reconcile a payment against the gateway's view of the transfer.
///
/// A payment that already settled returns immediately without touching the
/// gateway or the contract — repeated confirms are safe. A gateway report of
/// anything other than completion changes nothing and surfaces as
/// `PaymentNotCompleted`, so the caller can poll again. On completion the
/// payment flip and the contract's payment-progress advance commit together.
pub async fn confirm(
    db: &DatabaseConnection,
    gateway: &dyn PaymentGateway,
    notifier: &Notifier,
    payment_id: Uuid,
) -> Result<ConfirmOutcome, ApiError> {
    let payment = db::payments::get_payment_by_id(db, payment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment {payment_id} not found")))?;

    if payment.gateway != gateway.kind() {
        return Err(ApiError::Validation(
            "payment was initiated through a different gateway".to_string(),
        ));
    }

    let contract = db::contracts::get_contract_by_id(db, payment.contract_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Contract {} not found", payment.contract_id))
        })?;

    if payment.status == payments::Status::Success {
        return Ok(ConfirmOutcome {
            payment,
            contract,
            already_confirmed: true,
        });
    }

    let confirmation = gateway
        .confirm(
            &payment.transaction_id,
            payment.gateway_ref_id.as_deref(),
            payment.amount,
        )
        .await?;

    if !confirmation.complete {
        return Err(ApiError::PaymentNotCompleted);
    }

    let txn = db.begin().await.map_err(ApiError::Database)?;

    let settled = db::payments::mark_success(&txn, payment, confirmation.reference).await?;
    let contract = db::contracts::advance_payment_status(&txn, settled.contract_id).await?;

    txn.commit().await.map_err(ApiError::Database)?;

    tracing::info!(
        payment_id = %settled.id,
        contract_id = %contract.id,
        payment_status = ?contract.payment_status,
        "payment settled"
    );

    notifier.payment_received(settled.client_id, settled.id, settled.company_amount);

    Ok(ConfirmOutcome {
        payment: settled,
        contract,
        already_confirmed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_is_ten_percent() {
        let (commission, company_amount) = commission_split(1000.0);
        assert_eq!(commission, 100.0);
        assert_eq!(company_amount, 900.0);
    }

    #[test]
    fn split_always_sums_back_to_the_amount() {
        for amount in [500.0, 1234.56, 0.01, 99_999.99] {
            let (commission, company_amount) = commission_split(amount);
            assert!((commission + company_amount - amount).abs() < 1e-9);
        }
    }

    #[test]
    fn transaction_ids_have_the_gateway_format() {
        let id = new_transaction_id();
        let mut parts = id.splitn(3, '-');

        assert_eq!(parts.next(), Some("TXN"));
        assert!(parts.next().unwrap().parse::<i64>().is_ok());
        let salt: u32 = parts.next().unwrap().parse().unwrap();
        assert!(salt < 10_000);
    }
}
