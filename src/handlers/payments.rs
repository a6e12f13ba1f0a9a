use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::authorization::{require_client, require_contract_client};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::contracts as contract_db;
use crate::db::payments as payment_db;
use crate::error::ApiError;
use crate::gateways::{Checkout, EsewaClient, StripeClient};
use crate::services::notify::Notifier;
use crate::services::settlement::{self, ConfirmOutcome};

#[derive(Debug, Deserialize)]
pub struct InitiatePayment {
    pub contract_id: Uuid,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPayment {
    pub payment_id: Uuid,
}

/// POST /api/payments/esewa/initiate — start an eSewa checkout for a
/// contract. Idempotent per (contract, client, gateway): repeating the call
/// returns the existing payment without touching eSewa again.
pub async fn esewa_initiate(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    esewa: web::Data<EsewaClient>,
    notifier: web::Data<Notifier>,
    body: web::Json<InitiatePayment>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;
    let input = body.into_inner();

    let contract = contract_db::get_contract_by_id(db.get_ref(), input.contract_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contract {} not found", input.contract_id)))?;
    require_contract_client(&contract, user.0.id)?;

    let outcome = settlement::initiate(
        db.get_ref(),
        esewa.get_ref(),
        notifier.get_ref(),
        input.contract_id,
        user.0.id,
        input.amount,
    )
    .await?;

    let redirect_url = match &outcome.checkout {
        Some(Checkout::Redirect { url, .. }) => Some(url.clone()),
        _ => None,
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "payment": outcome.payment,
        "redirect_url": redirect_url,
        "reused": outcome.reused,
    })))
}

/// POST /api/payments/esewa/verify — poll eSewa for the transfer's status
/// and settle the payment if it completed. Safe to repeat.
pub async fn esewa_verify(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    esewa: web::Data<EsewaClient>,
    notifier: web::Data<Notifier>,
    body: web::Json<VerifyPayment>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;

    let outcome = settlement::confirm(
        db.get_ref(),
        esewa.get_ref(),
        notifier.get_ref(),
        body.payment_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(confirm_response(outcome)))
}

/// POST /api/payments/stripe/intent — create a Stripe payment intent for a
/// contract. Stripe confirms at intent creation, so the payment row settles
/// and the contract's payment progress advances in the same call.
pub async fn stripe_intent(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    stripe: web::Data<StripeClient>,
    notifier: web::Data<Notifier>,
    body: web::Json<InitiatePayment>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;
    let input = body.into_inner();

    let contract = contract_db::get_contract_by_id(db.get_ref(), input.contract_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contract {} not found", input.contract_id)))?;
    require_contract_client(&contract, user.0.id)?;

    let outcome = settlement::initiate(
        db.get_ref(),
        stripe.get_ref(),
        notifier.get_ref(),
        input.contract_id,
        user.0.id,
        input.amount,
    )
    .await?;

    let client_secret = match &outcome.checkout {
        Some(Checkout::Intent { client_secret, .. }) => Some(client_secret.clone()),
        _ => None,
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "client_secret": client_secret,
        "payment": outcome.payment,
        "reused": outcome.reused,
    })))
}

/// POST /api/payments/stripe/verify — manual fallback when the webhook
/// channel is unavailable: retrieve the intent and settle if it succeeded.
pub async fn stripe_verify(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    stripe: web::Data<StripeClient>,
    notifier: web::Data<Notifier>,
    body: web::Json<VerifyPayment>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;

    let outcome = settlement::confirm(
        db.get_ref(),
        stripe.get_ref(),
        notifier.get_ref(),
        body.payment_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(confirm_response(outcome)))
}

/// GET /api/payments/contract/{contract_id} — the contract's payment audit
/// trail, oldest first. Visible to the contract's client.
pub async fn get_payments_for_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let contract_id = path.into_inner();

    let contract = contract_db::get_contract_by_id(db.get_ref(), contract_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contract {contract_id} not found")))?;
    require_contract_client(&contract, user.0.id)?;

    let payments = payment_db::get_payments_for_contract(db.get_ref(), contract_id).await?;

    Ok(HttpResponse::Ok().json(payments))
}

fn confirm_response(outcome: ConfirmOutcome) -> serde_json::Value {
    serde_json::json!({
        "payment": outcome.payment,
        "contract_payment_status": outcome.contract.payment_status,
        "already_confirmed": outcome.already_confirmed,
    })
}
