use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{require_client, require_contract_client, resolve_company};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::companies as company_db;
use crate::db::contracts as contract_db;
use crate::error::ApiError;
use crate::models::contracts::ContractTerms;
use crate::services::documents::DocumentRenderer;
use crate::services::lifecycle;
use crate::services::notify::Notifier;

/// POST /api/contracts — the company drafts a contract from an accepted
/// quote. The contract waits in `pending_signature` for the client.
pub async fn create_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<ContractTerms>,
) -> Result<HttpResponse, ApiError> {
    let contract = lifecycle::create_contract(db.get_ref(), user.0.id, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(contract))
}

/// POST /api/contracts/{id}/accept — the client signs; the contract goes
/// active and every competing quote on the requirement is declined.
///
/// Document generation runs after the activation transaction committed; a
/// render failure is logged and reported as a missing URL, never rolled back.
pub async fn accept_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    renderer: web::Data<DocumentRenderer>,
    notifier: web::Data<Notifier>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;
    let contract_id = path.into_inner();

    // Party check before touching any state.
    let contract = contract_db::get_contract_by_id(db.get_ref(), contract_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contract {contract_id} not found")))?;
    require_contract_client(&contract, user.0.id)?;

    let activated = lifecycle::accept_contract(db.get_ref(), contract_id).await?;

    let document_url = match renderer
        .generate_for_contract(db.get_ref(), &activated)
        .await
    {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(contract_id = %activated.id, error = %e, "contract document generation failed");
            None
        }
    };

    if let Ok(Some(company)) = company_db::get_company_by_id(db.get_ref(), activated.company_id).await
    {
        notifier.contract_generated(company.user_id, activated.id);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "contract": activated,
        "document_url": document_url,
    })))
}

/// POST /api/contracts/{id}/decline — the client declines; the contract is
/// terminated. Declining twice is a no-op, not an error.
pub async fn decline_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;
    let contract_id = path.into_inner();

    let contract = contract_db::get_contract_by_id(db.get_ref(), contract_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contract {contract_id} not found")))?;
    require_contract_client(&contract, user.0.id)?;

    let terminated = lifecycle::decline_contract(db.get_ref(), contract_id).await?;

    Ok(HttpResponse::Ok().json(terminated))
}

/// GET /api/contracts/{id} — a single contract, visible to its parties only.
pub async fn get_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let contract_id = path.into_inner();
    let user_id = user.0.id;

    let contract = contract_db::get_contract_by_id(db.get_ref(), contract_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contract {contract_id} not found")))?;

    if contract.client_id != user_id {
        let company = company_db::get_company_by_id(db.get_ref(), contract.company_id).await?;
        if company.map(|c| c.user_id) != Some(user_id) {
            return Err(ApiError::Forbidden(
                "You are not a party to this contract".to_string(),
            ));
        }
    }

    Ok(HttpResponse::Ok().json(contract))
}

/// GET /api/contracts/company/pending — the caller company's contracts still
/// awaiting signature.
pub async fn get_pending_for_company(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let company = resolve_company(db.get_ref(), &user.0).await?;

    let contracts =
        contract_db::get_pending_contracts_for_company(db.get_ref(), company.id).await?;

    Ok(HttpResponse::Ok().json(contracts))
}

/// GET /api/contracts/company/projects — the caller company's contracts past
/// signature (active, terminated, completed).
pub async fn get_projects_for_company(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let company = resolve_company(db.get_ref(), &user.0).await?;

    let contracts = contract_db::get_projects_for_company(db.get_ref(), company.id).await?;

    Ok(HttpResponse::Ok().json(contracts))
}

/// GET /api/contracts/client/pending — contracts waiting for the caller's
/// signature.
pub async fn get_pending_for_client(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;

    let contracts = contract_db::get_pending_contracts_for_client(db.get_ref(), user.0.id).await?;

    Ok(HttpResponse::Ok().json(contracts))
}

/// GET /api/contracts/client/accepted — contracts the caller has signed
/// (active or completed).
pub async fn get_accepted_for_client(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;

    let contracts = contract_db::get_accepted_contracts_for_client(db.get_ref(), user.0.id).await?;

    Ok(HttpResponse::Ok().json(contracts))
}
