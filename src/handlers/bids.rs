use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{require_client, resolve_company};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::bids as bid_db;
use crate::db::companies as company_db;
use crate::db::requirements as requirement_db;
use crate::error::ApiError;
use crate::models::bid_requests::CreateBidRequest;
use crate::models::bids::SubmitQuote;
use crate::services::notify::Notifier;

/// POST /api/bids/requests — a client invites a company to quote on a
/// requirement.
pub async fn request_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
    body: web::Json<CreateBidRequest>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;
    let input = body.into_inner();

    let company = company_db::get_company_by_id(db.get_ref(), input.company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Company {} not found", input.company_id)))?;

    requirement_db::get_requirement_by_id(db.get_ref(), input.requirement_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Requirement {} not found", input.requirement_id))
        })?;

    let requirement_id = input.requirement_id;
    let bid_request = bid_db::insert_bid_request(db.get_ref(), input, user.0.id).await?;

    // Interest signal for the company — fire-and-forget.
    let client_name = user.0.display_name.clone().unwrap_or(user.0.email.clone());
    notifier.quote_requested(company.user_id, requirement_id, &client_name);

    Ok(HttpResponse::Created().json(bid_request))
}

/// GET /api/bids/requests/company — bid requests addressed to the caller's
/// company.
pub async fn get_bid_requests_for_company(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let company = resolve_company(db.get_ref(), &user.0).await?;

    let requests = bid_db::get_bid_requests_for_company(db.get_ref(), company.id).await?;

    Ok(HttpResponse::Ok().json(requests))
}

/// GET /api/bids/requests/requirement/{id} — bid requests raised against a
/// requirement.
pub async fn get_bid_requests_for_requirement(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;

    let requests =
        bid_db::get_bid_requests_for_requirement(db.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(requests))
}

/// POST /api/bids/requests/{id}/decline — the company passes on an
/// invitation.
pub async fn decline_bid_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let company = resolve_company(db.get_ref(), &user.0).await?;
    let request_id = path.into_inner();

    let request = bid_db::get_bid_request_by_id(db.get_ref(), request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bid request {request_id} not found")))?;

    if request.company_id != company.id {
        return Err(ApiError::Forbidden(
            "This bid request was not addressed to your company".to_string(),
        ));
    }

    let declined = bid_db::decline_bid_request(db.get_ref(), request.id).await?;

    Ok(HttpResponse::Ok().json(declined))
}

/// POST /api/bids — a company submits a priced quote.
///
/// One live quote per (company, requirement) is a convention, not a
/// constraint — frontends consult `GET /bids/status/{requirement_id}` first.
pub async fn submit_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
    body: web::Json<SubmitQuote>,
) -> Result<HttpResponse, ApiError> {
    let company = resolve_company(db.get_ref(), &user.0).await?;
    let input = body.into_inner();

    if input.amount <= 0.0 {
        return Err(ApiError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }

    let requirement = requirement_db::get_requirement_by_id(db.get_ref(), input.requirement_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Requirement {} not found", input.requirement_id))
        })?;

    let quote = bid_db::insert_quote(db.get_ref(), input, company.id).await?;

    notifier.quote_submitted(requirement.user_id, quote.id, &company.name);

    Ok(HttpResponse::Created().json(quote))
}

/// GET /api/bids/requirement/{id} — quotes for a requirement, newest first,
/// with company display fields.
pub async fn get_quotes_for_requirement(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;

    let quotes = bid_db::get_quotes_for_requirement(db.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(quotes))
}

/// GET /api/bids/status/{requirement_id} — whether the caller's company
/// already has a live quote on the requirement.
pub async fn quote_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let company = resolve_company(db.get_ref(), &user.0).await?;

    let bid = bid_db::find_active_bid(db.get_ref(), company.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "has_submitted": bid.is_some(),
        "bid": bid,
    })))
}

/// GET /api/bids/submitted — all quotes the caller's company has submitted,
/// with requirement summaries.
pub async fn get_submitted_bids(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let company = resolve_company(db.get_ref(), &user.0).await?;

    let rows = bid_db::get_bids_by_company(db.get_ref(), company.id).await?;

    let formatted: Vec<_> = rows
        .into_iter()
        .map(|(bid, requirement)| {
            serde_json::json!({
                "bid": bid,
                "requirement": requirement.map(|r| serde_json::json!({
                    "id": r.id,
                    "title": r.title,
                    "description": r.description,
                    "budget_range": format!("{} - {}", r.min_budget, r.max_budget),
                    "posted_at": r.created_at,
                })),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "total_bids": formatted.len(),
        "bids": formatted,
    })))
}

/// POST /api/bids/{id}/accept — the client accepts a quote.
///
/// Accepting here does not foreclose the requirement's other quotes; that
/// happens when a contract built from this quote is activated. A contract
/// that never materializes leaves the negotiation open.
pub async fn accept_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;

    let updated = bid_db::set_quote_status(
        db.get_ref(),
        path.into_inner(),
        crate::models::bids::Status::Accepted,
    )
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// POST /api/bids/{id}/decline — the client declines a quote.
pub async fn decline_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;

    let updated = bid_db::set_quote_status(
        db.get_ref(),
        path.into_inner(),
        crate::models::bids::Status::Declined,
    )
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}
