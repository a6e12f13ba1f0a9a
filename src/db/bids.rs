use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::bid_requests::{self, CreateBidRequest};
use crate::models::bids::{self, QuoteWithCompany, SubmitQuote};
use crate::models::companies;

// ── Bid requests (interest signals) ──

/// Insert a bid request with status `Sent`.
pub async fn insert_bid_request(
    db: &DatabaseConnection,
    input: CreateBidRequest,
    user_id: Uuid,
) -> Result<bid_requests::Model, DbErr> {
    let new_request = bid_requests::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        company_id: Set(input.company_id),
        requirement_id: Set(input.requirement_id),
        status: Set(bid_requests::Status::Sent),
        requested_at: Set(chrono::Utc::now()),
    };

    new_request.insert(db).await
}

/// Fetch all bid requests addressed to a company.
pub async fn get_bid_requests_for_company(
    db: &DatabaseConnection,
    company_id: Uuid,
) -> Result<Vec<bid_requests::Model>, DbErr> {
    bid_requests::Entity::find()
        .filter(bid_requests::Column::CompanyId.eq(company_id))
        .order_by_desc(bid_requests::Column::RequestedAt)
        .all(db)
        .await
}

/// Fetch all bid requests raised against a requirement.
pub async fn get_bid_requests_for_requirement(
    db: &DatabaseConnection,
    requirement_id: Uuid,
) -> Result<Vec<bid_requests::Model>, DbErr> {
    bid_requests::Entity::find()
        .filter(bid_requests::Column::RequirementId.eq(requirement_id))
        .order_by_desc(bid_requests::Column::RequestedAt)
        .all(db)
        .await
}

/// Fetch a single bid request by ID.
pub async fn get_bid_request_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<bid_requests::Model>, DbErr> {
    bid_requests::Entity::find_by_id(id).one(db).await
}

/// Mark a bid request as declined (the company passes on the invitation).
pub async fn decline_bid_request(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<bid_requests::Model, DbErr> {
    let request = bid_requests::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Bid request not found".to_string()))?;

    let mut active: bid_requests::ActiveModel = request.into();
    active.status = Set(bid_requests::Status::Declined);

    active.update(db).await
}

// ── Bids (priced quotes) ──

/// Insert a quote with status `Pending`.
pub async fn insert_quote(
    db: &DatabaseConnection,
    input: SubmitQuote,
    company_id: Uuid,
) -> Result<bids::Model, DbErr> {
    let new_bid = bids::ActiveModel {
        id: Set(Uuid::new_v4()),
        requirement_id: Set(input.requirement_id),
        company_id: Set(company_id),
        amount: Set(input.amount),
        delivery_time: Set(input.delivery_time),
        message: Set(input.message),
        status: Set(bids::Status::Pending),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_bid.insert(db).await
}

/// Fetch a single bid by ID.
pub async fn get_bid_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find_by_id(id).one(db).await
}

/// Quotes for a requirement, newest first, with the submitting company's
/// display name and logo joined in.
pub async fn get_quotes_for_requirement(
    db: &DatabaseConnection,
    requirement_id: Uuid,
) -> Result<Vec<QuoteWithCompany>, DbErr> {
    let rows = bids::Entity::find()
        .filter(bids::Column::RequirementId.eq(requirement_id))
        .find_also_related(companies::Entity)
        .order_by_desc(bids::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(bid, company)| QuoteWithCompany {
            bid,
            company: company.map(Into::into),
        })
        .collect())
}

/// Set a quote's status on the client's behalf (accept or decline).
///
/// This does NOT touch sibling bids — the authoritative invalidation of
/// competing quotes happens at contract activation, so that a failed contract
/// creation never leaves the negotiation foreclosed.
pub async fn set_quote_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: bids::Status,
) -> Result<bids::Model, DbErr> {
    let bid = bids::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Quote not found".to_string()))?;

    let mut active: bids::ActiveModel = bid.into();
    active.status = Set(status);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// The company's live (pending or accepted) bid on a requirement, if any.
pub async fn find_active_bid(
    db: &DatabaseConnection,
    company_id: Uuid,
    requirement_id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::CompanyId.eq(company_id))
        .filter(bids::Column::RequirementId.eq(requirement_id))
        .filter(bids::Column::Status.is_in([bids::Status::Pending, bids::Status::Accepted]))
        .one(db)
        .await
}

/// All bids submitted by a company, newest first, with their requirements.
pub async fn get_bids_by_company(
    db: &DatabaseConnection,
    company_id: Uuid,
) -> Result<Vec<(bids::Model, Option<crate::models::requirements::Model>)>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::CompanyId.eq(company_id))
        .find_also_related(crate::models::requirements::Entity)
        .order_by_desc(bids::Column::CreatedAt)
        .all(db)
        .await
}

/// Decline every bid of a requirement whose status is not `Accepted`.
///
/// Runs inside the contract-activation transaction; takes any connection so
/// callers can pass the open transaction handle.
pub async fn decline_competing_bids<C: ConnectionTrait>(
    conn: &C,
    requirement_id: Uuid,
) -> Result<u64, DbErr> {
    let result = bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(bids::Status::Declined))
        .col_expr(
            bids::Column::UpdatedAt,
            Expr::value(Some(chrono::Utc::now())),
        )
        .filter(bids::Column::RequirementId.eq(requirement_id))
        .filter(bids::Column::Status.ne(bids::Status::Accepted))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}
