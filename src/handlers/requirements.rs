use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_client;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::requirements as requirement_db;
use crate::error::ApiError;
use crate::models::requirements::CreateRequirement;

/// POST /api/requirements — a client posts a work request.
pub async fn create_requirement(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateRequirement>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;

    let input = body.into_inner();
    if input.min_budget < 0.0 || input.max_budget < input.min_budget {
        return Err(ApiError::Validation(
            "budget range must satisfy 0 <= min_budget <= max_budget".to_string(),
        ));
    }

    let requirement = requirement_db::insert_requirement(db.get_ref(), input, user.0.id).await?;

    Ok(HttpResponse::Created().json(requirement))
}

/// GET /api/requirements/{id} — fetch a single requirement.
pub async fn get_requirement(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let requirement = requirement_db::get_requirement_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Requirement {id} not found")))?;

    Ok(HttpResponse::Ok().json(requirement))
}

/// GET /api/requirements/mine — the caller's requirements, newest first.
pub async fn get_my_requirements(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    require_client(&user.0)?;

    let requirements =
        requirement_db::get_requirements_by_user_id(db.get_ref(), user.0.id).await?;

    Ok(HttpResponse::Ok().json(requirements))
}
