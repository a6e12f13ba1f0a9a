use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::users;
use crate::error::ApiError;
use crate::models::users::{CompleteProfile, UserResponse};

/// GET /api/auth/me — return the currently authenticated user's profile.
pub async fn me(user: AuthenticatedUser) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(UserResponse::from(user.0)))
}

/// POST /api/auth/complete-profile — set username, role, display_name after
/// first login (this is where an account becomes a client or a company).
pub async fn complete_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CompleteProfile>,
) -> Result<HttpResponse, ApiError> {
    let updated = users::complete_profile(db.get_ref(), user.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
