use sea_orm::*;
use uuid::Uuid;

use crate::models::companies;

/// Resolve the company record owned by a user (the company's login account).
pub async fn get_company_by_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<companies::Model>, DbErr> {
    companies::Entity::find()
        .filter(companies::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Fetch a single company by ID.
pub async fn get_company_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<companies::Model>, DbErr> {
    companies::Entity::find_by_id(id).one(db).await
}
