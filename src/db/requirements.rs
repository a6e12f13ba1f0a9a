use sea_orm::*;
use uuid::Uuid;

use crate::models::requirements::{self, CreateRequirement};

/// Insert a new requirement for a client.
pub async fn insert_requirement(
    db: &DatabaseConnection,
    input: CreateRequirement,
    user_id: Uuid,
) -> Result<requirements::Model, DbErr> {
    let new_requirement = requirements::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        title: Set(input.title),
        description: Set(input.description),
        category: Set(input.category),
        work_type: Set(input.work_type),
        min_budget: Set(input.min_budget),
        max_budget: Set(input.max_budget),
        skills: Set(input.skills),
        created_at: Set(chrono::Utc::now()),
    };

    new_requirement.insert(db).await
}

/// Fetch a single requirement by ID.
pub async fn get_requirement_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<requirements::Model>, DbErr> {
    requirements::Entity::find_by_id(id).one(db).await
}

/// Fetch a requirement inside a transaction with a row lock.
///
/// Concurrent contract activations for the same requirement serialize on
/// this lock, so only one can pass the single-active-contract check.
pub async fn get_requirement_for_update<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<requirements::Model>, DbErr> {
    requirements::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await
}

/// Fetch a client's requirements, newest first.
pub async fn get_requirements_by_user_id(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<requirements::Model>, DbErr> {
    requirements::Entity::find()
        .filter(requirements::Column::UserId.eq(user_id))
        .order_by_desc(requirements::Column::CreatedAt)
        .all(db)
        .await
}
