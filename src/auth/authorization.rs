use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::models::companies;
use crate::models::users::{self, Roles};

/// Caller must hold the client role.
pub fn require_client(user: &users::Model) -> Result<(), ApiError> {
    match user.role {
        Roles::Client | Roles::Admin => Ok(()),
        Roles::Company => Err(ApiError::Forbidden(
            "This operation is only available to clients".to_string(),
        )),
    }
}

/// Caller must hold the company role.
pub fn require_company(user: &users::Model) -> Result<(), ApiError> {
    match user.role {
        Roles::Company | Roles::Admin => Ok(()),
        Roles::Client => Err(ApiError::Forbidden(
            "This operation is only available to companies".to_string(),
        )),
    }
}

/// Resolve the company owned by the calling user, or 404.
pub async fn resolve_company(
    db: &DatabaseConnection,
    user: &users::Model,
) -> Result<companies::Model, ApiError> {
    require_company(user)?;

    db::companies::get_company_by_user(db, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No company registered for this user".to_string()))
}

/// The caller must be the client party on the contract.
pub fn require_contract_client(
    contract: &crate::models::contracts::Model,
    user_id: Uuid,
) -> Result<(), ApiError> {
    if contract.client_id == user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You are not the client on this contract".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::Roles;

    fn user_with_role(role: Roles) -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            username: None,
            display_name: None,
            avatar_url: None,
            auth_provider: "google".to_string(),
            role,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn clients_cannot_call_company_operations() {
        let client = user_with_role(Roles::Client);
        assert!(require_client(&client).is_ok());
        assert!(matches!(
            require_company(&client),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn companies_cannot_call_client_operations() {
        let company = user_with_role(Roles::Company);
        assert!(require_company(&company).is_ok());
        assert!(matches!(
            require_client(&company),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn admins_pass_both_guards() {
        let admin = user_with_role(Roles::Admin);
        assert!(require_client(&admin).is_ok());
        assert!(require_company(&admin).is_ok());
    }
}
