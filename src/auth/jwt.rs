use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by the Supabase-issued JWT.
///
/// Identity is owned by the auth collaborator; this crate only decodes the
/// token and trusts what it says. `sub` is the user's UUID in `auth.users`,
/// `user_metadata` carries profile fields from the OAuth provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
    /// Supabase role (e.g. "authenticated") — not our application role.
    pub role: Option<String>,
    pub user_metadata: Option<UserMetadata>,
}

/// Metadata populated by the OAuth provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    /// Best-effort display name from metadata.
    pub fn display_name(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.full_name.clone().or_else(|| m.name.clone()))
    }

    /// Best-effort avatar URL from metadata.
    pub fn avatar_url(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.avatar_url.clone().or_else(|| m.picture.clone()))
    }

    /// Best-effort email: prefer top-level, fall back to metadata.
    pub fn user_email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| self.user_metadata.as_ref().and_then(|m| m.email.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_helpers_fall_back_through_metadata() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: 0,
            iat: None,
            iss: None,
            email: None,
            role: None,
            user_metadata: Some(UserMetadata {
                full_name: None,
                name: Some("Asha Shrestha".to_string()),
                avatar_url: None,
                picture: Some("https://example.com/p.png".to_string()),
                email: Some("asha@example.com".to_string()),
                email_verified: Some(true),
            }),
        };

        assert_eq!(claims.display_name().as_deref(), Some("Asha Shrestha"));
        assert_eq!(
            claims.avatar_url().as_deref(),
            Some("https://example.com/p.png")
        );
        assert_eq!(claims.user_email().as_deref(), Some("asha@example.com"));
    }

    #[test]
    fn bad_sub_is_rejected() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            exp: 0,
            iat: None,
            iss: None,
            email: None,
            role: None,
            user_metadata: None,
        };

        assert!(claims.user_id().is_err());
    }
}
