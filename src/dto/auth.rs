//! Account payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::validate_identifier,
    state::identity::{Role, User},
};

/// Mock login: the account is looked up by email, no password is involved.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
}

/// New account registration.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Public projection of an account. Clients send `id` back in the `X-User-Id` header.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    pub created_at: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            player_id: user.player_id.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Role change request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleRequest {
    pub role: Role,
}

/// Contact details edit; absent fields are left unchanged and an empty phone clears it.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Link an account to a roster player.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LinkPlayerRequest {
    #[validate(custom(function = "validate_identifier"))]
    pub player_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_use_camel_case_on_the_wire() {
        let request: RoleRequest =
            serde_json::from_value(serde_json::json!({ "role": "masterAdmin" })).unwrap();
        assert_eq!(request.role, Role::MasterAdmin);
    }

    #[test]
    fn login_requires_an_email() {
        let request = LoginRequest {
            email: "mike".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn profile_edits_reject_malformed_emails() {
        let request: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({ "email": "not-an-email" })).unwrap();
        assert!(request.validate().is_err());

        let request: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({ "phone": "555-0101" })).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.email, None);
    }
}
