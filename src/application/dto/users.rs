use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::validation as rules;

/// Role change for an admin or merchant user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChangeRoleRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub role_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub role: String,
    #[validate(custom(function = "rules::object_id"))]
    pub performer_id: String,
}

/// Invitation of a new admin user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InviteAdminRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub role: String,
    #[validate(custom(function = "rules::object_id"))]
    pub performer_id: String,
}

/// Invitation of a user into a merchant account
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InviteMerchantUserRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub role: String,
    #[validate(custom(function = "rules::object_id"))]
    pub performer_id: String,
}

/// Resend and delete operations address a role binding
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RoleBindingRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub role_id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub performer_id: String,
}

impl RoleBindingRequest {
    pub fn new(role_id: impl Into<String>, performer_id: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            performer_id: performer_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MerchantUsersRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleListRequest {
    #[serde(rename = "type")]
    pub role_type: &'static str,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CheckInviteTokenRequest {
    #[validate(custom(function = "rules::not_empty"))]
    pub token: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AcceptInviteRequest {
    #[validate(custom(function = "rules::not_empty"))]
    pub token: String,
    #[validate(custom(function = "rules::object_id"))]
    pub user_id: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserMerchantsRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PermissionsRequest {
    pub user_id: String,
    pub merchant_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_role_fails_on_required() {
        let request = ChangeRoleRequest {
            role_id: "5ced34d689fce60bf4440829".into(),
            role: String::new(),
            performer_id: "ffffffffffffffffffffffff".into(),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("role"));
    }

    #[test]
    fn test_role_list_wire_name() {
        let value = serde_json::to_value(RoleListRequest { role_type: "system" }).unwrap();
        assert_eq!(value, serde_json::json!({"type": "system"}));
    }
}
