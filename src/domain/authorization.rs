use serde::{Deserialize, Serialize};

/// Role list types understood by the billing service.
pub mod role_types {
    pub const MERCHANT: &str = "merchant";
    pub const SYSTEM: &str = "system";
}

/// Authenticated user attached to the request by the auth middleware.
///
/// Handlers copy `id` and `merchant_id` into remote requests and never trust
/// the same fields coming from the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub merchant_id: String,
}

impl AuthUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_merchant(mut self, merchant_id: impl Into<String>, role: impl Into<String>) -> Self {
        self.merchant_id = merchant_id.into();
        self.role = role.into();
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_is_anonymous() {
        assert!(AuthUser::default().is_anonymous());
        assert!(!AuthUser::new("ffffffffffffffffffffffff", "test@unit.test").is_anonymous());
    }

    #[test]
    fn test_with_merchant() {
        let user = AuthUser::new("ffffffffffffffffffffffff", "test@unit.test")
            .with_merchant("5be2c3022b9bb6000765d132", "merchant_owner");

        assert_eq!(user.merchant_id, "5be2c3022b9bb6000765d132");
        assert_eq!(user.role, "merchant_owner");
    }
}
