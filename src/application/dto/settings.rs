//! System settings and project integration tools: operating companies,
//! payment minimum limits, payment tokens and webhook testing.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Extra;
use crate::application::validation as rules;

/// Legal entity invoicing merchants in a set of countries
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OperatingCompanyRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub name: String,
    #[validate(length(equal = 2))]
    pub country: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub registration_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vat_number: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vat_address: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub signatory_name: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub signatory_position: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub banking_details: String,
    pub payment_countries: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OperatingCompanyRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PaymentMinLimitRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub id: String,
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
}

/// Customer the payment token is issued for
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TokenUser {
    #[validate(custom(function = "rules::not_empty"))]
    pub id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Checkout settings sealed into the payment token
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TokenSettings {
    #[validate(custom(function = "rules::object_id"))]
    pub project_id: String,
    #[serde(rename = "type")]
    #[validate(custom(function = "rules::not_empty"))]
    pub order_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub currency: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[validate(custom(function = "rules::object_ids"))]
    pub products: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TokenRequest {
    #[validate(nested)]
    pub user: TokenUser,
    #[validate(nested)]
    pub settings: TokenSettings,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedToken {
    pub token: String,
    pub payment_form_url: String,
}

impl CreatedToken {
    pub fn new(token: impl Into<String>, form_url_mask: &str) -> Self {
        let token = token.into();
        Self {
            payment_form_url: format!("{form_url_mask}?token={token}"),
            token,
        }
    }
}

/// Order shaped request replayed to the project's notification URL
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WebhookTestingRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub project_id: String,
    pub testing_case: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub order_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[validate(custom(function = "rules::object_ids"))]
    pub products: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_requires_user_and_project() {
        let mut request: TokenRequest = serde_json::from_value(json!({
            "user": {"id": "254e3736-000f-5000-8000-178d1d80bf70", "email": {"value": "a@b.c"}},
            "settings": {
                "project_id": "5cd5620f06ae110001f4f6b4",
                "type": "simple",
                "currency": "RUB",
                "amount": 100
            }
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        request.user.id.clear();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_token_settings_keep_unknown_fields() {
        let request: TokenRequest = serde_json::from_value(json!({
            "user": {"id": "1"},
            "settings": {"project_id": "5cd5620f06ae110001f4f6b4", "type": "key", "platform_id": "steam"}
        }))
        .unwrap();

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["settings"]["platform_id"], "steam");
        assert_eq!(value["settings"]["type"], "key");
    }

    #[test]
    fn test_created_token_form_url() {
        let created = CreatedToken::new("abc", "https://checkout.pay.test/");
        assert_eq!(created.payment_form_url, "https://checkout.pay.test/?token=abc");
    }
}
