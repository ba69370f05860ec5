//! Payment methods and their per-environment settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Extra;
use crate::application::validation as rules;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PaymentMethodRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub id: String,
    #[validate(custom(function = "rules::company_name"))]
    pub name: String,
    #[validate(custom(function = "rules::object_id"))]
    pub payment_system_id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Selects the settings of one method for a currency and MCC
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PaymentMethodSettingsRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub payment_method_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub currency_a3: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mcc_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub operating_company_id: String,
}

/// Credentials and limits of a method in the production or test environment
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PaymentMethodParamsRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub payment_method_id: String,
    pub params: Extra,
    #[serde(flatten)]
    pub extra: Extra,
}
