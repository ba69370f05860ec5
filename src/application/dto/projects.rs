//! Merchant projects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::Extra;
use crate::application::validation as rules;
use crate::domain::constants::PROJECT_CALLBACK_PROTOCOL_EMPTY;

/// Project settings; `ChangeProject` creates it when `id` is empty
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProjectRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "rules::localized"))]
    pub name: BTreeMap<String, String>,
    #[validate(custom(function = "rules::not_empty"))]
    pub callback_protocol: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub callback_currency: String,
    #[validate(range(min = 0.0))]
    pub min_payment_amount: f64,
    #[validate(range(min = 0.0))]
    pub max_payment_amount: f64,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ProjectRequest {
    /// Projects created without a protocol receive no callbacks
    pub fn with_default_protocol(mut self) -> Self {
        if self.callback_protocol.is_empty() {
            self.callback_protocol = PROJECT_CALLBACK_PROTOCOL_EMPTY.to_string();
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct ProjectRef {
    #[validate(custom(function = "rules::object_id"))]
    pub project_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub merchant_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProjectListingRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub quick_search: String,
    #[serde(deserialize_with = "super::comma_list", skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,
    #[serde(deserialize_with = "super::comma_list", skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(ProjectListingRequest);

/// Whether `sku` is still free within a key project
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CheckSkuRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub project_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub sku: String,
}
