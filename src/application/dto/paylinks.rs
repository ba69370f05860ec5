//! Payment links: shareable checkout URLs for a fixed set of products.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Extra;
use crate::application::validation as rules;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PaylinkListingRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    /// Listing always spans every project of the merchant
    #[serde(skip_deserializing, skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(PaylinkListingRequest);

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct PaylinkRef {
    #[validate(custom(function = "rules::object_id"))]
    pub id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct PaylinkUrlRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub url_mask: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PaylinkRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub project_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub name: String,
    #[validate(length(min = 1), custom(function = "rules::object_ids"))]
    pub products: Vec<String>,
    #[validate(custom(function = "rules::not_empty"))]
    pub products_type: String,
    pub expires_at: i64,
    pub no_expiry_date: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Statistics of one paylink over an optional period (unix seconds)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PaylinkStatRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub id: String,
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub period_from: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub period_to: i64,
}
