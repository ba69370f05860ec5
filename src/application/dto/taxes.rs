//! Tax rates kept by the tax service.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Extra;

/// Rate filters; every location field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TaxRatesRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub zip: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(TaxRatesRequest);

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TaxRate {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u32,
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub zip: String,
    #[validate(range(min = 0.0))]
    pub rate: f64,
    #[serde(flatten)]
    pub extra: Extra,
}

fn is_zero(id: &u32) -> bool {
    *id == 0
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DeleteRateRequest {
    pub id: u32,
}
