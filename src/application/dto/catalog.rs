//! Reference data: countries, zip codes, price groups and recommended prices.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::validation as rules;

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct CountryRequest {
    #[validate(length(equal = 2))]
    pub iso_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ZipCodeRequest {
    #[validate(length(equal = 2))]
    pub country: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub zip: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(ZipCodeRequest);

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PriceGroupByCountryRequest {
    #[validate(custom(function = "rules::not_empty"))]
    pub country: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PriceGroupByRegionRequest {
    #[validate(custom(function = "rules::not_empty"))]
    pub region: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PriceGroupRecommendedPriceRequest {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(length(equal = 3))]
    pub currency: String,
    pub rounding: bool,
}

/// Recommended prices derived from one base amount
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RecommendedPriceRequest {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(length(equal = 3))]
    pub currency: String,
}
