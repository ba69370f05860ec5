//! Payment channel and money-back cost tariffs, system-wide and per merchant.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Extra;
use crate::application::validation as rules;

/// Lookup of the channel cost matching a payment method and location
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChannelCostQuery {
    #[serde(skip_deserializing, skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub name: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mcc_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub operating_company_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payout_currency: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
}

/// Lookup of the money-back cost for a refund or chargeback
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MoneyBackCostQuery {
    #[serde(skip_deserializing, skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub name: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mcc_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub operating_company_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payout_currency: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub days: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub undo_reason: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub payment_stage: i64,
}

/// Cost tariff to create, or to replace when `id` is set
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PaymentCost {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub merchant_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub name: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct PaymentCostRef {
    #[validate(custom(function = "rules::object_id"))]
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct MerchantCostsRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
}
