//! Merchant dashboard reports and balance.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::application::validation as rules;

/// Periods of the main and revenue dynamics reports
pub const MAIN_REPORT_PERIODS: &[&str] = &[
    "current_month",
    "previous_month",
    "current_quarter",
    "previous_quarter",
    "current_year",
    "previous_year",
];

/// Periods of the base report
pub const BASE_REPORT_PERIODS: &[&str] = &[
    "current_day",
    "previous_day",
    "current_week",
    "previous_week",
    "current_month",
    "previous_month",
    "current_quarter",
    "previous_quarter",
    "current_year",
    "previous_year",
];

fn one_of(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("oneof"))
    }
}

fn main_report_period(value: &str) -> Result<(), ValidationError> {
    one_of(value, MAIN_REPORT_PERIODS)
}

fn base_report_period(value: &str) -> Result<(), ValidationError> {
    one_of(value, BASE_REPORT_PERIODS)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardMainRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "main_report_period"))]
    pub period: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardBaseReportRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "base_report_period"))]
    pub period: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct MerchantBalanceRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
}
