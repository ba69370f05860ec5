//! User profiles, page reviews and email confirmation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use super::Extra;
use crate::application::validation as rules;

pub const REVIEW_MAX_LENGTH: u64 = 500;

/// Onboarding pages a review can be left on
pub const REVIEW_PAGES: &[&str] = &["primary_onboarding", "merchant_onboarding"];

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserProfileRef {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub profile_id: String,
}

impl UserProfileRef {
    pub fn of_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            profile_id: String::new(),
        }
    }

    pub fn of_profile(profile_id: impl Into<String>) -> Self {
        Self {
            user_id: String::new(),
            profile_id: profile_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileEmail {
    pub email: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProfilePersonal {
    #[validate(custom(function = "rules::name"))]
    pub first_name: String,
    #[validate(custom(function = "rules::name"))]
    pub last_name: String,
    #[validate(custom(function = "rules::position"))]
    pub position: String,
}

/// Questionnaire answers; every flag is a boolean
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileHelp {
    pub product_promotion_and_development: bool,
    pub released_game_promotion: bool,
    pub international_sales: bool,
    pub other: bool,
}

/// Inclusive bounds; `to == 0` is open ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRange {
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_company_ranges"))]
pub struct ProfileCompany {
    #[validate(custom(function = "rules::company_name"))]
    pub company_name: String,
    #[validate(url)]
    pub website: String,
    pub annual_income: ProfileRange,
    pub number_of_employees: ProfileRange,
    #[validate(custom(function = "rules::not_empty"))]
    pub kind_of_activity: String,
    #[serde(flatten)]
    pub extra: Extra,
}

fn validate_company_ranges(company: &ProfileCompany) -> Result<(), ValidationError> {
    let income = company.annual_income;
    rules::annual_income_range(income.from, income.to)
        .map_err(|_| rules::field_error("annual_income", "annual_income"))?;

    let employees = company.number_of_employees;
    rules::number_of_employees_range(employees.from, employees.to)
        .map_err(|_| rules::field_error("number_of_employees", "number_of_employees"))
}

/// Partial profile; the user and email always come from the session
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UserProfileRequest {
    pub user_id: String,
    pub email: ProfileEmail,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub personal: Option<ProfilePersonal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<ProfileHelp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub company: Option<ProfileCompany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_step: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl UserProfileRequest {
    pub fn for_user(mut self, user_id: impl Into<String>, email: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self.email = ProfileEmail {
            email: email.into(),
            extra: Extra::new(),
        };
        self
    }
}

fn review_page(value: &str) -> Result<(), ValidationError> {
    if REVIEW_PAGES.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("oneof"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PageReviewRequest {
    pub user_id: String,
    #[validate(custom(function = "rules::not_empty"), length(max = REVIEW_MAX_LENGTH))]
    pub review: String,
    #[validate(custom(function = "review_page"))]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ConfirmUserEmailRequest {
    #[validate(custom(function = "rules::not_empty"))]
    pub token: String,
}

/// Profile returned once the email is confirmed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfirmedProfile {
    pub id: String,
    pub user_id: String,
    pub email: ProfileEmail,
    pub created_at: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn company() -> ProfileCompany {
        serde_json::from_value(json!({
            "company_name": "Unit Test.-444",
            "website": "http://localhost",
            "annual_income": {"from": 0, "to": 1000},
            "number_of_employees": {"from": 1, "to": 10},
            "kind_of_activity": "other"
        }))
        .unwrap()
    }

    #[test]
    fn test_company_ranges() {
        assert!(company().validate().is_ok());

        let mut wrong_income = company();
        wrong_income.annual_income = ProfileRange { from: 5, to: 7 };
        assert!(wrong_income.validate().is_err());

        let mut open_ended = company();
        open_ended.number_of_employees = ProfileRange { from: 100, to: 0 };
        assert!(open_ended.validate().is_ok());
    }

    #[test]
    fn test_profile_identity_comes_from_session() {
        let request: UserProfileRequest = serde_json::from_value(json!({
            "user_id": "someone-else",
            "personal": {"first_name": "Unit", "last_name": "Test", "position": "CEO"}
        }))
        .unwrap();

        let request = request.for_user("ffffffffffffffffffffffff", "test@unit.test");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["user_id"], "ffffffffffffffffffffffff");
        assert_eq!(value["email"]["email"], "test@unit.test");
        assert!(value.get("company").is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_help_flags_must_be_boolean() {
        let result = serde_json::from_value::<UserProfileRequest>(json!({
            "help": {"product_promotion_and_development": "unit test"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_review_rules() {
        let mut review = PageReviewRequest {
            user_id: "1".into(),
            review: "some review text".into(),
            url: "merchant_onboarding".into(),
        };
        assert!(review.validate().is_ok());

        review.url = "dashboard".into();
        assert!(review.validate().is_err());

        review.url = "primary_onboarding".into();
        review.review = "a".repeat(501);
        assert!(review.validate().is_err());
    }
}
