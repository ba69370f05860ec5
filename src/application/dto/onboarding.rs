//! Merchant onboarding: company data, agreements, notifications and tariffs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use super::Extra;
use crate::application::validation as rules;
use crate::domain::zip_formats;

/// Merchant lookup by id or by owning user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MerchantByRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub merchant_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_id: String,
}

impl MerchantByRequest {
    pub fn by_id(merchant_id: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            ..Self::default()
        }
    }

    pub fn by_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

/// Merchant listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MerchantListingRequest {
    pub quick_search: String,
    pub name: String,
    pub last_payout_date_from: i64,
    pub last_payout_date_to: i64,
    pub received_date_from: i64,
    pub received_date_to: i64,
    pub last_payout_amount: f64,
    #[serde(deserialize_with = "super::comma_list")]
    pub status: Vec<String>,
    #[serde(deserialize_with = "super::comma_list")]
    pub sort: Vec<String>,
    /// Raw `is_signed` query value, translated by the handler
    #[serde(rename(deserialize = "is_signed"), skip_serializing)]
    pub signed: Option<String>,
    #[serde(skip_deserializing)]
    pub is_signed: i32,
    #[validate(range(min = 0))]
    pub limit: i64,
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(MerchantListingRequest);

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MerchantChangeStatusRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(range(min = 0, max = 6))]
    pub status: i32,
    pub message: String,
    #[validate(custom(function = "rules::object_id"))]
    pub user_id: String,
}

/// Agreement fields of `PATCH /merchants/{id}` after the type-checked overlay
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChangeMerchantDataRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(range(min = 0, max = 2))]
    pub agreement_type: i32,
    pub has_merchant_signature: bool,
    pub has_psp_signature: bool,
    pub agreement_sent_via_mail: bool,
    pub mail_tracking_link: String,
}

/// Company section of the onboarding form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "company_zip"))]
pub struct MerchantCompanyInfo {
    #[validate(custom(function = "rules::company_name"))]
    pub name: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub alternative_name: String,
    #[validate(url)]
    pub website: String,
    #[validate(length(equal = 2))]
    pub country: String,
    #[validate(length(max = 255))]
    pub state: String,
    pub zip: String,
    #[validate(custom(function = "rules::city"))]
    pub city: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub address: String,
    pub address_additional: String,
    pub registration_number: String,
    pub tax_id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

fn company_zip(company: &MerchantCompanyInfo) -> Result<(), ValidationError> {
    if zip_formats::is_valid_zip(&company.country, &company.zip) {
        Ok(())
    } else {
        Err(rules::field_error("zip", "zip"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContactAuthorized {
    #[validate(custom(function = "rules::name"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "rules::phone"))]
    pub phone: String,
    #[validate(custom(function = "rules::position"))]
    pub position: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContactTechnical {
    #[validate(custom(function = "rules::name"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "rules::phone"))]
    pub phone: String,
}

/// Contacts section of the onboarding form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MerchantContact {
    #[validate(required, nested)]
    pub authorized: Option<ContactAuthorized>,
    #[validate(required, nested)]
    pub technical: Option<ContactTechnical>,
}

/// Banking section of the onboarding form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MerchantBanking {
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub name: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub address: String,
    #[validate(custom(function = "rules::iban"))]
    pub account_number: String,
    #[validate(custom(function = "rules::swift"))]
    pub swift: String,
    #[validate(length(max = 30))]
    pub correspondent_account: String,
    pub details: String,
}

/// User performing the onboarding change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantUser {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub profile_id: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub registration_date: Value,
}

/// One onboarding step: exactly one of company, contacts or banking is set
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OnboardingRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub company: Option<MerchantCompanyInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub contacts: Option<MerchantContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub banking: Option<MerchantBanking>,
    pub user: MerchantUser,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AgreementSignUrlRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(range(min = 0, max = 1))]
    pub signer_type: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SetMerchantS3AgreementRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub s3_agreement_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NotificationRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub user_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub title: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationRef {
    pub merchant_id: String,
    pub notification_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NotificationListingRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "rules::optional_object_id"))]
    pub user_id: String,
    #[serde(deserialize_with = "super::comma_list")]
    pub sort: Vec<String>,
    /// Raw `is_system` query value, translated by the handler
    #[serde(rename(deserialize = "is_system"), skip_serializing)]
    pub system: Option<String>,
    #[serde(skip_deserializing)]
    pub is_system: i32,
    #[validate(range(min = 0))]
    pub limit: i64,
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(NotificationListingRequest);

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TariffRatesRequest {
    #[validate(custom(function = "rules::world_region"))]
    pub region: String,
    #[validate(length(equal = 3))]
    pub payout_currency: String,
    #[validate(range(min = 0.0))]
    pub amount_from: f64,
    #[validate(range(min = 0.0))]
    pub amount_to: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SetTariffRatesRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "rules::world_region"))]
    pub region: String,
    #[validate(length(equal = 3))]
    pub payout_currency: String,
    #[validate(range(min = 0.0))]
    pub amount_from: f64,
    #[validate(range(min = 0.0))]
    pub amount_to: f64,
}

/// Public description of a stored agreement document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementFile {
    pub url: String,
    pub metadata: AgreementMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementMetadata {
    pub name: String,
    pub extension: String,
    pub content_type: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::extract::{validate_request, violations};
    use serde_json::json;

    fn company() -> MerchantCompanyInfo {
        serde_json::from_value(json!({
            "name": "Roga and Copita LLC",
            "alternative_name": "Apple Inc",
            "website": "http://localhost",
            "country": "RU",
            "state": "St.Petersburg",
            "zip": "190000",
            "city": "St.Petersburg",
            "address": "Nevskiy st. 1",
            "legal_form": "LLC"
        }))
        .unwrap()
    }

    #[test]
    fn test_company_keeps_unknown_fields() {
        let company = company();
        assert!(company.validate().is_ok());
        assert_eq!(company.extra["legal_form"], "LLC");
    }

    #[test]
    fn test_company_zip_is_checked_per_country() {
        let request = OnboardingRequest {
            company: Some(MerchantCompanyInfo {
                zip: "1900".into(),
                ..company()
            }),
            ..OnboardingRequest::default()
        };

        let err = validate_request(&request).unwrap_err();
        assert_eq!(err.body()["code"], "ma000073");
    }

    #[test]
    fn test_missing_contact_uses_namespace_error() {
        let request = OnboardingRequest {
            contacts: Some(MerchantContact {
                authorized: None,
                technical: Some(ContactTechnical::default()),
            }),
            ..OnboardingRequest::default()
        };

        let found = violations(
            &request.validate().unwrap_err(),
            &crate::api::field_order::field_paths(&request),
        );
        assert_eq!(found[0].path, "contacts.authorized");

        let err = validate_request(&request).unwrap_err();
        assert_eq!(err.body()["code"], "ma000088");
    }

    #[test]
    fn test_bad_swift_uses_namespace_error() {
        let request = OnboardingRequest {
            banking: Some(MerchantBanking {
                currency: "RUB".into(),
                name: "Bank Name-Spb.".into(),
                address: "St.Petersburg, Nevskiy st. 1".into(),
                account_number: "DE89370400440532013000".into(),
                swift: "TEST".into(),
                ..MerchantBanking::default()
            }),
            ..OnboardingRequest::default()
        };

        let err = validate_request(&request).unwrap_err();
        assert_eq!(err.body()["code"], "ma000095");
    }

    #[test]
    fn test_listing_filter_wire_names() {
        let request: MerchantListingRequest =
            serde_urlencoded::from_str("is_signed=true&status=1,2&limit=10").unwrap();
        assert_eq!(request.signed.as_deref(), Some("true"));
        assert_eq!(request.status, vec!["1", "2"]);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["is_signed"], 0);
        assert!(value.get("signed").is_none());
    }
}
