//! Royalty reports, payout documents, VAT reports and generated report files.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use validator::Validate;

use super::Extra;
use crate::application::validation as rules;

/// Report formats the reporter can render
pub const REPORT_FILE_TYPES: &[&str] = &["csv", "pdf", "xlsx"];

/// VAT report statuses an admin may set by hand
pub const VAT_REPORT_MANUAL_STATUSES: &[&str] = &["paid", "canceled"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RoyaltyReportListingRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub merchant_id: String,
    #[serde(deserialize_with = "super::comma_list", skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub period_from: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub period_to: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(RoyaltyReportListingRequest);

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct RoyaltyReportRef {
    #[validate(custom(function = "rules::object_id"))]
    pub report_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RoyaltyReportOrdersRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub report_id: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(RoyaltyReportOrdersRequest);

/// Merchant acceptance or dispute of a royalty report
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct RoyaltyReportReviewRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub report_id: String,
    pub is_accepted: bool,
    pub ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RoyaltyReportCorrection {
    pub amount: f64,
    #[validate(custom(function = "rules::not_empty"))]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChangeRoyaltyReportRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub report_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub correction: Option<RoyaltyReportCorrection>,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub payout_id: String,
    #[serde(skip_deserializing)]
    pub ip: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PayoutDocumentListingRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub payout_document_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_object_id"))]
    pub merchant_id: String,
    #[serde(deserialize_with = "super::comma_list", skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(PayoutDocumentListingRequest);

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreatePayoutDocumentRequest {
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub ip: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdatePayoutDocumentRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub payout_document_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub transaction: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub failure_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub failure_message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub failure_transaction: String,
    #[serde(skip_deserializing)]
    pub ip: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct VatReportsRequest {
    #[serde(skip_deserializing)]
    #[validate(length(equal = 2))]
    pub country: String,
    #[serde(deserialize_with = "super::comma_list", skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(VatReportsRequest);

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct VatTransactionsRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub vat_report_id: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(VatTransactionsRequest);

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct VatReportStatusRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::object_id"))]
    pub id: String,
    #[validate(custom(function = "vat_report_manual_status"))]
    pub status: String,
}

fn vat_report_manual_status(value: &str) -> Result<(), validator::ValidationError> {
    if VAT_REPORT_MANUAL_STATUSES.contains(&value) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("oneof"))
    }
}

/// Body of `POST /report_file`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ReportFileRequest {
    #[validate(custom(function = "rules::optional_object_id"))]
    pub merchant_id: String,
    #[validate(custom(function = "report_file_type"))]
    pub file_type: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub report_type: String,
    pub template: String,
    pub params: Map<String, Value>,
}

fn report_file_type(value: &str) -> Result<(), validator::ValidationError> {
    if REPORT_FILE_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("oneof"))
    }
}

/// Reporter `CreateFile` message; `params` travels as JSON bytes
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportFile {
    pub user_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub merchant_id: String,
    pub report_type: String,
    pub file_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub template: String,
    #[serde(serialize_with = "json_bytes")]
    pub params: Map<String, Value>,
    pub send_notification: bool,
}

impl ReportFile {
    pub fn new(user_id: impl Into<String>, request: ReportFileRequest) -> Self {
        Self {
            user_id: user_id.into(),
            merchant_id: request.merchant_id,
            report_type: request.report_type,
            file_type: request.file_type,
            template: request.template,
            params: request.params,
            send_notification: true,
        }
    }
}

fn json_bytes<S: Serializer>(params: &Map<String, Value>, serializer: S) -> Result<S::Ok, S::Error> {
    let bytes = serde_json::to_vec(params).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&STANDARD.encode(bytes))
}

/// Split `<file id>.<extension>`; anything else is rejected.
pub fn parse_report_file_name(file: &str) -> Option<(&str, &str)> {
    let mut parts = file.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(extension), None) if !id.is_empty() && !extension.is_empty() => {
            Some((id, extension))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_file_params_are_json_bytes() {
        let request: ReportFileRequest = serde_json::from_value(json!({
            "file_type": "pdf",
            "report_type": "vat",
            "params": {"country": "RU"}
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let value = serde_json::to_value(ReportFile::new("ffffffffffffffffffffffff", request)).unwrap();
        let params = STANDARD.decode(value["params"].as_str().unwrap()).unwrap();

        assert_eq!(params, br#"{"country":"RU"}"#);
        assert_eq!(value["send_notification"], true);
        assert!(value.get("merchant_id").is_none());
    }

    #[test]
    fn test_report_file_type_must_be_known() {
        let request = ReportFileRequest {
            file_type: "docx".into(),
            report_type: "vat".into(),
            ..ReportFileRequest::default()
        };

        assert!(request.validate().unwrap_err().field_errors().contains_key("file_type"));
    }

    #[test]
    fn test_parse_report_file_name() {
        assert_eq!(
            parse_report_file_name("5ced34d689fce60bf4440829.csv"),
            Some(("5ced34d689fce60bf4440829", "csv"))
        );
        assert_eq!(parse_report_file_name("report.tar.gz"), None);
        assert_eq!(parse_report_file_name("report"), None);
        assert_eq!(parse_report_file_name(".csv"), None);
    }

    #[test]
    fn test_vat_status_is_paid_or_canceled() {
        let mut request = VatReportStatusRequest {
            id: "5ced34d689fce60bf4440829".into(),
            status: "paid".into(),
        };
        assert!(request.validate().is_ok());

        request.status = "threshold".into();
        assert!(request.validate().is_err());
    }
}
