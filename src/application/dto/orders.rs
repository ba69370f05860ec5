//! Checkout, payment form and refund requests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::Extra;
use crate::application::binders::OrderFormParams;
use crate::application::validation as rules;
use crate::domain::constants::order_fields;

/// Customer data sent by the project with a host-to-host order
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OrderUser {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_email"))]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OrderCreateRequest {
    #[validate(custom(function = "rules::optional_object_id"))]
    pub project_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub signature: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub currency: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub order_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payment_method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url_verify: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url_notify: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url_success: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url_fail: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payer_email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payer_phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub user: Option<OrderUser>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    /// Prepared order to pay instead of creating a new one
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_uuid"))]
    pub psp_order_uuid: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub other: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub raw_params: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_body: String,
    pub is_json: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub issuer_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cookie: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl OrderCreateRequest {
    /// Order described by checkout form `PP_*` fields.
    pub fn from_form(params: OrderFormParams) -> Result<Self, String> {
        let field = |name: &str| params.raw.get(name).cloned().unwrap_or_default();

        let amount = match params.raw.get(order_fields::AMOUNT) {
            Some(value) if !value.is_empty() => value
                .parse()
                .map_err(|_| format!("{} is not a number", order_fields::AMOUNT))?,
            _ => 0.0,
        };

        Ok(Self {
            project_id: field(order_fields::PROJECT_ID),
            signature: field(order_fields::SIGNATURE),
            amount,
            currency: field(order_fields::CURRENCY),
            account: field(order_fields::ACCOUNT),
            order_id: field(order_fields::ORDER_ID),
            description: field(order_fields::DESCRIPTION),
            payment_method: field(order_fields::PAYMENT_METHOD),
            url_verify: field(order_fields::URL_VERIFY),
            url_notify: field(order_fields::URL_NOTIFY),
            url_success: field(order_fields::URL_SUCCESS),
            url_fail: field(order_fields::URL_FAIL),
            payer_email: field(order_fields::PAYER_EMAIL),
            payer_phone: field(order_fields::PAYER_PHONE),
            region: field(order_fields::REGION),
            other: params.other,
            raw_params: params.raw,
            ..Self::default()
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OrderReCreateRequest {
    #[validate(custom(function = "rules::uuid"))]
    pub order_id: String,
}

/// Order reference answered to order creation
#[derive(Debug, Clone, Serialize)]
pub struct CreatedOrder {
    pub id: String,
    pub payment_form_url: String,
}

impl CreatedOrder {
    pub fn new(uuid: String, form_url_mask: &str) -> Self {
        Self {
            payment_form_url: format!("{form_url_mask}?order_id={uuid}"),
            id: uuid,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IsOrderCanBePayingRequest {
    pub order_id: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentFormDataRequest {
    pub order_id: String,
    pub scheme: String,
    pub host: String,
    pub locale: String,
    pub ip: String,
    pub referer: String,
    pub cookie: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderByPaylinkRequest {
    pub paylink_id: String,
    pub payer_ip: String,
    pub issuer_url: String,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub is_embedded: bool,
    pub cookie: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaylinkIdRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentCreateRequest {
    pub data: BTreeMap<String, String>,
    pub accept_language: String,
    pub user_agent: String,
    pub ip: String,
}

/// Public order of the signed-in merchant
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct OrderRef {
    #[validate(custom(function = "rules::uuid"))]
    pub order_id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub merchant_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OrderListingRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(deserialize_with = "super::comma_list")]
    #[validate(custom(function = "rules::object_ids"))]
    pub project: Vec<String>,
    #[serde(deserialize_with = "super::comma_list")]
    pub payment_method: Vec<String>,
    #[serde(deserialize_with = "super::comma_list")]
    pub country: Vec<String>,
    #[serde(deserialize_with = "super::comma_list")]
    pub status: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    pub pm_date_from: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    pub pm_date_to: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    pub project_date_from: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    pub project_date_to: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub quick_search: String,
    #[serde(deserialize_with = "super::comma_list")]
    pub sort: Vec<String>,
    /// Merchants the listing is restricted to; always the caller's own
    #[serde(skip_deserializing)]
    pub merchant: Vec<String>,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(OrderListingRequest);

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RefundListingRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::uuid"))]
    pub order_id: String,
    #[serde(skip_deserializing)]
    pub merchant_id: String,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub limit: i64,
    #[serde(deserialize_with = "super::lenient_i64")]
    #[validate(range(min = 0))]
    pub offset: i64,
}

crate::paginated!(RefundListingRequest);

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct RefundRef {
    #[validate(custom(function = "rules::uuid"))]
    pub order_id: String,
    #[validate(custom(function = "rules::uuid"))]
    pub refund_id: String,
    pub merchant_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateRefundRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::uuid"))]
    pub order_id: String,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(skip_deserializing)]
    pub creator_id: String,
    #[serde(skip_deserializing)]
    pub merchant_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChangeCodeRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::uuid"))]
    pub order_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub key_product_id: String,
}

/// Payment form language switch
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChangeLanguageRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::uuid"))]
    pub order_id: String,
    #[validate(length(min = 2, max = 2))]
    pub lang: String,
    #[serde(skip_deserializing)]
    pub accept_language: String,
    #[serde(skip_deserializing)]
    pub user_agent: String,
    #[serde(skip_deserializing)]
    pub ip: String,
}

/// Payment account typed into the form, used to guess the method
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChangeCustomerRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::uuid"))]
    pub order_id: String,
    #[validate(custom(function = "rules::object_id"))]
    pub method_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub account: String,
    #[serde(skip_deserializing)]
    pub accept_language: String,
    #[serde(skip_deserializing)]
    pub user_agent: String,
    #[serde(skip_deserializing)]
    pub ip: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BillingAddressRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::uuid"))]
    pub order_id: String,
    #[validate(length(equal = 2))]
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub zip: String,
    #[serde(skip_deserializing)]
    pub ip: String,
    #[serde(skip_deserializing)]
    pub cookie: String,
}

/// Opt-in for sales or new-region notifications
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UserNotifyRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::uuid"))]
    pub order_uuid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(custom(function = "rules::optional_email"))]
    pub email: String,
    pub enable_notification: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChangePlatformRequest {
    #[serde(skip_deserializing)]
    #[validate(custom(function = "rules::uuid"))]
    pub order_id: String,
    #[validate(custom(function = "rules::not_empty"))]
    pub platform: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderReceiptRequest {
    pub order_id: String,
    pub receipt_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::binders::order_form_params;

    #[test]
    fn test_order_from_checkout_form() {
        let params = order_form_params([
            ("PP_PROJECT_ID", "5be2c3022b9bb6000765d132"),
            ("PP_AMOUNT", "10.50"),
            ("PP_CURRENCY", "USD"),
            ("PP_ACCOUNT", "player-1"),
            ("game_level", "7"),
        ]);

        let order = OrderCreateRequest::from_form(params).unwrap();

        assert_eq!(order.project_id, "5be2c3022b9bb6000765d132");
        assert_eq!(order.amount, 10.5);
        assert_eq!(order.currency, "USD");
        assert_eq!(order.other.len(), 1);
        assert_eq!(order.raw_params.len(), 5);
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_order_form_amount_must_be_numeric() {
        let params = order_form_params([("PP_AMOUNT", "ten")]);
        assert!(OrderCreateRequest::from_form(params).is_err());
    }

    #[test]
    fn test_created_order_form_url() {
        let created = CreatedOrder::new("b1c2".into(), "https://checkout.example.com/");
        assert_eq!(created.payment_form_url, "https://checkout.example.com/?order_id=b1c2");
        assert_eq!(created.id, "b1c2");
    }

    #[test]
    fn test_refund_needs_positive_amount() {
        let refund = CreateRefundRequest {
            order_id: "9ec1b9a6-1b27-4d2c-b1f2-2e5a5f3b1e4a".into(),
            amount: 0.0,
            ..CreateRefundRequest::default()
        };

        assert!(refund.validate().unwrap_err().field_errors().contains_key("amount"));
    }
}
