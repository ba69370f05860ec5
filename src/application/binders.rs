//! Request binders that go beyond plain deserialization.
//!
//! PATCH-style endpoints start from the stored entity and overlay only the
//! fields present in the body, each checked against its expected JSON type.
//! Form checkout and payment endpoints flatten their bodies into string maps.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::constants::order_fields;
use crate::domain::errors::{self, ErrorCode};

/// JSON type a patchable field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Integer,
    Bool,
    String,
    StringList,
    /// Non-empty object of strings merged into the stored one
    Localized,
}

/// Patchable field and the error returned when its type is wrong.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub error: ErrorCode,
}

const fn rule(name: &'static str, kind: FieldKind, error: ErrorCode) -> FieldRule {
    FieldRule { name, kind, error }
}

/// Agreement fields of a merchant editable through `PATCH /merchants/{id}`.
pub const MERCHANT_DATA_FIELDS: &[FieldRule] = &[
    rule("agreement_type", FieldKind::Integer, errors::AGREEMENT_TYPE_INCORRECT_TYPE),
    rule(
        "has_merchant_signature",
        FieldKind::Bool,
        errors::HAS_MERCHANT_SIGNATURE_INCORRECT_TYPE,
    ),
    rule("has_psp_signature", FieldKind::Bool, errors::HAS_PSP_SIGNATURE_INCORRECT_TYPE),
    rule(
        "agreement_sent_via_mail",
        FieldKind::Bool,
        errors::AGREEMENT_SENT_VIA_MAIL_INCORRECT_TYPE,
    ),
    rule("mail_tracking_link", FieldKind::String, errors::MAIL_TRACKING_LINK_INCORRECT_TYPE),
];

/// Project fields editable through `PATCH /projects/{id}`.
pub const PROJECT_FIELDS: &[FieldRule] = &[
    rule("name", FieldKind::Localized, errors::NAME_INCORRECT_TYPE),
    rule("image", FieldKind::String, errors::IMAGE_INCORRECT_TYPE),
    rule("callback_currency", FieldKind::String, errors::CALLBACK_CURRENCY_INCORRECT_TYPE),
    rule("callback_protocol", FieldKind::String, errors::CALLBACK_PROTOCOL_INCORRECT_TYPE),
    rule(
        "create_order_allowed_urls",
        FieldKind::StringList,
        errors::CREATE_ORDER_ALLOWED_URLS_INCORRECT_TYPE,
    ),
    rule(
        "allow_dynamic_notify_urls",
        FieldKind::Bool,
        errors::ALLOW_DYNAMIC_NOTIFY_URLS_INCORRECT_TYPE,
    ),
    rule(
        "allow_dynamic_redirect_urls",
        FieldKind::Bool,
        errors::ALLOW_DYNAMIC_REDIRECT_URLS_INCORRECT_TYPE,
    ),
    rule("limits_currency", FieldKind::String, errors::LIMITS_CURRENCY_INCORRECT_TYPE),
    rule("min_payment_amount", FieldKind::Number, errors::MIN_PAYMENT_AMOUNT_INCORRECT_TYPE),
    rule("max_payment_amount", FieldKind::Number, errors::MAX_PAYMENT_AMOUNT_INCORRECT_TYPE),
    rule("notify_emails", FieldKind::StringList, errors::NOTIFY_EMAILS_INCORRECT_TYPE),
    rule(
        "is_products_checkout",
        FieldKind::Bool,
        errors::IS_PRODUCTS_CHECKOUT_INCORRECT_TYPE,
    ),
    rule("secret_key", FieldKind::String, errors::SECRET_KEY_INCORRECT_TYPE),
    rule("signature_required", FieldKind::Bool, errors::SIGNATURE_REQUIRED_INCORRECT_TYPE),
    rule("send_notify_email", FieldKind::Bool, errors::SEND_NOTIFY_EMAIL_INCORRECT_TYPE),
    rule("url_check_account", FieldKind::String, errors::URL_CHECK_ACCOUNT_INCORRECT_TYPE),
    rule("url_process_payment", FieldKind::String, errors::URL_PROCESS_PAYMENT_INCORRECT_TYPE),
    rule("url_redirect_fail", FieldKind::String, errors::URL_REDIRECT_FAIL_INCORRECT_TYPE),
    rule(
        "url_redirect_success",
        FieldKind::String,
        errors::URL_REDIRECT_SUCCESS_INCORRECT_TYPE,
    ),
    rule("status", FieldKind::Integer, errors::STATUS_INCORRECT_TYPE),
    rule(
        "url_chargeback_payment",
        FieldKind::String,
        errors::URL_CHARGEBACK_PAYMENT_INCORRECT_TYPE,
    ),
    rule("url_cancel_payment", FieldKind::String, errors::URL_CANCEL_PAYMENT_INCORRECT_TYPE),
    rule("url_fraud_payment", FieldKind::String, errors::URL_FRAUD_PAYMENT_INCORRECT_TYPE),
    rule("url_refund_payment", FieldKind::String, errors::URL_REFUND_PAYMENT_INCORRECT_TYPE),
];

/// Stored project fields carried into a project update.
pub const PROJECT_BASE_FIELDS: &[&str] = &[
    "merchant_id",
    "name",
    "image",
    "callback_currency",
    "callback_protocol",
    "create_order_allowed_urls",
    "allow_dynamic_notify_urls",
    "allow_dynamic_redirect_urls",
    "limits_currency",
    "min_payment_amount",
    "max_payment_amount",
    "notify_emails",
    "is_products_checkout",
    "secret_key",
    "signature_required",
    "send_notify_email",
    "url_check_account",
    "url_process_payment",
    "url_redirect_fail",
    "url_redirect_success",
    "status",
];

/// Copy `fields` of a stored entity into a fresh request map.
pub fn base_from(item: &Value, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|field| item.get(*field).map(|value| (field.to_string(), value.clone())))
        .collect()
}

/// Apply `patch` onto `base`, checking each present field against `rules`.
///
/// Rules are checked in declaration order; fields without a rule are ignored.
pub fn overlay(
    base: &mut Map<String, Value>,
    patch: &Map<String, Value>,
    rules: &[FieldRule],
) -> Result<(), ErrorCode> {
    for rule in rules {
        let Some(value) = patch.get(rule.name) else {
            continue;
        };

        let value = match rule.kind {
            FieldKind::Number if value.is_number() => value.clone(),
            FieldKind::Integer => match value.as_f64() {
                Some(number) => Value::from(number.trunc() as i64),
                None => return Err(rule.error),
            },
            FieldKind::Bool if value.is_boolean() => value.clone(),
            FieldKind::String if value.is_string() => value.clone(),
            FieldKind::StringList => match value.as_array() {
                Some(items) if items.iter().all(Value::is_string) => value.clone(),
                _ => return Err(rule.error),
            },
            FieldKind::Localized => {
                let merged = merge_localized(base.get(rule.name), value).ok_or(rule.error)?;
                Value::Object(merged)
            }
            _ => return Err(rule.error),
        };

        base.insert(rule.name.to_string(), value);
    }

    Ok(())
}

fn merge_localized(current: Option<&Value>, patch: &Value) -> Option<Map<String, Value>> {
    let patch = patch.as_object().filter(|map| !map.is_empty())?;
    if !patch.values().all(Value::is_string) {
        return None;
    }

    let mut merged = current
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    merged.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
    Some(merged)
}

/// `is_signed` query filter: `0`/`false` selects unsigned, `1`/`true` signed.
pub fn signed_filter(value: &str) -> Result<i32, ErrorCode> {
    match value {
        "0" | "false" => Ok(1),
        "1" | "true" => Ok(2),
        _ => Err(errors::REQUEST_PARAMS_INCORRECT),
    }
}

/// `is_system` query filter: `0`/`false` selects merchant notifications,
/// anything else system ones.
pub fn system_filter(value: &str) -> i32 {
    match value {
        "0" | "false" => 1,
        _ => 2,
    }
}

/// Checkout form parameters split for the order request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFormParams {
    /// Non-reserved parameters forwarded as free-form data
    pub other: BTreeMap<String, String>,
    /// Every parameter as received
    pub raw: BTreeMap<String, String>,
}

/// Split checkout form pairs; the first value of a repeated key wins.
pub fn order_form_params<I, K, V>(pairs: I) -> OrderFormParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut params = OrderFormParams::default();
    for (key, value) in pairs {
        let key = key.into();
        if params.raw.contains_key(&key) {
            continue;
        }
        let value = value.into();
        if !order_fields::is_reserved(&key) {
            params.other.insert(key.clone(), value.clone());
        }
        params.raw.insert(key, value);
    }
    params
}

/// Flatten a payment form into strings: booleans become `1`/`0`.
pub fn payment_form_fields(data: Map<String, Value>) -> BTreeMap<String, String> {
    data.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::Bool(true) => "1".to_string(),
                Value::Bool(false) => "0".to_string(),
                Value::String(text) => text,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, text)
        })
        .collect()
}
