//! Payment system callbacks relayed to billing.
//!
//! Only the fields needed to route a callback are checked here; billing
//! verifies the signature against the raw body.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Extra;
use crate::application::validation as rules;

pub const PAYMENT_SYSTEM_HANDLER_CARDPAY: &str = "cardpay";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CardPayMerchantOrder {
    #[validate(custom(function = "rules::not_empty"))]
    pub id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CardPayPaymentCallback {
    #[validate(custom(function = "rules::not_empty"))]
    pub payment_method: String,
    #[validate(nested)]
    pub merchant_order: CardPayMerchantOrder,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CardPayRefundCallback {
    #[validate(custom(function = "rules::not_empty"))]
    pub payment_method: String,
    #[validate(nested)]
    pub merchant_order: CardPayMerchantOrder,
    pub refund_data: Extra,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentNotifyRequest {
    pub order_id: String,
    #[serde(serialize_with = "super::as_base64")]
    pub request: Vec<u8>,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallbackRequest {
    pub handler: &'static str,
    #[serde(serialize_with = "super::as_base64")]
    pub body: Vec<u8>,
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_callback_requires_order() {
        let callback: CardPayPaymentCallback = serde_json::from_value(json!({
            "payment_method": "BANKCARD",
            "merchant_order": {"description": "order"}
        }))
        .unwrap();
        assert!(callback.validate().is_err());
    }

    #[test]
    fn test_notify_request_carries_raw_body_as_base64() {
        let request = PaymentNotifyRequest {
            order_id: "o1".into(),
            request: b"{}".to_vec(),
            signature: "sig".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["request"], "e30=");
    }
}
