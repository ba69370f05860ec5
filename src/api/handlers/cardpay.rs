//! CardPay payment and refund notifications.
//!
//! The raw body and its `Signature` header go to billing untouched; billing
//! verifies the signature and decides the outcome.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use validator::Validate;

use crate::api::errors::{relay_status, ApiError};
use crate::api::extract::validate_request;
use crate::api::handlers::header_str;
use crate::api::middleware::RawBody;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::callbacks::{
    CallbackRequest, CardPayPaymentCallback, CardPayRefundCallback, PaymentNotifyRequest,
    PAYMENT_SYSTEM_HANDLER_CARDPAY,
};
use crate::application::methods::BillingMethod;
use crate::domain::constants::HEADER_CARDPAY_SIGNATURE;
use crate::domain::envelope::{STATUS_ERROR_SYSTEM, STATUS_ERROR_VALIDATION, STATUS_TEMPORARY};
use crate::domain::errors::{self, ErrorCode};

pub const PAYMENT_COMPLETE_MESSAGE: &str = "Payment successfully complete";

pub fn register(groups: &mut RouteGroups) {
    groups
        .webhooks
        .post("/cardpay/payment", payment_callback_handler)
        .post("/cardpay/refund", refund_callback_handler);
}

fn parse<T>(raw: &RawBody, bind_error: &ErrorCode) -> Result<T, ApiError>
where
    T: DeserializeOwned + Serialize + Validate,
{
    let callback: T =
        serde_json::from_slice(&raw.0).map_err(|_| ApiError::bad_request(bind_error))?;
    validate_request(&callback)?;
    Ok(callback)
}

/// HTTP status answering a payment notification
pub fn payment_status(status: i32) -> StatusCode {
    match status {
        STATUS_ERROR_VALIDATION => StatusCode::BAD_REQUEST,
        STATUS_ERROR_SYSTEM => StatusCode::INTERNAL_SERVER_ERROR,
        STATUS_TEMPORARY => StatusCode::GONE,
        _ => StatusCode::OK,
    }
}

#[utoipa::path(
    post,
    path = "/webhook/cardpay/payment",
    tag = "webhooks",
    params(("Signature" = String, Header, description = "CardPay callback signature")),
    responses(
        (status = 200, description = "Payment accepted"),
        (status = 400, description = "Callback failed validation"),
        (status = 410, description = "Callback should be retried later"),
        (status = 500, description = "Billing failed to process the callback")
    )
)]
pub async fn payment_callback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Extension(raw): Extension<RawBody>,
) -> Result<Response, ApiError> {
    let callback: CardPayPaymentCallback = parse(&raw, &errors::REQUEST_DATA_INVALID)?;

    let request = PaymentNotifyRequest {
        order_id: callback.merchant_order.id,
        request: raw.0.to_vec(),
        signature: header_str(&headers, HEADER_CARDPAY_SIGNATURE).to_string(),
    };

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::PaymentCallbackProcess, &request)
        .await
        .map_err(|e| ApiError::from_gateway_as(e, StatusCode::BAD_REQUEST, &errors::UNKNOWN))?;

    let status = payment_status(envelope.status);
    let message = if status == StatusCode::OK {
        PAYMENT_COMPLETE_MESSAGE
    } else {
        tracing::warn!(order_id = %request.order_id, status = envelope.status, "payment callback declined");
        envelope.str_field("error")
    };

    Ok((status, Json(json!({ "message": message }))).into_response())
}

#[utoipa::path(
    post,
    path = "/webhook/cardpay/refund",
    tag = "webhooks",
    params(("Signature" = String, Header, description = "CardPay callback signature")),
    responses(
        (status = 200, description = "Refund accepted"),
        (status = 400, description = "Callback failed validation")
    )
)]
pub async fn refund_callback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Extension(raw): Extension<RawBody>,
) -> Result<Response, ApiError> {
    let callback: CardPayRefundCallback = parse(&raw, &errors::REQUEST_PARAMS_INCORRECT)?;

    let request = CallbackRequest {
        handler: PAYMENT_SYSTEM_HANDLER_CARDPAY,
        body: raw.0.to_vec(),
        signature: header_str(&headers, HEADER_CARDPAY_SIGNATURE).to_string(),
    };

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::ProcessRefundCallback, &request)
        .await?;

    let error = envelope.str_field("error");
    if !envelope.is_ok() {
        tracing::warn!(order_id = %callback.merchant_order.id, status = envelope.status, "refund callback declined");
        return Ok((relay_status(envelope.status), Json(json!({ "message": error }))).into_response());
    }
    if !error.is_empty() {
        return Ok((StatusCode::OK, Json(json!({ "message": error }))).into_response());
    }

    Ok(StatusCode::OK.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use crate::domain::Envelope;
    use axum::{
        body::Body,
        http::{header, Method, Request},
    };
    use serde_json::Value;

    const PAYMENT_BODY: &str = r#"{"payment_method":"BANKCARD","merchant_order":{"id":"5cd5620f06ae110001f4f6b4"},"payment_data":{"status":"COMPLETED"}}"#;
    const REFUND_BODY: &str = r#"{"payment_method":"BANKCARD","merchant_order":{"id":"5cd5620f06ae110001f4f6b4"},"refund_data":{"status":"COMPLETED"}}"#;

    fn callback(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(HEADER_CARDPAY_SIGNATURE, "signed-by-cardpay")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_payment_status_mapping() {
        assert_eq!(payment_status(STATUS_ERROR_VALIDATION), StatusCode::BAD_REQUEST);
        assert_eq!(payment_status(STATUS_ERROR_SYSTEM), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(payment_status(STATUS_TEMPORARY), StatusCode::GONE);
        assert_eq!(payment_status(200), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_payment_forwards_raw_body_and_signature() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "PaymentCallbackProcess",
            |req| {
                req["order_id"] == "5cd5620f06ae110001f4f6b4"
                    && req["signature"] == "signed-by-cardpay"
                    && req["request"].as_str().is_some_and(|body| !body.is_empty())
            },
            Envelope::ok(),
        );

        let (status, body) =
            send(app.router(), callback("/webhook/cardpay/payment", PAYMENT_BODY)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], PAYMENT_COMPLETE_MESSAGE);
    }

    #[tokio::test]
    async fn test_payment_temporary_status() {
        let mut app = TestApp::new();
        expect_call(
            &mut app.billing,
            "PaymentCallbackProcess",
            Envelope {
                status: STATUS_TEMPORARY,
                ..Envelope::default()
            }
            .with_field("error", json!("order not found")),
        );

        let (status, body) =
            send(app.router(), callback("/webhook/cardpay/payment", PAYMENT_BODY)).await;

        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["message"], "order not found");
    }

    #[tokio::test]
    async fn test_payment_invalid_body() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "PaymentCallbackProcess");

        let (status, body) =
            send(app.router(), callback("/webhook/cardpay/payment", "<xml/>")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000026");
    }

    #[tokio::test]
    async fn test_payment_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "PaymentCallbackProcess");

        let (status, body) =
            send(app.router(), callback("/webhook/cardpay/payment", PAYMENT_BODY)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000001");
    }

    #[tokio::test]
    async fn test_refund_ok_has_empty_body() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "ProcessRefundCallback",
            |req| req["handler"] == "cardpay" && req["signature"] == "signed-by-cardpay",
            Envelope::ok(),
        );

        let (status, body) =
            send(app.router(), callback("/webhook/cardpay/refund", REFUND_BODY)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_refund_ok_with_error_message() {
        let mut app = TestApp::new();
        expect_call(
            &mut app.billing,
            "ProcessRefundCallback",
            Envelope::ok().with_field("error", json!("refund already processed")),
        );

        let (status, body) =
            send(app.router(), callback("/webhook/cardpay/refund", REFUND_BODY)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "refund already processed");
    }

    #[tokio::test]
    async fn test_refund_rejected_relays_status() {
        let mut app = TestApp::new();
        expect_call(
            &mut app.billing,
            "ProcessRefundCallback",
            Envelope {
                status: 404,
                ..Envelope::default()
            }
            .with_field("error", json!("refund not found")),
        );

        let (status, body) =
            send(app.router(), callback("/webhook/cardpay/refund", REFUND_BODY)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "refund not found");
    }

    #[tokio::test]
    async fn test_refund_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "ProcessRefundCallback");

        let (status, body) =
            send(app.router(), callback("/webhook/cardpay/refund", REFUND_BODY)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000001");
    }
}
