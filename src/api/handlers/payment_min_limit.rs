//! System-wide minimum payment amounts per currency.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::settings::PaymentMinLimitRequest;
use crate::application::methods::BillingMethod;

pub fn register(groups: &mut RouteGroups) {
    groups
        .system_user
        .get("/payment_min_limit_system", list_handler)
        .post("/payment_min_limit_system", set_handler);
}

// Billing exposes no listing for the limits; the operating companies list is
// what the admin UI has always received here.
pub async fn list_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let mut envelope = state
        .gateway
        .billing(BillingMethod::GetOperatingCompaniesList, &json!({}))
        .await?;

    Ok(Json(envelope.take("items")))
}

pub async fn set_handler(
    State(state): State<AppState>,
    Bound(request): Bound<PaymentMinLimitRequest>,
) -> Result<StatusCode, ApiError> {
    validate_request(&request)?;

    state
        .gateway
        .billing(BillingMethod::SetPaymentMinLimitSystem, &request)
        .await?;

    tracing::info!(currency = %request.currency, amount = request.amount, "payment min limit set");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use crate::domain::Envelope;
    use axum::http::Method;

    #[tokio::test]
    async fn test_set_limit() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "SetPaymentMinLimitSystem",
            |req| req["currency"] == "USD" && req["amount"] == 0.5,
            Envelope::ok(),
        );

        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                "/system/api/v1/payment_min_limit_system",
                json!({"currency": "USD", "amount": 0.5}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_set_limit_rejects_negative_amount() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "SetPaymentMinLimitSystem");

        let (status, _) = send(
            app.router(),
            json_request(
                Method::POST,
                "/system/api/v1/payment_min_limit_system",
                json!({"currency": "USD", "amount": -1}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_relays_rejection() {
        let mut app = TestApp::new();
        expect_call(
            &mut app.billing,
            "GetOperatingCompaniesList",
            rejected(400, "bs000002"),
        );

        let (status, body) = send(
            app.router(),
            request(Method::GET, "/system/api/v1/payment_min_limit_system"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bs000002");
    }
}
