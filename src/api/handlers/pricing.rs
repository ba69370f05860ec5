//! Recommended prices for a base amount.

use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::catalog::RecommendedPriceRequest;
use crate::application::methods::BillingMethod;
use crate::domain::{errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_project
        .get("/pricing/recommended/conversion", recommended_by_conversion_handler)
        .get("/pricing/recommended/steam", recommended_by_steam_handler);
}

async fn recommended(
    state: &AppState,
    method: BillingMethod,
    request: RecommendedPriceRequest,
) -> Result<Json<Envelope>, ApiError> {
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(method, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::PRICE_GROUP_RECOMMENDED_LIST))?;

    Ok(Json(envelope))
}

/// Prices converted from the base amount at current exchange rates
pub async fn recommended_by_conversion_handler(
    State(state): State<AppState>,
    Bound(request): Bound<RecommendedPriceRequest>,
) -> Result<Json<Envelope>, ApiError> {
    recommended(&state, BillingMethod::GetRecommendedPriceByConversion, request).await
}

/// Prices following the Steam regional price table
pub async fn recommended_by_steam_handler(
    State(state): State<AppState>,
    Bound(request): Bound<RecommendedPriceRequest>,
) -> Result<Json<Envelope>, ApiError> {
    recommended(&state, BillingMethod::GetRecommendedPriceByPriceGroup, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_steam_prices_use_price_group_table() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetRecommendedPriceByPriceGroup",
            |req| req["amount"] == 19.99 && req["currency"] == "USD",
            Envelope::default().with_field("recommended_price", json!([{"currency": "RUB"}])),
        );

        let (status, body) = send(
            app.router(),
            request(
                Method::GET,
                "/auth/api/v1/pricing/recommended/steam?amount=19.99&currency=USD",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommended_price"][0]["currency"], "RUB");
    }

    #[tokio::test]
    async fn test_conversion_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "GetRecommendedPriceByConversion");

        let (status, body) = send(
            app.router(),
            request(
                Method::GET,
                "/auth/api/v1/pricing/recommended/conversion?amount=5&currency=EUR",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000072");
    }

    #[tokio::test]
    async fn test_conversion_rejects_zero_amount() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "GetRecommendedPriceByConversion");

        let (status, _) = send(
            app.router(),
            request(
                Method::GET,
                "/auth/api/v1/pricing/recommended/conversion?amount=0&currency=EUR",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
