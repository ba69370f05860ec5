//! Price groups: regional currencies and recommended prices.

use axum::{extract::State, Json};
use serde_json::json;

use crate::api::errors::ApiError;
use crate::api::extract::Valid;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::catalog::{
    PriceGroupByCountryRequest, PriceGroupByRegionRequest, PriceGroupRecommendedPriceRequest,
};
use crate::application::methods::BillingMethod;
use crate::domain::{errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_project
        .get("/price_group/country", price_group_by_country_handler)
        .get("/price_group/currencies", price_group_currencies_handler)
        .get("/price_group/region", currency_by_region_handler)
        .get("/price_group/recommended", recommended_price_handler);
}

/// GET /price_group/country?country=RU
pub async fn price_group_by_country_handler(
    State(state): State<AppState>,
    Valid(request): Valid<PriceGroupByCountryRequest>,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::GetPriceGroupByCountry, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::PRICE_GROUP_BY_COUNTRY))?;

    Ok(Json(envelope))
}

pub async fn price_group_currencies_handler(
    State(state): State<AppState>,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::GetPriceGroupCurrencies, &json!({}))
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::PRICE_GROUP_CURRENCY_LIST))?;

    Ok(Json(envelope))
}

/// GET /price_group/region?region=EUR
pub async fn currency_by_region_handler(
    State(state): State<AppState>,
    Valid(request): Valid<PriceGroupByRegionRequest>,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::GetPriceGroupCurrencyByRegion, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::PRICE_GROUP_CURRENCY_BY_REGION))?;

    Ok(Json(envelope))
}

/// GET /price_group/recommended?amount=10&currency=USD&rounding=true
pub async fn recommended_price_handler(
    State(state): State<AppState>,
    Valid(request): Valid<PriceGroupRecommendedPriceRequest>,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::GetPriceGroupRecommendedPrice, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::PRICE_GROUP_RECOMMENDED_LIST))?;

    Ok(Json(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_price_group_by_country() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetPriceGroupByCountry",
            |req| req["country"] == "RU",
            Envelope::default().with_field("region", json!("RUB")),
        );

        let (status, body) = send(
            app.router(),
            request(Method::GET, "/auth/api/v1/price_group/country?country=RU"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["region"], "RUB");
    }

    #[tokio::test]
    async fn test_price_group_by_country_requires_country() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "GetPriceGroupByCountry");

        let (status, _) = send(
            app.router(),
            request(Method::GET, "/auth/api/v1/price_group/country"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_currencies_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "GetPriceGroupCurrencies");

        let (status, body) = send(
            app.router(),
            request(Method::GET, "/auth/api/v1/price_group/currencies"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000070");
    }

    #[tokio::test]
    async fn test_recommended_price_sends_rounding() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetPriceGroupRecommendedPrice",
            |req| req["amount"] == 10.0 && req["currency"] == "USD" && req["rounding"] == true,
            Envelope::default().with_field("recommended_price", json!([])),
        );

        let (status, _) = send(
            app.router(),
            request(
                Method::GET,
                "/auth/api/v1/price_group/recommended?amount=10&currency=USD&rounding=true",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }
}
