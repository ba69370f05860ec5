//! Country reference data.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::api::errors::ApiError;
use crate::api::extract::validate_request;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::catalog::CountryRequest;
use crate::application::methods::BillingMethod;
use crate::domain::{errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .common
        .get("/country", list_countries_handler)
        .get("/country/{code}", get_country_handler);
}

pub async fn list_countries_handler(
    State(state): State<AppState>,
) -> Result<Json<Envelope>, ApiError> {
    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::GetCountriesList, &json!({}))
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::COUNTRIES_LIST_ERROR))?;

    Ok(Json(envelope))
}

/// GET /country/{code} by ISO 3166-1 alpha-2 code
pub async fn get_country_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    if code.chars().count() != 2 {
        return Err(ApiError::bad_request(&errors::INCORRECT_COUNTRY_IDENTIFIER));
    }

    let request = CountryRequest { iso_code: code };
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::GetCountry, &request)
        .await
        .map_err(|e| {
            ApiError::from_gateway_as(e, StatusCode::NOT_FOUND, &errors::COUNTRY_NOT_FOUND)
        })?;

    Ok(Json(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use axum::http::Method;

    #[tokio::test]
    async fn test_list_countries_passes_response_through() {
        let mut app = TestApp::new();
        expect_call(
            &mut app.billing,
            "GetCountriesList",
            Envelope::default().with_field("countries", json!([{"iso_code_a2": "RU"}])),
        );

        let (status, body) = send(app.router(), request(Method::GET, "/api/v1/country")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["countries"][0]["iso_code_a2"], "RU");
    }

    #[tokio::test]
    async fn test_list_countries_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "GetCountriesList");

        let (status, body) = send(app.router(), request(Method::GET, "/api/v1/country")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000027");
    }

    #[tokio::test]
    async fn test_get_country_bad_code() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "GetCountry");

        let (status, body) =
            send(app.router(), request(Method::GET, "/api/v1/country/RUS")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000010");
    }

    #[tokio::test]
    async fn test_get_country_not_found_on_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "GetCountry");

        let (status, body) = send(app.router(), request(Method::GET, "/api/v1/country/ZZ")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ma000013");
    }

    #[tokio::test]
    async fn test_get_country() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetCountry",
            |req| req["iso_code"] == "RU",
            Envelope::default().with_field("iso_code_a2", json!("RU")),
        );

        let (status, body) = send(app.router(), request(Method::GET, "/api/v1/country/RU")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["iso_code_a2"], "RU");
    }
}
