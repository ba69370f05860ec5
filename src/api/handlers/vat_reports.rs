//! VAT reports per country.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, Listing};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::reports::{
    VatReportStatusRequest, VatReportsRequest, VatTransactionsRequest,
};
use crate::application::methods::BillingMethod;

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/vat_reports", vat_reports_dashboard_handler)
        .get("/vat_reports/country/{country}", vat_reports_for_country_handler)
        .get("/vat_reports/details/{report_id}", vat_report_transactions_handler)
        .post("/vat_reports/status/{report_id}", update_vat_report_status_handler);
}

pub async fn vat_reports_dashboard_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let envelope = state
        .gateway
        .billing(BillingMethod::GetVatReportsDashboard, &json!({}))
        .await?;

    Ok(Json(envelope.data()))
}

/// GET /vat_reports/country/ru
pub async fn vat_reports_for_country_handler(
    State(state): State<AppState>,
    Path(country): Path<String>,
    Listing(mut request): Listing<VatReportsRequest>,
) -> Result<Json<Value>, ApiError> {
    request.country = country.to_uppercase();
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetVatReportsForCountry, &request)
        .await?;

    Ok(Json(envelope.data()))
}

pub async fn vat_report_transactions_handler(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Listing(mut request): Listing<VatTransactionsRequest>,
) -> Result<Json<Value>, ApiError> {
    request.vat_report_id = report_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetVatReportTransactions, &request)
        .await?;

    Ok(Json(envelope.data()))
}

/// Only `paid` and `canceled` may be set by hand
pub async fn update_vat_report_status_handler(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Bound(mut request): Bound<VatReportStatusRequest>,
) -> Result<StatusCode, ApiError> {
    request.id = report_id;
    validate_request(&request)?;

    state
        .gateway
        .billing(BillingMethod::UpdateVatReportStatus, &request)
        .await?;

    tracing::info!(report_id = %request.id, status = %request.status, "vat report status changed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use crate::domain::Envelope;
    use axum::http::Method;

    #[tokio::test]
    async fn test_dashboard_returns_data() {
        let mut app = TestApp::new();
        expect_call(
            &mut app.billing,
            "GetVatReportsDashboard",
            Envelope::ok().with_field("data", json!({"items": [{"country": "RU"}]})),
        );

        let (status, body) =
            send(app.router(), request(Method::GET, "/admin/api/v1/vat_reports")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["country"], "RU");
    }

    #[tokio::test]
    async fn test_country_is_upper_cased() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetVatReportsForCountry",
            |req| req["country"] == "RU" && req["limit"] == 100,
            Envelope::ok().with_field("data", json!({"count": 0})),
        );

        let (status, _) = send(
            app.router(),
            request(Method::GET, "/admin/api/v1/vat_reports/country/ru"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_country_must_be_two_letters() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "GetVatReportsForCountry");

        let (status, body) = send(
            app.router(),
            request(Method::GET, "/admin/api/v1/vat_reports/country/rus"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000002");
    }

    #[tokio::test]
    async fn test_status_change_answers_no_content() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "UpdateVatReportStatus",
            |req| req["id"] == OBJECT_ID && req["status"] == "paid",
            Envelope::ok(),
        );

        let uri = format!("/admin/api/v1/vat_reports/status/{OBJECT_ID}");
        let (status, _) = send(
            app.router(),
            json_request(Method::POST, &uri, json!({"status": "paid"})),
        )
        .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_status_change_rejects_other_statuses() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "UpdateVatReportStatus");

        let uri = format!("/admin/api/v1/vat_reports/status/{OBJECT_ID}");
        let (status, _) = send(
            app.router(),
            json_request(Method::POST, &uri, json!({"status": "threshold"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
