//! Merchant dashboard reports.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::dashboard::{DashboardBaseReportRequest, DashboardMainRequest};
use crate::application::methods::BillingMethod;

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/merchants/{merchant_id}/dashboard/main", main_report_handler)
        .get(
            "/merchants/{merchant_id}/dashboard/revenue_dynamics",
            revenue_dynamics_report_handler,
        )
        .get("/merchants/{merchant_id}/dashboard/base", base_report_handler);
}

async fn main_report(
    state: &AppState,
    method: BillingMethod,
    merchant_id: String,
    mut request: DashboardMainRequest,
) -> Result<Json<Value>, ApiError> {
    request.merchant_id = merchant_id;
    validate_request(&request)?;

    let envelope = state.gateway.billing(method, &request).await?;
    Ok(Json(envelope.item()))
}

/// GET /merchants/{merchant_id}/dashboard/main?period=current_month
pub async fn main_report_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Bound(request): Bound<DashboardMainRequest>,
) -> Result<Json<Value>, ApiError> {
    let method = BillingMethod::GetDashboardMainReport;
    main_report(&state, method, merchant_id, request).await
}

pub async fn revenue_dynamics_report_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Bound(request): Bound<DashboardMainRequest>,
) -> Result<Json<Value>, ApiError> {
    let method = BillingMethod::GetDashboardRevenueDynamicsReport;
    main_report(&state, method, merchant_id, request).await
}

pub async fn base_report_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Bound(mut request): Bound<DashboardBaseReportRequest>,
) -> Result<Json<Value>, ApiError> {
    request.merchant_id = merchant_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetDashboardBaseReport, &request)
        .await?;

    Ok(Json(envelope.item()))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use crate::domain::Envelope;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_main_report() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetDashboardMainReport",
            |req| req["merchant_id"] == MERCHANT_ID && req["period"] == "current_month",
            Envelope::ok().with_field("item", json!({"gross_revenue": {"amount": 10}})),
        );

        let uri = format!("/admin/api/v1/merchants/{MERCHANT_ID}/dashboard/main?period=current_month");
        let (status, body) = send(app.router(), request(Method::GET, &uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gross_revenue"]["amount"], 10);
    }

    #[tokio::test]
    async fn test_main_report_incorrect_period() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "GetDashboardMainReport");

        let uri = format!("/admin/api/v1/merchants/{MERCHANT_ID}/dashboard/main?period=123");
        let (status, body) = send(app.router(), request(Method::GET, &uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000099");
    }

    #[tokio::test]
    async fn test_base_report_incorrect_merchant() {
        let app = TestApp::new();

        let (status, body) = send(
            app.router(),
            request(Method::GET, "/admin/api/v1/merchants/nope/dashboard/base?period=current_day"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000006");
    }

    #[tokio::test]
    async fn test_revenue_dynamics_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "GetDashboardRevenueDynamicsReport");

        let uri = format!(
            "/admin/api/v1/merchants/{MERCHANT_ID}/dashboard/revenue_dynamics?period=previous_year"
        );
        let (status, body) = send(app.router(), request(Method::GET, &uri)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000001");
    }
}
