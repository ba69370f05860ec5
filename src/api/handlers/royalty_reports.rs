//! Royalty reports and their merchant review.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, CurrentUser, Listing};
use crate::api::handlers::client_ip;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::reports::{
    ChangeRoyaltyReportRequest, RoyaltyReportListingRequest, RoyaltyReportOrdersRequest,
    RoyaltyReportRef, RoyaltyReportReviewRequest,
};
use crate::application::methods::BillingMethod;

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/royalty_reports", list_royalty_reports_handler)
        .get("/royalty_reports/{report_id}", get_royalty_report_handler)
        .get(
            "/royalty_reports/{report_id}/transactions",
            list_royalty_report_orders_handler,
        )
        .post("/royalty_reports/{report_id}/accept", accept_royalty_report_handler)
        .post("/royalty_reports/{report_id}/decline", decline_royalty_report_handler)
        .post("/royalty_reports/{report_id}/change", change_royalty_report_handler);
}

/// GET /royalty_reports?period_from=...&period_to=...&status=pending
///
/// Without an explicit `merchant_id` the caller's own merchant is listed.
pub async fn list_royalty_reports_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Listing(mut request): Listing<RoyaltyReportListingRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.merchant_id.is_empty() {
        request.merchant_id = user.merchant_id;
    }
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::ListRoyaltyReports, &request)
        .await?;

    Ok(Json(envelope.data()))
}

pub async fn get_royalty_report_handler(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = RoyaltyReportRef { report_id };
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetRoyaltyReport, &request)
        .await?;

    Ok(Json(envelope.item()))
}

pub async fn list_royalty_report_orders_handler(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Listing(mut request): Listing<RoyaltyReportOrdersRequest>,
) -> Result<Json<Value>, ApiError> {
    request.report_id = report_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::ListRoyaltyReportOrders, &request)
        .await?;

    Ok(Json(envelope.data()))
}

async fn review(
    state: &AppState,
    report_id: String,
    headers: &HeaderMap,
    is_accepted: bool,
) -> Result<StatusCode, ApiError> {
    let request = RoyaltyReportReviewRequest {
        report_id,
        is_accepted,
        ip: client_ip(headers),
    };
    validate_request(&request)?;

    state
        .gateway
        .billing(BillingMethod::MerchantReviewRoyaltyReport, &request)
        .await?;

    tracing::info!(report_id = %request.report_id, is_accepted, "royalty report reviewed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn accept_royalty_report_handler(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    review(&state, report_id, &headers, true).await
}

/// Declining opens a dispute
pub async fn decline_royalty_report_handler(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    review(&state, report_id, &headers, false).await
}

/// POST /royalty_reports/{report_id}/change
///
/// `{"status": "accepted", "correction": {"amount": 100, "reason": "..."}, "payout_id": "..."}`
pub async fn change_royalty_report_handler(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    headers: HeaderMap,
    Bound(mut request): Bound<ChangeRoyaltyReportRequest>,
) -> Result<StatusCode, ApiError> {
    request.report_id = report_id;
    request.ip = client_ip(&headers);
    validate_request(&request)?;

    state
        .gateway
        .billing(BillingMethod::ChangeRoyaltyReport, &request)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
