//! Payment links of the signed-in merchant and their visit statistics.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, CurrentUser, Listing};
use crate::api::handlers::{header_str, merchant_of, require_object_id};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::paylinks::{
    PaylinkListingRequest, PaylinkRef, PaylinkRequest, PaylinkStatRequest, PaylinkUrlRequest,
};
use crate::application::errors::GatewayError;
use crate::application::methods::BillingMethod;
use crate::domain::errors;

/// Path mask billing fills with the paylink id
const PAYLINK_URL_MASK: &str = "/paylink/%s";

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/paylinks", list_paylinks_handler)
        .post("/paylinks", create_paylink_handler)
        .get("/paylinks/{paylink_id}", get_paylink_handler)
        .put("/paylinks/{paylink_id}", update_paylink_handler)
        .delete("/paylinks/{paylink_id}", delete_paylink_handler)
        .get("/paylinks/{paylink_id}/url", paylink_url_handler)
        .get("/paylinks/{paylink_id}/dashboard/summary", stat_summary_handler)
        .get("/paylinks/{paylink_id}/dashboard/country", stat_by_country_handler)
        .get("/paylinks/{paylink_id}/dashboard/referrer", stat_by_referrer_handler)
        .get("/paylinks/{paylink_id}/dashboard/date", stat_by_date_handler)
        .get("/paylinks/{paylink_id}/dashboard/utm", stat_by_utm_handler);
}

fn failed(err: GatewayError) -> ApiError {
    ApiError::from_gateway_as(err, StatusCode::BAD_REQUEST, &errors::UNKNOWN)
}

pub async fn list_paylinks_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Listing(mut request): Listing<PaylinkListingRequest>,
) -> Result<Json<Value>, ApiError> {
    request.merchant_id = user.merchant_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetPaylinks, &request)
        .await
        .map_err(failed)?;

    Ok(Json(envelope.data()))
}

fn paylink_ref(paylink_id: String, merchant_id: String) -> Result<PaylinkRef, ApiError> {
    require_object_id(&paylink_id, &errors::INCORRECT_PAYLINK_ID)?;
    let request = PaylinkRef {
        id: paylink_id,
        merchant_id,
    };
    validate_request(&request)?;
    Ok(request)
}

pub async fn get_paylink_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paylink_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = paylink_ref(paylink_id, user.merchant_id)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetPaylink, &request)
        .await
        .map_err(failed)?;

    Ok(Json(envelope.item()))
}

pub async fn delete_paylink_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paylink_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let request = paylink_ref(paylink_id, user.merchant_id)?;

    state
        .gateway
        .billing(BillingMethod::DeletePaylink, &request)
        .await
        .map_err(failed)?;

    tracing::info!(paylink_id = %request.id, "paylink deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Public URL of a paylink, as a JSON string
pub async fn paylink_url_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paylink_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<String>, ApiError> {
    require_object_id(&paylink_id, &errors::INCORRECT_PAYLINK_ID)?;

    let request = PaylinkUrlRequest {
        id: paylink_id,
        merchant_id: merchant_of(&state, &user).await?,
        url_mask: PAYLINK_URL_MASK.to_string(),
    };
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetPaylinkURL, &request)
        .await
        .map_err(failed)?;

    let host = match header_str(&headers, header::HOST.as_str()) {
        "" => state.config.host.as_str(),
        host => host,
    };
    Ok(Json(public_url(
        &state.config.http_scheme,
        host,
        envelope.str_field("url"),
    )))
}

/// `scheme://host/path` without duplicate slashes in the path
fn public_url(scheme: &str, host: &str, path: &str) -> String {
    let path = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("{scheme}://{}/{path}", host.trim_end_matches('/'))
}

async fn save_paylink(
    state: &AppState,
    mut request: PaylinkRequest,
    merchant_id: String,
) -> Result<Json<Value>, ApiError> {
    request.merchant_id = merchant_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::CreateOrUpdatePaylink, &request)
        .await
        .map_err(failed)?;

    Ok(Json(envelope.item()))
}

pub async fn create_paylink_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Bound(mut request): Bound<PaylinkRequest>,
) -> Result<Json<Value>, ApiError> {
    request.id.clear();
    save_paylink(&state, request, user.merchant_id).await
}

pub async fn update_paylink_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paylink_id): Path<String>,
    Bound(mut request): Bound<PaylinkRequest>,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&paylink_id, &errors::INCORRECT_PAYLINK_ID)?;
    request.id = paylink_id;
    save_paylink(&state, request, user.merchant_id).await
}

async fn paylink_stat(
    state: &AppState,
    method: BillingMethod,
    paylink_id: String,
    merchant_id: String,
    mut request: PaylinkStatRequest,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&paylink_id, &errors::INCORRECT_PAYLINK_ID)?;
    request.id = paylink_id;
    request.merchant_id = merchant_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(method, &request)
        .await
        .map_err(failed)?;

    Ok(Json(envelope.item()))
}

pub async fn stat_summary_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paylink_id): Path<String>,
    Bound(request): Bound<PaylinkStatRequest>,
) -> Result<Json<Value>, ApiError> {
    let method = BillingMethod::GetPaylinkStatTotal;
    paylink_stat(&state, method, paylink_id, user.merchant_id, request).await
}

pub async fn stat_by_country_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paylink_id): Path<String>,
    Bound(request): Bound<PaylinkStatRequest>,
) -> Result<Json<Value>, ApiError> {
    let method = BillingMethod::GetPaylinkStatByCountry;
    paylink_stat(&state, method, paylink_id, user.merchant_id, request).await
}

pub async fn stat_by_referrer_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paylink_id): Path<String>,
    Bound(request): Bound<PaylinkStatRequest>,
) -> Result<Json<Value>, ApiError> {
    let method = BillingMethod::GetPaylinkStatByReferrer;
    paylink_stat(&state, method, paylink_id, user.merchant_id, request).await
}

pub async fn stat_by_date_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paylink_id): Path<String>,
    Bound(request): Bound<PaylinkStatRequest>,
) -> Result<Json<Value>, ApiError> {
    let method = BillingMethod::GetPaylinkStatByDate;
    paylink_stat(&state, method, paylink_id, user.merchant_id, request).await
}

pub async fn stat_by_utm_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paylink_id): Path<String>,
    Bound(request): Bound<PaylinkStatRequest>,
) -> Result<Json<Value>, ApiError> {
    let method = BillingMethod::GetPaylinkStatByUtm;
    paylink_stat(&state, method, paylink_id, user.merchant_id, request).await
}
