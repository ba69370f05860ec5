//! Payment methods and their production and test settings.
//!
//! Billing's response is returned whole; only transport failures are
//! translated here.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::payment_methods::{
    PaymentMethodParamsRequest, PaymentMethodRequest, PaymentMethodSettingsRequest,
};
use crate::application::errors::GatewayError;
use crate::application::methods::BillingMethod;
use crate::domain::{errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .system_user
        .post("/payment_method", create_handler)
        .put("/payment_method/{id}", update_handler)
        .post("/payment_method/{id}/production", set_production_settings_handler)
        .put("/payment_method/{id}/production", set_production_settings_handler)
        .get("/payment_method/{id}/production", production_settings_handler)
        .delete("/payment_method/{id}/production", delete_production_settings_handler)
        .post("/payment_method/{id}/test", set_test_settings_handler)
        .put("/payment_method/{id}/test", set_test_settings_handler)
        .get("/payment_method/{id}/test", test_settings_handler)
        .delete("/payment_method/{id}/test", delete_test_settings_handler);
}

fn failed(err: GatewayError) -> ApiError {
    ApiError::from_gateway_as(err, StatusCode::BAD_REQUEST, &errors::UNKNOWN)
}

async fn save(state: &AppState, request: PaymentMethodRequest) -> Result<Json<Envelope>, ApiError> {
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::CreateOrUpdatePaymentMethod, &request)
        .await
        .map_err(failed)?;

    Ok(Json(envelope))
}

async fn settings(
    state: &AppState,
    method: BillingMethod,
    id: String,
    mut request: PaymentMethodSettingsRequest,
) -> Result<Json<Envelope>, ApiError> {
    request.payment_method_id = id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(method, &request)
        .await
        .map_err(failed)?;

    Ok(Json(envelope))
}

async fn change_settings(
    state: &AppState,
    method: BillingMethod,
    id: String,
    mut request: PaymentMethodParamsRequest,
) -> Result<Json<Envelope>, ApiError> {
    request.payment_method_id = id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(method, &request)
        .await
        .map_err(failed)?;

    tracing::info!(method = %method, payment_method_id = %request.payment_method_id, "payment method settings changed");
    Ok(Json(envelope))
}

pub async fn create_handler(
    State(state): State<AppState>,
    Bound(request): Bound<PaymentMethodRequest>,
) -> Result<Json<Envelope>, ApiError> {
    save(&state, request).await
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Bound(mut request): Bound<PaymentMethodRequest>,
) -> Result<Json<Envelope>, ApiError> {
    request.id = id;
    save(&state, request).await
}

pub async fn production_settings_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Bound(request): Bound<PaymentMethodSettingsRequest>,
) -> Result<Json<Envelope>, ApiError> {
    settings(&state, BillingMethod::GetPaymentMethodProductionSettings, id, request).await
}

pub async fn set_production_settings_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Bound(request): Bound<PaymentMethodParamsRequest>,
) -> Result<Json<Envelope>, ApiError> {
    change_settings(
        &state,
        BillingMethod::CreateOrUpdatePaymentMethodProductionSettings,
        id,
        request,
    )
    .await
}

pub async fn delete_production_settings_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Bound(request): Bound<PaymentMethodSettingsRequest>,
) -> Result<Json<Envelope>, ApiError> {
    settings(&state, BillingMethod::DeletePaymentMethodProductionSettings, id, request).await
}

pub async fn test_settings_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Bound(request): Bound<PaymentMethodSettingsRequest>,
) -> Result<Json<Envelope>, ApiError> {
    settings(&state, BillingMethod::GetPaymentMethodTestSettings, id, request).await
}

pub async fn set_test_settings_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Bound(request): Bound<PaymentMethodParamsRequest>,
) -> Result<Json<Envelope>, ApiError> {
    change_settings(
        &state,
        BillingMethod::CreateOrUpdatePaymentMethodTestSettings,
        id,
        request,
    )
    .await
}

pub async fn delete_test_settings_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Bound(request): Bound<PaymentMethodSettingsRequest>,
) -> Result<Json<Envelope>, ApiError> {
    settings(&state, BillingMethod::DeletePaymentMethodTestSettings, id, request).await
}
