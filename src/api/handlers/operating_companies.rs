//! Operating companies, maintained by system users.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::settings::{OperatingCompanyRef, OperatingCompanyRequest};
use crate::application::methods::BillingMethod;

pub fn register(groups: &mut RouteGroups) {
    groups
        .system_user
        .get("/operating_company", list_handler)
        .get("/operating_company/{id}", get_handler)
        .post("/operating_company", create_handler)
        .post("/operating_company/{id}", update_handler);
}

pub async fn list_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let mut envelope = state
        .gateway
        .billing(BillingMethod::GetOperatingCompaniesList, &json!({}))
        .await?;

    Ok(Json(envelope.take("items")))
}

pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut envelope = state
        .gateway
        .billing(BillingMethod::GetOperatingCompany, &OperatingCompanyRef { id })
        .await?;

    Ok(Json(envelope.take("company")))
}

async fn save(state: &AppState, request: OperatingCompanyRequest) -> Result<StatusCode, ApiError> {
    validate_request(&request)?;

    state
        .gateway
        .billing(BillingMethod::AddOperatingCompany, &request)
        .await?;

    tracing::info!(id = %request.id, name = %request.name, "operating company saved");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_handler(
    State(state): State<AppState>,
    Bound(mut request): Bound<OperatingCompanyRequest>,
) -> Result<StatusCode, ApiError> {
    request.id.clear();
    save(&state, request).await
}

/// Replaces the company under `id`; an id in the body is ignored
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Bound(mut request): Bound<OperatingCompanyRequest>,
) -> Result<StatusCode, ApiError> {
    request.id = id;
    save(&state, request).await
}
