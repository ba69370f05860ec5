use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extract::validate_request;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::key_products::KeyForOrderRequest;
use crate::application::methods::BillingMethod;
use crate::domain::errors;

pub fn register(groups: &mut RouteGroups) {
    groups.auth_user.get("/keys/{key_id}", get_key_handler);
}

pub async fn get_key_handler(
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = KeyForOrderRequest { key_id };
    validate_request(&request)?;

    let mut envelope = state
        .gateway
        .billing(BillingMethod::GetKeyByID, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::INTERNAL))?;

    Ok(Json(envelope.take("key")))
}
