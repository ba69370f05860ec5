//! Merchant balance.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, CurrentUser};
use crate::api::handlers::merchant_of;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::dashboard::MerchantBalanceRequest;
use crate::application::methods::BillingMethod;

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/balance", own_balance_handler)
        .get("/balance/{merchant_id}", merchant_balance_handler);
}

async fn balance(state: &AppState, merchant_id: String) -> Result<Json<Value>, ApiError> {
    let request = MerchantBalanceRequest { merchant_id };
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetMerchantBalance, &request)
        .await?;

    Ok(Json(envelope.item()))
}

/// Balance of the merchant owned by the caller
pub async fn own_balance_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let merchant_id = merchant_of(&state, &user).await?;
    balance(&state, merchant_id).await
}

pub async fn merchant_balance_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    balance(&state, merchant_id).await
}
