//! Payment channel and money-back cost tariffs.
//!
//! System tariffs are maintained by system users; merchant tariffs live on
//! the admin group under the merchant's id.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound};
use crate::api::handlers::require_object_id;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::payment_costs::{
    ChannelCostQuery, MerchantCostsRequest, MoneyBackCostQuery, PaymentCost, PaymentCostRef,
};
use crate::application::errors::GatewayError;
use crate::application::methods::BillingMethod;
use crate::domain::errors;

pub fn register(groups: &mut RouteGroups) {
    groups
        .system_user
        .get("/payment_costs/channel/system", channel_system_handler)
        .get("/payment_costs/channel/system/all", all_channel_system_handler)
        .post("/payment_costs/channel/system", set_channel_system_handler)
        .put("/payment_costs/channel/system/{id}", update_channel_system_handler)
        .delete("/payment_costs/channel/system/{id}", delete_channel_system_handler)
        .get("/payment_costs/money_back/system", money_back_system_handler)
        .get("/payment_costs/money_back/system/all", all_money_back_system_handler)
        .post("/payment_costs/money_back/system", set_money_back_system_handler)
        .put("/payment_costs/money_back/system/{id}", update_money_back_system_handler)
        .delete("/payment_costs/money_back/system/{id}", delete_money_back_system_handler);

    groups
        .auth_user
        .get("/payment_costs/channel/merchant/{merchant_id}", channel_merchant_handler)
        .get("/payment_costs/channel/merchant/{merchant_id}/all", all_channel_merchant_handler)
        .post("/payment_costs/channel/merchant/{merchant_id}", set_channel_merchant_handler)
        .put(
            "/payment_costs/channel/merchant/{merchant_id}/{rate_id}",
            update_channel_merchant_handler,
        )
        .delete(
            "/payment_costs/channel/merchant/{merchant_id}/{rate_id}",
            delete_channel_merchant_handler,
        )
        .get("/payment_costs/money_back/merchant/{merchant_id}", money_back_merchant_handler)
        .get(
            "/payment_costs/money_back/merchant/{merchant_id}/all",
            all_money_back_merchant_handler,
        )
        .post(
            "/payment_costs/money_back/merchant/{merchant_id}",
            set_money_back_merchant_handler,
        )
        .put(
            "/payment_costs/money_back/merchant/{merchant_id}/{rate_id}",
            update_money_back_merchant_handler,
        )
        .delete(
            "/payment_costs/money_back/merchant/{merchant_id}/{rate_id}",
            delete_money_back_merchant_handler,
        );
}

fn internal(err: GatewayError) -> ApiError {
    ApiError::from_gateway(err, &errors::INTERNAL)
}

async fn item<T>(state: &AppState, method: BillingMethod, request: &T) -> Result<Json<Value>, ApiError>
where
    T: Serialize + Validate,
{
    validate_request(request)?;

    let envelope = state
        .gateway
        .billing(method, request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.item()))
}

async fn all_of_system(state: &AppState, method: BillingMethod) -> Result<Json<Value>, ApiError> {
    let envelope = state
        .gateway
        .billing(method, &json!({}))
        .await
        .map_err(internal)?;

    Ok(Json(envelope.item()))
}

async fn delete(state: &AppState, method: BillingMethod, id: String) -> Result<StatusCode, ApiError> {
    let request = PaymentCostRef { id };
    validate_request(&request)?;

    state
        .gateway
        .billing(method, &request)
        .await
        .map_err(internal)?;

    tracing::info!(method = %method, id = %request.id, "payment cost deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn all_of_merchant(
    state: &AppState,
    method: BillingMethod,
    merchant_id: String,
) -> Result<Json<Value>, ApiError> {
    item(state, method, &MerchantCostsRequest { merchant_id }).await
}

/// GET /payment_costs/channel/system?name=VISA&region=CIS&country=AZ
pub async fn channel_system_handler(
    State(state): State<AppState>,
    Bound(query): Bound<ChannelCostQuery>,
) -> Result<Json<Value>, ApiError> {
    item(&state, BillingMethod::GetPaymentChannelCostSystem, &query).await
}

pub async fn all_channel_system_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    all_of_system(&state, BillingMethod::GetAllPaymentChannelCostSystem).await
}

pub async fn set_channel_system_handler(
    State(state): State<AppState>,
    Bound(mut cost): Bound<PaymentCost>,
) -> Result<Json<Value>, ApiError> {
    cost.merchant_id.clear();
    item(&state, BillingMethod::SetPaymentChannelCostSystem, &cost).await
}

pub async fn update_channel_system_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Bound(mut cost): Bound<PaymentCost>,
) -> Result<Json<Value>, ApiError> {
    cost.id = id;
    cost.merchant_id.clear();
    item(&state, BillingMethod::SetPaymentChannelCostSystem, &cost).await
}

pub async fn delete_channel_system_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete(&state, BillingMethod::DeletePaymentChannelCostSystem, id).await
}

/// GET /payment_costs/money_back/system?name=VISA&region=CIS&days=10&undo_reason=chargeback
pub async fn money_back_system_handler(
    State(state): State<AppState>,
    Bound(query): Bound<MoneyBackCostQuery>,
) -> Result<Json<Value>, ApiError> {
    item(&state, BillingMethod::GetMoneyBackCostSystem, &query).await
}

pub async fn all_money_back_system_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    all_of_system(&state, BillingMethod::GetAllMoneyBackCostSystem).await
}

pub async fn set_money_back_system_handler(
    State(state): State<AppState>,
    Bound(mut cost): Bound<PaymentCost>,
) -> Result<Json<Value>, ApiError> {
    cost.merchant_id.clear();
    item(&state, BillingMethod::SetMoneyBackCostSystem, &cost).await
}

pub async fn update_money_back_system_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Bound(mut cost): Bound<PaymentCost>,
) -> Result<Json<Value>, ApiError> {
    cost.id = id;
    cost.merchant_id.clear();
    item(&state, BillingMethod::SetMoneyBackCostSystem, &cost).await
}

pub async fn delete_money_back_system_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete(&state, BillingMethod::DeleteMoneyBackCostSystem, id).await
}

pub async fn channel_merchant_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Bound(mut query): Bound<ChannelCostQuery>,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    query.merchant_id = merchant_id;
    item(&state, BillingMethod::GetPaymentChannelCostMerchant, &query).await
}

pub async fn all_channel_merchant_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    all_of_merchant(&state, BillingMethod::GetAllPaymentChannelCostMerchant, merchant_id).await
}

pub async fn set_channel_merchant_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Bound(mut cost): Bound<PaymentCost>,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    cost.merchant_id = merchant_id;
    item(&state, BillingMethod::SetPaymentChannelCostMerchant, &cost).await
}

pub async fn update_channel_merchant_handler(
    State(state): State<AppState>,
    Path((merchant_id, rate_id)): Path<(String, String)>,
    Bound(mut cost): Bound<PaymentCost>,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    cost.merchant_id = merchant_id;
    cost.id = rate_id;
    item(&state, BillingMethod::SetPaymentChannelCostMerchant, &cost).await
}

pub async fn delete_channel_merchant_handler(
    State(state): State<AppState>,
    Path((merchant_id, rate_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    delete(&state, BillingMethod::DeletePaymentChannelCostMerchant, rate_id).await
}

pub async fn money_back_merchant_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Bound(mut query): Bound<MoneyBackCostQuery>,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    query.merchant_id = merchant_id;
    item(&state, BillingMethod::GetMoneyBackCostMerchant, &query).await
}

pub async fn all_money_back_merchant_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    all_of_merchant(&state, BillingMethod::GetAllMoneyBackCostMerchant, merchant_id).await
}

pub async fn set_money_back_merchant_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Bound(mut cost): Bound<PaymentCost>,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    cost.merchant_id = merchant_id;
    item(&state, BillingMethod::SetMoneyBackCostMerchant, &cost).await
}

pub async fn update_money_back_merchant_handler(
    State(state): State<AppState>,
    Path((merchant_id, rate_id)): Path<(String, String)>,
    Bound(mut cost): Bound<PaymentCost>,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    cost.merchant_id = merchant_id;
    cost.id = rate_id;
    item(&state, BillingMethod::SetMoneyBackCostMerchant, &cost).await
}

pub async fn delete_money_back_merchant_handler(
    State(state): State<AppState>,
    Path((merchant_id, rate_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    delete(&state, BillingMethod::DeleteMoneyBackCostMerchant, rate_id).await
}
