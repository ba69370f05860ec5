//! Tax rates, managed by system users through the tax service.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, Listing};
use crate::api::middleware::RawBody;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::taxes::{DeleteRateRequest, TaxRate, TaxRatesRequest};
use crate::application::errors::GatewayError;
use crate::application::methods::TaxMethod;
use crate::domain::{errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .system_user
        .get("/taxes", list_rates_handler)
        .post("/taxes", set_rate_handler)
        .delete("/taxes/{rate_id}", delete_rate_handler);
}

fn internal(err: GatewayError) -> ApiError {
    ApiError::from_gateway(err, &errors::INTERNAL)
}

/// GET /taxes?country=US&state=CA&limit=10
pub async fn list_rates_handler(
    State(state): State<AppState>,
    Listing(request): Listing<TaxRatesRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_request(&request)?;

    let mut envelope = state
        .gateway
        .tax(TaxMethod::GetRates, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.take("rates")))
}

/// Create a rate, or replace the one with the same `id`
pub async fn set_rate_handler(
    State(state): State<AppState>,
    Extension(raw): Extension<RawBody>,
    Bound(rate): Bound<TaxRate>,
) -> Result<Json<Envelope>, ApiError> {
    if raw.0.is_empty() {
        return Err(ApiError::bad_request(&errors::REQUEST_DATA_INVALID));
    }
    validate_request(&rate)?;

    let envelope = state
        .gateway
        .tax(TaxMethod::CreateOrUpdate, &rate)
        .await
        .map_err(internal)?;

    tracing::info!(country = %rate.country, zip = %rate.zip, rate = rate.rate, "tax rate saved");
    Ok(Json(envelope))
}

pub async fn delete_rate_handler(
    State(state): State<AppState>,
    Path(rate_id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id = rate_id
        .parse()
        .map_err(|_| ApiError::bad_request(&errors::REQUEST_PARAMS_INCORRECT))?;

    let envelope = state
        .gateway
        .tax(TaxMethod::DeleteRateById, &DeleteRateRequest { id })
        .await
        .map_err(internal)?;

    Ok(Json(envelope))
}
