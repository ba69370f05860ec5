//! Zip code lookup.

use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Listing};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::catalog::ZipCodeRequest;
use crate::application::methods::BillingMethod;
use crate::domain::{errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups.common.get("/zip", find_zip_handler);
}

/// GET /zip?country=US&zip=98
pub async fn find_zip_handler(
    State(state): State<AppState>,
    Listing(request): Listing<ZipCodeRequest>,
) -> Result<Json<Envelope>, ApiError> {
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::FindByZipCode, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNKNOWN))?;

    Ok(Json(envelope))
}
