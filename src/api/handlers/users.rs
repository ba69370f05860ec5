//! Invitations and merchant lookup for the signed-in user.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, BindRejection, Bound, CurrentUser};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::users::{
    AcceptInviteRequest, CheckInviteTokenRequest, PermissionsRequest, UserMerchantsRequest,
};
use crate::application::methods::BillingMethod;
use crate::domain::{errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .post("/user/invite/check", check_invite_handler)
        .post("/user/invite/approve", approve_invite_handler)
        .post("/user/merchants", user_merchants_handler);

    groups.auth_project.get("/permissions", permissions_handler);
}

pub async fn check_invite_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Bound<CheckInviteTokenRequest>, BindRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Bound(mut request) =
        body.map_err(|_| ApiError::bad_request(&errors::REQUEST_DATA_INVALID))?;
    request.email = user.email;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::CheckInviteToken, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNABLE_TO_CHECK_INVITE_TOKEN))?;

    Ok(Json(envelope))
}

pub async fn approve_invite_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Bound<AcceptInviteRequest>, BindRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Bound(mut request) =
        body.map_err(|_| ApiError::bad_request(&errors::REQUEST_DATA_INVALID))?;
    request.user_id = user.id;
    request.email = user.email;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::AcceptInvite, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNABLE_TO_ACCEPT_INVITE))?;

    Ok(Json(envelope))
}

/// Merchants the user has a role in, as returned by billing
pub async fn user_merchants_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Envelope>, ApiError> {
    let request = UserMerchantsRequest { user_id: user.id };

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::GetMerchantsForUser, &request)
        .await?;

    Ok(Json(envelope))
}

pub async fn permissions_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let request = PermissionsRequest {
        user_id: user.id,
        merchant_id: user.merchant_id,
    };

    let mut envelope = state
        .gateway
        .billing(BillingMethod::GetPermissionsForUser, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::INTERNAL))?;

    Ok(Json(envelope.take("permissions")))
}
