//! Users of a merchant account.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, BindRejection, Bound, CurrentUser};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::users::{
    ChangeRoleRequest, InviteMerchantUserRequest, MerchantUsersRequest, RoleBindingRequest,
    RoleListRequest,
};
use crate::application::methods::BillingMethod;
use crate::domain::{authorization::role_types, errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/merchants/roles", list_merchant_roles_handler)
        .get("/merchants/{merchant_id}/users", list_merchant_users_handler)
        .post("/merchants/{merchant_id}/invite", invite_merchant_user_handler)
        .post(
            "/merchants/{merchant_id}/users/{role_id}/resend",
            resend_merchant_invite_handler,
        )
        .put(
            "/merchants/{merchant_id}/users/{role_id}/role",
            change_merchant_role_handler,
        )
        .delete(
            "/merchants/{merchant_id}/users/{role_id}/role",
            delete_merchant_user_handler,
        );
}

pub async fn list_merchant_users_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = MerchantUsersRequest { merchant_id };
    validate_request(&request)?;

    let mut envelope = state
        .gateway
        .billing(BillingMethod::GetMerchantUsers, &request)
        .await?;

    Ok(Json(envelope.take("users")))
}

pub async fn change_merchant_role_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((_merchant_id, role_id)): Path<(String, String)>,
    body: Result<Bound<ChangeRoleRequest>, BindRejection>,
) -> Result<StatusCode, ApiError> {
    let Bound(mut request) =
        body.map_err(|_| ApiError::bad_request(&errors::REQUEST_DATA_INVALID))?;
    request.performer_id = user.id;
    request.role_id = role_id;
    validate_request(&request)?;

    state
        .gateway
        .billing(BillingMethod::ChangeRoleForMerchantUser, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::INTERNAL))?;

    Ok(StatusCode::OK)
}

pub async fn invite_merchant_user_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(merchant_id): Path<String>,
    body: Result<Bound<InviteMerchantUserRequest>, BindRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Bound(mut request) =
        body.map_err(|_| ApiError::bad_request(&errors::REQUEST_DATA_INVALID))?;
    request.performer_id = user.id;
    request.merchant_id = merchant_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::InviteUserMerchant, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNABLE_TO_SEND_INVITE))?;

    Ok(Json(envelope))
}

pub async fn resend_merchant_invite_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((_merchant_id, role_id)): Path<(String, String)>,
) -> Result<Json<Envelope>, ApiError> {
    let request = RoleBindingRequest::new(role_id, user.id);
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::ResendInviteMerchant, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNABLE_TO_SEND_INVITE))?;

    Ok(Json(envelope))
}

pub async fn list_merchant_roles_handler(
    State(state): State<AppState>,
) -> Result<Json<Envelope>, ApiError> {
    let request = RoleListRequest {
        role_type: role_types::MERCHANT,
    };

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::GetRoleList, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::INVALID_ROLE_TYPE))?;

    Ok(Json(envelope))
}

pub async fn delete_merchant_user_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((_merchant_id, role_id)): Path<(String, String)>,
) -> Result<Json<Envelope>, ApiError> {
    let request = RoleBindingRequest::new(role_id, user.id);
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::DeleteMerchantUser, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNABLE_TO_DELETE_USER))?;

    Ok(Json(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use axum::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_users_uses_path_merchant() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetMerchantUsers",
            |req| req["merchant_id"] == MERCHANT_ID,
            Envelope::ok().with_field("users", json!([{"email": USER_EMAIL}])),
        );

        let uri = format!("/admin/api/v1/merchants/{MERCHANT_ID}/users");
        let (status, body) = send(app.router(), request(Method::GET, &uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"email": USER_EMAIL}]));
    }

    #[tokio::test]
    async fn test_list_users_rejects_bad_merchant_id() {
        let app = TestApp::new();

        let (status, body) =
            send(app.router(), request(Method::GET, "/admin/api/v1/merchants/xyz/users")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000002");
    }

    #[tokio::test]
    async fn test_invite_binds_path_merchant() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "InviteUserMerchant",
            |req| req["merchant_id"] == MERCHANT_ID && req["performer_id"] == USER_ID,
            Envelope::ok(),
        );

        let uri = format!("/admin/api/v1/merchants/{MERCHANT_ID}/invite");
        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                &uri,
                json!({"email": "dev@unit.test", "role": "merchant_developer"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], 200);
    }

    #[tokio::test]
    async fn test_change_role_relays_rejection() {
        let mut app = TestApp::new();
        expect_call(
            &mut app.billing,
            "ChangeRoleForMerchantUser",
            rejected(404, "ma000100"),
        );

        let uri = format!("/admin/api/v1/merchants/{MERCHANT_ID}/users/{OBJECT_ID}/role");
        let (status, body) = send(
            app.router(),
            json_request(Method::PUT, &uri, json!({"role": "merchant_admin"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ma000100");
    }

    #[tokio::test]
    async fn test_list_roles_asks_for_merchant_roles() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetRoleList",
            |req| req["type"] == "merchant",
            Envelope::ok(),
        );

        let (status, _) =
            send(app.router(), request(Method::GET, "/admin/api/v1/merchants/roles")).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_user_returns_whole_response() {
        let mut app = TestApp::new();
        expect_call(&mut app.billing, "DeleteMerchantUser", rejected(400, "ma000004"));

        let uri = format!("/admin/api/v1/merchants/{MERCHANT_ID}/users/{OBJECT_ID}/role");
        let (status, body) = send(app.router(), request(Method::DELETE, &uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], 400);
        assert_eq!(body["message"]["code"], "ma000004");
    }
}
