//! System administrators: listing, invitations and role management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, BindRejection, Bound, CurrentUser};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::users::{
    ChangeRoleRequest, InviteAdminRequest, RoleBindingRequest, RoleListRequest,
};
use crate::application::methods::BillingMethod;
use crate::domain::{authorization::role_types, errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .system_user
        .get("/users", list_admin_users_handler)
        .put("/users/{role_id}/role", change_admin_role_handler)
        .post("/users/invite", invite_admin_handler)
        .post("/users/{role_id}/resend", resend_admin_invite_handler)
        .get("/users/roles", list_admin_roles_handler)
        .delete("/users/{role_id}/role", delete_admin_user_handler);

    groups
        .auth_user
        .get("/users", list_admin_users_handler)
        .put("/users/roles/{role_id}", change_admin_role_handler);
}

/// GET /users
/// List users of the system account
#[utoipa::path(
    get,
    path = "/admin/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Admin users"),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Remote call failed")
    )
)]
pub async fn list_admin_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let mut envelope = state
        .gateway
        .billing(BillingMethod::GetAdminUsers, &json!({}))
        .await?;

    Ok(Json(envelope.take("users")))
}

/// PUT /users/{role_id}/role
pub async fn change_admin_role_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<String>,
    body: Result<Bound<ChangeRoleRequest>, BindRejection>,
) -> Result<StatusCode, ApiError> {
    let Bound(mut request) =
        body.map_err(|_| ApiError::bad_request(&errors::REQUEST_DATA_INVALID))?;
    request.performer_id = user.id;
    request.role_id = role_id;
    validate_request(&request)?;

    state
        .gateway
        .billing(BillingMethod::ChangeRoleForAdminUser, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::INTERNAL))?;

    Ok(StatusCode::OK)
}

/// POST /users/invite
pub async fn invite_admin_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Bound<InviteAdminRequest>, BindRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Bound(mut request) =
        body.map_err(|_| ApiError::bad_request(&errors::REQUEST_DATA_INVALID))?;
    request.performer_id = user.id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::InviteUserAdmin, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNABLE_TO_SEND_INVITE))?;

    Ok(Json(envelope))
}

/// POST /users/{role_id}/resend
pub async fn resend_admin_invite_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let request = RoleBindingRequest::new(role_id, user.id);
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::ResendInviteAdmin, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNABLE_TO_SEND_INVITE))?;

    Ok(Json(envelope))
}

/// GET /users/roles
pub async fn list_admin_roles_handler(
    State(state): State<AppState>,
) -> Result<Json<Envelope>, ApiError> {
    let request = RoleListRequest {
        role_type: role_types::SYSTEM,
    };

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::GetRoleList, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::INVALID_ROLE_TYPE))?;

    Ok(Json(envelope))
}

/// DELETE /users/{role_id}/role
pub async fn delete_admin_user_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(role_id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let request = RoleBindingRequest::new(role_id, user.id);
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::DeleteAdminUser, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNABLE_TO_DELETE_USER))?;

    Ok(Json(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use axum::http::Method;

    #[tokio::test]
    async fn test_list_users_projects_users() {
        let mut app = TestApp::new();
        expect_call(
            &mut app.billing,
            "GetAdminUsers",
            Envelope::ok().with_field("users", json!([{"id": OBJECT_ID, "role": "some_role"}])),
        );

        let (status, body) = send(app.router(), request(Method::GET, "/system/api/v1/users")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"id": OBJECT_ID, "role": "some_role"}]));
    }

    #[tokio::test]
    async fn test_list_users_relays_remote_status() {
        let mut app = TestApp::new();
        expect_call(&mut app.billing, "GetAdminUsers", rejected(400, "ma000006"));

        let (status, body) = send(app.router(), request(Method::GET, "/system/api/v1/users")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000006");
    }

    #[tokio::test]
    async fn test_list_users_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "GetAdminUsers");

        let (status, body) = send(app.router(), request(Method::GET, "/system/api/v1/users")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000001");
    }

    #[tokio::test]
    async fn test_change_role_sets_performer_and_role() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "ChangeRoleForAdminUser",
            |req| {
                req["performer_id"] == USER_ID
                    && req["role_id"] == OBJECT_ID
                    && req["role"] == "system_admin"
            },
            Envelope::ok(),
        );

        let uri = format!("/system/api/v1/users/{OBJECT_ID}/role");
        let (status, body) = send(
            app.router(),
            json_request(Method::PUT, &uri, json!({"role": "system_admin", "performer_id": "x"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_change_role_empty_role_is_rejected() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "ChangeRoleForAdminUser");
        let router = app.router();

        let uri = format!("/admin/api/v1/users/roles/{OBJECT_ID}");
        let (status, body) =
            send(router.clone(), json_request(Method::PUT, &uri, json!({"role": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000002");

        let (status, body) = send(router, request(Method::PUT, &uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["details"],
            "field validation for 'role' failed on the 'required' tag"
        );
    }

    #[tokio::test]
    async fn test_change_role_malformed_body() {
        let app = TestApp::new();
        let uri = format!("/system/api/v1/users/{OBJECT_ID}/role");
        let request = axum::http::Request::put(&uri)
            .header("authorization", BEARER)
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{role"))
            .unwrap();

        let (status, body) = send(app.router(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000026");
    }

    #[tokio::test]
    async fn test_invite_returns_whole_response() {
        let mut app = TestApp::new();
        expect_call(
            &mut app.billing,
            "InviteUserAdmin",
            Envelope::ok().with_field("role", json!({"id": OBJECT_ID})),
        );

        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                "/system/api/v1/users/invite",
                json!({"email": "admin@unit.test", "role": "system_admin"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], 200);
        assert_eq!(body["role"]["id"], OBJECT_ID);
    }

    #[tokio::test]
    async fn test_invite_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "InviteUserAdmin");

        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                "/system/api/v1/users/invite",
                json!({"email": "admin@unit.test", "role": "system_admin"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000105");
    }

    #[tokio::test]
    async fn test_resend_invalid_role_id() {
        let app = TestApp::new();

        let (status, body) = send(
            app.router(),
            request(Method::POST, "/system/api/v1/users/not-an-id/resend"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000002");
    }

    #[tokio::test]
    async fn test_list_roles_asks_for_system_roles() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetRoleList",
            |req| req["type"] == "system",
            Envelope::ok().with_field("items", json!([])),
        );

        let (status, body) =
            send(app.router(), request(Method::GET, "/system/api/v1/users/roles")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], json!([]));
    }

    #[tokio::test]
    async fn test_delete_user_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "DeleteAdminUser");

        let uri = format!("/system/api/v1/users/{OBJECT_ID}/role");
        let (status, body) = send(app.router(), request(Method::DELETE, &uri)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000109");
    }
}
