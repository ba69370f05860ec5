//! The signed-in user's profile, page reviews and email confirmation.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, CurrentUser};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::onboarding::{MerchantUser, OnboardingRequest};
use crate::application::dto::user_profiles::{
    ConfirmUserEmailRequest, ConfirmedProfile, PageReviewRequest, UserProfileRef,
    UserProfileRequest,
};
use crate::application::errors::GatewayError;
use crate::application::methods::BillingMethod;
use crate::domain::{errors, ResponseErrorMessage};

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_project
        .get("/user/profile", get_own_profile_handler)
        .patch("/user/profile", set_profile_handler)
        .get("/user/profile/common", get_common_profile_handler)
        .post("/user/feedback", create_feedback_handler);

    groups
        .system_user
        .get("/user/profile/{profile_id}", get_profile_handler);

    groups
        .common
        .put("/user/confirm_email", confirm_email_handler);
}

fn unknown(err: GatewayError) -> ApiError {
    ApiError::from_gateway(err, &errors::UNKNOWN)
}

async fn profile(state: &AppState, request: UserProfileRef) -> Result<Json<Value>, ApiError> {
    let envelope = state
        .gateway
        .billing(BillingMethod::GetUserProfile, &request)
        .await
        .map_err(unknown)?;

    Ok(Json(envelope.item()))
}

pub async fn get_own_profile_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    profile(&state, UserProfileRef::of_user(user.id)).await
}

/// Any profile, looked up by its own id
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    profile(&state, UserProfileRef::of_profile(profile_id)).await
}

/// Profile fields shared across PaySuper products
pub async fn get_common_profile_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let mut envelope = state
        .gateway
        .billing(
            BillingMethod::GetCommonUserProfile,
            &UserProfileRef::of_user(user.id),
        )
        .await
        .map_err(unknown)?;

    Ok(Json(envelope.take("profile")))
}

pub async fn set_profile_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Bound(request): Bound<UserProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    let request = request.for_user(user.id, user.email);
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::CreateOrUpdateUserProfile, &request)
        .await
        .map_err(unknown)?;

    tracing::info!(user_id = %request.user_id, "user profile saved");
    Ok(Json(envelope.item()))
}

/// PUT /user/confirm_email
///
/// Confirms the address behind the token, then records the user on the
/// merchant created for them.
#[utoipa::path(
    put,
    path = "/api/v1/user/confirm_email",
    tag = "users",
    responses(
        (status = 200, description = "Email confirmed"),
        (status = 400, description = "Token missing or invalid", body = ResponseErrorMessage)
    )
)]
pub async fn confirm_email_handler(
    State(state): State<AppState>,
    Bound(request): Bound<ConfirmUserEmailRequest>,
) -> Result<(), ApiError> {
    request
        .validate()
        .map_err(|_| ApiError::bad_request(&errors::REQUEST_PARAMS_INCORRECT))?;

    let mut envelope = state
        .gateway
        .billing(BillingMethod::ConfirmUserEmail, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::INTERNAL))?;

    let profile: ConfirmedProfile = serde_json::from_value(envelope.take("profile"))
        .map_err(|_| ApiError::internal_error(&errors::INTERNAL))?;

    let onboarding = OnboardingRequest {
        user: MerchantUser {
            id: profile.user_id,
            email: profile.email.email,
            profile_id: profile.id,
            registration_date: profile.created_at,
        },
        ..OnboardingRequest::default()
    };
    validate_request(&onboarding)?;

    state
        .gateway
        .billing(BillingMethod::ChangeMerchant, &onboarding)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::INTERNAL))?;

    tracing::info!(user_id = %onboarding.user.id, "user email confirmed");
    Ok(())
}

/// Review left on an onboarding page
pub async fn create_feedback_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Bound(mut request): Bound<PageReviewRequest>,
) -> Result<(), ApiError> {
    if user.is_anonymous() {
        return Err(ApiError::unauthorized(&errors::ACCESS_DENIED));
    }

    request.user_id = user.id;
    validate_request(&request)?;

    state
        .gateway
        .billing(BillingMethod::CreatePageReview, &request)
        .await
        .map_err(unknown)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use crate::domain::Envelope;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn profile_body() -> Value {
        json!({
            "personal": {"first_name": "unit test", "last_name": "test-unit", "position": "Software Developer"},
            "company": {
                "company_name": "Unit Test.-444",
                "website": "http://localhost",
                "annual_income": {"from": 0, "to": 1000},
                "number_of_employees": {"from": 1, "to": 10},
                "kind_of_activity": "other"
            }
        })
    }

    #[tokio::test]
    async fn test_get_own_profile() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetUserProfile",
            |req| req["user_id"] == USER_ID && req.get("profile_id").is_none(),
            Envelope::ok().with_field("item", json!({"id": OBJECT_ID, "user_id": USER_ID})),
        );

        let (status, body) =
            send(app.router(), request(Method::GET, "/auth/api/v1/user/profile")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], OBJECT_ID);
    }

    #[tokio::test]
    async fn test_get_own_profile_rejected() {
        let mut app = TestApp::new();
        expect_call(&mut app.billing, "GetUserProfile", rejected(404, "ma000001"));

        let (status, body) =
            send(app.router(), request(Method::GET, "/auth/api/v1/user/profile")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "rejected by remote");
    }

    #[tokio::test]
    async fn test_system_user_reads_profile_by_id() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "GetUserProfile",
            |req| req["profile_id"] == OBJECT_ID && req.get("user_id").is_none(),
            Envelope::ok().with_field("item", json!({"id": OBJECT_ID})),
        );

        let (status, _) = send(
            app.router(),
            request(
                Method::GET,
                &format!("/system/api/v1/user/profile/{OBJECT_ID}"),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_common_profile() {
        let mut app = TestApp::new();
        expect_call(
            &mut app.billing,
            "GetCommonUserProfile",
            Envelope::ok().with_field("profile", json!({"profile": {"id": OBJECT_ID}})),
        );

        let (status, body) = send(
            app.router(),
            request(Method::GET, "/auth/api/v1/user/profile/common"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"]["id"], OBJECT_ID);
    }

    #[tokio::test]
    async fn test_set_profile() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "CreateOrUpdateUserProfile",
            |req| req["user_id"] == USER_ID && req["email"]["email"] == USER_EMAIL,
            Envelope::ok().with_field("item", json!({"id": OBJECT_ID})),
        );

        let (status, body) = send(
            app.router(),
            json_request(Method::PATCH, "/auth/api/v1/user/profile", profile_body()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], OBJECT_ID);
    }

    #[tokio::test]
    async fn test_set_profile_bind_error() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "CreateOrUpdateUserProfile");

        let (status, body) = send(
            app.router(),
            json_request(
                Method::PATCH,
                "/auth/api/v1/user/profile",
                json!({"help": {"product_promotion_and_development": "unit test"}}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000023");
    }

    #[tokio::test]
    async fn test_set_profile_wrong_annual_income() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "CreateOrUpdateUserProfile");

        let mut body = profile_body();
        body["company"]["annual_income"] = json!({"from": 3, "to": 4});

        let (status, body) = send(
            app.router(),
            json_request(Method::PATCH, "/auth/api/v1/user/profile", body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], errors::INCORRECT_ANNUAL_INCOME.code);
    }

    #[tokio::test]
    async fn test_set_profile_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "CreateOrUpdateUserProfile");

        let (status, body) = send(
            app.router(),
            json_request(Method::PATCH, "/auth/api/v1/user/profile", profile_body()),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000001");
    }

    #[tokio::test]
    async fn test_confirm_email_records_merchant_user() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "ConfirmUserEmail",
            |req| req["token"] == "123456789",
            Envelope::ok().with_field(
                "profile",
                json!({
                    "id": OBJECT_ID,
                    "user_id": USER_ID,
                    "email": {"email": USER_EMAIL, "confirmed": true},
                    "created_at": {"seconds": 1566460800}
                }),
            ),
        );
        expect_request(
            &mut app.billing,
            "ChangeMerchant",
            |req| {
                req["user"]["profile_id"] == OBJECT_ID
                    && req["user"]["id"] == USER_ID
                    && req["user"]["email"] == USER_EMAIL
                    && req["user"]["registration_date"]["seconds"] == 1566460800
            },
            Envelope::ok(),
        );

        let (status, body) = send(
            app.router(),
            json_request(
                Method::PUT,
                "/api/v1/user/confirm_email",
                json!({"token": "123456789"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_confirm_email_requires_token() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "ConfirmUserEmail");

        let (status, body) = send(
            app.router(),
            json_request(Method::PUT, "/api/v1/user/confirm_email", json!({"token": ""})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000023");
    }

    #[tokio::test]
    async fn test_confirm_email_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "ConfirmUserEmail");
        expect_no_call(&mut app.billing, "ChangeMerchant");

        let (status, body) = send(
            app.router(),
            json_request(
                Method::PUT,
                "/api/v1/user/confirm_email",
                json!({"token": "123456789"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000003");
    }

    #[tokio::test]
    async fn test_feedback() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "CreatePageReview",
            |req| req["user_id"] == USER_ID && req["url"] == "primary_onboarding",
            Envelope::ok(),
        );

        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                "/auth/api/v1/user/feedback",
                json!({"review": "some review text", "url": "primary_onboarding"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_feedback_unknown_page() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "CreatePageReview");

        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                "/auth/api/v1/user/feedback",
                json!({"review": "some review text", "url": ""}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], errors::INCORRECT_PAGE_ID.code);
    }

    #[tokio::test]
    async fn test_feedback_review_too_long() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "CreatePageReview");

        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                "/auth/api/v1/user/feedback",
                json!({"review": "a".repeat(501), "url": "primary_onboarding"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], errors::INCORRECT_REVIEW.code);
    }

    #[tokio::test]
    async fn test_feedback_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "CreatePageReview");

        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                "/auth/api/v1/user/feedback",
                json!({"review": "some review text", "url": "merchant_onboarding"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000001");
    }
}
