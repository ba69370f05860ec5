//! Test notifications sent to a project's webhook endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::settings::WebhookTestingRequest;
use crate::application::methods::BillingMethod;
use crate::domain::{errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .post("/projects/{project_id}/webhook/testing", send_test_webhook_handler);
}

/// Billing builds an order for `testing_case` and notifies the project
pub async fn send_test_webhook_handler(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Bound(mut request): Bound<WebhookTestingRequest>,
) -> Result<Json<Envelope>, ApiError> {
    request.project_id = project_id;
    validate_request(&request)?;

    if request.testing_case.is_empty() {
        return Err(ApiError::bad_request(&errors::REQUEST_PARAMS_INCORRECT));
    }

    let envelope = state
        .gateway
        .billing(BillingMethod::SendWebhookToMerchant, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::INTERNAL))?;

    Ok(Json(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn uri() -> String {
        format!("/admin/api/v1/projects/{OBJECT_ID}/webhook/testing")
    }

    #[tokio::test]
    async fn test_sends_webhook() {
        let mut app = TestApp::new();
        expect_request(
            &mut app.billing,
            "SendWebhookToMerchant",
            |req| req["project_id"] == OBJECT_ID && req["testing_case"] == "correct_payment",
            Envelope::ok(),
        );

        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                &uri(),
                json!({"testing_case": "correct_payment", "type": "simple", "amount": 10}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], 200);
    }

    #[tokio::test]
    async fn test_requires_testing_case() {
        let mut app = TestApp::new();
        expect_no_call(&mut app.billing, "SendWebhookToMerchant");

        let (status, body) = send(
            app.router(),
            json_request(Method::POST, &uri(), json!({"type": "simple"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000023");
    }

    #[tokio::test]
    async fn test_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.billing, "SendWebhookToMerchant");

        let (status, body) = send(
            app.router(),
            json_request(Method::POST, &uri(), json!({"testing_case": "non_existing_user"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000003");
    }
}
