//! Payment tokens issued to projects for their customers.

use axum::{extract::State, http::HeaderMap, Extension, Json};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound};
use crate::api::handlers::check_project_signature;
use crate::api::middleware::RawBody;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::settings::{CreatedToken, TokenRequest};
use crate::application::methods::BillingMethod;
use crate::domain::ResponseErrorMessage;

pub fn register(groups: &mut RouteGroups) {
    groups.common.post("/tokens", create_token_handler);
}

/// POST /tokens
///
/// The request must be signed with the project's secret key. The response
/// carries the token and a ready-made payment form link.
#[utoipa::path(
    post,
    path = "/api/v1/tokens",
    tag = "checkout",
    responses(
        (status = 200, description = "Token issued", body = CreatedToken),
        (status = 400, description = "Invalid request or signature", body = ResponseErrorMessage)
    )
)]
pub async fn create_token_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Extension(raw): Extension<RawBody>,
    Bound(request): Bound<TokenRequest>,
) -> Result<Json<CreatedToken>, ApiError> {
    validate_request(&request)?;
    check_project_signature(&state, &headers, &raw, &request.settings.project_id).await?;

    let envelope = state
        .gateway
        .billing(BillingMethod::CreateToken, &request)
        .await?;
    let token = envelope.str_field("token");

    tracing::info!(project_id = %request.settings.project_id, "payment token created");
    Ok(Json(CreatedToken::new(
        token,
        &state.config.order_inline_form_url_mask,
    )))
}
