//! Projects of the signed-in user's merchant.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, CurrentUser, Listing};
use crate::api::handlers::require_object_id;
use crate::api::router::{AppState, RouteGroups};
use crate::application::binders::{self, PROJECT_BASE_FIELDS, PROJECT_FIELDS};
use crate::application::dto::projects::{
    CheckSkuRequest, ProjectListingRequest, ProjectRef, ProjectRequest,
};
use crate::application::methods::BillingMethod;
use crate::domain::{errors, AuthUser, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/projects", list_projects_handler)
        .post("/projects", create_project_handler)
        .get("/projects/{project_id}", get_project_handler)
        .patch("/projects/{project_id}", update_project_handler)
        .delete("/projects/{project_id}", delete_project_handler)
        .get("/projects/{project_id}/sku", check_sku_handler);
}

fn project_ref(user: &AuthUser, project_id: String) -> Result<ProjectRef, ApiError> {
    let request = ProjectRef {
        project_id,
        merchant_id: user.merchant_id.clone(),
    };
    validate_request(&request)?;
    Ok(request)
}

fn require_own_merchant(user: &AuthUser, merchant_id: &str) -> Result<(), ApiError> {
    if merchant_id != user.merchant_id {
        tracing::warn!(user_id = %user.id, merchant_id = %merchant_id, "project of another merchant");
        return Err(ApiError::bad_request(&errors::INCORRECT_MERCHANT_ID));
    }
    Ok(())
}

pub async fn list_projects_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Listing(mut request): Listing<ProjectListingRequest>,
) -> Result<Json<Envelope>, ApiError> {
    request.merchant_id = user.merchant_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::ListProjects, &request)
        .await?;

    Ok(Json(envelope))
}

/// POST /projects; answers 201 with billing's response
pub async fn create_project_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Bound(request): Bound<ProjectRequest>,
) -> Result<(StatusCode, Json<Envelope>), ApiError> {
    require_own_merchant(&user, &request.merchant_id)?;
    let request = request.with_default_protocol();
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::ChangeProject, &request)
        .await?;

    tracing::info!(merchant_id = %request.merchant_id, "project created");
    Ok((StatusCode::CREATED, Json(envelope)))
}

pub async fn get_project_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let request = project_ref(&user, project_id)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetProject, &request)
        .await?;

    Ok(Json(envelope))
}

/// PATCH /projects/{project_id}
///
/// Starts from the stored project and overlays the fields present in the
/// body, each checked for its JSON type. Localized names are merged.
pub async fn update_project_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<String>,
    Bound(patch): Bound<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&project_id, &errors::INCORRECT_PROJECT_ID)?;

    let stored = state
        .gateway
        .billing(
            BillingMethod::GetProject,
            &ProjectRef {
                project_id: project_id.clone(),
                merchant_id: String::new(),
            },
        )
        .await?
        .item();

    let mut data = binders::base_from(&stored, PROJECT_BASE_FIELDS);
    binders::overlay(&mut data, &patch, PROJECT_FIELDS).map_err(ApiError::bad_request)?;
    data.insert("id".to_string(), Value::String(project_id));

    let request: ProjectRequest = serde_json::from_value(Value::Object(data))
        .map_err(|_| ApiError::bad_request(&errors::REQUEST_PARAMS_INCORRECT))?;
    require_own_merchant(&user, &request.merchant_id)?;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::ChangeProject, &request)
        .await?;

    Ok(Json(envelope.item()))
}

pub async fn delete_project_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let request = project_ref(&user, project_id)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::DeleteProject, &request)
        .await?;

    tracing::info!(project_id = %request.project_id, "project deleted");
    Ok(Json(envelope))
}

/// GET /projects/{project_id}/sku?sku=...; 200 with an empty body when free
pub async fn check_sku_handler(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Bound(mut request): Bound<CheckSkuRequest>,
) -> Result<StatusCode, ApiError> {
    request.project_id = project_id;
    validate_request(&request)?;

    state
        .gateway
        .billing(BillingMethod::CheckSkuAndKeyProject, &request)
        .await?;

    Ok(StatusCode::OK)
}
