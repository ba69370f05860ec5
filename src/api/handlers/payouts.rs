//! Payout documents.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, Listing};
use crate::api::handlers::client_ip;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::reports::{
    CreatePayoutDocumentRequest, PayoutDocumentListingRequest, UpdatePayoutDocumentRequest,
};
use crate::application::methods::BillingMethod;
use crate::domain::ResponseErrorMessage;

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/payout_documents", list_payout_documents_handler)
        .post("/payout_documents", create_payout_document_handler)
        .get(
            "/payout_documents/{payout_document_id}",
            get_payout_document_handler,
        )
        .post(
            "/payout_documents/{payout_document_id}",
            update_payout_document_handler,
        );
}

/// GET /payout_documents?status=pending&merchant_id=...&limit=10
pub async fn list_payout_documents_handler(
    State(state): State<AppState>,
    Listing(request): Listing<PayoutDocumentListingRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetPayoutDocuments, &request)
        .await?;

    Ok(Json(envelope.data()))
}

/// First document of a listing filtered by id; 404 when billing found none
pub async fn get_payout_document_handler(
    State(state): State<AppState>,
    Path(payout_document_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = PayoutDocumentListingRequest {
        payout_document_id,
        ..PayoutDocumentListingRequest::default()
    };
    validate_request(&request)?;

    let mut data = state
        .gateway
        .billing(BillingMethod::GetPayoutDocuments, &request)
        .await?
        .data();

    match data.get_mut("items").and_then(Value::as_array_mut) {
        Some(items) if !items.is_empty() => Ok(Json(items.swap_remove(0))),
        _ => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            ResponseErrorMessage {
                message: "Not Found".to_string(),
                ..ResponseErrorMessage::default()
            },
        )),
    }
}

pub async fn create_payout_document_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Bound(mut request): Bound<CreatePayoutDocumentRequest>,
) -> Result<Json<Value>, ApiError> {
    request.ip = client_ip(&headers);
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::CreatePayoutDocument, &request)
        .await?;

    tracing::info!(merchant_id = %request.merchant_id, "payout document created");
    Ok(Json(envelope.item()))
}

/// POST /payout_documents/{payout_document_id} with `{"status": "failed", "failure_code": "..."}`
pub async fn update_payout_document_handler(
    State(state): State<AppState>,
    Path(payout_document_id): Path<String>,
    headers: HeaderMap,
    Bound(mut request): Bound<UpdatePayoutDocumentRequest>,
) -> Result<Json<Value>, ApiError> {
    request.payout_document_id = payout_document_id;
    request.ip = client_ip(&headers);
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::UpdatePayoutDocument, &request)
        .await?;

    Ok(Json(envelope.item()))
}
