//! Key products of the signed-in merchant and their platform key files.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, CurrentUser, Listing};
use crate::api::handlers::{client_ip, header_str};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::key_products::{
    KeyProductInfoRequest, KeyProductListingRequest, KeyProductRef, KeyProductRequest,
    KeyProductStateRequest, PlatformKeyCountRequest, PlatformKeysFileRequest,
    PlatformListingRequest,
};
use crate::application::errors::GatewayError;
use crate::application::gateway::LONG_CALL_TIMEOUT;
use crate::application::methods::{BillingMethod, GeoMethod};
use crate::application::ports::CallOptions;
use crate::domain::constants::HEADER_ACCEPT_LANGUAGE;
use crate::domain::{errors, Envelope};

const KEYS_FILE_FIELD: &str = "file";

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/key-products", list_key_products_handler)
        .post("/key-products", create_key_product_handler)
        .get("/key-products/{key_product_id}", get_key_product_handler)
        .put("/key-products/{key_product_id}", change_key_product_handler)
        .delete("/key-products/{key_product_id}", delete_key_product_handler)
        .post(
            "/key-products/{key_product_id}/publish",
            publish_key_product_handler,
        )
        .post(
            "/key-products/{key_product_id}/unpublish",
            unpublish_key_product_handler,
        )
        .get("/platforms", list_platforms_handler)
        .post(
            "/key-products/{key_product_id}/platforms/{platform_id}/file",
            upload_keys_handler,
        )
        .get(
            "/key-products/{key_product_id}/platforms/{platform_id}/count",
            count_keys_handler,
        );

    groups
        .auth_project
        .get("/key-products/{key_product_id}", key_product_info_handler);
}

fn internal(err: GatewayError) -> ApiError {
    ApiError::from_gateway(err, &errors::INTERNAL)
}

pub async fn list_key_products_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Listing(mut request): Listing<KeyProductListingRequest>,
) -> Result<Json<Envelope>, ApiError> {
    request.merchant_id = user.merchant_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetKeyProducts, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope))
}

pub async fn create_key_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Bound(mut request): Bound<KeyProductRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    request.id.clear();
    request.merchant_id = user.merchant_id;
    validate_request(&request)?;

    tracing::info!(sku = %request.sku, project_id = %request.project_id, "creating key product");

    let mut envelope = state
        .gateway
        .billing(BillingMethod::CreateOrUpdateKeyProduct, &request)
        .await
        .map_err(internal)?;

    Ok((StatusCode::CREATED, Json(envelope.take("product"))))
}

pub async fn get_key_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(key_product_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = KeyProductRef {
        id: key_product_id,
        merchant_id: user.merchant_id,
    };
    validate_request(&request)?;

    let mut envelope = state
        .gateway
        .billing(BillingMethod::GetKeyProduct, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.take("product")))
}

pub async fn change_key_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(key_product_id): Path<String>,
    Bound(mut request): Bound<KeyProductRequest>,
) -> Result<Json<Value>, ApiError> {
    request.id = key_product_id;
    request.merchant_id = user.merchant_id;
    validate_request(&request)?;

    let mut envelope = state
        .gateway
        .billing(BillingMethod::CreateOrUpdateKeyProduct, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.take("product")))
}

pub async fn delete_key_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(key_product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let request = KeyProductRef {
        id: key_product_id,
        merchant_id: user.merchant_id,
    };
    validate_request(&request)?;

    state
        .gateway
        .billing(BillingMethod::DeleteKeyProduct, &request)
        .await
        .map_err(internal)?;

    Ok(StatusCode::OK)
}

async fn change_publication(
    state: &AppState,
    method: BillingMethod,
    request: KeyProductStateRequest,
) -> Result<Json<Value>, ApiError> {
    validate_request(&request)?;

    let mut envelope = state
        .gateway
        .billing(method, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.take("product")))
}

pub async fn publish_key_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(key_product_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = KeyProductStateRequest {
        key_product_id,
        merchant_id: user.merchant_id,
    };
    change_publication(&state, BillingMethod::PublishKeyProduct, request).await
}

pub async fn unpublish_key_product_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(key_product_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = KeyProductStateRequest {
        key_product_id,
        merchant_id: user.merchant_id,
    };
    change_publication(&state, BillingMethod::UnPublishKeyProduct, request).await
}

pub async fn list_platforms_handler(
    State(state): State<AppState>,
    Listing(request): Listing<PlatformListingRequest>,
) -> Result<Json<Envelope>, ApiError> {
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetPlatforms, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope))
}

/// Contents of the `file` part
async fn read_keys_file(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<u8>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::error!(error = %e, "key file upload is not a multipart form");
        ApiError::bad_request(&errors::FILE_NOT_FOUND)
    })?;

    loop {
        let field = multipart.next_field().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read multipart form");
            ApiError::bad_request(&errors::CANT_READ_FILE)
        })?;
        let Some(field) = field else {
            return Err(ApiError::bad_request(&errors::FILE_NOT_FOUND));
        };
        if field.name() != Some(KEYS_FILE_FIELD) {
            continue;
        }

        let bytes = field.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read key file");
            ApiError::bad_request(&errors::CANT_READ_FILE)
        })?;
        return Ok(bytes.to_vec());
    }
}

/// POST /key-products/{key_product_id}/platforms/{platform_id}/file
///
/// Uploads a newline-separated key file after checking the product belongs to
/// the merchant. Large files are processed synchronously by billing, hence the
/// long per-call timeout.
pub async fn upload_keys_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((key_product_id, platform_id)): Path<(String, String)>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let file = read_keys_file(multipart).await?;

    let request = PlatformKeysFileRequest {
        key_product_id,
        platform_id,
        merchant_id: user.merchant_id,
        file,
    };

    let owner = KeyProductRef {
        id: request.key_product_id.clone(),
        merchant_id: request.merchant_id.clone(),
    };
    state
        .gateway
        .billing(BillingMethod::GetKeyProduct, &owner)
        .await
        .map_err(internal)?;

    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_with(
            BillingMethod::UploadKeysFile,
            &request,
            CallOptions::with_timeout(LONG_CALL_TIMEOUT),
        )
        .await
        .map_err(internal)?;

    Ok(Json(envelope))
}

pub async fn count_keys_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((key_product_id, platform_id)): Path<(String, String)>,
) -> Result<Json<Envelope>, ApiError> {
    let request = PlatformKeyCountRequest {
        key_product_id,
        platform_id,
        merchant_id: user.merchant_id,
    };
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetAvailableKeysCount, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope))
}

/// Language part of the first `Accept-Language` entry, when it names a region
pub fn accept_language(value: &str) -> String {
    let first = value.split(',').next().unwrap_or_default();
    match first.split_once('-') {
        Some((language, _)) => language.trim().to_lowercase(),
        None => String::new(),
    }
}

/// Country of the client address; lookup failures are only logged
async fn country_by_ip(state: &AppState, ip: String) -> Option<String> {
    let request = serde_json::json!({ "ip": ip });
    match state.gateway.geo(GeoMethod::GetIpData, &request).await {
        Ok(envelope) => envelope
            .field("country")
            .and_then(|country| country.get("iso_code"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(e) => {
            tracing::error!(error = %e, "geo lookup failed");
            None
        }
    }
}

/// GET /key-products/{key_product_id} for the storefront
pub async fn key_product_info_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key_product_id): Path<String>,
    Bound(mut request): Bound<KeyProductInfoRequest>,
) -> Result<Json<Value>, ApiError> {
    request.key_product_id = key_product_id;
    validate_request(&request)?;

    if request.currency.is_empty() && request.country.is_empty() {
        if let Some(country) = country_by_ip(&state, client_ip(&headers)).await {
            request.country = country;
        }
    }
    if request.language.is_empty() {
        request.language = accept_language(header_str(&headers, HEADER_ACCEPT_LANGUAGE));
    }

    let mut envelope = state
        .gateway
        .billing(BillingMethod::GetKeyProductInfo, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.take("key_product")))
}
