//! Merchant onboarding: profile sections, status, agreement, notifications
//! and tariffs.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, CurrentUser, Listing};
use crate::api::handlers::{file_response, require_object_id};
use crate::api::router::{AppState, RouteGroups};
use crate::application::binders::{self, MERCHANT_DATA_FIELDS};
use crate::application::dto::onboarding::{
    AgreementFile, AgreementMetadata, AgreementSignUrlRequest, ChangeMerchantDataRequest,
    MerchantBanking, MerchantByRequest, MerchantChangeStatusRequest, MerchantCompanyInfo,
    MerchantContact, MerchantListingRequest, MerchantUser, NotificationListingRequest,
    NotificationRef, NotificationRequest, OnboardingRequest, SetMerchantS3AgreementRequest,
    SetTariffRatesRequest, TariffRatesRequest,
};
use crate::application::gateway::LONG_CALL_TIMEOUT;
use crate::application::methods::BillingMethod;
use crate::application::ports::CallOptions;
use crate::domain::constants::{
    agreement_file_name, agreement_url, tariff_region_name, AGREEMENT_CONTENT_TYPE,
    AGREEMENT_UPLOAD_MAX_SIZE,
};
use crate::domain::{errors, AuthUser, Envelope};

const AGREEMENT_EXTENSION: &str = "pdf";
const AGREEMENT_FILE_FIELD: &str = "file";

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .get("/merchants", list_merchants_handler)
        .get("/merchants/user", get_user_merchant_handler)
        .get("/merchants/{merchant_id}", get_merchant_handler)
        .patch("/merchants/{merchant_id}", change_merchant_data_handler)
        .put("/merchants/company", set_company_handler)
        .put("/merchants/contacts", set_contacts_handler)
        .put("/merchants/banking", set_banking_handler)
        .put("/merchants/{merchant_id}/company", set_merchant_company_handler)
        .put("/merchants/{merchant_id}/contacts", set_merchant_contacts_handler)
        .put("/merchants/{merchant_id}/banking", set_merchant_banking_handler)
        .get("/merchants/{merchant_id}/status", get_merchant_status_handler)
        .put(
            "/merchants/{merchant_id}/change-status",
            change_merchant_status_handler,
        )
        .get("/merchants/{merchant_id}/agreement", get_agreement_handler)
        .get(
            "/merchants/{merchant_id}/agreement/document",
            get_agreement_document_handler,
        )
        .post(
            "/merchants/{merchant_id}/agreement/document",
            upload_agreement_document_handler,
        )
        .put(
            "/merchants/{merchant_id}/agreement/signature",
            create_agreement_signature_handler,
        )
        .post(
            "/merchants/{merchant_id}/notifications",
            create_notification_handler,
        )
        .get(
            "/merchants/{merchant_id}/notifications",
            list_notifications_handler,
        )
        .get(
            "/merchants/{merchant_id}/notifications/{notification_id}",
            get_notification_handler,
        )
        .put(
            "/merchants/{merchant_id}/notifications/{notification_id}/mark-as-read",
            mark_notification_read_handler,
        )
        .get("/merchants/tariffs", get_tariff_rates_handler)
        .post("/merchants/{merchant_id}/tariffs", set_tariff_rates_handler);
}

/// Stored merchant; a rejected lookup is relayed as is
async fn fetch_merchant(state: &AppState, merchant_id: &str) -> Result<Value, ApiError> {
    let envelope = state
        .gateway
        .billing(
            BillingMethod::GetMerchantBy,
            &MerchantByRequest::by_id(merchant_id),
        )
        .await?;

    Ok(envelope.item())
}

pub async fn get_merchant_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(fetch_merchant(&state, &merchant_id).await?))
}

/// Merchant owned by the signed-in user
pub async fn get_user_merchant_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    if user.is_anonymous() {
        return Err(ApiError::unauthorized(&errors::ACCESS_DENIED));
    }

    let envelope = state
        .gateway
        .billing(BillingMethod::GetMerchantBy, &MerchantByRequest::by_user(user.id))
        .await?;

    Ok(Json(envelope.item()))
}

pub async fn list_merchants_handler(
    State(state): State<AppState>,
    Listing(mut request): Listing<MerchantListingRequest>,
) -> Result<Json<Envelope>, ApiError> {
    if let Some(value) = request.signed.as_deref() {
        request.is_signed = binders::signed_filter(value).map_err(ApiError::bad_request)?;
    }
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::ListMerchants, &request)
        .await?;

    Ok(Json(envelope))
}

pub async fn change_merchant_status_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(merchant_id): Path<String>,
    Bound(mut request): Bound<MerchantChangeStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    request.merchant_id = merchant_id;
    request.user_id = user.id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::ChangeMerchantStatus, &request)
        .await
        .map_err(|e| ApiError::from_gateway_as(e, StatusCode::BAD_REQUEST, &errors::UNKNOWN))?;

    Ok(Json(envelope.item()))
}

/// PATCH /merchants/{merchant_id}
///
/// Starts from the stored agreement fields and overlays the ones present in
/// the body, each checked for its JSON type.
pub async fn change_merchant_data_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Bound(patch): Bound<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;

    let merchant = fetch_merchant(&state, &merchant_id).await?;
    let fields: Vec<&str> = MERCHANT_DATA_FIELDS.iter().map(|rule| rule.name).collect();
    let mut data = binders::base_from(&merchant, &fields);
    binders::overlay(&mut data, &patch, MERCHANT_DATA_FIELDS).map_err(ApiError::bad_request)?;
    data.insert("merchant_id".to_string(), Value::String(merchant_id));

    let request: ChangeMerchantDataRequest = serde_json::from_value(Value::Object(data))
        .map_err(|_| ApiError::bad_request(&errors::REQUEST_PARAMS_INCORRECT))?;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::ChangeMerchantData, &request)
        .await?;

    Ok(Json(envelope.item()))
}

async fn change_merchant(
    state: &AppState,
    user: AuthUser,
    mut request: OnboardingRequest,
) -> Result<Json<Value>, ApiError> {
    request.user = MerchantUser {
        id: user.id,
        email: user.email,
        ..MerchantUser::default()
    };
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::ChangeMerchant, &request)
        .await?;

    Ok(Json(envelope.item()))
}

fn company_step(id: String, company: MerchantCompanyInfo) -> OnboardingRequest {
    OnboardingRequest {
        id,
        company: Some(company),
        ..OnboardingRequest::default()
    }
}

fn contacts_step(id: String, contacts: MerchantContact) -> OnboardingRequest {
    OnboardingRequest {
        id,
        contacts: Some(contacts),
        ..OnboardingRequest::default()
    }
}

fn banking_step(id: String, banking: MerchantBanking) -> OnboardingRequest {
    OnboardingRequest {
        id,
        banking: Some(banking),
        ..OnboardingRequest::default()
    }
}

/// PUT /merchants/company
/// First onboarding step; creates the merchant when the user has none
pub async fn set_company_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Bound(company): Bound<MerchantCompanyInfo>,
) -> Result<Json<Value>, ApiError> {
    change_merchant(&state, user, company_step(String::new(), company)).await
}

pub async fn set_merchant_company_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(merchant_id): Path<String>,
    Bound(company): Bound<MerchantCompanyInfo>,
) -> Result<Json<Value>, ApiError> {
    change_merchant(&state, user, company_step(merchant_id, company)).await
}

pub async fn set_contacts_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Bound(contacts): Bound<MerchantContact>,
) -> Result<Json<Value>, ApiError> {
    change_merchant(&state, user, contacts_step(String::new(), contacts)).await
}

pub async fn set_merchant_contacts_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(merchant_id): Path<String>,
    Bound(contacts): Bound<MerchantContact>,
) -> Result<Json<Value>, ApiError> {
    change_merchant(&state, user, contacts_step(merchant_id, contacts)).await
}

pub async fn set_banking_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Bound(banking): Bound<MerchantBanking>,
) -> Result<Json<Value>, ApiError> {
    change_merchant(&state, user, banking_step(String::new(), banking)).await
}

pub async fn set_merchant_banking_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(merchant_id): Path<String>,
    Bound(banking): Bound<MerchantBanking>,
) -> Result<Json<Value>, ApiError> {
    change_merchant(&state, user, banking_step(merchant_id, banking)).await
}

/// Onboarding completion flags of a merchant
pub async fn get_merchant_status_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = SetMerchantS3AgreementRequest {
        merchant_id,
        ..SetMerchantS3AgreementRequest::default()
    };
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetMerchantOnboardingCompleteData, &request)
        .await?;

    Ok(Json(envelope.item()))
}

fn agreement_temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(name)
}

async fn describe_agreement(
    state: &AppState,
    merchant_id: &str,
    path: &std::path::Path,
) -> Result<AgreementFile, ApiError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        tracing::error!(merchant_id, error = %e, "agreement file is missing after transfer");
        ApiError::internal_error(&errors::INTERNAL)
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(AgreementFile {
        url: agreement_url(&state.config.http_scheme, &state.config.host, merchant_id),
        metadata: AgreementMetadata {
            name,
            extension: AGREEMENT_EXTENSION.to_string(),
            content_type: AGREEMENT_CONTENT_TYPE.to_string(),
            size: metadata.len(),
        },
    })
}

/// Stored agreement name, 404 when the agreement was never uploaded
fn agreement_name(merchant: &Value) -> Result<String, ApiError> {
    merchant
        .get("s3_agreement_name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::not_found(&errors::AGREEMENT_NOT_GENERATED))
}

/// GET /merchants/{merchant_id}/agreement
/// Link and metadata of the merchant's agreement document
pub async fn get_agreement_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<AgreementFile>, ApiError> {
    require_object_id(&merchant_id, &errors::REQUEST_PARAMS_INCORRECT)?;

    let merchant = fetch_merchant(&state, &merchant_id).await?;
    let name = agreement_name(&merchant)?;
    let path = agreement_temp_path(&name);

    state
        .agreement_storage
        .download(&name, &path)
        .await
        .map_err(|e| {
            tracing::error!(file_name = %name, error = %e, "agreement download failed");
            ApiError::internal_error(&errors::UNKNOWN)
        })?;

    Ok(Json(describe_agreement(&state, &merchant_id, &path).await?))
}

/// GET /merchants/{merchant_id}/agreement/document
pub async fn get_agreement_document_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
) -> Result<Response, ApiError> {
    require_object_id(&merchant_id, &errors::REQUEST_PARAMS_INCORRECT)?;

    let merchant = fetch_merchant(&state, &merchant_id).await?;
    let name = agreement_name(&merchant)?;
    let path = agreement_temp_path(&name);

    state
        .agreement_storage
        .download(&name, &path)
        .await
        .map_err(|e| {
            tracing::error!(file_name = %name, error = %e, "agreement download failed");
            ApiError::internal_error(&errors::AGREEMENT_FILE_NOT_EXIST)
        })?;

    file_response(&path, AGREEMENT_CONTENT_TYPE).await
}

/// Read the `file` part, enforcing size and PDF signature
async fn read_agreement_upload(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request(&errors::NOT_MULTIPART_FORM))?
    {
        if field.name() != Some(AGREEMENT_FILE_FIELD) {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::bad_request(&errors::UNKNOWN))?;
        if bytes.len() > AGREEMENT_UPLOAD_MAX_SIZE {
            return Err(ApiError::bad_request(&errors::AGREEMENT_UPLOAD_MAX_SIZE));
        }
        if !bytes.starts_with(b"%PDF-") {
            return Err(ApiError::bad_request(&errors::AGREEMENT_CONTENT_TYPE));
        }
        return Ok(bytes.to_vec());
    }

    Err(ApiError::bad_request(&errors::NOT_MULTIPART_FORM))
}

/// POST /merchants/{merchant_id}/agreement/document
/// Replace the agreement with an uploaded PDF
pub async fn upload_agreement_document_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AgreementFile>, ApiError> {
    require_object_id(&merchant_id, &errors::REQUEST_PARAMS_INCORRECT)?;

    fetch_merchant(&state, &merchant_id).await?;

    let multipart = multipart.map_err(|_| ApiError::bad_request(&errors::NOT_MULTIPART_FORM))?;
    let content = read_agreement_upload(multipart).await?;

    let name = agreement_file_name(&merchant_id);
    let path = agreement_temp_path(&name);
    tokio::fs::write(&path, &content).await.map_err(|e| {
        tracing::error!(merchant_id = %merchant_id, error = %e, "upload of agreement failed");
        ApiError::internal_error(&errors::INTERNAL)
    })?;

    state
        .agreement_storage
        .upload(&name, &path, AGREEMENT_CONTENT_TYPE)
        .await
        .map_err(|e| {
            tracing::error!(file_name = %name, error = %e, "agreement upload to storage failed");
            ApiError::internal_error(&errors::UPLOAD_FAILED)
        })?;

    let request = SetMerchantS3AgreementRequest {
        merchant_id: merchant_id.clone(),
        s3_agreement_name: name,
    };
    state
        .gateway
        .billing_unchecked(BillingMethod::SetMerchantS3Agreement, &request)
        .await?;

    Ok(Json(describe_agreement(&state, &merchant_id, &path).await?))
}

/// Signing URL for the agreement
pub async fn create_agreement_signature_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Bound(mut request): Bound<AgreementSignUrlRequest>,
) -> Result<Json<Value>, ApiError> {
    request.merchant_id = merchant_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetMerchantAgreementSignUrl, &request)
        .await?;

    Ok(Json(envelope.item()))
}

pub async fn create_notification_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(merchant_id): Path<String>,
    Bound(mut request): Bound<NotificationRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    request.merchant_id = merchant_id;
    request.user_id = user.id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::CreateNotification, &request)
        .await
        .map_err(|e| ApiError::from_gateway_as(e, StatusCode::BAD_REQUEST, &errors::UNKNOWN))?;

    Ok((StatusCode::CREATED, Json(envelope.item())))
}

fn notification_ref(
    merchant_id: String,
    notification_id: String,
) -> Result<NotificationRef, ApiError> {
    require_object_id(&merchant_id, &errors::INCORRECT_MERCHANT_ID)?;
    require_object_id(&notification_id, &errors::INCORRECT_NOTIFICATION_ID)?;

    Ok(NotificationRef {
        merchant_id,
        notification_id,
    })
}

pub async fn get_notification_handler(
    State(state): State<AppState>,
    Path((merchant_id, notification_id)): Path<(String, String)>,
) -> Result<Json<Envelope>, ApiError> {
    let request = notification_ref(merchant_id, notification_id)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::GetNotification, &request)
        .await
        .map_err(|e| {
            ApiError::from_gateway_as(e, StatusCode::NOT_FOUND, &errors::NOTIFICATION_NOT_FOUND)
        })?;

    Ok(Json(envelope))
}

pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Listing(mut request): Listing<NotificationListingRequest>,
) -> Result<Json<Envelope>, ApiError> {
    request.merchant_id = merchant_id;
    if let Some(value) = request.system.as_deref() {
        request.is_system = binders::system_filter(value);
    }
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::ListNotifications, &request)
        .await
        .map_err(|e| ApiError::from_gateway_as(e, StatusCode::BAD_REQUEST, &errors::UNKNOWN))?;

    Ok(Json(envelope))
}

pub async fn mark_notification_read_handler(
    State(state): State<AppState>,
    Path((merchant_id, notification_id)): Path<(String, String)>,
) -> Result<Json<Envelope>, ApiError> {
    let request = notification_ref(merchant_id, notification_id)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::MarkNotificationAsRead, &request)
        .await
        .map_err(|e| ApiError::from_gateway_as(e, StatusCode::BAD_REQUEST, &errors::UNKNOWN))?;

    Ok(Json(envelope))
}

/// GET /merchants/tariffs
pub async fn get_tariff_rates_handler(
    State(state): State<AppState>,
    Bound(mut request): Bound<TariffRatesRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_request(&request)?;
    request.region = tariff_region_name(&request.region)
        .unwrap_or_default()
        .to_string();

    let envelope = state
        .gateway
        .billing(BillingMethod::GetMerchantTariffRates, &request)
        .await?;

    Ok(Json(envelope.item()))
}

/// POST /merchants/{merchant_id}/tariffs
pub async fn set_tariff_rates_handler(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    Bound(mut request): Bound<SetTariffRatesRequest>,
) -> Result<StatusCode, ApiError> {
    request.merchant_id = merchant_id;
    validate_request(&request)?;
    request.region = tariff_region_name(&request.region)
        .unwrap_or_default()
        .to_string();

    state
        .gateway
        .billing_with(
            BillingMethod::SetMerchantTariffRates,
            &request,
            CallOptions::with_timeout(LONG_CALL_TIMEOUT),
        )
        .await?;

    Ok(StatusCode::OK)
}
