//! Checkout: order creation, the payment form and refunds.

use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Extension, Form, Json,
};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, BindRejection, Bound, CurrentUser, Listing};
use crate::api::handlers::{
    check_project_signature, client_ip, found, header_str, request_cookie, with_customer_cookie,
};
use crate::api::middleware::RawBody;
use crate::api::router::{AppState, RouteGroups};
use crate::application::binders::{order_form_params, payment_form_fields};
use crate::application::dto::orders::{
    BillingAddressRequest, ChangeCodeRequest, ChangeCustomerRequest, ChangeLanguageRequest,
    ChangePlatformRequest, CreateRefundRequest, CreatedOrder, IsOrderCanBePayingRequest,
    OrderByPaylinkRequest, OrderCreateRequest, OrderListingRequest, OrderReCreateRequest,
    OrderReceiptRequest, OrderRef, OrderUser, PaylinkIdRequest, PaymentCreateRequest, PaymentFormDataRequest,
    RefundListingRequest, RefundRef, UserNotifyRequest,
};
use crate::application::dto::Extra;
use crate::application::errors::GatewayError;
use crate::application::gateway::Gateway;
use crate::application::methods::BillingMethod;
use crate::domain::constants::{
    CUSTOMER_TOKEN_COOKIE, HEADER_ACCEPT_LANGUAGE, HEADER_REFERER, HEADER_USER_AGENT,
};
use crate::domain::{errors, Envelope};

const UTM_SOURCE: &str = "utm_source";
const UTM_MEDIUM: &str = "utm_medium";
const UTM_CAMPAIGN: &str = "utm_campaign";

pub fn register(groups: &mut RouteGroups) {
    groups
        .common
        .get("/order/{order_id}", payment_form_handler)
        .get("/paylink/{paylink_id}", paylink_order_handler)
        .get("/order/create", create_from_form_handler)
        .post("/order/create", create_from_form_handler)
        .post("/order", create_json_handler)
        .post("/payment", create_payment_handler)
        .post("/order/recreate", recreate_order_handler)
        .patch("/orders/{order_id}/language", change_language_handler)
        .patch("/orders/{order_id}/customer", change_customer_handler)
        .post("/orders/{order_id}/billing_address", billing_address_handler)
        .post("/orders/{order_id}/notify_sale", notify_sale_handler)
        .post("/orders/{order_id}/notify_new_region", notify_new_region_handler)
        .post("/orders/{order_id}/platform", change_platform_handler)
        .get("/orders/receipt/{receipt_id}/{order_id}", receipt_handler);

    groups
        .auth_user
        .get("/order", list_orders_handler)
        .get("/order/{order_id}", get_order_handler)
        .get("/order/{order_id}/refunds", list_refunds_handler)
        .get("/order/{order_id}/refunds/{refund_id}", get_refund_handler)
        .post("/order/{order_id}/refunds", create_refund_handler);

    groups
        .system_user
        .put("/order/{order_id}/replace_code", replace_code_handler);
}

fn internal(err: GatewayError) -> ApiError {
    ApiError::from_gateway(err, &errors::INTERNAL)
}

/// GET|POST /order/create
///
/// Checkout form post from a project page; redirects to the payment form.
pub async fn create_from_form_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(pairs) = form.map_err(|e| {
        tracing::debug!(error = %e, "checkout form binding failed");
        ApiError::bad_request(&errors::REQUEST_DATA_INVALID)
    })?;

    let mut request = OrderCreateRequest::from_form(order_form_params(pairs)).map_err(|reason| {
        tracing::debug!(%reason, "checkout form binding failed");
        ApiError::bad_request(&errors::REQUEST_DATA_INVALID)
    })?;
    request.user = Some(OrderUser {
        ip: client_ip(&headers),
        ..Default::default()
    });
    request.issuer_url = header_str(&headers, HEADER_REFERER).to_string();
    request.cookie = request_cookie(&headers, CUSTOMER_TOKEN_COOKIE);
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::OrderCreateProcess, &request)
        .await
        .map_err(internal)?;

    let item = envelope.item();
    let id = item.get("id").and_then(Value::as_str).unwrap_or_default();
    found(&format!("/order/{id}"))
}

fn order_uuid(order: &Value) -> String {
    order
        .get("uuid")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub async fn recreate_order_handler(
    State(state): State<AppState>,
    Bound(request): Bound<OrderReCreateRequest>,
) -> Result<Json<CreatedOrder>, ApiError> {
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::OrderReCreateProcess, &request)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNKNOWN))?;

    let uuid = order_uuid(&envelope.item());
    Ok(Json(CreatedOrder::new(
        uuid,
        &state.config.order_inline_form_url_mask,
    )))
}

/// POST /order
///
/// Host-to-host orders carrying customer data must be signed by the project.
/// A prepared order is only checked for being payable.
pub async fn create_json_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Extension(raw): Extension<RawBody>,
    Bound(mut request): Bound<OrderCreateRequest>,
) -> Result<Json<CreatedOrder>, ApiError> {
    request.raw_body = raw.as_str();
    request.is_json = true;
    request.cookie = request_cookie(&headers, CUSTOMER_TOKEN_COOKIE);
    validate_request(&request)?;

    if request.user.is_some() {
        check_project_signature(&state, &headers, &raw, &request.project_id).await?;
    }
    request.issuer_url = header_str(&headers, HEADER_REFERER).to_string();

    let order = if request.psp_order_uuid.is_empty() {
        state
            .gateway
            .billing(BillingMethod::OrderCreateProcess, &request)
            .await
            .map_err(internal)?
            .item()
    } else {
        let payable = IsOrderCanBePayingRequest {
            order_id: request.psp_order_uuid.clone(),
            project_id: request.project_id.clone(),
        };
        state
            .gateway
            .billing(BillingMethod::IsOrderCanBePaying, &payable)
            .await
            .map_err(internal)?
            .item()
    };

    Ok(Json(CreatedOrder::new(
        order_uuid(&order),
        &state.config.order_inline_form_url_mask,
    )))
}

/// GET /order/{order_id} on the public group: data for rendering the form
pub async fn payment_form_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Result<Response, ApiError> {
    let request = PaymentFormDataRequest {
        order_id,
        scheme: state.config.http_scheme.clone(),
        host: header_str(&headers, "host").to_string(),
        locale: header_str(&headers, HEADER_ACCEPT_LANGUAGE).to_string(),
        ip: client_ip(&headers),
        referer: header_str(&headers, HEADER_REFERER).to_string(),
        cookie: request_cookie(&headers, CUSTOMER_TOKEN_COOKIE),
    };

    let mut envelope = state
        .gateway
        .billing(BillingMethod::PaymentFormJsonDataProcess, &request)
        .await
        .map_err(internal)?;

    let cookie = envelope.str_field("cookie").to_string();
    let item = envelope.take("item");
    Ok(with_customer_cookie(&state.config, &cookie, item))
}

/// Bump the visit counter of a paylink; billing answers with an empty message.
async fn count_paylink_visit(
    gateway: &Gateway,
    visit: &PaylinkIdRequest,
) -> Result<(), GatewayError> {
    gateway
        .billing_unchecked(BillingMethod::IncrPaylinkVisits, visit)
        .await
        .map(|_| ())
}

/// GET /paylink/{paylink_id}
///
/// Creates an order for the paylink and redirects to the inline form. The
/// visit counter is bumped in the background.
pub async fn paylink_order_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(paylink_id): Path<String>,
    Query(mut params): Query<BTreeMap<String, String>>,
) -> Result<Response, ApiError> {
    let gateway = state.gateway.clone();
    let visit = PaylinkIdRequest {
        id: paylink_id.clone(),
    };
    tokio::spawn(async move {
        if let Err(e) = count_paylink_visit(&gateway, &visit).await {
            tracing::error!(paylink_id = %visit.id, error = %e, "paylink visit was not counted");
        }
    });

    let param = |name: &str| params.get(name).cloned().unwrap_or_default();
    let request = OrderByPaylinkRequest {
        paylink_id,
        payer_ip: client_ip(&headers),
        issuer_url: header_str(&headers, HEADER_REFERER).to_string(),
        utm_source: param(UTM_SOURCE),
        utm_medium: param(UTM_MEDIUM),
        utm_campaign: param(UTM_CAMPAIGN),
        is_embedded: false,
        cookie: request_cookie(&headers, CUSTOMER_TOKEN_COOKIE),
    };

    let envelope = state
        .gateway
        .billing(BillingMethod::OrderCreateByPaylink, &request)
        .await
        .map_err(|e| ApiError::from_gateway_as(e, StatusCode::BAD_REQUEST, &errors::UNKNOWN))?;

    params.insert("order_id".to_string(), order_uuid(&envelope.item()));
    let query = serde_urlencoded::to_string(&params).map_err(|e| {
        tracing::error!(error = %e, "failed to encode paylink redirect");
        ApiError::internal_error(&errors::UNKNOWN)
    })?;

    found(&format!(
        "{}?{query}",
        state.config.order_inline_form_url_mask
    ))
}

/// GET /order on the merchant group
pub async fn list_orders_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Listing(mut request): Listing<OrderListingRequest>,
) -> Result<Json<Value>, ApiError> {
    request.merchant = vec![user.merchant_id];
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::FindAllOrdersPublic, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.item()))
}

pub async fn get_order_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = OrderRef {
        order_id,
        merchant_id: user.merchant_id,
    };
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetOrderPublic, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.item()))
}

/// POST /payment
///
/// The form travels to billing as a flat string map.
pub async fn create_payment_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Bound<Extra>, BindRejection>,
) -> Result<Json<Value>, ApiError> {
    let Bound(data) = form.map_err(|rejection| {
        tracing::debug!(reason = %rejection.reason, "payment form binding failed");
        ApiError::bad_request(&errors::REQUEST_DATA_INVALID)
    })?;

    let request = PaymentCreateRequest {
        data: payment_form_fields(data),
        accept_language: header_str(&headers, HEADER_ACCEPT_LANGUAGE).to_string(),
        user_agent: header_str(&headers, HEADER_USER_AGENT).to_string(),
        ip: client_ip(&headers),
    };

    let envelope = state
        .gateway
        .billing(BillingMethod::PaymentCreateProcess, &request)
        .await
        .map_err(internal)?;

    Ok(Json(serde_json::json!({
        "redirect_url": envelope.str_field("redirect_url"),
        "need_redirect": envelope
            .field("need_redirect")
            .and_then(Value::as_bool)
            .unwrap_or_default(),
    })))
}

pub async fn get_refund_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((order_id, refund_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let request = RefundRef {
        order_id,
        refund_id,
        merchant_id: user.merchant_id,
    };
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::GetRefund, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.item()))
}

/// Answers the whole remote response, whatever its status.
pub async fn list_refunds_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<String>,
    Listing(mut request): Listing<RefundListingRequest>,
) -> Result<Json<Envelope>, ApiError> {
    request.order_id = order_id;
    request.merchant_id = user.merchant_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing_unchecked(BillingMethod::ListRefunds, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope))
}

pub async fn create_refund_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<String>,
    Bound(mut request): Bound<CreateRefundRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    request.order_id = order_id;
    validate_request(&request)?;
    request.creator_id = user.id;
    request.merchant_id = user.merchant_id;

    let envelope = state
        .gateway
        .billing(BillingMethod::CreateRefund, &request)
        .await
        .map_err(internal)?;

    Ok((StatusCode::CREATED, Json(envelope.item())))
}

/// PUT /order/{order_id}/replace_code on the system group
pub async fn replace_code_handler(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Bound(mut request): Bound<ChangeCodeRequest>,
) -> Result<Json<Value>, ApiError> {
    request.order_id = order_id;
    validate_request(&request)?;

    let mut envelope = state
        .gateway
        .billing(BillingMethod::ChangeCodeInOrder, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.take("order")))
}

pub async fn change_language_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
    Bound(mut request): Bound<ChangeLanguageRequest>,
) -> Result<Json<Value>, ApiError> {
    request.accept_language = header_str(&headers, HEADER_ACCEPT_LANGUAGE).to_string();
    request.user_agent = header_str(&headers, HEADER_USER_AGENT).to_string();
    request.ip = client_ip(&headers);
    request.order_id = order_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::PaymentFormLanguageChanged, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.item()))
}

pub async fn change_customer_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
    Bound(mut request): Bound<ChangeCustomerRequest>,
) -> Result<Json<Value>, ApiError> {
    request.accept_language = header_str(&headers, HEADER_ACCEPT_LANGUAGE).to_string();
    request.user_agent = header_str(&headers, HEADER_USER_AGENT).to_string();
    request.ip = client_ip(&headers);
    request.order_id = order_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::PaymentFormPaymentAccountChanged, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.item()))
}

/// Also refreshes the customer cookie.
pub async fn billing_address_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
    Bound(mut request): Bound<BillingAddressRequest>,
) -> Result<Response, ApiError> {
    request.ip = client_ip(&headers);
    request.cookie = request_cookie(&headers, CUSTOMER_TOKEN_COOKIE);
    request.order_id = order_id;
    validate_request(&request)?;

    let mut envelope = state
        .gateway
        .billing(BillingMethod::ProcessBillingAddress, &request)
        .await
        .map_err(internal)?;

    let cookie = envelope.str_field("cookie").to_string();
    let item = envelope.take("item");
    Ok(with_customer_cookie(&state.config, &cookie, item))
}

async fn set_user_notify(
    state: &AppState,
    method: BillingMethod,
    order_uuid: String,
    mut request: UserNotifyRequest,
) -> Result<StatusCode, ApiError> {
    request.order_uuid = order_uuid;
    validate_request(&request)?;

    state
        .gateway
        .billing_unchecked(method, &request)
        .await
        .map_err(internal)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn notify_sale_handler(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Bound(request): Bound<UserNotifyRequest>,
) -> Result<StatusCode, ApiError> {
    set_user_notify(&state, BillingMethod::SetUserNotifySales, order_id, request).await
}

pub async fn notify_new_region_handler(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Bound(request): Bound<UserNotifyRequest>,
) -> Result<StatusCode, ApiError> {
    set_user_notify(&state, BillingMethod::SetUserNotifyNewRegion, order_id, request).await
}

pub async fn change_platform_handler(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Bound(mut request): Bound<ChangePlatformRequest>,
) -> Result<Json<Value>, ApiError> {
    request.order_id = order_id;
    validate_request(&request)?;

    let envelope = state
        .gateway
        .billing(BillingMethod::PaymentFormPlatformChanged, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.item()))
}

pub async fn receipt_handler(
    State(state): State<AppState>,
    Path((receipt_id, order_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let is_uuid = |value: &str| uuid::Uuid::parse_str(value).is_ok();
    if !is_uuid(&order_id) || !is_uuid(&receipt_id) {
        return Err(ApiError::bad_request(&errors::REQUEST_PARAMS_INCORRECT));
    }

    let request = OrderReceiptRequest {
        order_id,
        receipt_id,
    };
    let mut envelope = state
        .gateway
        .billing(BillingMethod::OrderReceipt, &request)
        .await
        .map_err(internal)?;

    Ok(Json(envelope.take("receipt")))
}
