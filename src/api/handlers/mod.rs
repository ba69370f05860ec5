//! Route handlers grouped by resource.
//!
//! Each module exposes `register`, which attaches its routes to the route
//! groups, and one `*_handler` function per route.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::path::Path;
use tokio_util::io::ReaderStream;

use crate::api::errors::ApiError;
use crate::api::middleware::RawBody;
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::onboarding::MerchantByRequest;
use crate::application::errors::GatewayError;
use crate::application::methods::BillingMethod;
use crate::application::validation::is_object_id;
use crate::config::Config;
use crate::domain::constants::{
    CUSTOMER_TOKEN_COOKIE, HEADER_X_API_SIGNATURE, HEADER_X_FORWARDED_FOR, HEADER_X_REAL_IP,
};
use crate::domain::errors::{self, ErrorCode};
use crate::domain::AuthUser;

pub mod admin_users;
pub mod balance;
pub mod cardpay;
pub mod countries;
pub mod dashboard;
pub mod health;
pub mod key_products;
pub mod keys;
pub mod merchant_users;
pub mod onboarding;
pub mod operating_companies;
pub mod orders;
pub mod paylinks;
pub mod payment_costs;
pub mod payment_methods;
pub mod payment_min_limit;
pub mod payouts;
pub mod price_groups;
pub mod pricing;
pub mod products;
pub mod projects;
pub mod report_files;
pub mod royalty_reports;
pub mod taxes;
pub mod tokens;
pub mod user_profiles;
pub mod users;
pub mod vat_reports;
pub mod webhook_testing;
pub mod zip_codes;

pub use health::health_handler;

/// Attach every resource group's routes.
pub fn register_all(groups: &mut RouteGroups) {
    admin_users::register(groups);
    users::register(groups);
    merchant_users::register(groups);
    onboarding::register(groups);
    key_products::register(groups);
    keys::register(groups);
    orders::register(groups);
    paylinks::register(groups);
    royalty_reports::register(groups);
    payouts::register(groups);
    vat_reports::register(groups);
    taxes::register(groups);
    countries::register(groups);
    zip_codes::register(groups);
    balance::register(groups);
    dashboard::register(groups);
    report_files::register(groups);
    tokens::register(groups);
    price_groups::register(groups);
    pricing::register(groups);
    operating_companies::register(groups);
    payment_min_limit::register(groups);
    payment_costs::register(groups);
    payment_methods::register(groups);
    user_profiles::register(groups);
    webhook_testing::register(groups);
    projects::register(groups);
    products::register(groups);
    cardpay::register(groups);
}

/// Reject a path identifier that is not a 24-character hex object id.
pub(crate) fn require_object_id(value: &str, code: &ErrorCode) -> Result<(), ApiError> {
    if is_object_id(value) {
        Ok(())
    } else {
        Err(ApiError::bad_request(code))
    }
}

/// Header value as a string, empty when absent or not visible ASCII.
pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Client address as reported by the fronting proxy.
pub(crate) fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = header_str(headers, HEADER_X_FORWARDED_FOR)
        .split(',')
        .next()
        .map(str::trim)
        .unwrap_or_default();

    if !forwarded.is_empty() {
        return forwarded.to_string();
    }
    header_str(headers, HEADER_X_REAL_IP).trim().to_string()
}

/// Value of a request cookie, empty when absent.
pub(crate) fn request_cookie(headers: &HeaderMap, name: &str) -> String {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .unwrap_or_default()
}

/// `Set-Cookie` value for the customer token; `None` when billing sent no token.
pub(crate) fn customer_token_cookie(config: &Config, token: &str) -> Option<HeaderValue> {
    if token.is_empty() {
        return None;
    }

    let expires = Utc::now() + Duration::seconds(config.customer_token_cookies_lifetime);
    let mut cookie = format!(
        "{CUSTOMER_TOKEN_COOKIE}={token}; Path=/; Expires={}; HttpOnly",
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    );
    if !config.cookie_domain.is_empty() {
        cookie.push_str(&format!("; Domain={}", config.cookie_domain));
    }

    tracing::info!(expires = %expires, domain = %config.cookie_domain, "setting customer cookie");
    HeaderValue::from_str(&cookie).ok()
}

/// JSON response carrying the customer token cookie, when there is one.
pub(crate) fn with_customer_cookie<T: Serialize>(
    config: &Config,
    token: &str,
    body: T,
) -> Response {
    let mut response = axum::Json(body).into_response();
    if let Some(cookie) = customer_token_cookie(config, token) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

/// 302 to `location`.
pub(crate) fn found(location: &str) -> Result<Response, ApiError> {
    let location = HeaderValue::from_str(location).map_err(|e| {
        tracing::error!(error = %e, "redirect location is not a valid header");
        ApiError::internal_error(&errors::UNKNOWN)
    })?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

#[derive(Serialize)]
struct SignatureCheck<'a> {
    body: String,
    project_id: &'a str,
    signature: &'a str,
}

/// Have billing verify `X-API-SIGNATURE` over the raw request body.
pub(crate) async fn check_project_signature(
    state: &AppState,
    headers: &HeaderMap,
    body: &RawBody,
    project_id: &str,
) -> Result<(), ApiError> {
    let signature = header_str(headers, HEADER_X_API_SIGNATURE);
    if signature.is_empty() {
        return Err(ApiError::bad_request(&errors::SIGNATURE_HEADER_IS_EMPTY));
    }

    let request = SignatureCheck {
        body: body.as_str(),
        project_id,
        signature,
    };
    match state
        .gateway
        .billing(BillingMethod::CheckProjectRequestSignature, &request)
        .await
    {
        Ok(_) => Ok(()),
        Err(GatewayError::Rejected(envelope)) => Err(ApiError::from_envelope(envelope)),
        Err(e) => Err(ApiError::from_gateway(e, &errors::UNKNOWN)),
    }
}

/// Id of the merchant owned by `user`, looked up in billing.
///
/// Transport failures and a missing merchant answer 500 `ma000001`; a
/// rejection is relayed.
pub(crate) async fn merchant_of(state: &AppState, user: &AuthUser) -> Result<String, ApiError> {
    let envelope = state
        .gateway
        .billing(BillingMethod::GetMerchantBy, &MerchantByRequest::by_user(&user.id))
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::UNKNOWN))?;

    match envelope.item().get("id").and_then(serde_json::Value::as_str) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => {
            tracing::error!(user_id = %user.id, "user has no merchant");
            Err(ApiError::internal_error(&errors::UNKNOWN))
        }
    }
}

/// Stream a local file as the response body.
pub(crate) async fn file_response(path: &Path, content_type: &str) -> Result<Response, ApiError> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to open downloaded file");
        ApiError::internal_error(&errors::INTERNAL)
    })?;
    let size = file
        .metadata()
        .await
        .map(|metadata| metadata.len())
        .unwrap_or_default();

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type);
    if size > 0 {
        builder = builder.header(header::CONTENT_LENGTH, size.to_string());
    }

    builder
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            tracing::error!(error = %e, "failed to build file response");
            ApiError::internal_error(&errors::INTERNAL)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_X_REAL_IP, HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "10.0.0.2");

        headers.insert(
            HEADER_X_FORWARDED_FOR,
            HeaderValue::from_static("127.0.0.1, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers), "127.0.0.1");
    }

    #[test]
    fn test_request_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; _ps_ctkn=abc123; lang=en"),
        );

        assert_eq!(request_cookie(&headers, CUSTOMER_TOKEN_COOKIE), "abc123");
        assert_eq!(request_cookie(&headers, "missing"), "");
    }

    #[test]
    fn test_customer_token_cookie() {
        let config = Config {
            cookie_domain: "pay.example.com".into(),
            ..Config::default()
        };

        let cookie = customer_token_cookie(&config, "abc123").unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("_ps_ctkn=abc123; Path=/; Expires="));
        assert!(cookie.ends_with("GMT; HttpOnly; Domain=pay.example.com"));
        assert!(customer_token_cookie(&config, "").is_none());
    }

    #[test]
    fn test_found_redirect() {
        let response = found("/order/5ced34d689fce60bf4440829").unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/order/5ced34d689fce60bf4440829"
        );
    }

    #[test]
    fn test_require_object_id() {
        assert!(require_object_id("5be2c3022b9bb6000765d132", &errors::INCORRECT_MERCHANT_ID).is_ok());

        let err = require_object_id("5be2c3022b9bb6000765d13z", &errors::INCORRECT_MERCHANT_ID)
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body()["code"], "ma000006");
    }

    #[tokio::test]
    async fn test_file_response_streams_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agreement.pdf");
        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

        let response = file_response(&path, "application/pdf").await.unwrap();

        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "8");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_file_response_missing_file() {
        let err = file_response(Path::new("/nonexistent/agreement.pdf"), "application/pdf")
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
