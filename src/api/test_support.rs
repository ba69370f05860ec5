//! Router harness shared by the handler tests.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::api::router::{create_router, AppState};
use crate::application::gateway::{Gateway, RemoteServices};
use crate::application::ports::{
    MockFileStorage, MockIdentityProvider, MockRemoteService, TransportError, UserInfo,
};
use crate::config::Config;
use crate::domain::Envelope;

pub const USER_ID: &str = "ffffffffffffffffffffffff";
pub const USER_EMAIL: &str = "test@unit.test";
pub const MERCHANT_ID: &str = "5be2c3022b9bb6000765d132";
pub const OBJECT_ID: &str = "5ced34d689fce60bf4440829";
pub const BEARER: &str = "Bearer unit-test-token-0001";

/// Ports and configuration for one test router
pub struct TestApp {
    pub billing: MockRemoteService,
    pub tax: MockRemoteService,
    pub geo: MockRemoteService,
    pub reporter: MockRemoteService,
    pub agreement_storage: MockFileStorage,
    pub report_storage: MockFileStorage,
    pub identity: MockIdentityProvider,
    pub config: Config,
}

impl TestApp {
    /// Every bearer token resolves to the test user, owner of [`MERCHANT_ID`]
    pub fn new() -> Self {
        let mut identity = MockIdentityProvider::new();
        identity.expect_user_info().returning(|_| {
            Ok(UserInfo {
                user_id: USER_ID.to_string(),
                email: USER_EMAIL.to_string(),
            })
        });

        let mut billing = MockRemoteService::new();
        billing
            .expect_call()
            .withf(|method, _, _| method == "GetMerchantsForUser")
            .returning(|_, _, _| {
                Ok(Envelope::ok().with_field(
                    "merchants",
                    json!([{"id": MERCHANT_ID, "role": "owner"}]),
                ))
            });

        Self {
            billing,
            tax: MockRemoteService::new(),
            geo: MockRemoteService::new(),
            reporter: MockRemoteService::new(),
            agreement_storage: MockFileStorage::new(),
            report_storage: MockFileStorage::new(),
            identity,
            config: Config::default(),
        }
    }

    pub fn state(self) -> AppState {
        AppState {
            gateway: Gateway::new(RemoteServices {
                billing: Arc::new(self.billing),
                tax: Arc::new(self.tax),
                geo: Arc::new(self.geo),
                reporter: Arc::new(self.reporter),
            }),
            config: Arc::new(self.config),
            agreement_storage: Arc::new(self.agreement_storage),
            report_storage: Arc::new(self.report_storage),
            identity: Arc::new(self.identity),
        }
    }

    pub fn router(self) -> Router {
        create_router(self.state())
    }
}

/// Expect exactly one call of `method`, answered with `response`
pub fn expect_call(mock: &mut MockRemoteService, method: &'static str, response: Envelope) {
    mock.expect_call()
        .withf(move |m, _, _| m == method)
        .times(1)
        .returning(move |_, _, _| Ok(response.clone()));
}

/// Like [`expect_call`], also checking the encoded request
pub fn expect_request<F>(
    mock: &mut MockRemoteService,
    method: &'static str,
    check: F,
    response: Envelope,
) where
    F: Fn(&Value) -> bool + Send + 'static,
{
    mock.expect_call()
        .withf(move |m, request, _| m == method && check(request))
        .times(1)
        .returning(move |_, _, _| Ok(response.clone()));
}

pub fn expect_transport_error(mock: &mut MockRemoteService, method: &'static str) {
    mock.expect_call()
        .withf(move |m, _, _| m == method)
        .times(1)
        .returning(|_, _, _| Err(TransportError::Unavailable("connection refused".into())));
}

pub fn expect_no_call(mock: &mut MockRemoteService, method: &'static str) {
    mock.expect_call()
        .withf(move |m, _, _| m == method)
        .never();
}

/// Envelope rejected with `status` and a catalog-shaped message
pub fn rejected(status: i32, code: &str) -> Envelope {
    Envelope::with_status(
        status,
        crate::domain::ResponseErrorMessage {
            code: code.to_string(),
            message: "rejected by remote".to_string(),
            details: String::new(),
        },
    )
}

/// Reply of a method whose response message carries no status, decoded the
/// way the transport decodes `{}`
pub fn empty_reply() -> Envelope {
    serde_json::from_str("{}").unwrap()
}

/// Authenticated request without body
pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, BEARER)
        .body(Body::empty())
        .unwrap()
}

/// Authenticated request with a JSON body
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, BEARER)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Status and decoded JSON body (`null` for an empty body)
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if body.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&body).unwrap())
}

pub async fn send_raw(router: Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.unwrap()
}
