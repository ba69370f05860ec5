use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

/// CORS layer built from `ALLOW_ORIGIN`
///
/// Credentials are allowed, so a wildcard origin is mirrored back instead of
/// answered with `*`.
pub fn create_cors_layer(config: &Config) -> CorsLayer {
    let origins = match config.allowed_origins() {
        Some(origins) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ),
        None => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("content-type"),
        ])
        .expose_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("content-type"),
            HeaderName::from_static("set-cookie"),
            HeaderName::from_static("cookie"),
        ])
        .allow_credentials(true)
}
