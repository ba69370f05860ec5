use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::info;

use super::raw_body::RawBody;

const MAX_DUMP_BODY: usize = 4 * 1024 * 1024;

fn headers_to_string(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value.to_str().unwrap_or("<binary>")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Log request and response of webhook calls at info level
pub async fn dump_bodies(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let request_headers = headers_to_string(request.headers());
    let request_body = request
        .extensions()
        .get::<RawBody>()
        .map(RawBody::as_str)
        .unwrap_or_default();

    let response = next.run(request).await;
    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_DUMP_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "webhook response body not readable");
            return parts.status.into_response();
        }
    };

    info!(
        path = %path,
        request_headers = %request_headers,
        request_body = %request_body,
        response_headers = %headers_to_string(&parts.headers),
        response_body = %String::from_utf8_lossy(&bytes),
        "webhook"
    );

    Response::from_parts(parts, Body::from(bytes))
}
