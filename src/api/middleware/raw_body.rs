use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    middleware::Next,
    response::Response,
};

use crate::api::errors::ApiError;
use crate::domain::errors;

/// Largest body kept for signature checks (key files go through multipart).
const MAX_RAW_BODY: usize = 16 * 1024 * 1024;

/// Request body bytes as received, for webhooks and signature checks
#[derive(Debug, Clone, Default)]
pub struct RawBody(pub Bytes);

impl RawBody {
    pub fn as_str(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

/// Buffer the body into extensions and hand an identical body downstream
pub async fn capture_raw_body(request: Request, next: Next) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    let is_multipart = parts
        .headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/"));
    if is_multipart {
        parts.extensions.insert(RawBody::default());
        return Ok(next.run(Request::from_parts(parts, body)).await);
    }

    let bytes = to_bytes(body, MAX_RAW_BODY)
        .await
        .map_err(|_| ApiError::bad_request(&errors::REQUEST_PARAMS_INCORRECT))?;

    parts.extensions.insert(RawBody(bytes.clone()));
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::post, Extension, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_raw_body_and_body_are_both_available() {
        let app = Router::new()
            .route(
                "/webhook",
                post(|Extension(raw): Extension<RawBody>, body: String| async move {
                    format!("{}|{}", raw.as_str(), body)
                }),
            )
            .layer(middleware::from_fn(capture_raw_body));

        let response = app
            .oneshot(
                Request::post("/webhook")
                    .body(Body::from("{\"a\":1}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{\"a\":1}|{\"a\":1}");
    }
}
