use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::api::errors::ApiError;
use crate::api::router::AppState;
use crate::application::methods::BillingMethod;
use crate::domain::{constants::AUTHORIZATION_TOKEN_PATTERN, errors, AuthUser};

static TOKEN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(AUTHORIZATION_TOKEN_PATTERN).ok());

/// Extract the bearer token from the `Authorization` header
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ApiError::unauthorized(&errors::AUTHORIZATION_HEADER_NOT_FOUND))?;

    TOKEN
        .as_ref()
        .and_then(|re| re.captures(header))
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str().to_string())
        .ok_or_else(|| ApiError::unauthorized(&errors::AUTHORIZATION_TOKEN_NOT_FOUND))
}

async fn resolve_user(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = bearer_token(headers)?;
    let info = state.identity.user_info(&token).await.map_err(|e| {
        tracing::warn!(error = %e, "user info lookup failed");
        ApiError::unauthorized(&errors::AUTHORIZED_USER_NOT_FOUND)
    })?;

    Ok(AuthUser::new(info.user_id, info.email))
}

/// Bearer authentication for the project and system groups
pub async fn user_details(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = if state.config.disable_auth_middleware {
        AuthUser::default()
    } else {
        resolve_user(&state, request.headers()).await?
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Bearer authentication plus merchant resolution for the admin group.
///
/// The first merchant the user belongs to becomes the request's merchant.
pub async fn merchant_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.config.disable_auth_middleware {
        request.extensions_mut().insert(AuthUser::default());
        return Ok(next.run(request).await);
    }

    let mut user = resolve_user(&state, request.headers()).await?;

    let envelope = state
        .gateway
        .billing(
            BillingMethod::GetMerchantsForUser,
            &json!({ "user_id": user.id }),
        )
        .await?;

    if let Some(merchant) = envelope
        .field("merchants")
        .and_then(|merchants| merchants.as_array())
        .and_then(|merchants| merchants.first())
    {
        let id = merchant["id"].as_str().unwrap_or_default();
        let role = merchant["role"].as_str().unwrap_or_default();
        user = user.with_merchant(id, role);
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Resolve the user when a bearer token is present, otherwise continue anonymously
pub async fn optional_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.config.disable_auth_middleware && request.headers().contains_key(AUTHORIZATION) {
        if let Ok(user) = resolve_user(&state, request.headers()).await {
            request.extensions_mut().insert(user);
        }
    }

    next.run(request).await
}
