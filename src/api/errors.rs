use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::application::errors::GatewayError;
use crate::domain::errors::{self, ErrorCode};
use crate::domain::{Envelope, ResponseErrorMessage};

/// API error response
///
/// The body is either a catalog [`ResponseErrorMessage`] or whatever `message`
/// a remote envelope carried (possibly `null`).
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<ResponseErrorMessage>) -> Self {
        let message: ResponseErrorMessage = message.into();
        Self {
            status,
            body: serde_json::to_value(message).unwrap_or(Value::Null),
        }
    }

    pub fn bad_request(message: impl Into<ResponseErrorMessage>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<ResponseErrorMessage>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<ResponseErrorMessage>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_error(message: impl Into<ResponseErrorMessage>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Relay a rejected envelope: its status becomes the HTTP status.
    pub fn from_envelope(envelope: Envelope) -> Self {
        Self {
            status: relay_status(envelope.status),
            body: envelope
                .message
                .and_then(|message| serde_json::to_value(message).ok())
                .unwrap_or(Value::Null),
        }
    }

    /// Translate a gateway failure, answering transport errors with `transport`.
    pub fn from_gateway(err: GatewayError, transport: &ErrorCode) -> Self {
        Self::from_gateway_as(err, StatusCode::INTERNAL_SERVER_ERROR, transport)
    }

    /// Same as [`from_gateway`](Self::from_gateway) with a non-500 transport status.
    pub fn from_gateway_as(err: GatewayError, status: StatusCode, transport: &ErrorCode) -> Self {
        match err {
            GatewayError::Rejected(envelope) => Self::from_envelope(envelope),
            GatewayError::Transport { .. } | GatewayError::Encode(_) => {
                Self::new(status, transport)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// Remote statuses outside the HTTP range surface as 500.
pub fn relay_status(status: i32) -> StatusCode {
    u16::try_from(status)
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self::from_gateway(err, &errors::UNKNOWN)
    }
}
