//! Errors raised while dispatching a call to a remote service.

use thiserror::Error;

use crate::application::ports::TransportError;
use crate::domain::Envelope;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The call never produced an envelope (network, gateway or decode failure).
    #[error("{service}.{method} call failed: {source}")]
    Transport {
        service: &'static str,
        method: &'static str,
        #[source]
        source: TransportError,
    },

    /// The remote answered with a non-success status.
    #[error("remote rejected request with status {}", .0.status)]
    Rejected(Envelope),

    #[error("request encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Encode(_))
    }

    /// Rejected envelope, if the remote produced one.
    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            Self::Rejected(envelope) => Some(envelope),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors;

    #[test]
    fn test_transport_error_names_method() {
        let err = GatewayError::Transport {
            service: "billing",
            method: "GetAdminUsers",
            source: TransportError::Unavailable("connection refused".into()),
        };

        assert!(err.is_transport());
        assert!(err.envelope().is_none());
        assert!(err.to_string().starts_with("billing.GetAdminUsers call failed"));
    }

    #[test]
    fn test_rejected_keeps_envelope() {
        let err = GatewayError::Rejected(Envelope::with_status(404, errors::MERCHANT_NOT_FOUND.into()));

        assert!(!err.is_transport());
        assert_eq!(err.envelope().map(|e| e.status), Some(404));
    }
}
