use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::domain::Envelope;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway responded with {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Per-call transport options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Overrides the client's default request timeout
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Port for one remote RPC service (billing, tax, geo, reporter)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Invoke `method` with a JSON-encoded request message
    async fn call(
        &self,
        method: &str,
        request: Value,
        options: CallOptions,
    ) -> Result<Envelope, TransportError>;
}
