use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token rejected with status {0}")]
    Rejected(u16),
}

/// Subset of the OpenID Connect user-info claims used by the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "sub")]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
}

/// Port for resolving bearer tokens into users
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn user_info(&self, token: &str) -> Result<UserInfo, IdentityError>;
}
