use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::application::ports::{IdentityError, IdentityProvider, UserInfo};

pub const USER_INFO_PATH: &str = "/oauth2/userinfo";

/// Resolves bearer tokens through the Auth1 OpenID Connect user-info endpoint
#[derive(Clone)]
pub struct Auth1Client {
    client: Client,
    user_info_url: String,
}

impl Auth1Client {
    pub fn new(client: Client, issuer: &str) -> Self {
        Self {
            client,
            user_info_url: format!("{}{USER_INFO_PATH}", issuer.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl IdentityProvider for Auth1Client {
    async fn user_info(&self, token: &str) -> Result<UserInfo, IdentityError> {
        let response = self
            .client
            .get(&self.user_info_url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "user info rejected");
            return Err(IdentityError::Rejected(status.as_u16()));
        }

        Ok(response.json::<UserInfo>().await?)
    }
}
