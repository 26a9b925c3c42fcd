use std::time::Duration;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use http::header::AUTHORIZATION;
use reqwest::Client;
use tracing::debug;

use crate::cache::error::TokenError;
use crate::config::sources::AuthConfig;
use crate::sources::fetch::TokenEndpoint;
use crate::sources::TokenResponse;
use crate::utils::constants::GRANT_TYPE_CLIENT_CREDENTIALS;

/// OAuth2 client-credentials grant against `{base_url}/oauth2/token`.
///
/// Configuration is read on every request, so missing credentials surface as
/// [`TokenError::Configuration`] at first use rather than at startup.
#[derive(Debug, Clone)]
pub struct OAuth2Source {
    pub cfg: AuthConfig,
    pub client: Client,
}

impl OAuth2Source {
    pub fn new(client: Client, cfg: AuthConfig) -> Self {
        Self { cfg, client }
    }

    fn basic_authorization(&self) -> Result<String, TokenError> {
        let client_id = self.cfg.client_id()?;
        let client_secret = self.cfg.client_secret()?;
        let credentials = BASE64_STANDARD.encode(format!("{}:{}", client_id, client_secret));
        Ok(format!("Basic {}", credentials))
    }
}

impl TokenEndpoint for OAuth2Source {
    async fn request_token(&self) -> Result<TokenResponse, TokenError> {
        let authorization = self.basic_authorization()?;
        let token_url = self.cfg.token_url()?;
        debug!("requesting client credentials token from {}", token_url);

        let form = [
            ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS),
            ("scope", self.cfg.scope.as_str()),
        ];
        let response = self
            .client
            .post(&token_url)
            .header(AUTHORIZATION, authorization)
            .timeout(Duration::from_millis(self.cfg.request_timeout_ms))
            .form(&form)
            .send()
            .await
            .map_err(|err| TokenError::RefreshTransport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::RefreshTransport(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| TokenError::RefreshTransport(err.to_string()))?;
        TokenResponse::parse(&body)
    }

    fn client_id(&self) -> Result<String, TokenError> {
        self.cfg.client_id().map(str::to_owned)
    }
}
