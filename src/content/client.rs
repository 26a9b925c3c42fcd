use std::sync::Arc;

use http::StatusCode;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::token_cache::TokenCache;
use crate::config::sources::{non_empty, ContentConfig};
use crate::content::error::ContentError;
use crate::content::types::{
    ChaptersResponse, FootNoteResponse, RecitationsResponse, VersesResponse,
};
use crate::helpers::time::{get_instant, Clock, SystemClock};
use crate::observability::metrics::get_metrics;
use crate::resilience::retry::RetrySettings;
use crate::sources::fetch::TokenEndpoint;
use crate::sources::oauth2::OAuth2Source;
use crate::utils::constants::{
    AUTH_TOKEN_HEADER, CLIENT_ID_HEADER, CONTENT_API_PREFIX, VERSE_FIELDS,
};

/// Paging and resource selection for verse listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersesQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub translation_id: Option<u32>,
    pub recitation_id: Option<u32>,
}

/// Upstream content API client.
///
/// Every request carries the shared bearer token and the client id. A 401
/// from upstream drops the rejected token from the cache, unless another
/// request already rotated it, and the request is repeated once with the
/// current token.
#[derive(Debug)]
pub struct ContentClient<E = OAuth2Source, C = SystemClock> {
    client: Client,
    tokens: Arc<TokenCache<E, C>>,
    cfg: ContentConfig,
    retry: RetrySettings,
}

impl<E: TokenEndpoint, C: Clock> ContentClient<E, C> {
    pub fn new(
        client: Client,
        tokens: Arc<TokenCache<E, C>>,
        cfg: ContentConfig,
        retry: RetrySettings,
    ) -> Self {
        Self { client, tokens, cfg, retry }
    }

    pub async fn chapters(&self) -> Result<Vec<Value>, ContentError> {
        let response: ChaptersResponse = self.get_json("chapters", "chapters", &[]).await?;
        info!("chapter list received: {} chapters", response.chapters.len());
        Ok(response.chapters)
    }

    pub async fn verses_by_chapter(
        &self,
        chapter: u32,
        query: &VersesQuery,
    ) -> Result<VersesResponse, ContentError> {
        let mut params = vec![
            ("fields", VERSE_FIELDS.to_owned()),
            (
                "translations",
                query.translation_id.unwrap_or(self.cfg.default_translation_id).to_string(),
            ),
            ("page", query.page.unwrap_or(1).to_string()),
            (
                "per_page",
                query.per_page.unwrap_or(self.cfg.default_per_page).to_string(),
            ),
        ];
        if let Some(recitation_id) = query.recitation_id {
            params.push(("audio", recitation_id.to_string()));
        }

        let path = format!("verses/by_chapter/{}", chapter);
        let response: VersesResponse = self.get_json("verses", &path, &params).await?;
        info!("verses received for chapter {}: {} verses", chapter, response.verses.len());
        Ok(response)
    }

    pub async fn footnote(&self, id: u64) -> Result<Value, ContentError> {
        let path = format!("foot_notes/{}", id);
        let response: FootNoteResponse = self.get_json("footnote", &path, &[]).await?;
        Ok(response.foot_note)
    }

    pub async fn recitations(&self) -> Result<Vec<Value>, ContentError> {
        let response: RecitationsResponse = self
            .get_json("recitations", "resources/recitations", &[])
            .await?;
        Ok(response.recitations)
    }

    pub async fn translations(&self) -> Result<Value, ContentError> {
        self.get_json("translations", "resources/translations", &[]).await
    }

    pub async fn languages(&self) -> Result<Value, ContentError> {
        self.get_json("languages", "resources/languages", &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ContentError> {
        let metrics = get_metrics().await;
        let start = get_instant();
        let url = self.resource_url(path)?;
        debug!("fetching {} from {}", resource, url);

        let result = self
            .retry
            .run_with_retry(|| self.get_authorized(&url, query), ContentError::is_retryable)
            .await;

        let status = match &result {
            Ok(_) => "2xx".to_owned(),
            Err(ContentError::Status(status)) => format!("{}xx", status.as_u16() / 100),
            Err(_) => "error".to_owned(),
        };
        metrics.content_requests.with_label_values(&[resource, status.as_str()]).inc();
        metrics
            .content_duration
            .with_label_values(&[resource])
            .observe(start.elapsed().as_secs_f64());
        result
    }

    async fn get_authorized<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ContentError> {
        let (mut response, access_token) = self.send(url, query).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("content api rejected the access token, rotating it");
            self.tokens.invalidate_if_current(&access_token);
            (response, _) = self.send(url, query).await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status(status));
        }
        let body = response
            .text()
            .await
            .map_err(|err| ContentError::Transport(err.to_string()))?;
        serde_json::from_str(&body).map_err(|err| ContentError::Decode(err.to_string()))
    }

    /// Sends one authorized GET and hands back the token it carried.
    async fn send(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<(Response, String), ContentError> {
        let access_token = self.tokens.get_token().await?;
        let client_id = self.tokens.client_id()?;

        let response = self
            .client
            .get(url)
            .header(AUTH_TOKEN_HEADER, access_token.as_str())
            .header(CLIENT_ID_HEADER, client_id)
            .query(query)
            .send()
            .await
            .map_err(|err| ContentError::Transport(err.to_string()))?;
        Ok((response, access_token))
    }

    fn resource_url(&self, path: &str) -> Result<String, ContentError> {
        let base_url = non_empty(&self.cfg.base_url)
            .ok_or_else(|| ContentError::Configuration("content.base_url".to_owned()))?;
        Ok(format!("{}/{}/{}", base_url.trim_end_matches('/'), CONTENT_API_PREFIX, path))
    }
}
