// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;

use crate::cache::error::TokenError;
use crate::cache::token_cache::TokenCache;
use crate::config::sources::{AuthConfig, ContentConfig};
use crate::content::client::ContentClient;
use crate::helpers::time::ManualClock;
use crate::resilience::retry::RetrySettings;
use crate::sources::fetch::TokenEndpoint;
use crate::sources::oauth2::OAuth2Source;
use crate::sources::TokenResponse;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn token_response(access_token: &str, expires_in: u64) -> TokenResponse {
    TokenResponse {
        access_token: access_token.to_owned(),
        token_type: "Bearer".to_owned(),
        expires_in,
        scope: "content".to_owned(),
    }
}

/// Token endpoint answering from a queue, counting every call.
#[derive(Debug)]
pub struct ScriptedEndpoint {
    calls: AtomicUsize,
    responses: Mutex<VecDeque<Result<TokenResponse, TokenError>>>,
    delay: Duration,
}

impl ScriptedEndpoint {
    pub fn new() -> Arc<Self> {
        Self::with_delay(Duration::ZERO)
    }

    /// Every request stays in flight for `delay`, so concurrent callers overlap.
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(VecDeque::new()),
            delay,
        })
    }

    pub fn push_ok(&self, access_token: &str, expires_in: u64) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(token_response(access_token, expires_in)));
    }

    pub fn push_err(&self, err: TokenError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenEndpoint for ScriptedEndpoint {
    async fn request_token(&self) -> Result<TokenResponse, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(TokenError::RefreshTransport("no scripted response".to_owned())))
    }

    fn client_id(&self) -> Result<String, TokenError> {
        Ok("test-client".to_owned())
    }
}

pub fn scripted_cache(
    endpoint: &Arc<ScriptedEndpoint>,
    clock: &ManualClock,
) -> Arc<TokenCache<Arc<ScriptedEndpoint>, ManualClock>> {
    Arc::new(TokenCache::with_clock(endpoint.clone(), clock.clone(), 60))
}

pub fn auth_config(base_url: &str) -> AuthConfig {
    AuthConfig {
        client_id: Some("client".to_owned()),
        client_secret: Some("secret".to_owned()),
        base_url: Some(base_url.to_owned()),
        ..AuthConfig::default()
    }
}

/// Content client wired exactly like the binary does it.
pub fn oauth2_content_client(auth: AuthConfig, content_base_url: Option<String>) -> ContentClient {
    let client = build_reqwest_client();
    let safety_margin_seconds = auth.safety_margin_seconds;
    let tokens = Arc::new(TokenCache::new(
        OAuth2Source::new(client.clone(), auth),
        safety_margin_seconds,
    ));
    let content = ContentConfig { base_url: content_base_url, ..ContentConfig::default() };
    let retry = RetrySettings { attempts: 2, base_delay_ms: 10, max_delay_ms: 20 };
    ContentClient::new(client, tokens, content, retry)
}
