use serde::Deserialize;

use crate::cache::error::TokenError;
use crate::config::settings::SettingsConfig;
use crate::utils::constants::{
    DEFAULT_AUDIO_BASE_URL, DEFAULT_PER_PAGE, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_SAFETY_MARGIN_SECS, DEFAULT_SCOPE, DEFAULT_TRANSLATION_ID,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

/// ================================
/// OAuth2 client credentials
/// ================================
///
/// Credentials may be absent at startup; they are required on first use.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// authorization server base url, token endpoint is `{base_url}/oauth2/token`
    pub base_url: Option<String>,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_safety_margin_seconds")]
    pub safety_margin_seconds: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            base_url: None,
            scope: default_scope(),
            safety_margin_seconds: default_safety_margin_seconds(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl AuthConfig {
    pub fn client_id(&self) -> Result<&str, TokenError> {
        required(&self.client_id, "auth.client_id")
    }

    pub fn client_secret(&self) -> Result<&str, TokenError> {
        required(&self.client_secret, "auth.client_secret")
    }

    pub fn base_url(&self) -> Result<&str, TokenError> {
        required(&self.base_url, "auth.base_url")
    }

    pub fn token_url(&self) -> Result<String, TokenError> {
        Ok(format!("{}/oauth2/token", self.base_url()?.trim_end_matches('/')))
    }
}

/// ================================
/// Upstream content API
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    pub base_url: Option<String>,
    #[serde(default = "default_translation_id")]
    pub default_translation_id: u32,
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            default_translation_id: default_translation_id(),
            default_per_page: default_per_page(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AudioConfig {
    #[serde(default = "default_audio_base_url")]
    pub base_url: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { base_url: default_audio_base_url() }
    }
}

/// Empty strings come from unset `${VAR}` references and count as absent.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str, TokenError> {
    non_empty(value).ok_or_else(|| TokenError::Configuration(key.to_owned()))
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_owned()
}

fn default_safety_margin_seconds() -> u64 {
    DEFAULT_SAFETY_MARGIN_SECS
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_translation_id() -> u32 {
    DEFAULT_TRANSLATION_ID
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_audio_base_url() -> String {
    DEFAULT_AUDIO_BASE_URL.to_owned()
}
