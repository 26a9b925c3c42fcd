//! Shared constants and invariants

pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_SCOPE: &str = "content";
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 1000;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

// Upstream content API
pub const CONTENT_API_PREFIX: &str = "content/api/v4";
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";
pub const CLIENT_ID_HEADER: &str = "x-client-id";
pub const DEFAULT_TRANSLATION_ID: u32 = 85;
pub const DEFAULT_PER_PAGE: u32 = 50;
pub const VERSE_FIELDS: &str = "text_uthmani,translations";

pub const DEFAULT_AUDIO_BASE_URL: &str = "https://verses.quran.foundation/";

/// Used when no config file exists: everything comes from the environment.
pub const DEFAULT_CONFIG_YAML: &str = r#"
settings:
  server:
    host: ${HOST:0.0.0.0}
    port: "${PORT:3000}"
  logging:
    level: ${LOG_LEVEL:info}
    format: ${LOG_FORMAT:compact}
  metrics:
    is_enabled: true
    path: /metrics
auth:
  client_id: "${QURAN_CLIENT_ID}"
  client_secret: "${QURAN_CLIENT_SECRET}"
  base_url: "${QURAN_API_BASE_URL}"
content:
  base_url: "${QURAN_CONTENT_API_BASE_URL}"
audio:
  base_url: "${QURAN_AUDIO_BASE_URL:https://verses.quran.foundation/}"
"#;
