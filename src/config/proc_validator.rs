//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Missing OAuth credentials are not an error here, they fail at first use

use reqwest::Url;
use tracing::{error, info};

use crate::config::settings::{RetryConfig, SettingsConfig};
use crate::config::sources::{non_empty, AuthConfig, ServiceConfig};
use crate::observability::metrics::get_metrics;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_auth(&cfg.auth, &mut errors);

    if let Some(base_url) = non_empty(&cfg.content.base_url) {
        validate_url("content.base_url", base_url, &mut errors);
    }
    validate_url("audio.base_url", &cfg.audio.base_url, &mut errors);
    if cfg.content.default_per_page == 0 {
        errors.push("content.default_per_page must be greater than 0".to_owned());
    }

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        let metrics = get_metrics().await;
        for err in &errors {
            error!("config validation: {}", err);
            metrics.config_validation_errors.inc();
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_owned());
    }
    if settings.server.port.trim().parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' is not a valid port",
            settings.server.port
        ));
    }
    if !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }
    if let Some(retry) = &settings.retry {
        validate_retry(retry, errors);
    }
}

fn validate_retry(retry: &RetryConfig, errors: &mut Vec<String>) {
    if retry.attempts() == 0 {
        errors.push("settings.retry.attempts must be at least 1".to_owned());
    }
    if retry.max_delay_ms() < retry.base_delay_ms() {
        errors.push(format!(
            "settings.retry.max_delay_ms ({}) must be >= base_delay_ms ({})",
            retry.max_delay_ms(),
            retry.base_delay_ms()
        ));
    }
}

fn validate_auth(auth: &AuthConfig, errors: &mut Vec<String>) {
    if auth.request_timeout_ms == 0 {
        errors.push("auth.request_timeout_ms must be greater than 0".to_owned());
    }
    if auth.scope.trim().is_empty() {
        errors.push("auth.scope must not be empty".to_owned());
    }
    if let Some(base_url) = non_empty(&auth.base_url) {
        validate_url("auth.base_url", base_url, errors);
    }
}

fn validate_url(key: &str, value: &str, errors: &mut Vec<String>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!("{} has unsupported scheme '{}'", key, url.scheme())),
        Err(err) => errors.push(format!("{} '{}' is not a valid url: {}", key, value, err)),
    }
}
