use std::path::Path;
use anyhow::{anyhow, Result};
use tracing::info;

use crate::ServiceConfig;
use crate::config::proc_loader::{file_to_config, parse_config};
use crate::utils::constants::DEFAULT_CONFIG_YAML;

/// Load the config file, or the built-in environment-driven config when the file does not exist.
pub async fn run(config_path: &str) -> Result<ServiceConfig> {
    let path = Path::new(config_path);
    if !path.exists() {
        info!("config file '{}' not found, using environment defaults", config_path);
        return parse_config(DEFAULT_CONFIG_YAML.to_owned())
            .await
            .map_err(|e| anyhow!(format!("Invalid default config: {}", e)));
    }
    file_to_config(path).await.map_err(|e| anyhow!(format!("Invalid config format: {}", e)))
}
