use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use quran_gateway::cache::token_cache::TokenCache;
use quran_gateway::content::client::ContentClient;
use quran_gateway::resilience::retry::RetrySettings;
use quran_gateway::server;
use quran_gateway::sources::oauth2::OAuth2Source;
use quran_gateway::utils::config_loader;
use quran_gateway::utils::logging;
use quran_gateway::utils::logging::LogLevel;
use reqwest::Client;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "quran-gateway.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum, ignore_case = true)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level)?;

    // -------------------------------
    // 2. Shared request client and token cache
    //
    // one cache per process, handed to every upstream caller
    // -------------------------------

    let client = Client::new();
    let auth = service_config.auth.to_owned();
    let safety_margin_seconds = auth.safety_margin_seconds;
    let tokens = Arc::new(TokenCache::new(
        OAuth2Source::new(client.clone(), auth),
        safety_margin_seconds,
    ));

    // -------------------------------
    // 3. Content client
    // -------------------------------

    let retry = RetrySettings::from(service_config.settings.retry.as_ref());
    let content = Arc::new(ContentClient::new(
        client,
        tokens,
        service_config.content.to_owned(),
        retry,
    ));

    // -------------------------------
    // 4. Serve the local API
    // -------------------------------

    info!("Service starting...");
    server::server::start(&service_config.settings, content).await
}
