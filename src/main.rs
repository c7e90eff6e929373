//! Barakah server binary entry point.
//!
//! Logs go to stderr; `LOG_FORMAT=json` switches to one JSON object per line.
//!
//! Coverage is excluded because `main` binds a socket and waits for a
//! shutdown signal.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use barakah::config::{Config, LogFormat};
use barakah::server::HttpServer;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .parse()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default();
    init_tracing(format);

    tracing::info!("barakah starting...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        database = %config.database_path,
        bind = %config.bind_address,
        timeout_ms = config.request_timeout_ms,
        image_enabled = config.image_api_key.is_some(),
        "Configuration loaded"
    );

    if let Err(e) = HttpServer::new(config).run().await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    tracing::info!("barakah shutdown complete");
}
