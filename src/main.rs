#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use movie_catalog_service::infrastructure::{
    config::{AppConfig, LogFormat, LoggingConfig},
    http::start_server,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    init_tracing(&config.logging);

    info!("Starting Movie Catalog Service in {} mode", config.mode);
    info!(
        "Configuration loaded: server will bind to {}:{}, operation deadline {}s",
        config.server.host, config.server.port, config.server.operation_timeout_seconds
    );

    if let Err(e) = start_server(config).await {
        error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

/// Initialize structured logging
///
/// An explicit `logging.filter` wins over `RUST_LOG`; without either, the
/// configured level applies to this crate and `tower_http`.
fn init_tracing(logging: &LoggingConfig) {
    let filter = match &logging.filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "movie_catalog_service={level},tower_http={level}",
                level = logging.level
            ))
        }),
    };

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).init(),
    }
}
