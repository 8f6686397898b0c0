use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use colorscheme_api::auth::JwtAuthenticator;
use colorscheme_api::config::AppConfig;
use colorscheme_api::database::Database;
use colorscheme_api::{app, AppState};

/// Multi-user color scheme store over HTTP
#[derive(Debug, Parser)]
#[command(name = "colorscheme-api", version, about)]
struct Cli {
    /// YAML configuration file (overrides the APP_ENV preset)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Listen port (overrides config and PORT)
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,colorscheme_api=debug,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::info!("Starting colorscheme-api in {:?} mode", config.environment);

    let database = Database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    database.bootstrap().await.context("failed to bootstrap schema")?;

    let authenticator = JwtAuthenticator::from_config(&config.security).context("invalid JWT settings")?;
    let state = AppState::new(database.clone(), Arc::new(authenticator));
    state.users.warm_up().await.context("failed to prepare password verifier")?;
    let router = app(state, &config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("colorscheme-api listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
