use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sliceline::config::Config;
use sliceline::engine::MenuCatalog;
use sliceline::notifications::EmailNotifier;
use sliceline::payments::StripeGateway;
use sliceline::AppState;

#[derive(Parser, Debug)]
#[command(name = "sliceline")]
#[command(author, version, about = "Pizza delivery ordering backend", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sliceline.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Sliceline v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage and make sure a menu exists
    let store = sliceline::store::init(&config.storage).await?;
    MenuCatalog::seed_default(store.as_ref()).await?;

    // Outbound collaborators
    let payments = Arc::new(StripeGateway::new(&config.payment));
    let notifier = Arc::new(EmailNotifier::new(config.email.clone()));
    if !notifier.is_enabled() {
        tracing::warn!("Email is not configured; order confirmations will be skipped");
    }

    let state = Arc::new(AppState::new(config, store, payments, notifier));
    let app = sliceline::api::create_router(state.clone());

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
