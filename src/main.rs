use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use innkeep::config::Config;
use innkeep::google::GoogleTokenInfo;
use innkeep::AppState;

#[derive(Parser, Debug)]
#[command(name = "innkeep")]
#[command(author, version, about = "Hotel booking API server", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "innkeep.toml")]
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

    tracing::info!(
        mode = ?config.server.mode,
        "Starting innkeep v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize database
    let db = innkeep::db::init(&config.database).await?;

    // Bootstrap the admin account when credentials are configured
    if let (Some(email), Some(password)) = (&config.auth.admin_email, &config.auth.admin_password) {
        innkeep::api::auth::ensure_admin_user(&db, email, password).await?;
    }

    let images = innkeep::images::from_config(&config.images);
    let google = Arc::new(GoogleTokenInfo::new(config.google.client_id.clone()));
    if config.google.client_id.is_none() {
        tracing::warn!("GOOGLE_CLIENT_ID not set; Google token audience is not checked");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| "Invalid server address")?;

    let state = Arc::new(AppState::new(config, db, images, google));
    let app = innkeep::api::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
