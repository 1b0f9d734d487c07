//! Messenger Gateway - HTTP front door for the messenger backends

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use messenger_gateway::{auth::TokenValidator, build_router, config::Config, AppState};

/// Messenger Gateway CLI
#[derive(Parser)]
#[command(name = "messenger-gateway")]
#[command(about = "HTTP gateway for the messenger dialog, user and notification services")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a bearer token with the configured secret
    CheckToken {
        /// The JWT, without the "Bearer " prefix
        #[arg(long)]
        token: String,
    },

    /// Run the server
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "messenger_gateway=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config).await?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::CheckToken { token } => {
            check_token(&config, &token)?;
        }
        Commands::Run => {
            run_server(config).await?;
        }
    }

    Ok(())
}

fn check_token(config: &Config, token: &str) -> anyhow::Result<()> {
    let validator = TokenValidator::new(&config.auth.jwt_secret);
    match validator.validate(token) {
        Ok(identity) => {
            println!("Token is valid for user {}", identity.as_str());
            Ok(())
        }
        Err(e) => anyhow::bail!("Token rejected: {}", e),
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Messenger Gateway v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&config).context("failed to set up backend clients")?;
    tracing::info!(
        dialog = %config.backends.dialog_url,
        users = %config.backends.users_url,
        notifications = %config.notifications.base_url,
        "Backends configured"
    );

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
