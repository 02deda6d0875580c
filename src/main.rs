//! Memory App - personal notes behind a login
//!
//! Loads configuration, initialises tracing, opens the store and serves the
//! HTTP API until the process is stopped.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use memory_app::{build_router, config::AppConfig, AppState};
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "memory-app")]
#[command(about = "Personal memory notes web service")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR")]
    bind: Option<String>,

    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH")]
    database_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(path) = args.database_path {
        config.database_path = path;
    }
    config.validate()?;

    if config.is_default_secret() {
        warn!("Running with the default SECRET_KEY; set SECRET_KEY before deploying");
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Memory app listening on {}", bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memory_app=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    let _ = dotenv();

    // also pick up a .env next to the manifest when run from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
