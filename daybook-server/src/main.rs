mod routes;
mod singleton;
mod state;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use daybook_core::config::ServerConfig;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "daybook-server", version, about = "Serve daybook calendars over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the users' calendars
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut config = ServerConfig::load().context("Failed to load server config")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    let data_dir = config.data_path();
    let state = AppState::open(&data_dir)?;

    // Ensure only one instance serves this data directory
    let _lock = singleton::acquire_lock(&data_dir)?;

    let app = routes::router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, data_dir = %data_dir.display(), "daybook-server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
