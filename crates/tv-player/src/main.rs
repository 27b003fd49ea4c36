use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use application::PlayerManager;
use infrastructure::HttpContentSource;
use infrastructure::config::PlayerConfig;
use tv_player::LoggingRenderer;
use tv_player::settings::{player_settings, tv_ids};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Override the admin server URL
    #[arg(long)]
    server_url: Option<String>,

    /// TV ids to drive, replaces tv_ids from config (repeatable)
    #[arg(long = "tv")]
    tvs: Vec<String>,
}

async fn run() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tv_player=debug,application=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("📺 TV Player starting...");

    let mut config = PlayerConfig::load(&args.config_dir)
        .with_context(|| format!("Failed to load configuration from {}", args.config_dir))?;
    if let Some(url) = args.server_url {
        config.server_url = url;
    }
    if !args.tvs.is_empty() {
        config.tv_ids = args.tvs;
    }

    let tvs = tv_ids(&config.tv_ids)?;
    let source = Arc::new(HttpContentSource::new(&config.server_url, REQUEST_TIMEOUT)?);
    info!(server = %source.base_url(), tvs = tvs.len(), "✅ Configuration loaded");

    let manager = PlayerManager::new(source, Arc::new(LoggingRenderer::new()), player_settings(&config));
    for tv in tvs {
        manager.start(tv)?;
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping players...");
    manager.stop_all().await;
    info!("TV Player stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("❌ Fatal error: {:#}", e);
        std::process::exit(1);
    }
}
