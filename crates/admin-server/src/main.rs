use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use admin_server::services::LivenessMonitor;
use admin_server::{api, setup_app_state};
use infrastructure::config::ServerConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding default.toml / {RUN_MODE}.toml
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// API port, overrides listen_port
    #[arg(long)]
    port: Option<u16>,

    /// Admin UI assets, overrides static_dir
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,admin_server=debug,application=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("📺 Signage Admin Server starting...");

    let mut config = ServerConfig::load(&args.config_dir)
        .with_context(|| format!("Failed to load configuration from {}", args.config_dir))?;
    if let Some(port) = args.port {
        config.listen_port = port;
    }
    if args.static_dir.is_some() {
        config.static_dir = args.static_dir;
    }
    info!(
        port = config.listen_port,
        scope = ?config.activation_scope,
        heartbeat_secs = config.heartbeat_interval_secs,
        missed_threshold = config.missed_threshold,
        "Configuration loaded"
    );

    let state = setup_app_state(&config);

    let monitor = LivenessMonitor::new(state.registry.clone(), config.liveness_check_interval());
    let monitor_token = monitor.cancel_token();
    let monitor_handle = tokio::spawn(monitor.run());

    let app = api::create_router(state, config.static_dir.as_deref());
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✅ Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    monitor_token.cancel();
    monitor_handle.await.ok();
    info!("Admin server stopped");
    Ok(())
}
