//! Bridge server entry point.
//!
//! Resolves the configuration (defaults, optional JSON file, environment,
//! flags) and serves until Ctrl-C or SIGTERM.
//!
//! ```text
//! bridge-server --base-dir "/home/coach/HOCKEY" --port 8080
//! ```

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bridge_config::{BridgeConfig, ConfigOverrides};
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bridge-server", about = "Saves editor deploys to the local filesystem")]
struct Cli {
    /// JSON config file with any of `base_dir`, `host`, `port`.
    #[arg(long, env = "BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory that `layouts/` and `teams/` are written under.
    #[arg(long, env = "BRIDGE_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Interface to bind.
    #[arg(long, env = "BRIDGE_HOST")]
    host: Option<IpAddr>,

    /// Port to listen on.
    #[arg(long, env = "BRIDGE_PORT")]
    port: Option<u16>,
}

impl Cli {
    fn resolve(self) -> Result<BridgeConfig> {
        let base = match &self.config {
            Some(path) => BridgeConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => BridgeConfig::default(),
        };
        Ok(base.with_overrides(ConfigOverrides {
            base_dir: self.base_dir,
            host: self.host,
            port: self.port,
        }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = Cli::parse().resolve()?;
    info!("Starting bridge on {}", config.socket_addr());

    bridge_server::serve(config, shutdown_signal())
        .await
        .context("bridge server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received");
}
