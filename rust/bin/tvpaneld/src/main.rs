//! `tvpaneld`: the TV panel server binary.
//!
//! Usage:
//!   tvpaneld -c <context-name-or-path> [--listen <addr>] [-- --db=PATH ...]
//!
//! The context name resolves to `/etc/tvpanel/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use config::ServerConfig;
use panel::PanelModule;
use panel::service::PanelService;
use tvpanel_core::Module;

/// TV panel server.
#[derive(Parser, Debug)]
#[command(name = "tvpaneld", about = "TV panel layout server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides the config file).
    #[arg(long = "listen")]
    listen: Option<String>,

    /// Extra `--key=value` overrides, e.g. `--db=/tmp/panels.redb`.
    #[arg(last = true)]
    overrides: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    let service_config = server_config
        .service_config(cli.listen.as_deref())
        .with_args(&cli.overrides);

    if let Some(data_dir) = &service_config.data_dir {
        std::fs::create_dir_all(data_dir)?;
    }

    let db_path = service_config.resolve_db_path();
    let kv: Arc<dyn tvpanel_kv::KVStore> = Arc::new(
        tvpanel_kv::RedbStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );
    info!("KV store opened at {}", db_path.display());

    let service = PanelService::new(kv);
    bootstrap::audit_layouts(&service)?;

    let panel_module = PanelModule::new(service);
    info!("Panel module initialized");

    let app = routes::build_router(vec![(panel_module.name(), panel_module.routes())]);

    let listener = tokio::net::TcpListener::bind(&service_config.listen).await?;
    info!("tvpaneld listening on {}", service_config.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
