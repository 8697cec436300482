//! `taskboardd` — the Taskboard server binary.
//!
//! Usage:
//!   taskboardd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/taskboard/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use taskboard_core::Module;
use tracing::info;

use config::ServerConfig;

/// Taskboard server.
#[derive(Parser, Debug)]
#[command(name = "taskboardd", about = "Taskboard server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides the config file and the default 0.0.0.0:8080).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    let listen = cli
        .listen
        .or(server_config.server.listen.clone())
        .unwrap_or_else(|| "0.0.0.0:8080".to_string());

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = taskboard_core::ServiceConfig {
        data_dir: Some(data_dir),
        sqlite_path: server_config
            .storage
            .sqlite_path
            .as_ref()
            .map(std::path::PathBuf::from),
        listen: listen.clone(),
    };

    let sql: Arc<dyn taskboard_sql::SQLStore> = Arc::new(
        taskboard_sql::SqliteStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // Initialize modules.
    let task_module = task::TaskModule::new(Arc::clone(&sql))?;
    info!("Task module initialized");

    let module_routes = vec![(task_module.name(), task_module.routes())];

    // Build router.
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("Taskboard server listening on {}", listen);
    axum::serve(listener, app).await?;

    Ok(())
}
