//! Runs the civic issue server.
//!
//! Usage:
//!
//! ```text
//! civic_resolve [--config <path>] [--bind <addr>]
//! ```
//!
//! Configuration is read from TOML; a missing file yields the defaults.
//! When a `[database]` section is present, issues, leaders, hashtags,
//! accounts and notifications are stored in `PostgreSQL`.

use civic_resolve::config::AppConfig;
use civic_resolve::http::{self, AppState, Stores};
use civic_resolve::issue::adapters::postgres::IssuePgPool;
use civic_resolve::telemetry;
use clap::Parser;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "civic_resolve")]
#[command(about = "Civic issue reporting with two-step resolution and live channels")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "civic-resolve.toml")]
    config: PathBuf,

    /// Listen address (overrides the configuration file).
    #[arg(long, env = "CIVIC_RESOLVE_BIND")]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let subscriber_installed = telemetry::init_tracing();
    let cli = Cli::parse();
    info!(config = %cli.config.display(), subscriber_installed, "starting civic_resolve");

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }

    let stores = match &config.database {
        Some(database) => {
            let manager = ConnectionManager::<PgConnection>::new(database.url.as_str());
            let pool: IssuePgPool = Pool::builder()
                .max_size(database.max_connections)
                .build(manager)?;
            info!(max_connections = database.max_connections, "using PostgreSQL stores");
            Stores::with_postgres(pool)
        }
        None => {
            info!("no database configured, using in-memory stores");
            Stores::in_memory()
        }
    };

    let state = AppState::from_config(&config, stores);
    let listener = tokio::net::TcpListener::bind(config.server.bind_addr).await?;
    info!(addr = %config.server.bind_addr, "listening");
    axum::serve(listener, http::router(state)).await?;
    Ok(())
}
