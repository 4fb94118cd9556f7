//! sweatlist-api - Song suggestion service
//!
//! Class participants suggest songs for fitness classes within a monthly
//! quota; instructors approve or reject; track search is proxied to the
//! external music catalog.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use sweatlist_api::services::catalog::CatalogClient;
use sweatlist_api::AppState;
use sweatlist_common::config::{load_toml_config, TomlConfig};

#[derive(Debug, Parser)]
#[command(name = "sweatlist-api", version, about = "Song suggestion service")]
struct Args {
    /// Address to bind
    #[arg(long, env = "SWEATLIST_BIND", default_value = "127.0.0.1:8000")]
    bind: String,

    /// SQLite database path
    #[arg(long, env = "SWEATLIST_DB", default_value = "sweatlist.db")]
    database: PathBuf,

    /// Optional TOML config file path
    #[arg(long, env = "SWEATLIST_CONFIG")]
    config: Option<PathBuf>,

    /// Extra allowed CORS origin for the frontend
    #[arg(long, env = "SWEATLIST_CORS_ORIGIN")]
    cors_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting sweatlist song suggestion service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    // Catalog/CORS config tier is best-effort; a broken file degrades to
    // defaults. Storage below is fatal.
    let toml_config = load_toml_config(args.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config file ignored: {}", e);
        TomlConfig::default()
    });

    let catalog_config = sweatlist_api::config::resolve_catalog_config(&toml_config);
    let catalog = CatalogClient::new(catalog_config)
        .map_err(|e| anyhow::anyhow!("Failed to create catalog client: {}", e))?;

    let pool = sweatlist_common::db::init_database(&args.database).await?;
    info!("Database connection established");

    sweatlist_common::db::seed::seed_demo_data(&pool).await;

    let state = AppState::new(pool, catalog);
    let cors_origin = args.cors_origin.or(toml_config.cors_origin);
    let app = sweatlist_api::build_router(state, cors_origin);

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!("Listening on http://{}", args.bind);
    info!("Health check: http://{}/health", args.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
