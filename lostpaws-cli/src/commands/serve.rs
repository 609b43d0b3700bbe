//! HTTP server command

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use lostpaws_server::db::{create_pool, ensure_schema};
use lostpaws_server::http::{run_server, ServerConfig};
use lostpaws_server::storage::PhotoStore;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory for uploaded listing photos
    #[arg(long, env = "LOSTPAWS_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: String,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url or the DATABASE_URL env var")?;

    tracing::info!("Starting lostpaws server on {}", args.bind);

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    // Explicit startup step. A failure here is logged and serving
    // continues with no guarantee the schema is usable.
    if let Err(e) = ensure_schema(&pool).await {
        tracing::error!("schema initialization failed: {}", e);
    }

    let photos =
        PhotoStore::new(&args.upload_dir).context("Failed to prepare uploads directory")?;

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(pool, photos, config).await.context("Server error")?;

    Ok(())
}
