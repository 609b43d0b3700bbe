//! Standalone schema initialization command
//!
//! Useful for provisioning a database before the first `serve`, or for
//! applying the is_admin upgrade to an older deployment.

use anyhow::{Context, Result};
use clap::Parser;

use lostpaws_server::db::{create_pool, ensure_schema};

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    /// Database URL (overrides environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Create or upgrade the schema, then exit.
pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url or the DATABASE_URL env var")?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to connect to the database")?;

    ensure_schema(&pool)
        .await
        .context("Failed to initialize schema")?;

    tracing::info!("Database schema initialized");
    Ok(())
}
