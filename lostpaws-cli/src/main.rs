//! lostpaws CLI - community lost/found pet classifieds server
//!
//! Subcommands:
//! - `serve`: run the HTTP server (ensures the schema on startup)
//! - `init-db`: create or upgrade the database schema and exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "lostpaws",
    author,
    version,
    about = "Community classifieds board for lost and found pets"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Initialize or upgrade the database schema
    InitDb(commands::init_db::InitDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // DATABASE_URL and friends may live in a local .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    tracing_setup::init(cli.debug)?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
        Commands::InitDb(args) => commands::init_db::run_init_db(args).await,
    }
}
