//! HTTP server command
//!
//! Builds the connection pool before binding, so a missing or
//! unreachable database stops startup instead of failing requests.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use meteohidro_server::db::{InitMode, PoolManager};
use meteohidro_server::http::{run_server, ServerConfig};

use super::db_args::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = args.db.to_config()?;

    tracing::info!(
        locator = %db_config.redacted_locator(),
        "Starting meteohidro server on {}",
        args.bind
    );

    let pool = PoolManager::new(db_config);
    pool.initialize(InitMode::Eager)
        .await
        .context("Failed to create database pool")?;

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
