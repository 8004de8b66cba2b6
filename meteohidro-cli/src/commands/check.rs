//! One-shot database connectivity check
//!
//! Connects with the same settings `serve` would use, checks out one
//! connection and reports what the session sees.

use anyhow::{Context, Result};
use clap::Parser;
use meteohidro_server::db::{probe, InitMode, PoolManager};
use serde_json::json;

use super::db_args::DbArgs;

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

pub async fn run_check(args: CheckArgs) -> Result<()> {
    let config = args.db.to_config()?;
    let locator = config.redacted_locator();
    let expected_path = config.search_path.to_string();

    let pool = PoolManager::new(config);
    pool.initialize(InitMode::Eager)
        .await
        .with_context(|| format!("Database unreachable at {}", locator))?;

    let mut conn = pool
        .acquire()
        .await
        .context("Failed to check out a connection")?;
    let search_path = probe::current_search_path(&mut conn).await?;
    let version = probe::server_version(&mut conn).await?;
    pool.release(conn);

    let stats = pool.stats();
    pool.close().await;

    if args.json {
        let report = json!({
            "ok": true,
            "locator": locator,
            "server_version": version,
            "search_path": search_path,
            "pool": stats,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("database:     {} (PostgreSQL {})", locator, version);
        println!("search_path:  {}", search_path);
        println!(
            "pool:         {} live / {} max",
            stats.size, stats.max_connections
        );
    }

    if search_path != expected_path {
        tracing::warn!(
            expected = %expected_path,
            actual = %search_path,
            "search_path differs from configuration"
        );
    }

    Ok(())
}
