//! Database flags shared by `serve` and `check`
//!
//! Each flag falls back to its environment variable (also read from
//! `.env`); anything not given either way uses the library defaults.

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Args;
use meteohidro_server::DbConfig;

#[derive(Args, Debug, Clone, Default)]
pub struct DbArgs {
    /// Database URL (when unset, assembled from POSTGRES_HOST/PORT/USER/PASSWORD/DB)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Comma-separated schema search path applied on every checkout
    #[arg(long, env = "DB_SEARCH_PATH")]
    pub search_path: Option<String>,

    /// Minimum number of pooled connections
    #[arg(long, env = "DB_POOL_MIN")]
    pub pool_min: Option<u32>,

    /// Maximum number of pooled connections
    #[arg(long, env = "DB_POOL_MAX")]
    pub pool_max: Option<u32>,

    /// Seconds to wait for a free connection before failing
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS")]
    pub acquire_timeout: Option<u64>,

    /// Do not ping idle connections before handing them out
    #[arg(long)]
    pub no_validate: bool,
}

impl DbArgs {
    /// Resolve flags over the process environment.
    pub fn to_config(&self) -> Result<DbConfig> {
        self.to_config_with(|key| std::env::var(key).ok())
    }

    /// Resolve flags over `env`; a flag always beats the same variable.
    pub fn to_config_with<F>(&self, env: F) -> Result<DbConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides: HashMap<&'static str, String> = HashMap::new();
        if let Some(url) = &self.database_url {
            overrides.insert("DATABASE_URL", url.clone());
        }
        if let Some(path) = &self.search_path {
            overrides.insert("DB_SEARCH_PATH", path.clone());
        }
        if let Some(min) = self.pool_min {
            overrides.insert("DB_POOL_MIN", min.to_string());
        }
        if let Some(max) = self.pool_max {
            overrides.insert("DB_POOL_MAX", max.to_string());
        }
        if let Some(secs) = self.acquire_timeout {
            overrides.insert("DB_ACQUIRE_TIMEOUT_SECS", secs.to_string());
        }
        if self.no_validate {
            overrides.insert("DB_VALIDATE_ON_CHECKOUT", "false".to_string());
        }

        DbConfig::from_lookup(|key| overrides.get(key).cloned().or_else(|| env(key)))
            .context("Invalid database configuration")
    }
}
