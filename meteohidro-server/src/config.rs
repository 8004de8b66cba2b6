//! Database configuration loaded from the environment
//!
//! The locator comes from `DATABASE_URL`, or is assembled from the
//! `POSTGRES_*` parts shared with the rest of the deployment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// Schemas consulted when `DB_SEARCH_PATH` is not set.
pub const DEFAULT_SEARCH_PATH: &str = "meteo,auth,public";

/// Default minimum pool size. Connections are opened on demand.
pub const DEFAULT_MIN_CONNECTIONS: u32 = 0;

/// Default maximum pool size.
/// Kept low: every request holds a connection for a single statement.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default bound on how long `acquire` waits for a free connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_PG_HOST: &str = "db";
const DEFAULT_PG_PORT: u16 = 5432;

/// Unquoted PostgreSQL identifier, or the special `$user` entry.
static SCHEMA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\$user|[a-z_][a-z0-9_$]{0,62})$").expect("invalid schema regex")
});

/// Configuration errors. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set (and POSTGRES_DB is not set either)")]
    MissingLocator,

    #[error("malformed database locator: {reason}")]
    MalformedLocator { reason: String },

    #[error("search path is empty")]
    EmptySearchPath,

    #[error("invalid schema name '{name}' in search path")]
    InvalidSchema { name: String },

    #[error("{key} must be a valid {expected}, got '{value}'")]
    InvalidNumber {
        key: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{key} must be true or false, got '{value}'")]
    InvalidFlag { key: &'static str, value: String },

    #[error("pool bounds are inverted: min {min} > max {max}")]
    InvertedBounds { min: u32, max: u32 },

    #[error("maximum pool size must be at least 1")]
    ZeroCapacity,

    #[error("acquire timeout must be greater than zero")]
    ZeroAcquireTimeout,
}

/// Ordered list of schemas applied with `SET search_path` on every checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath(Vec<String>);

impl SearchPath {
    pub fn new<I, S>(schemas: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let schemas: Vec<String> = schemas
            .into_iter()
            .map(|s| s.as_ref().trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();

        if schemas.is_empty() {
            return Err(ConfigError::EmptySearchPath);
        }

        if let Some(bad) = schemas.iter().find(|s| !SCHEMA_RE.is_match(s)) {
            return Err(ConfigError::InvalidSchema { name: bad.clone() });
        }

        Ok(Self(schemas))
    }

    pub fn schemas(&self) -> &[String] {
        &self.0
    }

    /// The statement that applies this path to a session.
    pub fn set_statement(&self) -> String {
        format!("SET search_path TO {}", self)
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self(DEFAULT_SEARCH_PATH.split(',').map(str::to_owned).collect())
    }
}

impl FromStr for SearchPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(','))
    }
}

/// Renders the path the way `current_setting('search_path')` reports it.
impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, schema) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if schema == "$user" {
                write!(f, "\"{}\"", schema)?;
            } else {
                f.write_str(schema)?;
            }
        }
        Ok(())
    }
}

/// Everything the pool manager needs to build its backing pool.
#[derive(Clone)]
pub struct DbConfig {
    pub connect_options: PgConnectOptions,
    pub search_path: SearchPath,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Ping each idle connection before handing it out, dropping dead ones.
    pub validate_on_checkout: bool,
}

impl DbConfig {
    /// Config with default pool settings for an explicit locator.
    pub fn new(locator: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            connect_options: parse_locator(locator)?,
            search_path: SearchPath::default(),
            min_connections: DEFAULT_MIN_CONNECTIONS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            validate_on_checkout: true,
        })
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (environment, CLI overrides, tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let connect_options = match get("DATABASE_URL") {
            Some(url) => parse_locator(&url)?,
            None => locator_from_parts(&get)?,
        };

        let search_path = match get("DB_SEARCH_PATH") {
            Some(raw) => raw.parse()?,
            None => SearchPath::default(),
        };

        let min_connections = parse_or("DB_POOL_MIN", get("DB_POOL_MIN"), DEFAULT_MIN_CONNECTIONS)?;
        let max_connections = parse_or("DB_POOL_MAX", get("DB_POOL_MAX"), DEFAULT_MAX_CONNECTIONS)?;
        let acquire_timeout = match get("DB_ACQUIRE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_or("DB_ACQUIRE_TIMEOUT_SECS", Some(raw), 0u64)?),
            None => DEFAULT_ACQUIRE_TIMEOUT,
        };
        let validate_on_checkout = match get("DB_VALIDATE_ON_CHECKOUT") {
            Some(raw) => parse_flag("DB_VALIDATE_ON_CHECKOUT", &raw)?,
            None => true,
        };

        let config = Self {
            connect_options,
            search_path,
            min_connections,
            max_connections,
            acquire_timeout,
            validate_on_checkout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the pool bounds and acquire timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.acquire_timeout.is_zero() {
            return Err(ConfigError::ZeroAcquireTimeout);
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::InvertedBounds {
                min: self.min_connections,
                max: self.max_connections,
            });
        }
        Ok(())
    }

    /// `host:port/database` without credentials, for logs.
    pub fn redacted_locator(&self) -> String {
        let opts = &self.connect_options;
        format!(
            "{}:{}/{}",
            opts.get_host(),
            opts.get_port(),
            opts.get_database().unwrap_or("")
        )
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("locator", &self.redacted_locator())
            .field("search_path", &self.search_path.to_string())
            .field("min_connections", &self.min_connections)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("validate_on_checkout", &self.validate_on_checkout)
            .finish()
    }
}

/// Parse a `postgres://` / `postgresql://` URL.
///
/// A driver suffix such as `postgresql+psycopg://` is accepted so the
/// same `.env` file can be shared with other services.
pub fn parse_locator(raw: &str) -> Result<PgConnectOptions, ConfigError> {
    let raw = raw.trim();
    let (scheme, rest) = raw.split_once("://").ok_or_else(|| ConfigError::MalformedLocator {
        reason: "expected a postgres:// URL".into(),
    })?;

    let base_scheme = scheme.split('+').next().unwrap_or(scheme);
    if base_scheme != "postgres" && base_scheme != "postgresql" {
        return Err(ConfigError::MalformedLocator {
            reason: format!("unsupported scheme '{}'", scheme),
        });
    }

    let url = format!("postgres://{}", rest);
    PgConnectOptions::from_str(&url).map_err(|e| ConfigError::MalformedLocator {
        reason: e.to_string(),
    })
}

fn locator_from_parts<F>(get: &F) -> Result<PgConnectOptions, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let database = get("POSTGRES_DB").ok_or(ConfigError::MissingLocator)?;
    let host = get("POSTGRES_HOST").unwrap_or_else(|| DEFAULT_PG_HOST.to_string());
    let port = parse_or("POSTGRES_PORT", get("POSTGRES_PORT"), DEFAULT_PG_PORT)?;

    let mut options = PgConnectOptions::new_without_pgpass()
        .host(&host)
        .port(port)
        .database(&database);

    if let Some(user) = get("POSTGRES_USER") {
        options = options.username(&user);
    }
    if let Some(password) = get("POSTGRES_PASSWORD") {
        options = options.password(&password);
    }

    Ok(options)
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
            key,
            expected: std::any::type_name::<T>(),
            value,
        }),
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_search_path() {
        let path = SearchPath::default();
        assert_eq!(path.schemas(), ["meteo", "auth", "public"]);
        assert_eq!(path.to_string(), "meteo, auth, public");
        assert_eq!(path.set_statement(), "SET search_path TO meteo, auth, public");
    }

    #[test]
    fn search_path_trims_and_skips_blanks() {
        let path: SearchPath = " hidro , ,public ".parse().unwrap();
        assert_eq!(path.schemas(), ["hidro", "public"]);
    }

    #[test]
    fn search_path_quotes_user_entry() {
        let path: SearchPath = "$user,public".parse().unwrap();
        assert_eq!(path.to_string(), "\"$user\", public");
    }

    #[test]
    fn search_path_rejects_injection() {
        let err = "meteo; DROP TABLE mesures".parse::<SearchPath>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSchema { .. }));

        let err = "Meteo".parse::<SearchPath>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSchema { .. }));
    }

    #[test]
    fn search_path_rejects_empty() {
        assert!(matches!(
            " , ".parse::<SearchPath>(),
            Err(ConfigError::EmptySearchPath)
        ));
    }

    #[test]
    fn missing_locator_is_an_error() {
        let err = DbConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingLocator));
    }

    #[test]
    fn malformed_locators_are_rejected() {
        for url in ["not a url", "mysql://localhost/x", "postgres://host:notaport/db"] {
            let err = DbConfig::from_lookup(lookup(&[("DATABASE_URL", url)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::MalformedLocator { .. }),
                "{url} gave {err:?}"
            );
        }
    }

    #[test]
    fn loads_defaults_from_url() {
        let config =
            DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://u:p@localhost:5433/meteo")]))
                .unwrap();

        assert_eq!(config.redacted_locator(), "localhost:5433/meteo");
        assert_eq!(config.search_path, SearchPath::default());
        assert_eq!(config.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.acquire_timeout, DEFAULT_ACQUIRE_TIMEOUT);
        assert!(config.validate_on_checkout);
    }

    #[test]
    fn accepts_driver_suffixed_scheme() {
        let config = DbConfig::new("postgresql+psycopg://u:p@db:5432/meteo").unwrap();
        assert_eq!(config.redacted_locator(), "db:5432/meteo");
    }

    #[test]
    fn assembles_locator_from_parts() {
        let config = DbConfig::from_lookup(lookup(&[
            ("POSTGRES_DB", "meteo"),
            ("POSTGRES_USER", "reader"),
            ("POSTGRES_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.redacted_locator(), "db:5432/meteo");
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn reads_pool_settings() {
        let config = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/meteo"),
            ("DB_SEARCH_PATH", "hidro,public"),
            ("DB_POOL_MIN", "1"),
            ("DB_POOL_MAX", "8"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "2"),
            ("DB_VALIDATE_ON_CHECKOUT", "off"),
        ]))
        .unwrap();

        assert_eq!(config.search_path.schemas(), ["hidro", "public"]);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.acquire_timeout, Duration::from_secs(2));
        assert!(!config.validate_on_checkout);
    }

    #[test]
    fn rejects_bad_pool_bounds() {
        let err = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/meteo"),
            ("DB_POOL_MIN", "6"),
            ("DB_POOL_MAX", "2"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedBounds { min: 6, max: 2 }));

        let err = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/meteo"),
            ("DB_POOL_MAX", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroCapacity));

        let err = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/meteo"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroAcquireTimeout));

        let err = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/meteo"),
            ("DB_POOL_MAX", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: "DB_POOL_MAX", .. }));
    }
}
