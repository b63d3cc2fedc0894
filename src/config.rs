use crate::error::Result;
use crate::logging::Logger;
use crate::validation::{Validate, Violations};
use config::{Config, Environment, File};
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Optional TOML layer read on top of the environment defaults
pub const DEFAULT_CONFIG_FILE: &str = "flowrun.toml";

const DATABASE_URL: &str = "database_url";
const DB_MAX_OPEN_CONNS: &str = "db_max_open_conns";
const DB_MAX_IDLE_CONNS: &str = "db_max_idle_conns";
const DB_CONN_MAX_LIFETIME: &str = "db_conn_max_lifetime";
const SERVER_PORT: &str = "server_port";
const SERVER_HOST: &str = "server_host";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRunConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection URL of the relational store
    pub url: String,

    /// Upper bound on open pool connections
    pub max_open_conns: u32,

    /// Connections kept warm in the pool
    pub max_idle_conns: u32,

    /// Lifetime after which a pooled connection is recycled
    pub conn_max_lifetime: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// IP address to bind to
    pub host: IpAddr,

    /// Port to listen on
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self, v: &mut Violations) {
        if v.required("url", &self.url) {
            v.url("url", &self.url);
        }
        v.range("max_open_conns", &self.max_open_conns, &1, &1000);
        v.range("max_idle_conns", &self.max_idle_conns, &1, &100);
        v.range(
            "conn_max_lifetime",
            &self.conn_max_lifetime,
            &Duration::from_secs(60),
            &Duration::from_secs(3600),
        );
    }
}

impl Validate for ServerConfig {
    fn validate(&self, v: &mut Violations) {
        if self.port == 0 {
            v.push("port", "must be between 1 and 65535");
        }
    }
}

impl Validate for FlowRunConfig {
    fn validate(&self, v: &mut Violations) {
        v.nested("database", &self.database);
        v.nested("server", &self.server);
    }
}

impl FlowRunConfig {
    /// Load configuration from `.env`, the default config file and the process environment
    pub fn load(logger: &Logger) -> Result<Self> {
        Self::load_from_file(DEFAULT_CONFIG_FILE, logger)
    }

    /// Load configuration with a specific optional TOML file.
    ///
    /// Precedence, lowest first: built-in defaults, the file, `.env`, the process environment.
    pub fn load_from_file<P: AsRef<Path>>(path: P, logger: &Logger) -> Result<Self> {
        let log = logger.span();
        let path_str = path.as_ref().to_string_lossy();
        debug!(parent: log, "Loading configuration from: {}", path_str);

        match dotenvy::dotenv() {
            Ok(env_path) => debug!(parent: log, "Loaded environment from {}", env_path.display()),
            Err(e) if e.not_found() => debug!(parent: log, "No .env file found"),
            Err(e) => warn!(parent: log, "Ignoring unreadable .env file: {}", e),
        }

        let settings = Config::builder()
            .add_source(File::with_name(&path_str).required(false))
            .add_source(Environment::default())
            .build()?;

        Self::from_settings(&settings, logger)
    }

    /// Resolve and validate configuration from already-layered settings
    pub fn from_settings(settings: &Config, logger: &Logger) -> Result<Self> {
        let mut violations = Violations::new();

        let url = lookup(settings, DATABASE_URL).unwrap_or_default();
        let max_open_conns = pool_size(
            settings,
            PoolSize {
                key: DB_MAX_OPEN_CONNS,
                field: "database.max_open_conns",
                max: 1000,
                default: default_max_open_conns(),
            },
            &mut violations,
            logger,
        );
        let max_idle_conns = pool_size(
            settings,
            PoolSize {
                key: DB_MAX_IDLE_CONNS,
                field: "database.max_idle_conns",
                max: 100,
                default: default_max_idle_conns(),
            },
            &mut violations,
            logger,
        );

        let conn_max_lifetime = match lookup(settings, DB_CONN_MAX_LIFETIME) {
            Some(raw) => match humantime::parse_duration(&raw) {
                Ok(duration) => duration,
                Err(e) => {
                    violations.push(
                        "database.conn_max_lifetime",
                        format!("must be a duration such as 5m ({}: {})", raw, e),
                    );
                    default_conn_max_lifetime()
                }
            },
            None => defaulted(
                logger,
                DB_CONN_MAX_LIFETIME,
                default_conn_max_lifetime(),
                humantime::format_duration(default_conn_max_lifetime()),
            ),
        };

        let port = match lookup(settings, SERVER_PORT) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    violations.push(
                        "server.port",
                        format!("must be numeric between 1 and 65535 (got {})", raw),
                    );
                    default_server_port()
                }
            },
            None => defaulted(logger, SERVER_PORT, default_server_port(), default_server_port()),
        };

        let host = match lookup(settings, SERVER_HOST) {
            Some(raw) => match IpAddr::from_str(&raw) {
                Ok(host) => host,
                Err(_) => {
                    violations.push(
                        "server.host",
                        format!("must be an IP address (got {})", raw),
                    );
                    default_server_host()
                }
            },
            None => defaulted(logger, SERVER_HOST, default_server_host(), default_server_host()),
        };

        let config = FlowRunConfig {
            database: DatabaseConfig {
                url,
                max_open_conns,
                max_idle_conns,
                conn_max_lifetime,
            },
            server: ServerConfig { host, port },
        };

        // Parse failures first, then range checks on what did parse
        config.validate(&mut violations);
        violations.into_result()?;

        info!(parent: logger.span(), "Configuration loaded successfully");
        debug!(parent: logger.span(), "Final configuration: {:?}", config.redacted());

        Ok(config)
    }

    /// Copy with credentials stripped from the database URL, for logging
    pub fn redacted(&self) -> FlowRunConfig {
        let mut copy = self.clone();
        if let Ok(mut url) = url::Url::parse(&copy.database.url) {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            copy.database.url = url.to_string();
        }
        copy
    }
}

/// Non-empty value for `key`, treating an empty string as unset
fn lookup(settings: &Config, key: &str) -> Option<String> {
    settings
        .get_string(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn defaulted<T, D: Display>(logger: &Logger, key: &str, value: T, shown: D) -> T {
    warn!(parent: logger.span(), "{} not set, using default: {}", key.to_uppercase(), shown);
    value
}

struct PoolSize {
    key: &'static str,
    field: &'static str,
    max: u32,
    default: u32,
}

/// Pool size setting. Unset or non-numeric values fall back to the default;
/// numbers that cannot be a pool size are recorded against `size.field`.
fn pool_size(
    settings: &Config,
    size: PoolSize,
    violations: &mut Violations,
    logger: &Logger,
) -> u32 {
    let Some(raw) = lookup(settings, size.key) else {
        return defaulted(logger, size.key, size.default, size.default);
    };

    match raw.parse::<i64>() {
        Ok(value) => match u32::try_from(value) {
            Ok(value) => value,
            Err(_) => {
                violations.push(
                    size.field,
                    format!("must be between 1 and {} (got {})", size.max, value),
                );
                size.default
            }
        },
        Err(_) => {
            warn!(
                parent: logger.span(),
                "Invalid integer value for {}: {}, using default: {}",
                size.key.to_uppercase(),
                raw,
                size.default
            );
            size.default
        }
    }
}

// Default value functions
fn default_max_open_conns() -> u32 {
    25
}
fn default_max_idle_conns() -> u32 {
    10
}
fn default_conn_max_lifetime() -> Duration {
    Duration::from_secs(5 * 60)
}
fn default_server_port() -> u16 {
    8080
}
fn default_server_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}
