//! Configuration management for Surplus.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Invalid values fall back to their defaults.

use std::env;
use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub query: QueryConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "./data/food_wastage.db".to_string(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(30),
        }
    }
}

/// Settings for operator-supplied ad-hoc statements.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub adhoc_mode: AdhocMode,
    pub max_rows: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            adhoc_mode: AdhocMode::Unrestricted,
            max_rows: 1000,
        }
    }
}

/// How ad-hoc statements are admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdhocMode {
    /// Executed verbatim, writes included.
    #[default]
    Unrestricted,
    /// Only read statements, run in a transaction that is always rolled back.
    ReadOnly,
    /// Rejected outright.
    Disabled,
}

impl AdhocMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unrestricted => "unrestricted",
            Self::ReadOnly => "read_only",
            Self::Disabled => "disabled",
        }
    }
}

impl std::str::FromStr for AdhocMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "unrestricted" => Ok(Self::Unrestricted),
            "read_only" | "readonly" => Ok(Self::ReadOnly),
            "disabled" | "off" => Ok(Self::Disabled),
            _ => Err(format!("Unknown ad-hoc query mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Bearer token required on operator routes. `None` leaves them open.
    pub operator_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_defaults = DatabaseConfig::default();
        let query_defaults = QueryConfig::default();

        Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: parse_or("PORT", 8501),
            },
            database: DatabaseConfig {
                path: env_or("DATABASE_PATH", &db_defaults.path),
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", db_defaults.max_connections)
                    .max(1),
                busy_timeout: Duration::from_secs(parse_or(
                    "DATABASE_BUSY_TIMEOUT_SECS",
                    db_defaults.busy_timeout.as_secs(),
                )),
            },
            query: QueryConfig {
                adhoc_mode: parse_or("ADHOC_QUERY_MODE", query_defaults.adhoc_mode),
                max_rows: parse_or("ADHOC_MAX_ROWS", query_defaults.max_rows),
            },
            auth: AuthConfig {
                operator_token: env::var("OPERATOR_TOKEN")
                    .ok()
                    .filter(|t| !t.trim().is_empty()),
            },
            logging: LoggingConfig {
                format: match env_or("LOG_FORMAT", "text").to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Text,
                },
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
