//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub storage: StorageConfig,
    pub messages: MessageConfig,
    pub presence: PresenceConfig,
    pub cors: CorsConfig,
    /// `None` disables rate limiting
    pub rate_limit: Option<RateLimitConfig>,
    pub snowflake: SnowflakeConfig,
    pub request_timeout_secs: u64,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which persistence backend the repositories use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// Process-local stores for development and tests
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Message store and account store settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub message_database_url: Option<String>,
    pub account_database_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Table holding `username`, `is_online`, `last_seen`
    pub account_table: String,
    /// Accounts created up front by the memory backend
    pub seed_accounts: Vec<String>,
}

impl StorageConfig {
    /// Account store URL, falling back to the message store URL
    pub fn account_url(&self) -> Option<&str> {
        self.account_database_url
            .as_deref()
            .or(self.message_database_url.as_deref())
    }
}

/// Message retrieval limits
#[derive(Debug, Clone, Copy)]
pub struct MessageConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

/// Presence sweep settings
#[derive(Debug, Clone, Copy)]
pub struct PresenceConfig {
    pub inactive_minutes: u32,
    /// 0 disables the background sweeper
    pub sweep_interval_secs: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

// Default values
const DEFAULT_APP_NAME: &str = "parley";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ACCOUNT_TABLE: &str = "accounts";
const DEFAULT_MESSAGE_LIMIT: i64 = 100;
const DEFAULT_MAX_MESSAGE_LIMIT: i64 = 1000;
const DEFAULT_INACTIVE_MINUTES: u32 = 30;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
const DEFAULT_BURST: u32 = 50;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Variable lookup with trimming; blank values count as unset
struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
    {
        self.get(key)
            .map(|raw| {
                raw.parse()
                    .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
            })
            .transpose()
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
    {
        Ok(self.parse(key)?.unwrap_or(default))
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value fails to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let backend = vars.parse_or("STORAGE_BACKEND", StorageBackend::default())?;
        let message_database_url = vars
            .get("MESSAGE_DATABASE_URL")
            .or_else(|| vars.get("DATABASE_URL"));
        if backend == StorageBackend::Postgres && message_database_url.is_none() {
            return Err(ConfigError::MissingVar("MESSAGE_DATABASE_URL"));
        }

        let messages = MessageConfig {
            default_limit: vars.parse_or("MESSAGE_DEFAULT_LIMIT", DEFAULT_MESSAGE_LIMIT)?,
            max_limit: vars.parse_or("MESSAGE_MAX_LIMIT", DEFAULT_MAX_MESSAGE_LIMIT)?,
        };
        if messages.default_limit <= 0 || messages.max_limit < messages.default_limit {
            return Err(ConfigError::InvalidValue(
                "MESSAGE_DEFAULT_LIMIT",
                format!(
                    "default {} must be positive and not exceed max {}",
                    messages.default_limit, messages.max_limit
                ),
            ));
        }

        let rate_limit = match vars.parse::<u32>("RATE_LIMIT_REQUESTS_PER_SECOND")? {
            Some(0) | None => None,
            Some(requests_per_second) => Some(RateLimitConfig {
                requests_per_second,
                burst: vars.parse_or("RATE_LIMIT_BURST", DEFAULT_BURST)?,
            }),
        };

        Ok(Self {
            app: AppSettings {
                name: vars
                    .get("APP_NAME")
                    .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
                env: vars.parse_or("APP_ENV", Environment::default())?,
            },
            api: ServerConfig {
                host: vars
                    .get("API_HOST")
                    .unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: vars.parse_or("API_PORT", DEFAULT_PORT)?,
            },
            storage: StorageConfig {
                backend,
                message_database_url,
                account_database_url: vars.get("ACCOUNT_DATABASE_URL"),
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
                min_connections: vars.parse_or("DATABASE_MIN_CONNECTIONS", DEFAULT_MIN_CONNECTIONS)?,
                acquire_timeout_secs: vars
                    .parse_or("DATABASE_ACQUIRE_TIMEOUT_SECS", DEFAULT_ACQUIRE_TIMEOUT_SECS)?,
                account_table: vars
                    .get("ACCOUNT_TABLE")
                    .unwrap_or_else(|| DEFAULT_ACCOUNT_TABLE.to_string()),
                seed_accounts: vars.list("MEMORY_SEED_ACCOUNTS"),
            },
            messages,
            presence: PresenceConfig {
                inactive_minutes: vars.parse_or("PRESENCE_INACTIVE_MINUTES", DEFAULT_INACTIVE_MINUTES)?,
                sweep_interval_secs: vars
                    .parse_or("PRESENCE_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS)?,
            },
            cors: CorsConfig {
                allowed_origins: vars.list("CORS_ALLOWED_ORIGINS"),
            },
            rate_limit,
            snowflake: SnowflakeConfig {
                worker_id: vars.parse_or("WORKER_ID", 0)?,
            },
            request_timeout_secs: vars.parse_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
        })
    }

    /// Development configuration on the memory backend with the given accounts
    pub fn in_memory<I, S>(seed_accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            app: AppSettings {
                name: DEFAULT_APP_NAME.to_string(),
                env: Environment::Development,
            },
            api: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: DEFAULT_PORT,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                message_database_url: None,
                account_database_url: None,
                max_connections: DEFAULT_MAX_CONNECTIONS,
                min_connections: DEFAULT_MIN_CONNECTIONS,
                acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
                account_table: DEFAULT_ACCOUNT_TABLE.to_string(),
                seed_accounts: seed_accounts.into_iter().map(Into::into).collect(),
            },
            messages: MessageConfig {
                default_limit: DEFAULT_MESSAGE_LIMIT,
                max_limit: DEFAULT_MAX_MESSAGE_LIMIT,
            },
            presence: PresenceConfig {
                inactive_minutes: DEFAULT_INACTIVE_MINUTES,
                sweep_interval_secs: 0,
            },
            cors: CorsConfig::default(),
            rate_limit: None,
            snowflake: SnowflakeConfig::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
