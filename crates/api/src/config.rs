use serde::Deserialize;
use std::net::SocketAddr;

use chrono_tz::Tz;
use domain::services::QueryFailurePolicy;
use shared::money::PriceFormat;

pub use persistence::db::DatabaseConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub spend_limit: SpendLimitConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Spend cap enforcement settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SpendLimitConfig {
    /// IANA zone used for calendar-day window arithmetic.
    #[serde(default = "default_store_timezone")]
    pub store_timezone: String,

    /// Checkout behaviour when the cap cannot be evaluated.
    #[serde(default)]
    pub on_query_failure: QueryFailurePolicy,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
}

impl Default for SpendLimitConfig {
    fn default() -> Self {
        Self {
            store_timezone: default_store_timezone(),
            on_query_failure: QueryFailurePolicy::default(),
            currency_symbol: default_currency_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

impl SpendLimitConfig {
    /// Parsed store time zone.
    pub fn timezone(&self) -> Result<Tz, ConfigValidationError> {
        self.store_timezone.parse::<Tz>().map_err(|_| {
            ConfigValidationError::InvalidValue(format!(
                "Unknown spend_limit.store_timezone: {}",
                self.store_timezone
            ))
        })
    }

    pub fn price_format(&self) -> PriceFormat {
        PriceFormat {
            currency_symbol: self.currency_symbol.clone(),
            decimal_places: self.decimal_places,
            thousands_separator: self.thousands_separator.clone(),
            decimal_separator: self.decimal_separator.clone(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_store_timezone() -> String {
    "UTC".to_string()
}
fn default_currency_symbol() -> String {
    "$".to_string()
}
fn default_decimal_places() -> u32 {
    2
}
fn default_thousands_separator() -> String {
    ",".to_string()
}
fn default_decimal_separator() -> String {
    ".".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with SC__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("SC")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds from embedded defaults so tests never depend on config files.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 2
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [spend_limit]
            store_timezone = "UTC"
            on_query_failure = "fail_open"
            currency_symbol = "$"
            decimal_places = 2
            thousands_separator = ","
            decimal_separator = "."
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        // Skip validation to allow partial configs
        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "SC__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        self.spend_limit.timezone()?;

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigValidationError::InvalidValue(format!(
                    "Invalid listen address {}:{}",
                    self.server.host, self.server.port
                ))
            })
    }
}
