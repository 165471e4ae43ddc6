//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//! Variables may also come from a `.env` file loaded by `main.rs`.
//!
//! ## Server
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `PUBLIC_BASE_URL` - Base for generated short links, e.g. `https://sho.rt`
//!   (default: `http://` + request `Host` header)
//! - `BEHIND_PROXY` - Read client IPs from `X-Forwarded-For` / `X-Real-IP`
//!   (default: `false`)
//!
//! ## Logging
//!
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//!
//! ## Telemetry
//!
//! - `LOG_ENDPOINT` - Collector URL; entries go to the local log when unset
//! - `LOG_API_KEY` - Bearer token sent to the collector
//! - `LOG_TIMEOUT_MS` - Per-request timeout (default: 4000)
//! - `LOG_MAX_RETRIES` - Retries after the first attempt (default: 2, max: 10)
//! - `LOG_BACKOFF_MS` - Linear backoff step (default: 300)
//! - `TELEMETRY_QUEUE_CAPACITY` - Entry buffer size (default: 1000, min: 10)
//! - `TELEMETRY_CONCURRENCY` - Concurrent deliveries (default: 4, max: 256)

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub public_base_url: Option<String>,
    /// When true, client IPs are read from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
    pub log_level: String,
    pub log_format: String,
    pub telemetry: TelemetryConfig,
}

/// Settings for the background telemetry delivery.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub max_retries: usize,
    pub backoff_ms: u64,
    pub queue_capacity: usize,
    pub concurrency: usize,
}

impl TelemetryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_ms: 4000,
            max_retries: 2,
            backoff_ms: 300,
            queue_capacity: 1000,
            concurrency: 4,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let public_base_url = non_empty_var("PUBLIC_BASE_URL");
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let defaults = TelemetryConfig::default();
        let telemetry = TelemetryConfig {
            endpoint: non_empty_var("LOG_ENDPOINT"),
            api_key: non_empty_var("LOG_API_KEY"),
            timeout_ms: parse_var("LOG_TIMEOUT_MS", defaults.timeout_ms)?,
            max_retries: parse_var("LOG_MAX_RETRIES", defaults.max_retries)?,
            backoff_ms: parse_var("LOG_BACKOFF_MS", defaults.backoff_ms)?,
            queue_capacity: parse_var("TELEMETRY_QUEUE_CAPACITY", defaults.queue_capacity)?,
            concurrency: parse_var("TELEMETRY_CONCURRENCY", defaults.concurrency)?,
        };

        Ok(Self {
            listen_addr,
            public_base_url,
            behind_proxy,
            log_level,
            log_format,
            telemetry,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `listen_addr` is not a socket address
    /// - `log_format` is not `text` or `json`
    /// - `PUBLIC_BASE_URL` or `LOG_ENDPOINT` is not an http(s) URL
    /// - a telemetry setting is out of range
    pub fn validate(&self) -> Result<()> {
        self.listen_addr
            .parse::<SocketAddr>()
            .with_context(|| {
                format!(
                    "LISTEN must be in format 'host:port', got '{}'",
                    self.listen_addr
                )
            })?;

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if let Some(ref base) = self.public_base_url {
            validate_http_url("PUBLIC_BASE_URL", base)?;
        }

        if let Some(ref endpoint) = self.telemetry.endpoint {
            validate_http_url("LOG_ENDPOINT", endpoint)?;
        }

        if self.telemetry.timeout_ms == 0 {
            anyhow::bail!("LOG_TIMEOUT_MS must be greater than 0");
        }

        if self.telemetry.max_retries > 10 {
            anyhow::bail!(
                "LOG_MAX_RETRIES is too large (max: 10), got {}",
                self.telemetry.max_retries
            );
        }

        if !(10..=1_000_000).contains(&self.telemetry.queue_capacity) {
            anyhow::bail!(
                "TELEMETRY_QUEUE_CAPACITY must be between 10 and 1000000, got {}",
                self.telemetry.queue_capacity
            );
        }

        if self.telemetry.concurrency == 0 || self.telemetry.concurrency > 256 {
            anyhow::bail!(
                "TELEMETRY_CONCURRENCY must be between 1 and 256, got {}",
                self.telemetry.concurrency
            );
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!(
            "  Public base URL: {}",
            self.public_base_url.as_deref().unwrap_or("(from Host header)")
        );
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);

        match self.telemetry.endpoint {
            Some(ref endpoint) => tracing::info!(
                "  Telemetry: {} (api key: {})",
                endpoint,
                self.telemetry
                    .api_key
                    .as_deref()
                    .map(mask_secret)
                    .unwrap_or_else(|| "none".to_string())
            ),
            None => tracing::info!("  Telemetry: local log"),
        }

        tracing::info!(
            "  Telemetry queue capacity: {}, concurrency: {}, retries: {}",
            self.telemetry.queue_capacity,
            self.telemetry.concurrency,
            self.telemetry.max_retries
        );
    }
}

/// Masks a secret for logging, keeping at most the first four characters.
///
/// - `sk_live_abcdef` → `sk_l***`
/// - `abc` → `***`
fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        return "***".to_string();
    }

    let prefix: String = secret.chars().take(4).collect();
    format!("{}***", prefix)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

fn validate_http_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).with_context(|| format!("{} is not a valid URL: '{}'", name, value))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!(
            "{} must start with 'http://' or 'https://', got '{}'",
            name,
            value
        );
    }

    Ok(())
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "LISTEN",
        "PUBLIC_BASE_URL",
        "BEHIND_PROXY",
        "LOG_FORMAT",
        "LOG_ENDPOINT",
        "LOG_API_KEY",
        "LOG_TIMEOUT_MS",
        "LOG_MAX_RETRIES",
        "LOG_BACKOFF_MS",
        "TELEMETRY_QUEUE_CAPACITY",
        "TELEMETRY_CONCURRENCY",
    ];

    fn clear_env() {
        // SAFETY: Tests touching the environment are run serially
        unsafe {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }

    fn valid_config() -> Config {
        Config {
            listen_addr: "0.0.0.0:3000".to_string(),
            public_base_url: None,
            behind_proxy: false,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            telemetry: TelemetryConfig::default(),
        }
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk_live_abcdef"), "sk_l***");
        assert_eq!(mask_secret("abcd"), "***");
        assert_eq!(mask_secret(""), "***");
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "127.0.0.1:8080".to_string();

        config.public_base_url = Some("ftp://sho.rt".to_string());
        assert!(config.validate().is_err());
        config.public_base_url = Some("https://sho.rt".to_string());
        assert!(config.validate().is_ok());

        config.telemetry.endpoint = Some("not a url".to_string());
        assert!(config.validate().is_err());
        config.telemetry.endpoint = Some("http://collector.local/logs".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_telemetry_bounds() {
        let mut config = valid_config();

        config.telemetry.queue_capacity = 5;
        assert!(config.validate().is_err());
        config.telemetry.queue_capacity = 1000;

        config.telemetry.concurrency = 0;
        assert!(config.validate().is_err());
        config.telemetry.concurrency = 257;
        assert!(config.validate().is_err());
        config.telemetry.concurrency = 4;

        config.telemetry.max_retries = 11;
        assert!(config.validate().is_err());
        config.telemetry.max_retries = 2;

        config.telemetry.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_defaults_from_empty_env() {
        clear_env();

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert!(config.public_base_url.is_none());
        assert!(!config.behind_proxy);
        assert_eq!(config.log_format, "text");
        assert!(config.telemetry.endpoint.is_none());
        assert_eq!(config.telemetry.timeout(), Duration::from_millis(4000));
        assert_eq!(config.telemetry.max_retries, 2);
        assert_eq!(config.telemetry.backoff(), Duration::from_millis(300));
        assert_eq!(config.telemetry.queue_capacity, 1000);
        assert_eq!(config.telemetry.concurrency, 4);
    }

    #[test]
    #[serial]
    fn test_load_from_env_overrides() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("LISTEN", "127.0.0.1:8080");
            env::set_var("PUBLIC_BASE_URL", "https://sho.rt");
            env::set_var("BEHIND_PROXY", "TRUE");
            env::set_var("LOG_ENDPOINT", "http://collector.local/logs");
            env::set_var("LOG_API_KEY", "secret-key");
            env::set_var("LOG_MAX_RETRIES", "5");
            env::set_var("TELEMETRY_CONCURRENCY", "8");
        }

        let config = load_from_env().unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.public_base_url.as_deref(), Some("https://sho.rt"));
        assert!(config.behind_proxy);
        assert_eq!(
            config.telemetry.endpoint.as_deref(),
            Some("http://collector.local/logs")
        );
        assert_eq!(config.telemetry.api_key.as_deref(), Some("secret-key"));
        assert_eq!(config.telemetry.max_retries, 5);
        assert_eq!(config.telemetry.concurrency, 8);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_malformed_number_is_rejected() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("LOG_TIMEOUT_MS", "soon");
        }

        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_optional_values_are_unset() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("LOG_ENDPOINT", "  ");
            env::set_var("LOG_API_KEY", "");
        }

        let config = Config::from_env().unwrap();
        assert!(config.telemetry.endpoint.is_none());
        assert!(config.telemetry.api_key.is_none());

        clear_env();
    }
}
