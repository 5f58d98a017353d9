//! Configuration management for the Gitcoin MCP server and import jobs.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is picked up through `dotenvy`, which does not write to stdout
//! (stdout belongs to the MCP transport).

use crate::domain::Network;
use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Conviction-voting subgraph used while running in debug mode.
pub const DEBUG_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/danielesalatti/gtc-conviction-voting-rinkeby";

/// Configuration shared by the server and the import binaries.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gas data provider base URL (required by the server only)
    pub gas_api_url: Option<String>,

    /// Optional API key sent to the gas data provider
    pub gas_api_key: Option<String>,

    /// GraphQL endpoint for the conviction-voting import
    pub subgraph_url: Option<String>,

    /// SQLite database file
    pub database_path: String,

    /// Development mode: bypasses cache hits, selects test networks
    pub debug: bool,

    /// Expiry for cached gas history, in minutes (default: 180)
    pub history_cache_ttl_minutes: u64,

    /// Confirmation-time target used for gas recommendations (default: 4)
    pub confirm_time_minutes_target: u32,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `GAS_API_BASE_URL`: Base URL for the gas data provider
    /// - `GAS_API_KEY`: API key for the gas data provider
    /// - `SUBGRAPH_URL`: GraphQL endpoint for the grant import
    /// - `DATABASE_PATH`: SQLite file (default: "gitcoin.db")
    /// - `DEBUG`: Development mode (default: false)
    /// - `HISTORY_CACHE_TTL_MINUTES`: Gas history cache expiry (default: 180)
    /// - `CONFIRM_TIME_MINUTES_TARGET`: Gas recommendation target (default: 4)
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let gas_api_url = Self::optional_var("GAS_API_BASE_URL");
        if let Some(url) = &gas_api_url {
            Self::validate_url("GAS_API_BASE_URL", url)?;
        }

        let subgraph_url = Self::optional_var("SUBGRAPH_URL");
        if let Some(url) = &subgraph_url {
            Self::validate_url("SUBGRAPH_URL", url)?;
        }

        let gas_api_key = Self::optional_var("GAS_API_KEY");
        let database_path =
            Self::optional_var("DATABASE_PATH").unwrap_or_else(|| "gitcoin.db".to_string());
        let debug = Self::parse_env_bool("DEBUG", false)?;
        let history_cache_ttl_minutes = Self::parse_env_u64("HISTORY_CACHE_TTL_MINUTES", 180)?;
        let confirm_time_minutes_target = Self::parse_env_u32("CONFIRM_TIME_MINUTES_TARGET", 4)?;
        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;

        if confirm_time_minutes_target == 0 {
            return Err(ConfigError::InvalidValue {
                var: "CONFIRM_TIME_MINUTES_TARGET".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            gas_api_url,
            gas_api_key,
            subgraph_url,
            database_path,
            debug,
            history_cache_ttl_minutes,
            confirm_time_minutes_target,
            request_timeout,
            log_level,
        })
    }

    /// The gas provider URL, which the server cannot run without.
    pub fn gas_api_url(&self) -> ConfigResult<&str> {
        self.gas_api_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("GAS_API_BASE_URL".to_string()))
    }

    /// The subgraph endpoint for the grant import.
    ///
    /// Debug mode falls back to the public rinkeby subgraph; production
    /// requires `SUBGRAPH_URL`.
    pub fn subgraph_endpoint(&self) -> ConfigResult<&str> {
        match (&self.subgraph_url, self.debug) {
            (Some(url), _) => Ok(url),
            (None, true) => Ok(DEBUG_SUBGRAPH_URL),
            (None, false) => Err(ConfigError::MissingVar("SUBGRAPH_URL".to_string())),
        }
    }

    /// Network whose tips count toward comment totals.
    pub fn network(&self) -> Network {
        Network::for_debug(self.debug)
    }

    /// Gas history cache expiry in seconds.
    pub fn history_cache_ttl_secs(&self) -> u64 {
        self.history_cache_ttl_minutes * 60
    }

    fn optional_var(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn validate_url(var_name: &str, url: &str) -> ConfigResult<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }
        Ok(())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as u32 with a default value.
    fn parse_env_u32(var_name: &str, default: u32) -> ConfigResult<u32> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u32>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as a boolean flag with a default value.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match env::var(var_name) {
            Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" | "" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be a boolean, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gas_api_url: None,
            gas_api_key: None,
            subgraph_url: None,
            database_path: "gitcoin.db".to_string(),
            debug: false,
            history_cache_ttl_minutes: 180,
            confirm_time_minutes_target: 4,
            request_timeout: 10,
            log_level: "error".to_string(),
        }
    }
}
