//! HTTP clients for the external data providers.
//!
//! `GasApiClient` is a synchronous client for the gas data API (history,
//! confirmation-time spread, recommended price, advisories, FX conversion).
//! It is used from async contexts through [`AsyncGasClientImpl`], which runs
//! each call on `tokio::task::spawn_blocking`. `SubgraphClient` posts GraphQL
//! queries for the import jobs.

mod async_wrapper;
pub mod subgraph;

pub use async_wrapper::{AsyncGasClientImpl, ConversionProvider, GasDataProvider};
pub use subgraph::SubgraphClient;

use crate::config::Config;
use crate::domain::Breakdown;
use crate::error::{ConfigResult, ProviderError, ProviderResult};
use crate::metrics::{HttpTimer, Metrics};
use crate::models::{ConfTimePoint, GasAdvisory, GasHistoryPoint};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Header carrying the optional provider API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Response wrapper for `/gas/history`.
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<GasHistoryPoint>,
}

/// Response wrapper for `/gas/conf_time_spread`.
#[derive(Debug, Deserialize)]
pub struct SpreadResponse {
    pub spread: Vec<ConfTimePoint>,
}

/// Response wrapper for `/gas/recommended`.
#[derive(Debug, Deserialize)]
pub struct RecommendedResponse {
    pub gas_price: f64,
}

/// Response wrapper for `/gas/advisories`.
#[derive(Debug, Deserialize)]
pub struct AdvisoriesResponse {
    #[serde(default)]
    pub advisories: Vec<GasAdvisory>,
}

/// Response wrapper for `/conversion`.
#[derive(Debug, Deserialize)]
pub struct ConversionResponse {
    pub amount: f64,
}

/// HTTP client for the gas data API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct GasApiClient {
    /// Base URL for the gas API
    base_url: String,

    /// Optional API key
    api_key: Option<String>,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl GasApiClient {
    /// Create a new GasApiClient from configuration.
    pub fn new(config: &Config) -> ConfigResult<Self> {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Ok(Self {
            base_url: config.gas_api_url()?.to_string(),
            api_key: config.gas_api_key.clone(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        })
    }

    /// Create a GasApiClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            api_key,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Share a metrics collector with the rest of the process.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute a GET request and decode the JSON body.
    fn get_json<T: DeserializeOwned>(&self, path: &str) -> ProviderResult<T> {
        let timer = HttpTimer::new(self.metrics.clone());
        let url = self.build_url(path);

        tracing::debug!("GET {}", url);

        let mut request = self.agent.get(&url).set("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.set(API_KEY_HEADER, key);
        }

        let response = match request.call() {
            Ok(response) => {
                timer.complete();
                response
            }
            Err(e) => {
                timer.complete_with_error();
                let err = map_error(e);
                tracing::error!("GET {} - Error: {:?}", url, err);
                return Err(err);
            }
        };

        let body = response
            .into_string()
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        serde_json::from_str(&body).map_err(ProviderError::JsonError)
    }

    /// Gas price history for one line of the history chart.
    ///
    /// # Arguments
    /// * `breakdown` - Bucket size of the samples
    /// * `mins` - Confirmation-time line the samples belong to
    pub fn gas_history(&self, breakdown: Breakdown, mins: u32) -> ProviderResult<Vec<GasHistoryPoint>> {
        let path = format!("/gas/history?breakdown={}&mins={}", breakdown, mins);
        let response: HistoryResponse = self.get_json(&path)?;
        Ok(response.history)
    }

    /// Predicted confirmation times, optionally anchored at a gas price.
    pub fn conf_time_spread(&self, gas_price: Option<f64>) -> ProviderResult<Vec<ConfTimePoint>> {
        let path = match gas_price {
            Some(price) => format!("/gas/conf_time_spread?gas_price={}", price),
            None => "/gas/conf_time_spread".to_string(),
        };
        let response: SpreadResponse = self.get_json(&path)?;
        Ok(response.spread)
    }

    /// Lowest gas price expected to confirm within `minutes`.
    pub fn recommend_min_gas_price_to_confirm_in_time(&self, minutes: u32) -> ProviderResult<f64> {
        let path = format!("/gas/recommended?confirm_time_minutes={}", minutes);
        let response: RecommendedResponse = self.get_json(&path)?;
        Ok(response.gas_price)
    }

    /// Current network-condition advisories.
    pub fn gas_advisories(&self) -> ProviderResult<Vec<GasAdvisory>> {
        let response: AdvisoriesResponse = self.get_json("/gas/advisories")?;
        Ok(response.advisories)
    }

    /// Convert `amount` of `from` into `to`.
    pub fn convert_amount(&self, amount: f64, from: &str, to: &str) -> ProviderResult<f64> {
        let path = format!(
            "/conversion?amount={}&from={}&to={}",
            amount,
            urlencoding::encode(from),
            urlencoding::encode(to)
        );
        let response: ConversionResponse = self.get_json(&path)?;
        Ok(response.amount)
    }
}

/// Map a ureq error to a ProviderError.
pub(crate) fn map_error(error: ureq::Error) -> ProviderError {
    match error {
        ureq::Error::Status(code, response) => {
            let message = response
                .into_string()
                .unwrap_or_else(|_| "Unknown error".to_string());

            match code {
                401 => ProviderError::Unauthorized,
                404 => ProviderError::NotFound(message),
                429 => ProviderError::RateLimitExceeded,
                _ => ProviderError::ApiError {
                    status: code,
                    message,
                },
            }
        }
        ureq::Error::Transport(transport) => {
            if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                ProviderError::HttpError("Connection failed".to_string())
            } else if transport.kind() == ureq::ErrorKind::Io {
                ProviderError::Timeout
            } else {
                ProviderError::HttpError(transport.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let client = GasApiClient::with_base_url("https://gas.example.com".to_string(), None);

        assert_eq!(
            client.build_url("/gas/advisories"),
            "https://gas.example.com/gas/advisories"
        );

        assert_eq!(
            client.build_url("gas/advisories"),
            "https://gas.example.com/gas/advisories"
        );

        let client_with_slash =
            GasApiClient::with_base_url("https://gas.example.com/".to_string(), None);

        assert_eq!(
            client_with_slash.build_url("/gas/advisories"),
            "https://gas.example.com/gas/advisories"
        );
    }

    #[test]
    fn test_client_creation() {
        let config = Config {
            gas_api_url: Some("https://gas.example.com".to_string()),
            gas_api_key: Some("test-key-123".to_string()),
            ..Config::default()
        };

        let client = GasApiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://gas.example.com");
        assert_eq!(client.api_key.as_deref(), Some("test-key-123"));
    }

    #[test]
    fn test_client_creation_requires_url() {
        assert!(GasApiClient::new(&Config::default()).is_err());
    }
}
