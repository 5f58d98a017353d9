//! Async wrapper around the synchronous GasApiClient.
//!
//! Each call is moved onto `tokio::task::spawn_blocking` so the blocking
//! `ureq` request never stalls the async runtime.

use crate::client::GasApiClient;
use crate::domain::Breakdown;
use crate::error::{ProviderError, ProviderResult};
use crate::models::{ConfTimePoint, GasAdvisory, GasHistoryPoint};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of gas-market data.
///
/// Calls may be slow or rate-limited; callers decide whether to cache.
#[async_trait]
pub trait GasDataProvider: Send + Sync {
    async fn gas_history(
        &self,
        breakdown: Breakdown,
        granularity: u32,
    ) -> ProviderResult<Vec<GasHistoryPoint>>;

    async fn conf_time_spread(&self, gas_price: Option<f64>) -> ProviderResult<Vec<ConfTimePoint>>;

    async fn recommend_min_gas_price_to_confirm_in_time(&self, minutes: u32)
        -> ProviderResult<f64>;

    async fn gas_advisories(&self) -> ProviderResult<Vec<GasAdvisory>>;
}

/// Source of currency conversion rates.
#[async_trait]
pub trait ConversionProvider: Send + Sync {
    async fn convert_amount(&self, amount: f64, from: &str, to: &str) -> ProviderResult<f64>;
}

/// Async wrapper around the synchronous GasApiClient.
#[derive(Clone)]
pub struct AsyncGasClientImpl {
    client: Arc<GasApiClient>,
}

impl AsyncGasClientImpl {
    pub fn new(client: GasApiClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> ProviderError {
    ProviderError::HttpError(format!("Task join error: {}", e))
}

#[async_trait]
impl GasDataProvider for AsyncGasClientImpl {
    async fn gas_history(
        &self,
        breakdown: Breakdown,
        granularity: u32,
    ) -> ProviderResult<Vec<GasHistoryPoint>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.gas_history(breakdown, granularity))
            .await
            .map_err(join_error)?
    }

    async fn conf_time_spread(&self, gas_price: Option<f64>) -> ProviderResult<Vec<ConfTimePoint>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.conf_time_spread(gas_price))
            .await
            .map_err(join_error)?
    }

    async fn recommend_min_gas_price_to_confirm_in_time(
        &self,
        minutes: u32,
    ) -> ProviderResult<f64> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || {
            client.recommend_min_gas_price_to_confirm_in_time(minutes)
        })
        .await
        .map_err(join_error)?
    }

    async fn gas_advisories(&self) -> ProviderResult<Vec<GasAdvisory>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.gas_advisories())
            .await
            .map_err(join_error)?
    }
}

#[async_trait]
impl ConversionProvider for AsyncGasClientImpl {
    async fn convert_amount(&self, amount: f64, from: &str, to: &str) -> ProviderResult<f64> {
        let client = self.client.clone();
        let from = from.to_string();
        let to = to.to_string();

        tokio::task::spawn_blocking(move || client.convert_amount(amount, &from, &to))
            .await
            .map_err(join_error)?
    }
}
