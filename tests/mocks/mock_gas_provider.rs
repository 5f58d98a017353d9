use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use gitcoin_mcp_server::client::GasDataProvider;
use gitcoin_mcp_server::domain::Breakdown;
use gitcoin_mcp_server::error::{ProviderError, ProviderResult};
use gitcoin_mcp_server::models::{ConfTimePoint, GasAdvisory, GasHistoryPoint};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock gas data provider for testing.
///
/// Serves canned history, spread, recommendation and advisories, and tracks
/// method calls (and the spread anchors it was asked for) for verification.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockGasProvider {
    histories: Arc<Mutex<HashMap<(Breakdown, u32), Vec<GasHistoryPoint>>>>,
    recommended: Arc<Mutex<f64>>,
    spread: Arc<Mutex<Vec<ConfTimePoint>>>,
    advisories: Arc<Mutex<Vec<GasAdvisory>>>,
    failing: Arc<Mutex<bool>>,
    history_delay: Arc<Mutex<Option<Duration>>>,
    spread_requests: Arc<Mutex<Vec<Option<f64>>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockGasProvider {
    /// A provider recommending 20 gwei with a two-point spread and no history.
    pub fn new() -> Self {
        Self {
            histories: Arc::new(Mutex::new(HashMap::new())),
            recommended: Arc::new(Mutex::new(20.0)),
            spread: Arc::new(Mutex::new(vec![
                ConfTimePoint {
                    gas_price: 1.0,
                    mins: 120.0,
                },
                ConfTimePoint {
                    gas_price: 20.0,
                    mins: 3.5,
                },
            ])),
            advisories: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(false)),
            history_delay: Arc::new(Mutex::new(None)),
            spread_requests: Arc::new(Mutex::new(Vec::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// A history sample for building fixtures.
    pub fn point(gas_price: f64, hour: u32) -> GasHistoryPoint {
        GasHistoryPoint {
            gas_price,
            created_on: Utc.with_ymd_and_hms(2022, 5, 1, hour, 0, 0).unwrap(),
        }
    }

    pub fn set_history(&self, breakdown: Breakdown, mins: u32, points: Vec<GasHistoryPoint>) {
        self.histories
            .lock()
            .unwrap()
            .insert((breakdown, mins), points);
    }

    pub fn set_recommended(&self, price: f64) {
        *self.recommended.lock().unwrap() = price;
    }

    pub fn set_advisories(&self, advisories: Vec<GasAdvisory>) {
        *self.advisories.lock().unwrap() = advisories;
    }

    /// Make every call fail with a timeout.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Sleep for `delay` inside every history request before answering.
    pub fn set_history_delay(&self, delay: Duration) {
        *self.history_delay.lock().unwrap() = Some(delay);
    }

    /// The `gas_price` argument of every spread request, in call order.
    pub fn spread_requests(&self) -> Vec<Option<f64>> {
        self.spread_requests.lock().unwrap().clone()
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Reset all call counts.
    pub fn reset_call_counts(&self) {
        self.call_counts.lock().unwrap().clear();
    }

    fn track_call(&self, method: &str) -> ProviderResult<()> {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;

        if *self.failing.lock().unwrap() {
            return Err(ProviderError::Timeout);
        }
        Ok(())
    }
}

impl Default for MockGasProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GasDataProvider for MockGasProvider {
    async fn gas_history(
        &self,
        breakdown: Breakdown,
        granularity: u32,
    ) -> ProviderResult<Vec<GasHistoryPoint>> {
        self.track_call("gas_history")?;
        let delay = *self.history_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let histories = self.histories.lock().unwrap();
        Ok(histories
            .get(&(breakdown, granularity))
            .cloned()
            .unwrap_or_default())
    }

    async fn conf_time_spread(&self, gas_price: Option<f64>) -> ProviderResult<Vec<ConfTimePoint>> {
        self.spread_requests.lock().unwrap().push(gas_price);
        self.track_call("conf_time_spread")?;
        Ok(self.spread.lock().unwrap().clone())
    }

    async fn recommend_min_gas_price_to_confirm_in_time(
        &self,
        _minutes: u32,
    ) -> ProviderResult<f64> {
        self.track_call("recommend_min_gas_price_to_confirm_in_time")?;
        Ok(*self.recommended.lock().unwrap())
    }

    async fn gas_advisories(&self) -> ProviderResult<Vec<GasAdvisory>> {
        self.track_call("gas_advisories")?;
        Ok(self.advisories.lock().unwrap().clone())
    }
}
