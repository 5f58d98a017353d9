use async_trait::async_trait;
use gitcoin_mcp_server::client::ConversionProvider;
use gitcoin_mcp_server::error::ProviderResult;
use std::sync::{Arc, Mutex};

/// Mock FX provider converting at a single fixed rate.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockConversionProvider {
    rate: Arc<Mutex<f64>>,
}

#[allow(dead_code)]
impl MockConversionProvider {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: Arc::new(Mutex::new(rate)),
        }
    }

    pub fn set_rate(&self, rate: f64) {
        *self.rate.lock().unwrap() = rate;
    }
}

#[async_trait]
impl ConversionProvider for MockConversionProvider {
    async fn convert_amount(&self, amount: f64, _from: &str, _to: &str) -> ProviderResult<f64> {
        Ok(amount * *self.rate.lock().unwrap())
    }
}
