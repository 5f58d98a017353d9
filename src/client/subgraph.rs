//! GraphQL client for The Graph subgraphs.

use crate::client::map_error;
use crate::error::{ProviderError, ProviderResult};
use crate::metrics::{HttpTimer, Metrics};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: T,
}

/// Synchronous client that POSTs `{"query": ...}` to one endpoint.
#[derive(Clone)]
pub struct SubgraphClient {
    url: String,
    agent: Arc<ureq::Agent>,
    metrics: Metrics,
}

impl SubgraphClient {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .build();

        Self {
            url: url.into(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run `query` and decode the `data` member of the response.
    ///
    /// Anything but a 200 fails with [`ProviderError::QueryFailed`], carrying
    /// the status and the query text.
    pub fn run_query<T: DeserializeOwned>(&self, query: &str) -> ProviderResult<T> {
        let timer = HttpTimer::new(self.metrics.clone());

        tracing::debug!("POST {} (graphql)", self.url);

        let result = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_json(serde_json::json!({ "query": query }));

        let response = match result {
            Ok(response) if response.status() == 200 => {
                timer.complete();
                response
            }
            Ok(response) => {
                timer.complete_with_error();
                return Err(ProviderError::QueryFailed {
                    status: response.status(),
                    query: query.to_string(),
                });
            }
            Err(ureq::Error::Status(status, _)) => {
                timer.complete_with_error();
                return Err(ProviderError::QueryFailed {
                    status,
                    query: query.to_string(),
                });
            }
            Err(e) => {
                timer.complete_with_error();
                return Err(map_error(e));
            }
        };

        let body = response
            .into_string()
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        let envelope: GraphQlResponse<T> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }
}
